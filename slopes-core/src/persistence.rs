//! Parameter persistence: the last session's parameter set as a flat JSON object.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use slopes_types::Parameters;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not encode parameters: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Key-value storage for the parameter set. `load` returns `None` when no record exists.
pub trait ParameterStore: Send + Sync {
    fn load(&self) -> Result<Option<Parameters>, PersistError>;
    fn save(&self, params: &Parameters) -> Result<(), PersistError>;
}

pub fn default_storage_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("slopes")
        .join("parameters.json")
}

/// Stores the parameter set as pretty-printed JSON in a single file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ParameterStore for JsonFileStore {
    /// A missing file is "absent". A file that does not decode is logged and
    /// also treated as absent so a bad record never blocks a session.
    fn load(&self) -> Result<Option<Parameters>, PersistError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(PersistError::Io { path: self.path.clone(), source });
            }
        };
        match serde_json::from_str::<Parameters>(&contents) {
            Ok(params) => Ok(Some(params.clamped())),
            Err(e) => {
                log::warn!(target: "persist", "ignoring unreadable parameters in {}: {}", self.path.display(), e);
                Ok(None)
            }
        }
    }

    fn save(&self, params: &Parameters) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|source| PersistError::Io { path: parent.to_path_buf(), source })?;
        }
        let json = serde_json::to_string_pretty(params)?;
        std::fs::write(&self.path, json)
            .map_err(|source| PersistError::Io { path: self.path.clone(), source })?;
        log::debug!(target: "persist", "saved parameters to {}", self.path.display());
        Ok(())
    }
}

/// In-process store, for tests and for sessions that should not touch disk.
#[derive(Default)]
pub struct MemoryStore {
    record: Mutex<Option<Parameters>>,
    saves: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(params: Parameters) -> Self {
        Self { record: Mutex::new(Some(params)), saves: Mutex::new(0) }
    }

    /// How many times `save` has run.
    pub fn save_count(&self) -> usize {
        self.saves.lock().map(|n| *n).unwrap_or(0)
    }

    pub fn record(&self) -> Option<Parameters> {
        self.record.lock().ok().and_then(|r| r.clone())
    }
}

impl ParameterStore for MemoryStore {
    fn load(&self) -> Result<Option<Parameters>, PersistError> {
        Ok(self.record())
    }

    fn save(&self, params: &Parameters) -> Result<(), PersistError> {
        if let Ok(mut record) = self.record.lock() {
            *record = Some(params.clone());
        }
        if let Ok(mut saves) = self.saves.lock() {
            *saves += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nope.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("parameters.json"));
        let mut params = Parameters::default();
        params.omega = 33.0;
        params.enable_mirrored = true;
        store.save(&params).unwrap();
        assert_eq!(store.load().unwrap(), Some(params));
    }

    #[test]
    fn record_keys_are_parameter_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("parameters.json"));
        store.save(&Parameters::default()).unwrap();
        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["amplitudeAmount"], serde_json::json!(50.0));
        assert_eq!(raw["enableMirrored"], serde_json::json!(false));
    }

    #[test]
    fn corrupt_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("parameters.json");
        std::fs::write(&path, "{\"seed\": ").unwrap();
        assert!(JsonFileStore::new(path).load().unwrap().is_none());
    }

    #[test]
    fn out_of_range_record_is_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("parameters.json");
        let mut json = serde_json::to_value(Parameters::default()).unwrap();
        json["lineAmount"] = serde_json::json!(400.0);
        std::fs::write(&path, json.to_string()).unwrap();
        let loaded = JsonFileStore::new(path).load().unwrap().unwrap();
        assert_eq!(loaded.line_amount, 100.0);
    }

    #[test]
    fn memory_store_counts_saves() {
        let store = MemoryStore::new();
        assert!(store.load().unwrap().is_none());
        store.save(&Parameters::default()).unwrap();
        store.save(&Parameters::default()).unwrap();
        assert_eq!(store.save_count(), 2);
        assert_eq!(store.record(), Some(Parameters::default()));
    }
}
