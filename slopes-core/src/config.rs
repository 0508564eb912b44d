use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    history: HistoryConfig,
    #[serde(default)]
    effects: EffectsConfig,
    #[serde(default)]
    storage: StorageConfig,
}

#[derive(Deserialize, Default)]
struct HistoryConfig {
    coalesce_window_ms: Option<u64>,
}

#[derive(Deserialize, Default)]
struct EffectsConfig {
    persist: Option<bool>,
    analytics: Option<bool>,
    persist_debounce_ms: Option<u64>,
    analytics_debounce_ms: Option<u64>,
}

#[derive(Deserialize, Default)]
struct StorageConfig {
    path: Option<PathBuf>,
}

pub struct Config {
    history: HistoryConfig,
    effects: EffectsConfig,
    storage: StorageConfig,
}

impl Config {
    /// Embedded defaults overlaid with the user's config file, if any.
    pub fn load() -> Self {
        Self::load_from(user_config_path().as_deref())
    }

    /// Embedded defaults overlaid with the file at `path`. A missing or
    /// malformed file is logged and ignored.
    pub fn load_from(path: Option<&Path>) -> Self {
        let mut base: ConfigFile =
            toml::from_str(DEFAULT_CONFIG).expect("Failed to parse embedded config.toml");

        if let Some(path) = path {
            if path.exists() {
                match std::fs::read_to_string(path) {
                    Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                        Ok(user) => merge(&mut base, user),
                        Err(e) => {
                            log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                        }
                    },
                    Err(e) => {
                        log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
                    }
                }
            }
        }

        Config {
            history: base.history,
            effects: base.effects,
            storage: base.storage,
        }
    }

    /// Undo coalescing window (clamped to 1..=5000 ms).
    pub fn coalesce_window(&self) -> Duration {
        let ms = self.history.coalesce_window_ms.unwrap_or(600).clamp(1, 5_000);
        Duration::from_millis(ms)
    }

    pub fn persist_enabled(&self) -> bool {
        self.effects.persist.unwrap_or(true)
    }

    pub fn analytics_enabled(&self) -> bool {
        self.effects.analytics.unwrap_or(true)
    }

    pub fn persist_debounce(&self) -> Duration {
        Duration::from_millis(self.effects.persist_debounce_ms.unwrap_or(1000).min(60_000))
    }

    pub fn analytics_debounce(&self) -> Duration {
        Duration::from_millis(self.effects.analytics_debounce_ms.unwrap_or(600).min(60_000))
    }

    /// Where the parameter set is persisted.
    pub fn storage_path(&self) -> PathBuf {
        self.storage
            .path
            .clone()
            .unwrap_or_else(crate::persistence::default_storage_path)
    }
}

pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("slopes").join("config.toml"))
}

fn merge(base: &mut ConfigFile, user: ConfigFile) {
    if user.history.coalesce_window_ms.is_some() {
        base.history.coalesce_window_ms = user.history.coalesce_window_ms;
    }
    if user.effects.persist.is_some() {
        base.effects.persist = user.effects.persist;
    }
    if user.effects.analytics.is_some() {
        base.effects.analytics = user.effects.analytics;
    }
    if user.effects.persist_debounce_ms.is_some() {
        base.effects.persist_debounce_ms = user.effects.persist_debounce_ms;
    }
    if user.effects.analytics_debounce_ms.is_some() {
        base.effects.analytics_debounce_ms = user.effects.analytics_debounce_ms;
    }
    if user.storage.path.is_some() {
        base.storage.path = user.storage.path;
    }
}
