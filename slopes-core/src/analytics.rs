//! Analytics events. Transport is the sink's business; the engine only decides
//! which event fires for which action.

use std::sync::Mutex;

use serde::Serialize;
use slopes_types::{Action, ParamName};

pub const MACHINE_NAME: &str = "slopes";

pub const CHANGE_CONTROL_VALUE: &str = "change-control-value";
pub const SHUFFLE: &str = "shuffle";
pub const TOGGLE_MACHINE_POWER: &str = "toggle-machine-power";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub event_name: String,
    pub machine_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_name: Option<String>,
}

impl AnalyticsEvent {
    pub fn control_changed(name: ParamName) -> Self {
        Self {
            event_name: CHANGE_CONTROL_VALUE.to_string(),
            machine_name: MACHINE_NAME.to_string(),
            control_name: Some(name.as_str().to_string()),
        }
    }

    pub fn machine(event_name: &str) -> Self {
        Self {
            event_name: event_name.to_string(),
            machine_name: MACHINE_NAME.to_string(),
            control_name: None,
        }
    }
}

/// Which events an action produces, split into per-control events (debounced
/// per name by the caller) and whole-machine events (sent immediately).
pub fn events_for(action: &Action) -> (Vec<ParamName>, Option<AnalyticsEvent>) {
    match action {
        Action::ToggleParameter { .. } | Action::TweakParameter { .. } => (action.control_names(), None),
        Action::Shuffle => (Vec::new(), Some(AnalyticsEvent::machine(SHUFFLE))),
        Action::ToggleMachinePower => (Vec::new(), Some(AnalyticsEvent::machine(TOGGLE_MACHINE_POWER))),
        Action::Undo | Action::Unknown => (Vec::new(), None),
    }
}

pub trait AnalyticsSink: Send + Sync {
    fn emit(&self, event: &AnalyticsEvent) -> Result<(), String>;
}

/// Writes each event as a JSON line through the `log` facade.
pub struct LogSink;

impl AnalyticsSink for LogSink {
    fn emit(&self, event: &AnalyticsEvent) -> Result<(), String> {
        let line = serde_json::to_string(event).map_err(|e| e.to_string())?;
        log::info!(target: "analytics", "{}", line);
        Ok(())
    }
}

/// Keeps every event in memory.
#[derive(Default)]
pub struct MemorySink {
    events: Mutex<Vec<AnalyticsEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl AnalyticsSink for MemorySink {
    fn emit(&self, event: &AnalyticsEvent) -> Result<(), String> {
        self.events
            .lock()
            .map_err(|e| e.to_string())?
            .push(event.clone());
        Ok(())
    }
}
