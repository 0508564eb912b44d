pub mod undo;

use std::collections::BTreeSet;

use serde::Serialize;

use crate::disabled;
use crate::param::{ParamName, Parameters};

pub use undo::{HistoryEntry, UndoHistory, DEFAULT_COALESCE_WINDOW, HISTORY_SIZE_LIMIT};

/// Authoritative session state. Only `reduce::transition` produces new values of it.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineState {
    pub history: UndoHistory,
    /// Whether consumers should interpolate towards new values or snap to them.
    pub animate_transitions: bool,
    pub is_powered_on: bool,
    pub parameters: Parameters,
}

impl EngineState {
    pub fn new(parameters: Parameters) -> Self {
        Self::with_history(parameters, UndoHistory::new())
    }

    pub fn with_history(parameters: Parameters, history: UndoHistory) -> Self {
        Self {
            history,
            animate_transitions: true,
            is_powered_on: true,
            parameters,
        }
    }

    pub fn disabled_parameters(&self) -> BTreeSet<ParamName> {
        disabled::resolve(&self.parameters)
    }

    /// Derive what consumers see after a transition.
    pub fn read_model(&self) -> ReadModel {
        ReadModel {
            parameters: self.parameters.clone(),
            disabled_parameters: self.disabled_parameters(),
            animate_transitions: self.animate_transitions,
            is_powered_on: self.is_powered_on,
        }
    }
}

/// Immutable view handed to the renderer and other readers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadModel {
    pub parameters: Parameters,
    pub disabled_parameters: BTreeSet<ParamName>,
    pub animate_transitions: bool,
    pub is_powered_on: bool,
}
