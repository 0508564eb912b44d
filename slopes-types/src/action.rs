//! Action protocol dispatched by the UI and consumed by the reducer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::param::{ParamName, ParamValue, ParameterSnapshot};

/// A closed, tagged set of user intents.
///
/// On the wire: `{"type": "tweakParameter", "values": {"amplitudeAmount": 80}}`.
/// Any unrecognised `type` decodes to `Unknown`, which the reducer ignores.
/// Parameter names are resolved through `ParamName::from_str`, so a bad name
/// fails with `EngineError::InvalidParameterName`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", try_from = "WireAction")]
pub enum Action {
    /// Flip a boolean parameter. Not recorded in history.
    ToggleParameter { name: ParamName },
    /// Set one or more parameters; recorded in history, coalesced per batch.
    TweakParameter { values: ParameterSnapshot },
    /// Randomize the parameter set.
    Shuffle,
    /// Power the machine off (all amounts to zero) or back on (defaults).
    ToggleMachinePower,
    /// Restore the values recorded by the newest history entry.
    Undo,
    Unknown,
}

/// An action as it arrives on the wire, before parameter names are checked.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WireAction {
    ToggleParameter { name: String },
    TweakParameter { values: BTreeMap<String, ParamValue> },
    Shuffle,
    ToggleMachinePower,
    Undo,
    #[serde(other)]
    Unknown,
}

impl TryFrom<WireAction> for Action {
    type Error = EngineError;

    fn try_from(wire: WireAction) -> Result<Self, Self::Error> {
        Ok(match wire {
            WireAction::ToggleParameter { name } => Action::ToggleParameter { name: name.parse()? },
            WireAction::TweakParameter { values } => Action::TweakParameter {
                values: values
                    .into_iter()
                    .map(|(name, value)| Ok((name.parse::<ParamName>()?, value)))
                    .collect::<Result<ParameterSnapshot, EngineError>>()?,
            },
            WireAction::Shuffle => Action::Shuffle,
            WireAction::ToggleMachinePower => Action::ToggleMachinePower,
            WireAction::Undo => Action::Undo,
            WireAction::Unknown => Action::Unknown,
        })
    }
}

impl Action {
    /// Build a toggle from a user-supplied name.
    pub fn toggle(name: &str) -> Result<Self, EngineError> {
        Ok(Action::ToggleParameter { name: name.parse()? })
    }

    /// Build a single-key tweak from user-supplied text, parsed per the parameter's kind.
    pub fn tweak(name: &str, value: &str) -> Result<Self, EngineError> {
        let name: ParamName = name.parse()?;
        let value = name.parse_value(value)?;
        Ok(Self::tweak_one(name, value))
    }

    pub fn tweak_one(name: ParamName, value: ParamValue) -> Self {
        Action::TweakParameter {
            values: [(name, value)].into_iter().collect(),
        }
    }

    /// Parameters this action targets by name. Empty for whole-set actions.
    pub fn control_names(&self) -> Vec<ParamName> {
        match self {
            Action::ToggleParameter { name } => vec![*name],
            Action::TweakParameter { values } => values.keys().copied().collect(),
            _ => Vec::new(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Action::ToggleParameter { .. } => "toggleParameter",
            Action::TweakParameter { .. } => "tweakParameter",
            Action::Shuffle => "shuffle",
            Action::ToggleMachinePower => "toggleMachinePower",
            Action::Undo => "undo",
            Action::Unknown => "unknown",
        }
    }
}
