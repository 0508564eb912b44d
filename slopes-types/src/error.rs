use thiserror::Error;

use crate::param::ParamName;

/// Caller contract violations reported by the engine. State is never modified when one is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("unknown parameter name: {0:?}")]
    InvalidParameterName(String),

    #[error("parameter {name} expects a {expected} value")]
    KindMismatch { name: ParamName, expected: &'static str },

    #[error("parameter {0} is not a boolean and cannot be toggled")]
    NotToggleable(ParamName),

    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: ParamName, reason: String },
}
