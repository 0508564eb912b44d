//! # slopes-types
//!
//! Parameter state engine for the Slopes generative-art machine.
//!
//! Everything in this crate is pure: the parameter model, the action protocol,
//! the undo history with batch coalescing, the disabled-parameter resolver, the
//! randomizer, and the `transition` reducer that ties them together. Side effects
//! (persistence, analytics, timers) live in slopes-core.

pub mod action;
pub mod disabled;
mod dispatch;
mod error;
mod param;
pub mod reduce;
pub mod shuffle;
pub mod state;

pub use action::{Action, WireAction};
pub use dispatch::Dispatcher;
pub use error::EngineError;
pub use param::{
    AmountRange, Curve, ParamKind, ParamName, ParamValue, ParameterSnapshot, Parameters,
    DEFAULT_SEED, SEED_MAX,
};
pub use reduce::{transition, Tick};
pub use state::*;
