//! Dispatch abstraction over whoever owns the engine state.

use crate::{Action, EngineError, ReadModel};

/// Trait for dispatching actions to the state engine.
///
/// The owner applies the action, keeps the resulting state, and hands back the
/// derived read model. On error the owner's state is unchanged.
pub trait Dispatcher {
    fn dispatch(&mut self, action: &Action) -> Result<ReadModel, EngineError>;
}
