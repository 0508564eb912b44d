//! Pure state transitions for the slopes engine.
//!
//! `transition` is the single source of truth for action → state changes. It
//! clones its input, applies exactly one action, and returns the new state.
//! It does NOT:
//! - Persist parameters
//! - Emit analytics events
//! - Recompute derived values (callers ask the new state for its read model)

mod machine;
mod parameters;

use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::{Action, EngineError, EngineState};

/// Everything a transition needs from the outside world: the current time for
/// batch coalescing and entropy for shuffle and fresh seeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub now: Instant,
    pub entropy: u64,
}

impl Tick {
    pub fn new(now: Instant, entropy: u64) -> Self {
        Self { now, entropy }
    }

    pub(crate) fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.entropy)
    }
}

/// Apply one action. Returns the new state, or an error when the action
/// violates the caller contract (unknown or mistyped parameter); the input
/// is left as it was either way.
pub fn transition(state: &EngineState, action: &Action, tick: &Tick) -> Result<EngineState, EngineError> {
    let mut next = state.clone();
    match action {
        Action::ToggleParameter { name } => parameters::toggle(&mut next, *name)?,
        Action::TweakParameter { values } => parameters::tweak(&mut next, values, tick.now)?,
        Action::Undo => parameters::undo(&mut next)?,
        Action::Shuffle => machine::shuffle(&mut next, tick),
        Action::ToggleMachinePower => machine::toggle_power(&mut next, tick),
        Action::Unknown => {
            log::debug!(target: "engine", "ignoring unknown action");
        }
    }
    Ok(next)
}

/// A machine that is off but has live amounts again (after a tweak, shuffle
/// or undo) counts as switched back on.
fn wake_if_live(state: &mut EngineState) {
    if !state.is_powered_on && !state.parameters.is_blank() {
        log::debug!(target: "engine", "amounts live again, powering on");
        state.is_powered_on = true;
    }
}
