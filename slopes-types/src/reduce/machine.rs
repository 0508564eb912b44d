use crate::shuffle::{fresh_seed, shuffle as shuffle_parameters};
use crate::{EngineState, Parameters};

use super::Tick;

pub(super) fn shuffle(state: &mut EngineState, tick: &Tick) {
    let mut rng = tick.rng();
    state.parameters = shuffle_parameters(&state.parameters, &mut rng);
    state.animate_transitions = true;
    super::wake_if_live(state);
}

/// Off: every amount drops to zero, flags stay. On: back to defaults with a
/// fresh seed, keeping only the cosmetic flags. Neither direction animates.
pub(super) fn toggle_power(state: &mut EngineState, tick: &Tick) {
    state.animate_transitions = false;

    if state.is_powered_on {
        state.is_powered_on = false;
        state.parameters.power_off();
        log::debug!(target: "engine", "machine powered off");
        return;
    }

    let mut rng = tick.rng();
    let mut params = Parameters::defaults_with_seed(fresh_seed(&mut rng));
    params.enable_dark_mode = state.parameters.enable_dark_mode;
    params.enable_margins = state.parameters.enable_margins;
    state.parameters = params;
    state.is_powered_on = true;
    log::debug!(target: "engine", "machine powered on with seed {}", state.parameters.seed);
}
