use std::time::Instant;

use crate::{EngineError, EngineState, ParamKind, ParamName, ParameterSnapshot};

pub(super) fn toggle(state: &mut EngineState, name: ParamName) -> Result<(), EngineError> {
    if name.kind() != ParamKind::Flag {
        return Err(EngineError::NotToggleable(name));
    }
    let params = &mut state.parameters;
    let current = params.flag(name).ok_or(EngineError::NotToggleable(name))?;
    if let Some(slot) = params.flag_mut(name) {
        *slot = !current;
    }
    Ok(())
}

/// Merge `values` into the parameters and record the overwritten values for undo.
/// An empty tweak changes nothing and records nothing.
pub(super) fn tweak(
    state: &mut EngineState,
    values: &ParameterSnapshot,
    now: Instant,
) -> Result<(), EngineError> {
    if values.is_empty() {
        return Ok(());
    }
    let pre_values = state.parameters.snapshot(values.keys().copied());
    state.parameters.apply(values)?;
    state.history.record(pre_values, now);
    state.animate_transitions = true;
    super::wake_if_live(state);
    Ok(())
}

pub(super) fn undo(state: &mut EngineState) -> Result<(), EngineError> {
    let Some(entry) = state.history.pop() else {
        return Ok(());
    };
    state.parameters.apply(&entry.changed_parameters)?;
    super::wake_if_live(state);
    Ok(())
}
