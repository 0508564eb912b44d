//! The session's single writer of `EngineState`.

use std::time::{Duration, Instant};

use slopes_types::{
    transition, Action, Dispatcher, EngineError, EngineState, Parameters, ReadModel, Tick,
    UndoHistory,
};

use crate::effects::EffectTriggers;
use crate::persistence::ParameterStore;

/// Where a session's starting parameters came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialSource {
    Override,
    Persisted,
    Defaults,
}

/// Pick the starting parameters: explicit override, then the persisted
/// record, then fresh session defaults. A failing store counts as absent.
pub fn initial_parameters(
    override_params: Option<Parameters>,
    store: &dyn ParameterStore,
) -> (Parameters, InitialSource) {
    if let Some(params) = override_params {
        return (params.clamped(), InitialSource::Override);
    }
    match store.load() {
        Ok(Some(params)) => return (params, InitialSource::Persisted),
        Ok(None) => {}
        Err(e) => log::warn!(target: "store", "could not load parameters: {}", e),
    }
    (Parameters::session_defaults(&mut rand::thread_rng()), InitialSource::Defaults)
}

pub struct Store {
    state: EngineState,
    effects: EffectTriggers,
}

impl Store {
    pub fn new(state: EngineState, effects: EffectTriggers) -> Self {
        Self { state, effects }
    }

    /// Start a session with the given coalescing window.
    pub fn open(
        coalesce_window: Duration,
        override_params: Option<Parameters>,
        store: &dyn ParameterStore,
        effects: EffectTriggers,
    ) -> Self {
        let (parameters, source) = initial_parameters(override_params, store);
        log::info!(target: "store", "session starting from {:?} (seed {})", source, parameters.seed);
        let state = EngineState::with_history(parameters, UndoHistory::with_window(coalesce_window));
        Self::new(state, effects)
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn read_model(&self) -> ReadModel {
        self.state.read_model()
    }

    /// Apply an action at an explicit tick. On error the state is unchanged
    /// and no effects fire.
    pub fn dispatch_at(&mut self, action: &Action, tick: &Tick) -> Result<ReadModel, EngineError> {
        let next = transition(&self.state, action, tick).map_err(|e| {
            log::warn!(target: "store", "{} rejected: {}", action.label(), e);
            e
        })?;
        self.state = next;
        self.effects.observe(action, &self.state);
        Ok(self.state.read_model())
    }
}

impl Dispatcher for Store {
    fn dispatch(&mut self, action: &Action) -> Result<ReadModel, EngineError> {
        let tick = Tick::new(Instant::now(), rand::random());
        self.dispatch_at(action, &tick)
    }
}
