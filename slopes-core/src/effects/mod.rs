//! Side effects fired after each settled state: parameter persistence and
//! analytics. Both are fire-and-forget; failures are logged and never reach
//! the reducer.

mod debounce;

pub use debounce::Debouncer;

use std::sync::Arc;
use std::time::Duration;

use slopes_types::{Action, EngineState, ParamName, Parameters};

use crate::analytics::{self, AnalyticsEvent, AnalyticsSink};
use crate::config::Config;
use crate::persistence::ParameterStore;

pub struct EffectTriggers {
    persist: Option<Debouncer<(), Parameters>>,
    analytics: Option<Debouncer<ParamName, ()>>,
    sink: Option<Arc<dyn AnalyticsSink>>,
}

impl EffectTriggers {
    /// Effects as configured: each trigger can be switched off in config.
    pub fn from_config(
        config: &Config,
        store: Arc<dyn ParameterStore>,
        sink: Arc<dyn AnalyticsSink>,
    ) -> Self {
        let persist_delay = config.persist_enabled().then(|| config.persist_debounce());
        let analytics_delay = config.analytics_enabled().then(|| config.analytics_debounce());
        Self::spawn(persist_delay, analytics_delay, store, sink)
    }

    /// Spawn the enabled triggers. `None` disables a trigger. A worker that
    /// fails to start is logged and treated as disabled.
    pub fn spawn(
        persist_delay: Option<Duration>,
        analytics_delay: Option<Duration>,
        store: Arc<dyn ParameterStore>,
        sink: Arc<dyn AnalyticsSink>,
    ) -> Self {
        let persist = persist_delay.and_then(|delay| {
            let spawned = Debouncer::spawn("slopes-persist", delay, move |(), params: Parameters| {
                if let Err(e) = store.save(&params) {
                    log::warn!(target: "persist", "could not save parameters: {}", e);
                }
            });
            spawned
                .map_err(|e| log::warn!(target: "persist", "persistence disabled: {}", e))
                .ok()
        });

        let analytics = analytics_delay.and_then(|delay| {
            let sink = Arc::clone(&sink);
            let spawned = Debouncer::spawn("slopes-analytics", delay, move |name: ParamName, ()| {
                emit(sink.as_ref(), &AnalyticsEvent::control_changed(name));
            });
            spawned
                .map_err(|e| log::warn!(target: "analytics", "analytics disabled: {}", e))
                .ok()
        });

        let sink = analytics.as_ref().map(|_| sink);
        Self { persist, analytics, sink }
    }

    /// Effects that never do anything.
    pub fn disabled() -> Self {
        Self { persist: None, analytics: None, sink: None }
    }

    /// Hand a settled state to the triggers.
    pub fn observe(&self, action: &Action, settled: &EngineState) {
        if let Some(persist) = &self.persist {
            persist.call((), settled.parameters.clone());
        }

        let (controls, machine_event) = analytics::events_for(action);
        if let Some(debouncer) = &self.analytics {
            for name in controls {
                debouncer.call(name, ());
            }
        }
        if let (Some(sink), Some(event)) = (&self.sink, machine_event) {
            emit(sink.as_ref(), &event);
        }
    }
}

fn emit(sink: &dyn AnalyticsSink, event: &AnalyticsEvent) {
    if let Err(e) = sink.emit(event) {
        log::warn!(target: "analytics", "dropping {} event: {}", event.event_name, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::MemorySink;
    use crate::persistence::{MemoryStore, PersistError};
    use std::thread;

    struct BrokenStore;

    impl ParameterStore for BrokenStore {
        fn load(&self) -> Result<Option<Parameters>, PersistError> {
            Ok(None)
        }
        fn save(&self, _: &Parameters) -> Result<(), PersistError> {
            Err(PersistError::Io {
                path: "/dev/null/parameters.json".into(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk on fire"),
            })
        }
    }

    fn short() -> Option<Duration> {
        Some(Duration::from_millis(30))
    }

    #[test]
    fn burst_of_states_saves_once() {
        let store = Arc::new(MemoryStore::new());
        let sink = Arc::new(MemorySink::new());
        let effects = EffectTriggers::spawn(short(), short(), store.clone(), sink.clone());

        let mut state = EngineState::new(Parameters::default());
        for v in [10.0, 20.0, 30.0] {
            state.parameters.omega = v;
            effects.observe(&Action::Unknown, &state);
        }
        thread::sleep(Duration::from_millis(300));
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.record().unwrap().omega, 30.0);
    }

    #[test]
    fn control_events_coalesce_per_name() {
        let store = Arc::new(MemoryStore::new());
        let sink = Arc::new(MemorySink::new());
        let effects = EffectTriggers::spawn(None, short(), store, sink.clone());
        let state = EngineState::new(Parameters::default());

        for _ in 0..5 {
            effects.observe(&Action::ToggleParameter { name: ParamName::EnableMargins }, &state);
        }
        effects.observe(&Action::ToggleParameter { name: ParamName::EnableOcclusion }, &state);
        thread::sleep(Duration::from_millis(300));

        let mut controls: Vec<_> = sink.events().into_iter().filter_map(|e| e.control_name).collect();
        controls.sort();
        assert_eq!(controls, vec!["enableMargins".to_string(), "enableOcclusion".to_string()]);
    }

    #[test]
    fn machine_events_are_immediate() {
        let sink = Arc::new(MemorySink::new());
        let effects = EffectTriggers::spawn(None, short(), Arc::new(MemoryStore::new()), sink.clone());
        let state = EngineState::new(Parameters::default());
        effects.observe(&Action::Shuffle, &state);
        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_name, analytics::SHUFFLE);
        assert_eq!(events[0].control_name, None);
    }

    #[test]
    fn save_failures_are_swallowed() {
        let effects =
            EffectTriggers::spawn(short(), None, Arc::new(BrokenStore), Arc::new(MemorySink::new()));
        effects.observe(&Action::Unknown, &EngineState::new(Parameters::default()));
        thread::sleep(Duration::from_millis(200));
        // still accepting work
        effects.observe(&Action::Unknown, &EngineState::new(Parameters::default()));
    }

    #[test]
    fn disabled_does_nothing() {
        let effects = EffectTriggers::disabled();
        effects.observe(&Action::Shuffle, &EngineState::new(Parameters::default()));
    }
}
