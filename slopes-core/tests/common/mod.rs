#![allow(dead_code)]
//! Test harness utilities for slopes-core integration tests.

use std::sync::Arc;
use std::time::{Duration, Instant};

use slopes_core::analytics::MemorySink;
use slopes_core::effects::EffectTriggers;
use slopes_core::persistence::MemoryStore;
use slopes_core::Store;
use slopes_types::{Action, EngineState, ParamName, ParamValue, Parameters, ReadModel, Tick};

/// A store over default parameters with no side effects.
pub fn quiet_store() -> Store {
    Store::new(EngineState::new(Parameters::default()), EffectTriggers::disabled())
}

/// A store wired to in-memory persistence and analytics with short delays.
pub fn observed_store(delay: Duration) -> (Store, Arc<MemoryStore>, Arc<MemorySink>) {
    let params = Arc::new(MemoryStore::new());
    let sink = Arc::new(MemorySink::new());
    let effects = EffectTriggers::spawn(Some(delay), Some(delay), params.clone(), sink.clone());
    let store = Store::new(EngineState::new(Parameters::default()), effects);
    (store, params, sink)
}

/// A clock the tests advance by hand.
pub struct TestClock {
    now: Instant,
    entropy: u64,
}

impl TestClock {
    pub fn new() -> Self {
        Self { now: Instant::now(), entropy: 1 }
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    pub fn tick(&mut self) -> Tick {
        self.entropy += 1;
        Tick::new(self.now, self.entropy)
    }
}

pub fn tweak(store: &mut Store, clock: &mut TestClock, name: ParamName, value: f32) -> ReadModel {
    let action = Action::tweak_one(name, ParamValue::Float(value));
    store.dispatch_at(&action, &clock.tick()).expect("tweak")
}

pub fn send(store: &mut Store, clock: &mut TestClock, action: Action) -> ReadModel {
    store.dispatch_at(&action, &clock.tick()).expect("dispatch")
}
