//! End-to-end behaviour of a session: dispatch through the store, read the model back.

mod common;

use std::time::Duration;

use common::{observed_store, quiet_store, send, tweak, TestClock};
use slopes_core::effects::EffectTriggers;
use slopes_core::persistence::{JsonFileStore, ParameterStore};
use slopes_core::Store;
use slopes_types::{
    Action, Curve, Dispatcher, EngineError, ParamKind, ParamName, ParamValue, Parameters,
    DEFAULT_COALESCE_WINDOW, DEFAULT_SEED, HISTORY_SIZE_LIMIT,
};

const PAUSE: Duration = Duration::from_millis(700);
const BURST: Duration = Duration::from_millis(100);

#[test]
fn tweak_from_defaults() {
    let mut store = quiet_store();
    let mut clock = TestClock::new();
    let model = tweak(&mut store, &mut clock, ParamName::AmplitudeAmount, 80.0);
    assert_eq!(model.parameters.amplitude_amount, 80.0);
    assert_eq!(store.state().history.len(), 1);
}

#[test]
fn second_tweak_inside_window_extends_the_batch() {
    let mut store = quiet_store();
    let mut clock = TestClock::new();
    tweak(&mut store, &mut clock, ParamName::AmplitudeAmount, 80.0);
    clock.advance(BURST);
    tweak(&mut store, &mut clock, ParamName::Wavelength, 40.0);

    let history = &store.state().history;
    assert_eq!(history.len(), 1);
    let entry = history.last().unwrap();
    assert_eq!(entry.changed_parameters[&ParamName::AmplitudeAmount], ParamValue::Float(50.0));
    assert!(entry.changed_parameters.contains_key(&ParamName::Wavelength));
}

#[test]
fn undo_after_tweak() {
    let mut store = quiet_store();
    let mut clock = TestClock::new();
    tweak(&mut store, &mut clock, ParamName::AmplitudeAmount, 80.0);
    let model = send(&mut store, &mut clock, Action::Undo);
    assert_eq!(model.parameters.amplitude_amount, 50.0);
    assert!(store.state().history.is_empty());
}

#[test]
fn power_off_then_on() {
    let mut store = quiet_store();
    let mut clock = TestClock::new();

    let off = send(&mut store, &mut clock, Action::ToggleMachinePower);
    assert!(!off.is_powered_on);
    assert_eq!(off.parameters.line_amount, 0.0);
    let dark_mode = off.parameters.enable_dark_mode;

    let on = send(&mut store, &mut clock, Action::ToggleMachinePower);
    assert!(on.is_powered_on);
    assert_eq!(on.parameters.line_amount, 45.0);
    assert_eq!(on.parameters.enable_dark_mode, dark_mode);
    assert_ne!(on.parameters.seed, DEFAULT_SEED);
}

#[test]
fn empty_undo_changes_nothing() {
    let mut store = quiet_store();
    let mut clock = TestClock::new();
    let before = store.state().clone();
    send(&mut store, &mut clock, Action::Undo);
    assert_eq!(store.state(), &before);
}

#[test]
fn history_is_bounded_across_batches() {
    let mut store = quiet_store();
    let mut clock = TestClock::new();
    for i in 0..12 {
        tweak(&mut store, &mut clock, ParamName::BallSize, i as f32);
        assert!(store.state().history.len() <= HISTORY_SIZE_LIMIT);
        clock.advance(PAUSE);
    }
    assert_eq!(store.state().history.len(), HISTORY_SIZE_LIMIT);

    // five undos walk back five batches, the sixth finds nothing
    for _ in 0..HISTORY_SIZE_LIMIT {
        send(&mut store, &mut clock, Action::Undo);
    }
    assert_eq!(store.state().parameters.ball_size, 6.0);
    send(&mut store, &mut clock, Action::Undo);
    assert_eq!(store.state().parameters.ball_size, 6.0);
}

#[test]
fn window_boundary() {
    let mut store = quiet_store();
    let mut clock = TestClock::new();
    tweak(&mut store, &mut clock, ParamName::Omega, 10.0);
    clock.advance(DEFAULT_COALESCE_WINDOW);
    tweak(&mut store, &mut clock, ParamName::Omega, 20.0);
    assert_eq!(store.state().history.len(), 2);
}

#[test]
fn shuffles_stay_valid() {
    let mut store = quiet_store();
    for _ in 0..200 {
        let model = store.dispatch(&Action::Shuffle).unwrap();
        for name in ParamName::powered() {
            if let ParamKind::Amount(range) = name.kind() {
                assert!(range.contains(model.parameters.amount(name).unwrap()));
            }
        }
        assert!(!model.parameters.is_blank());
    }
    assert!(store.state().history.is_empty());
}

#[test]
fn unknown_json_action_is_ignored() {
    let mut store = quiet_store();
    let before = store.state().clone();
    let action: Action = serde_json::from_str(r#"{"type":"explode","force":9000}"#).unwrap();
    store.dispatch(&action).unwrap();
    assert_eq!(store.state(), &before);
}

#[test]
fn invalid_name_is_reported() {
    assert_eq!(
        Action::tweak("brightness", "3"),
        Err(EngineError::InvalidParameterName("brightness".to_string()))
    );
}

#[test]
fn effects_follow_settled_state() {
    let (mut store, params, sink) = observed_store(Duration::from_millis(100));
    let mut clock = TestClock::new();

    for v in [10.0, 20.0, 30.0] {
        tweak(&mut store, &mut clock, ParamName::DotAmount, v);
    }
    send(&mut store, &mut clock, Action::Shuffle);
    let shuffled: Parameters = store.state().parameters.clone();
    std::thread::sleep(Duration::from_millis(600));

    assert_eq!(params.save_count(), 1);
    assert_eq!(params.record(), Some(shuffled));

    let events = sink.events();
    let controls: Vec<_> = events.iter().filter_map(|e| e.control_name.clone()).collect();
    assert_eq!(controls, vec!["dotAmount".to_string()]);
    assert!(events.iter().any(|e| e.event_name == "shuffle"));
}

#[test]
fn undo_works_after_loading_a_broken_curve() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("parameters.json");
    let mut json = serde_json::to_value(Parameters::default()).unwrap();
    json["peaksCurve"] = serde_json::json!([[5.0, -3.0]]);
    json["omega"] = serde_json::json!(12.0);
    std::fs::write(&path, json.to_string()).unwrap();

    let disk = JsonFileStore::new(&path);
    let loaded = disk.load().unwrap().expect("record kept");
    assert_eq!(loaded.peaks_curve, Curve::peaks_default());
    assert_eq!(loaded.omega, 12.0);

    let mut store = Store::open(DEFAULT_COALESCE_WINDOW, None, &disk, EffectTriggers::disabled());
    let mut clock = TestClock::new();
    let curve = Action::tweak("peaksCurve", "0,0 0.4,0.9 1,1").unwrap();
    send(&mut store, &mut clock, curve);
    let model = store.dispatch_at(&Action::Undo, &clock.tick()).unwrap();
    assert_eq!(model.parameters.peaks_curve, Curve::peaks_default());
}
