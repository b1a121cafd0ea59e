//! Transport integration tests
//!
//! Duration, head delay and playhead behavior as seen through the engine.

use tapeloop::prelude::*;
use tapeloop::transport::{derive, TransportInput};

#[path = "../helpers/mod.rs"]
mod helpers;
use helpers::tolerances::*;
use helpers::*;

/// Two anchors 250 apart, radius 12, speed 7.5, 5 units per inch.
#[test]
fn test_reference_scenario() {
    let engine = stadium_engine();
    let params = engine.params();

    assert!((params.physical_length - 115.1).abs() < 0.05);
    assert!((params.loop_duration_seconds - 15.35).abs() < 0.01);
    assert!((params.playback_speed_ratio - 1.0).abs() < TIME_EPSILON);
    assert!((params.head_delay_seconds - 12.0 / 7.5).abs() < TIME_EPSILON);
    assert_eq!(engine.profile(), SonicProfile::Mid);
}

#[test]
fn test_faster_tape_shortens_every_time() {
    let mut engine = stadium_engine();
    let mut last = engine.params();

    for speed in [9.0, 12.0, 15.0, 22.5, 30.0] {
        engine.set_speed(speed);
        engine.rebuild();
        let params = engine.params();
        assert!(params.loop_duration_seconds < last.loop_duration_seconds);
        assert!(params.head_delay_seconds < last.head_delay_seconds);
        assert!(params.tone_cutoff_hz > last.tone_cutoff_hz);
        last = params;
    }
}

#[test]
fn test_stopped_tape_yields_zero_times() {
    let mut engine = stadium_engine();
    engine.set_speed(0.0);
    engine.tick(1.0);

    let params = engine.params();
    assert_eq!(params.loop_duration_seconds, 0.0);
    assert_eq!(params.head_delay_seconds, 0.0);
    assert!(params.is_finite());
    assert_eq!(engine.playhead().traveled(), 0.0);
}

#[test]
fn test_head_separation_clamped_to_loop() {
    init_tracing();
    let mut engine = stadium_engine();
    engine.set_head_separation(1000.0);
    engine.rebuild();

    let params = engine.params();
    let config = engine.config();
    assert!(
        config.record_offset + params.head_separation + config.guard_gap
            <= params.physical_length + TIME_EPSILON
    );
    assert_eq!(engine.head_separation(), 1000.0);
}

/// Editing the path mid-playback keeps the tape at the same relative position.
#[test]
fn test_playhead_rescales_on_edit() {
    let mut engine = stadium_engine();
    engine.tick(4.0);
    let phase = engine.playhead().phase();

    let id = engine.add_guide().unwrap();
    engine.move_guide(id, Point::new(320.0, 320.0)).unwrap();
    engine.tick(0.0);

    let playhead = engine.playhead();
    assert!(playhead.loop_length() > 115.1);
    assert!((playhead.phase() - phase).abs() < 1e-12);
}

#[test]
fn test_backwards_playback_wraps_below_zero() {
    let mut engine = TapeLoopEngine::builder()
        .anchors(ANCHOR_A, ANCHOR_B)
        .direction(Direction::Backwards)
        .build()
        .unwrap();

    engine.tick(1.0);
    let length = engine.params().physical_length;
    assert!((engine.playhead().traveled() - (length - 7.5)).abs() < 1e-9);

    let snapshot = engine.snapshot();
    let expected = (length - 7.5) * engine.config().units_per_inch;
    assert!((snapshot.playhead_distance - expected).abs() < 1e-6);
}

#[test]
fn test_derive_matches_engine() {
    let engine = stadium_engine();
    let direct = derive(&TransportInput {
        total_length: engine.snapshot().total_length(),
        ..TransportInput::default()
    });
    assert_eq!(direct, engine.params());
}
