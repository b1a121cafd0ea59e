//! Test helpers and fixtures for tapeloop integration tests
//!
//! ## Tolerance Levels
//!
//! Use the appropriate tolerance from [`tolerances`] module:
//! - `GEOMETRY_EPSILON` (1e-9): closed-form geometry
//! - `WRAP_EPSILON` (1e-6): lookups after wrapping
//! - `SAMPLED_LENGTH_RATIO` (0.5%): sampled vs analytic length

#![allow(dead_code)]

pub mod tolerances;

use tapeloop::geometry::{GuidePost, PathMetrics};
use tapeloop::prelude::*;

/// First anchor of the reference stadium.
pub const ANCHOR_A: Point = Point::new(195.0, 180.0);
/// Second anchor, 250 units to the right of [`ANCHOR_A`].
pub const ANCHOR_B: Point = Point::new(445.0, 180.0);

/// Route engine logs to the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Two anchors 250 apart, radius 12, no guides, speed 7.5.
pub fn stadium_engine() -> TapeLoopEngine {
    TapeLoopEngine::builder()
        .anchors(ANCHOR_A, ANCHOR_B)
        .build()
        .expect("Failed to create test engine")
}

pub fn post(id: u32, x: f64, y: f64, radius: f64) -> GuidePost {
    GuidePost::new(PostId(id), Point::new(x, y), radius)
}

/// `count` posts evenly spaced counter-clockwise on a circle.
pub fn ring(count: usize, center: Point, ring_radius: f64, radii: &[f64]) -> Vec<GuidePost> {
    (0..count)
        .map(|i| {
            let angle = core::f64::consts::TAU * i as f64 / count as f64;
            let at = center + Vec2::from_angle(angle) * ring_radius;
            GuidePost::new(PostId(i as u32), at, radii[i % radii.len()])
        })
        .collect()
}

/// Smallest distance from `p` to any sample of `metrics`.
pub fn distance_to_samples(metrics: &PathMetrics, p: Point) -> f64 {
    metrics
        .samples()
        .iter()
        .map(|s| s.point.distance(p))
        .fold(f64::INFINITY, f64::min)
}

pub fn assert_point_near(actual: Point, expected: Point, tolerance: f64) {
    let off = actual.distance(expected);
    assert!(
        off <= tolerance,
        "expected {:?}, got {:?} ({} apart)",
        expected,
        actual,
        off
    );
}
