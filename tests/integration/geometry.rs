//! Geometry integration tests
//!
//! Path construction through the public pipeline: build, measure, query.

use tapeloop::geometry::{build_loop_path, measure, GuideRegistry, PathMetrics};
use tapeloop::prelude::*;

#[path = "../helpers/mod.rs"]
mod helpers;
use helpers::tolerances::*;
use helpers::*;

fn three_post_loop(guide: Point, guide_radius: f64) -> Vec<tapeloop::GuidePost> {
    vec![
        post(0, 0.0, 0.0, 12.0),
        post(2, guide.x, guide.y, guide_radius),
        post(1, 250.0, 0.0, 12.0),
    ]
}

fn measured(posts: &[tapeloop::GuidePost]) -> (PathMode, PathMetrics) {
    let path = build_loop_path(posts).expect("at least two posts");
    (path.mode, measure(&path))
}

/// Stadium scenario: two anchors 250 apart, radius 12.
#[test]
fn test_stadium_length() {
    let registry =
        GuideRegistry::new(Point::new(0.0, 0.0), Point::new(250.0, 0.0), 12.0, 12).unwrap();
    let (mode, metrics) = measured(registry.posts());

    assert_eq!(mode, PathMode::Tangent);
    let expected = 2.0 * 250.0 + 2.0 * core::f64::consts::PI * 12.0;
    assert!((metrics.total_length() - expected).abs() < GEOMETRY_EPSILON);
}

/// Every contact point lies on the path's own straight runs.
#[test]
fn test_contact_points_are_on_the_path() {
    let posts = ring(5, Point::new(300.0, 180.0), 120.0, &[8.0, 14.0, 10.0]);
    let path = build_loop_path(&posts).unwrap();
    assert_eq!(path.mode, PathMode::Tangent);
    let metrics = measure(&path);

    for t in &path.tangents {
        for p in [t.start, t.end] {
            let hit = metrics.nearest_segment(p).unwrap();
            assert!(hit.distance < WRAP_EPSILON, "{:?} is {} off", p, hit.distance);
        }
    }
}

/// Pulling a middle guide away from the anchor line only ever lengthens the loop.
#[test]
fn test_length_grows_with_guide_offset() {
    let mut previous = None;
    for step in 0..=20 {
        let h = step as f64 * 5.0;
        let (mode, metrics) = measured(&three_post_loop(Point::new(125.0, h), 12.0));
        assert_eq!(mode, PathMode::Tangent, "h={}", h);

        let length = metrics.total_length();
        if let Some(prev) = previous {
            assert!(length > prev, "h={}: {} <= {}", h, length, prev);
        }
        previous = Some(length);
    }
}

/// Zero offset reproduces the plain stadium; the guide adds nothing.
#[test]
fn test_collinear_guide_is_transparent() {
    let (_, flat) = measured(&three_post_loop(Point::new(125.0, 0.0), 12.0));
    let expected = 2.0 * 250.0 + 2.0 * core::f64::consts::PI * 12.0;
    assert!((flat.total_length() - expected).abs() < 1e-6);
}

#[test]
fn test_identical_centers_never_fail() {
    let posts = [post(0, 80.0, 80.0, 12.0), post(1, 80.0, 80.0, 12.0)];
    let (mode, metrics) = measured(&posts);

    assert_eq!(mode, PathMode::Fallback);
    assert!(metrics.total_length() >= 0.0);
    for d in [-10.0, 0.0, 3.5, 1.0e9] {
        assert!(metrics.point_at_distance(d).is_finite());
        assert!(metrics.sampled_point_at_distance(d).is_finite());
    }
    assert!(metrics.samples().iter().all(|s| s.point.is_finite()));
}

/// Dragging a small guide onto its neighbor flips the path to fallback mode
/// without the outline jumping further than one post diameter.
#[test]
fn test_fallback_switch_is_bounded() {
    init_tracing();

    // Radii 4 and 12: tangents exist only while the centers are more than 8 apart.
    let (tangent_mode, tangent_metrics) = measured(&three_post_loop(Point::new(250.0, 8.5), 4.0));
    let (fallback_mode, fallback_metrics) =
        measured(&three_post_loop(Point::new(250.0, 7.5), 4.0));

    assert_eq!(tangent_mode, PathMode::Tangent);
    assert_eq!(fallback_mode, PathMode::Fallback);

    let bound = 2.0 * 12.0 + 1.0;
    for s in fallback_metrics.samples() {
        let off = distance_to_samples(&tangent_metrics, s.point);
        assert!(off <= bound, "fallback sample {:?} is {} away", s.point, off);
    }
    for s in tangent_metrics.samples() {
        let off = distance_to_samples(&fallback_metrics, s.point);
        assert!(off <= bound, "tangent sample {:?} is {} away", s.point, off);
    }
}

#[test]
fn test_sampled_length_tracks_analytic_length() {
    for count in 2..=6 {
        let posts = ring(count, Point::new(320.0, 180.0), 100.0, &[10.0, 12.0]);
        let (_, metrics) = measured(&posts);
        let ratio = (metrics.sampled_length() - metrics.total_length()).abs()
            / metrics.total_length();
        assert!(ratio < SAMPLED_LENGTH_RATIO, "{} posts: ratio {}", count, ratio);
    }
}

#[test]
fn test_pick_threshold_filters_far_clicks() {
    let registry =
        GuideRegistry::new(Point::new(0.0, 0.0), Point::new(250.0, 0.0), 12.0, 12).unwrap();
    let (_, metrics) = measured(registry.posts());

    let near = metrics.pick_segment(Point::new(60.0, -20.0), 14.0).unwrap();
    assert_point_near(near.projection, Point::new(60.0, -12.0), GEOMETRY_EPSILON);
    assert!(metrics.pick_segment(Point::new(60.0, -40.0), 14.0).is_none());
}
