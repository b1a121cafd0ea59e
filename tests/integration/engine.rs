//! Engine integration tests
//!
//! Guide lifecycle, pipeline states and snapshot publication.

use tapeloop::geometry::Error as GeometryError;
use tapeloop::prelude::*;

#[path = "../helpers/mod.rs"]
mod helpers;
use helpers::*;

#[test]
fn test_engine_builds_idle() {
    init_tracing();
    let engine = stadium_engine();

    assert_eq!(engine.state(), PipelineState::Idle);
    assert_eq!(engine.posts().len(), 2);
    assert_eq!(engine.path_mode(), Some(PathMode::Tangent));
    assert!(!engine.snapshot().is_empty());
}

#[test]
fn test_invalid_config_rejected() {
    let result = TapeLoopEngine::builder()
        .config(LoopConfig {
            reference_speed: -1.0,
            ..LoopConfig::default()
        })
        .build();
    assert!(matches!(result, Err(Error::InvalidConfig(_))));
}

#[test]
fn test_non_finite_anchor_rejected() {
    let result = TapeLoopEngine::builder()
        .anchors(Point::new(f64::NAN, 0.0), ANCHOR_B)
        .build();
    assert!(matches!(
        result,
        Err(Error::Geometry(GeometryError::NonFinitePosition))
    ));
}

/// A click close to a straight run splices the guide between that run's posts.
#[test]
fn test_add_guide_at_on_path() {
    let mut engine = stadium_engine();
    let path = engine.path().unwrap().clone();
    let run = path.tangents[0];
    let click = run.midpoint() + Vec2::new(0.0, 3.0);

    let id = engine.add_guide_at(click).unwrap();
    let from = engine.guides().index_of(run.from).unwrap();
    let index = engine.guides().index_of(id).unwrap();
    assert_eq!(index, from + 1);
    assert_point_near(engine.guides().get(id).unwrap().center, click, 1e-9);
}

/// A click far from the path still adds a guide, ordered along the anchor axis.
#[test]
fn test_add_guide_at_off_path() {
    let mut engine = stadium_engine();
    let left = engine.add_guide_at(Point::new(250.0, 320.0)).unwrap();
    let right = engine.add_guide_at(Point::new(400.0, 320.0)).unwrap();
    engine.rebuild();

    let posts = engine.posts();
    let left_at = engine.guides().index_of(left).unwrap();
    let right_at = engine.guides().index_of(right).unwrap();
    assert_eq!(posts.len(), 4);
    assert_eq!(engine.path_mode(), Some(PathMode::Tangent));
    // Both sit on the same side of the anchor line, so they share a run and
    // keep their order along the axis in loop order.
    assert_eq!((left_at as isize - right_at as isize).abs(), 1);
}

#[test]
fn test_guide_limit() {
    let mut engine = TapeLoopEngine::builder()
        .config(LoopConfig {
            max_guides: 2,
            ..LoopConfig::default()
        })
        .build()
        .unwrap();

    engine.add_guide().unwrap();
    engine.add_guide().unwrap();
    assert!(matches!(
        engine.add_guide(),
        Err(Error::Geometry(GeometryError::GuideLimitReached { max: 2 }))
    ));
    assert_eq!(engine.guides().guide_count(), 2);
}

#[test]
fn test_remove_guide_restores_stadium() {
    let mut engine = stadium_engine();
    let stadium = engine.snapshot().total_length();

    let id = engine.add_guide().unwrap();
    engine.move_guide(id, Point::new(320.0, 40.0)).unwrap();
    engine.rebuild();
    assert!(engine.snapshot().total_length() > stadium);

    engine.remove_guide(id).unwrap();
    engine.rebuild();
    assert!((engine.snapshot().total_length() - stadium).abs() < 1e-9);
    assert!(matches!(
        engine.remove_guide(id),
        Err(Error::Geometry(GeometryError::UnknownGuide(_)))
    ));
}

/// Dragging a guide onto an anchor degrades to fallback and recovers.
#[test]
fn test_drag_through_degenerate_configuration() {
    init_tracing();
    let mut engine = stadium_engine();
    let id = engine.add_guide().unwrap();

    engine.move_guide(id, ANCHOR_B).unwrap();
    engine.tick(0.1);
    assert_eq!(engine.path_mode(), Some(PathMode::Fallback));
    let snapshot = engine.snapshot();
    assert!(snapshot.params.is_finite());
    assert!(snapshot.playhead_point().unwrap().is_finite());

    engine.move_guide(id, Point::new(320.0, 300.0)).unwrap();
    engine.tick(0.1);
    assert_eq!(engine.path_mode(), Some(PathMode::Tangent));
}

/// A large guide past the second anchor turns the tape round: it wraps
/// more than half its circumference, and the anchor between is only
/// touched the short way.
#[test]
fn test_large_guide_beyond_anchor_wraps_past_half_turn() {
    let mut engine = stadium_engine();
    let (a, b) = engine.anchors();
    let id = engine.add_guide_at(Point::new(560.0, 180.0)).unwrap();
    let order: Vec<PostId> = engine.posts().iter().map(|p| p.id).collect();
    assert_eq!(order, vec![a, id, b]);

    engine.set_guide_radius(id, 40.0).unwrap();
    engine.rebuild();

    let snapshot = engine.snapshot();
    let path = snapshot.path.as_ref().unwrap();
    assert_eq!(path.mode, PathMode::Tangent);

    let sweep_of = |post: PostId| path.arcs.iter().find(|arc| arc.post == post).unwrap().sweep;
    assert!(sweep_of(id) > core::f64::consts::PI);
    assert!(sweep_of(b) < 0.0);
    let total: f64 = path.arcs.iter().map(|arc| arc.sweep).sum();
    assert!((total - core::f64::consts::TAU).abs() < tolerances::WRAP_EPSILON);
    assert!(
        (snapshot.total_length() - (path.tangent_length() + path.arc_length())).abs()
            < tolerances::WRAP_EPSILON
    );
}

#[test]
fn test_arrange_by_primary_axis_untangles_loop() {
    let mut engine = stadium_engine();
    let first = engine.add_guide_at(Point::new(400.0, 40.0)).unwrap();
    let second = engine.add_guide_at(Point::new(250.0, 40.0)).unwrap();

    // Force a crossing order, then let the registry sort it out.
    engine.move_guide(first, Point::new(250.0, 40.0)).unwrap();
    engine.move_guide(second, Point::new(400.0, 40.0)).unwrap();
    engine.arrange_by_primary_axis();
    engine.rebuild();

    let posts = engine.posts();
    let (a, b) = engine.anchors();
    assert_eq!(posts[0].id, a);
    let b_at = engine.guides().index_of(b).unwrap();
    assert_eq!(b_at, 3);
    let xs: Vec<f64> = posts[1..b_at].iter().map(|p| p.center.x).collect();
    assert_eq!(xs, vec![250.0, 400.0]);
}

#[test]
fn test_reader_on_render_thread() {
    let mut engine = stadium_engine();
    let reader = engine.reader();

    std::thread::scope(|scope| {
        let handle = scope.spawn(move || reader.load_full());
        let seen = handle.join().unwrap();
        assert!(seen.total_length() > 0.0);
    });

    let reader = engine.reader();
    engine.tick(2.0);
    assert_eq!(*reader.load_full(), *engine.snapshot());
    let (start, end) = reader.load().active_window(40.0).unwrap();
    let total = reader.load().total_length();
    let playhead = reader.load().playhead_distance;
    assert!((start - (playhead - 20.0).rem_euclid(total)).abs() < 1e-9);
    assert!((end - (playhead + 20.0).rem_euclid(total)).abs() < 1e-9);
}

#[test]
fn test_snapshot_revision_tracks_rebuilds() {
    let mut engine = stadium_engine();
    let first = engine.snapshot().revision;

    engine.tick(0.5);
    assert_eq!(engine.snapshot().revision, first);

    engine.set_flutter(2.0);
    engine.tick(0.0);
    assert_eq!(engine.snapshot().revision, first + 1);
    assert_eq!(engine.state(), PipelineState::Idle);
}
