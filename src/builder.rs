//! Builder for configuring and constructing a `TapeLoopEngine`.

use crate::{LoopConfig, Result, TapeLoopEngine};
use tapeloop_geometry::{clamp_to, GuideRegistry, Point};
use tapeloop_transport::{Direction, FLUTTER_RANGE, SPEED_RANGE};

/// Distance between the two default anchors, in drawing units.
pub const DEFAULT_ANCHOR_SPAN: f64 = 250.0;

/// Anchors default to a horizontal pair [`DEFAULT_ANCHOR_SPAN`] apart,
/// centered in the workspace.
///
/// The returned engine has already been built once, so its snapshot holds a
/// path and transport parameters.
///
/// # Example
///
/// ```
/// use tapeloop::prelude::*;
///
/// let engine = TapeLoopEngine::builder()
///     .speed(15.0)
///     .flutter(0.5)
///     .build()?;
///
/// assert_eq!(engine.state(), PipelineState::Idle);
/// assert!(engine.params().loop_duration_seconds > 0.0);
/// # Ok::<(), tapeloop::Error>(())
/// ```
pub struct TapeLoopEngineBuilder {
    config: LoopConfig,
    anchors: Option<(Point, Point)>,
    speed: f64,
    head_separation: f64,
    flutter: f64,
    direction: Direction,
}

impl Default for TapeLoopEngineBuilder {
    fn default() -> Self {
        Self {
            config: LoopConfig::default(),
            anchors: None,
            speed: SPEED_RANGE.default,
            head_separation: 12.0,
            flutter: FLUTTER_RANGE.default,
            direction: Direction::Forwards,
        }
    }
}

impl TapeLoopEngineBuilder {
    pub fn config(mut self, config: LoopConfig) -> Self {
        self.config = config;
        self
    }

    /// Centers of the two drive anchors. Clamped into the workspace.
    pub fn anchors(mut self, a: Point, b: Point) -> Self {
        self.anchors = Some((a, b));
        self
    }

    /// Default: 7.5
    pub fn speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Requested record-to-play separation in physical units. Default: 12
    pub fn head_separation(mut self, separation: f64) -> Self {
        self.head_separation = separation;
        self
    }

    /// Default: 1.0
    pub fn flutter(mut self, flutter: f64) -> Self {
        self.flutter = flutter;
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn build(self) -> Result<TapeLoopEngine> {
        self.config.validate()?;

        let workspace = self.config.workspace;
        let margin = self.config.anchor_radius;
        let (a, b) = self.anchors.unwrap_or_else(|| {
            let center = workspace.center();
            let half = DEFAULT_ANCHOR_SPAN / 2.0;
            (
                Point::new(center.x - half, center.y),
                Point::new(center.x + half, center.y),
            )
        });
        let (a, b) = (
            clamp_to(&workspace, a, margin),
            clamp_to(&workspace, b, margin),
        );

        let guides = GuideRegistry::new(a, b, self.config.anchor_radius, self.config.max_guides)?;

        let mut engine = TapeLoopEngine::from_parts(self.config, guides);
        engine.set_speed(self.speed);
        engine.set_head_separation(self.head_separation);
        engine.set_flutter(self.flutter);
        engine.set_direction(self.direction);
        engine.rebuild();

        tracing::info!(
            anchors = ?engine.anchors(),
            total_length = engine.snapshot().total_length(),
            "tape loop engine built"
        );

        Ok(engine)
    }
}
