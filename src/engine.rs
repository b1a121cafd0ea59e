//! TapeLoopEngine: owns the guide list, runs the rebuild pipeline and
//! advances the playhead.

use crate::pipeline::{PipelineEvent, PipelineFsm, PipelineState};
use crate::snapshot::{HeadMarker, LoopSnapshot, SnapshotReader};
use crate::{LoopConfig, Result, TapeLoopEngineBuilder};
use arc_swap::ArcSwap;
use std::sync::Arc;
use tapeloop_geometry::{
    build_loop_path, clamp_to, measure_with_spacing, GuidePost, GuideRegistry, PathGeometry,
    PathMetrics, PathMode, Point, PostId,
};
use tapeloop_transport::{
    derive, Direction, Playhead, SonicProfile, TransportInput, TransportParams, FLUTTER_RANGE,
    SPEED_RANGE,
};

/// Tape loop over movable guide posts.
///
/// Guide mutations and transport changes only mark the pipeline dirty. The
/// work happens in [`rebuild`](Self::rebuild) or on the next
/// [`tick`](Self::tick), which runs the whole pipeline to completion and
/// publishes a fresh [`LoopSnapshot`].
///
/// # Example
///
/// ```
/// use tapeloop::prelude::*;
///
/// let mut engine = TapeLoopEngine::builder().build()?;
/// let reader = engine.reader();
///
/// let id = engine.add_guide()?;
/// engine.move_guide(id, Point::new(320.0, 260.0))?;
/// engine.tick(1.0 / 60.0);
///
/// let snapshot = reader.load();
/// assert!(snapshot.total_length() > 0.0);
/// assert!(snapshot.playhead_point().is_some());
/// # Ok::<(), tapeloop::Error>(())
/// ```
pub struct TapeLoopEngine {
    config: LoopConfig,
    guides: GuideRegistry,
    pipeline: PipelineFsm,

    path: Option<Arc<PathGeometry>>,
    metrics: Option<Arc<PathMetrics>>,
    params: TransportParams,
    playhead: Playhead,
    revision: u64,

    speed: f64,
    /// As requested; the derived params hold the clamped value.
    head_separation: f64,
    separation_clamp_reported: bool,
    flutter: f64,
    direction: Direction,

    snapshot: Arc<ArcSwap<LoopSnapshot>>,
}

impl TapeLoopEngine {
    pub fn builder() -> TapeLoopEngineBuilder {
        TapeLoopEngineBuilder::default()
    }

    pub(crate) fn from_parts(config: LoopConfig, guides: GuideRegistry) -> Self {
        let mut pipeline = PipelineFsm::new();
        pipeline.transition(PipelineEvent::Mutate);

        Self {
            config,
            guides,
            pipeline,
            path: None,
            metrics: None,
            params: TransportParams::default(),
            playhead: Playhead::default(),
            revision: 0,
            speed: SPEED_RANGE.default,
            head_separation: 0.0,
            separation_clamp_reported: false,
            flutter: FLUTTER_RANGE.default,
            direction: Direction::Forwards,
            snapshot: Arc::new(ArcSwap::from_pointee(LoopSnapshot::empty())),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    pub fn guides(&self) -> &GuideRegistry {
        &self.guides
    }

    /// Posts in winding order.
    pub fn posts(&self) -> &[GuidePost] {
        self.guides.posts()
    }

    pub fn anchors(&self) -> (PostId, PostId) {
        self.guides.anchors()
    }

    pub fn state(&self) -> PipelineState {
        self.pipeline.state()
    }

    /// Mode of the last build, `None` before the first one.
    pub fn path_mode(&self) -> Option<PathMode> {
        self.pipeline.last_mode()
    }

    /// Path from the last build. Stale while [`state`](Self::state) is dirty.
    pub fn path(&self) -> Option<&PathGeometry> {
        self.path.as_deref()
    }

    pub fn metrics(&self) -> Option<&PathMetrics> {
        self.metrics.as_deref()
    }

    pub fn params(&self) -> TransportParams {
        self.params
    }

    pub fn profile(&self) -> SonicProfile {
        SonicProfile::classify(self.params.loop_duration_seconds, self.speed)
    }

    pub fn playhead(&self) -> Playhead {
        self.playhead
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Requested separation, before clamping to the loop.
    pub fn head_separation(&self) -> f64 {
        self.head_separation
    }

    pub fn flutter(&self) -> f64 {
        self.flutter
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Arc<LoopSnapshot> {
        self.snapshot.load_full()
    }

    /// Handle for reading snapshots from another thread.
    pub fn reader(&self) -> SnapshotReader {
        SnapshotReader::new(Arc::clone(&self.snapshot))
    }

    // =========================================================================
    // Guide lifecycle
    // =========================================================================

    /// Add a guide at the midpoint of the longest straight run, or at the
    /// workspace center if there is no path yet.
    pub fn add_guide(&mut self) -> Result<PostId> {
        self.ensure_built();
        let radius = self.config.guide_radius;

        let longest = self
            .path
            .as_ref()
            .and_then(|path| path.longest_tangent())
            .map(|t| (t.from, t.midpoint()));

        let id = match longest {
            Some((after, at)) => {
                let at = clamp_to(&self.config.workspace, at, radius);
                self.guides.insert_after(after, at, radius)?
            }
            None => {
                let at = self.config.workspace.center();
                self.guides.insert_by_primary_axis(at, radius)?
            }
        };

        tracing::debug!(%id, "guide added");
        self.mark_dirty();
        Ok(id)
    }

    /// Add a guide at `p`.
    ///
    /// If `p` is within the pick threshold of a straight run the guide is
    /// spliced into that run; otherwise it joins the loop in primary-axis
    /// order.
    pub fn add_guide_at(&mut self, p: Point) -> Result<PostId> {
        self.ensure_built();
        let radius = self.config.guide_radius;
        let at = clamp_to(&self.config.workspace, p, radius);

        let hit = self
            .metrics
            .as_ref()
            .and_then(|m| m.pick_segment(p, self.config.pick_threshold));

        let id = match hit {
            Some(hit) => self.guides.insert_after(hit.from, at, radius)?,
            None => self.guides.insert_by_primary_axis(at, radius)?,
        };

        tracing::debug!(%id, x = at.x, y = at.y, on_path = hit.is_some(), "guide added");
        self.mark_dirty();
        Ok(id)
    }

    /// Remove a movable guide. Anchors are rejected.
    pub fn remove_guide(&mut self, id: PostId) -> Result<GuidePost> {
        let post = self.guides.remove(id)?;
        tracing::debug!(%id, "guide removed");
        self.mark_dirty();
        Ok(post)
    }

    /// Move a guide, clamped into the workspace. Returns where it landed.
    pub fn move_guide(&mut self, id: PostId, p: Point) -> Result<Point> {
        let radius = self
            .guides
            .get(id)
            .map_or(self.config.guide_radius, |post| post.radius);
        let at = clamp_to(&self.config.workspace, p, radius);
        self.guides.move_to(id, at)?;
        self.mark_dirty();
        Ok(at)
    }

    /// Resize a movable guide. Anchor radii are fixed by
    /// [`LoopConfig::anchor_radius`] and rejected here.
    pub fn set_guide_radius(&mut self, id: PostId, radius: f64) -> Result<()> {
        self.guides.set_radius(id, radius)?;
        self.mark_dirty();
        Ok(())
    }

    /// Re-sort the loop geometrically; anchors stay at the run ends.
    pub fn arrange_by_primary_axis(&mut self) {
        self.guides.arrange_by_primary_axis();
        self.mark_dirty();
    }

    // =========================================================================
    // Transport controls
    // =========================================================================

    /// Clamped to [`SPEED_RANGE`].
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = SPEED_RANGE.clamp(speed);
        self.retune();
    }

    /// Requested record-to-play separation in physical units.
    ///
    /// The derived parameters clamp it so record offset, separation and
    /// guard gap fit on the loop.
    pub fn set_head_separation(&mut self, separation: f64) {
        if !separation.is_finite() {
            return;
        }
        self.head_separation = separation.max(0.0);
        self.separation_clamp_reported = false;
        self.retune();
    }

    /// Clamped to [`FLUTTER_RANGE`].
    pub fn set_flutter(&mut self, flutter: f64) {
        self.flutter = FLUTTER_RANGE.clamp(flutter);
        self.retune();
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn reverse(&mut self) {
        self.direction = self.direction.reversed();
    }

    /// Jump the tape to `distance` physical units from the path start.
    pub fn locate(&mut self, distance: f64) {
        self.playhead.locate(distance);
        self.publish();
    }

    // =========================================================================
    // Pipeline
    // =========================================================================

    /// Run whatever part of the pipeline is stale and publish a snapshot.
    pub fn rebuild(&mut self) {
        if self.state().needs_rebuild() {
            self.rebuild_geometry();
        }
        if self.state() == PipelineState::Measured {
            self.parameterize();
        }
        self.publish();
        self.pipeline.transition(PipelineEvent::Settle);
    }

    /// Advance the playhead by `dt` seconds, rebuilding first if needed.
    ///
    /// `dt = 0` changes nothing once the pipeline is idle.
    pub fn tick(&mut self, dt: f64) {
        if self.state() != PipelineState::Idle {
            self.rebuild();
        }

        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        if dt > 0.0 {
            self.playhead.advance(self.speed, dt, self.direction);
            self.publish();
        }

        tracing::trace!(dt, traveled = self.playhead.traveled(), "tick");
    }

    fn ensure_built(&mut self) {
        if self.state() != PipelineState::Idle {
            self.rebuild();
        }
    }

    fn mark_dirty(&mut self) {
        self.pipeline.transition(PipelineEvent::Mutate);
    }

    fn retune(&mut self) {
        self.pipeline.transition(PipelineEvent::Retune);
    }

    fn rebuild_geometry(&mut self) {
        self.pipeline.transition(PipelineEvent::Rebuild);

        match build_loop_path(self.guides.posts()) {
            Some(path) => {
                self.pipeline.transition(PipelineEvent::PathBuilt(path.mode));
                let metrics = measure_with_spacing(&path, self.config.sample_spacing);

                tracing::debug!(
                    mode = ?path.mode,
                    posts = self.guides.len(),
                    total_length = metrics.total_length(),
                    "loop rebuilt"
                );

                self.path = Some(Arc::new(path));
                self.metrics = Some(Arc::new(metrics));
                self.pipeline.transition(PipelineEvent::Measure);
            }
            None => {
                tracing::debug!(posts = self.guides.len(), "no loop to build");
                self.path = None;
                self.metrics = None;
                self.pipeline.transition(PipelineEvent::NoPath);
            }
        }
    }

    fn parameterize(&mut self) {
        let total_length = self.metrics.as_ref().map_or(0.0, |m| m.total_length());

        self.params = derive(&TransportInput {
            total_length,
            units_per_inch: self.config.units_per_inch,
            speed: self.speed,
            reference_speed: self.config.reference_speed,
            record_offset: self.config.record_offset,
            head_separation: self.head_separation,
            guard_gap: self.config.guard_gap,
            guide_count: self.guides.guide_count(),
            flutter: self.flutter,
        });
        self.playhead.set_loop_length(self.params.physical_length);
        self.revision += 1;

        if self.params.head_separation < self.head_separation && !self.separation_clamp_reported {
            tracing::warn!(
                requested = self.head_separation,
                max = self.params.max_head_separation,
                "head separation clamped to fit the loop"
            );
            self.separation_clamp_reported = true;
        }

        self.pipeline.transition(PipelineEvent::Parameterize);
    }

    fn publish(&self) {
        let units = self.config.units_per_inch;
        let marker = |physical: f64| {
            self.metrics.as_ref().map(|m| {
                let distance = m.wrap_distance(physical * units);
                HeadMarker {
                    distance,
                    point: m.point_at_distance(distance),
                }
            })
        };

        let record_offset = self.config.record_offset;
        let snapshot = LoopSnapshot {
            revision: self.revision,
            path: self.path.clone(),
            metrics: self.metrics.clone(),
            params: self.params,
            profile: self.profile(),
            playhead: self.playhead,
            playhead_distance: self
                .metrics
                .as_ref()
                .map_or(0.0, |m| m.wrap_distance(self.playhead.traveled() * units)),
            record_head: marker(record_offset),
            play_head: marker(record_offset + self.params.head_separation),
        };
        self.snapshot.store(Arc::new(snapshot));
    }
}

impl std::fmt::Debug for TapeLoopEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TapeLoopEngine")
            .field("posts", &self.guides.len())
            .field("state", &self.state())
            .field("revision", &self.revision)
            .field("speed", &self.speed)
            .finish()
    }
}
