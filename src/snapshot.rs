//! Immutable per-tick view of the loop for renderers and the audio side.
//!
//! ```text
//! ┌───────────────┐   publish    ┌──────────────┐  load()  ┌────────────────┐
//! │ TapeLoopEngine│───ArcSwap───▶│ LoopSnapshot │◀─────────│ SnapshotReader │
//! └───────────────┘              └──────────────┘          └────────────────┘
//! ```
//!
//! The engine swaps in a fresh snapshot after every rebuild and tick. Readers
//! never block the engine and never see a half-updated loop.

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tapeloop_geometry::{PathGeometry, PathMetrics, Point, SegmentHit};
use tapeloop_transport::{Playhead, SonicProfile, TransportParams};

/// A fixed head position on the loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadMarker {
    /// Drawing units from the path start.
    pub distance: f64,
    pub point: Point,
}

/// Everything a reader needs to draw or play one moment of the loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopSnapshot {
    /// Bumped on every rebuild or retune.
    pub revision: u64,
    /// `None` until a loop with at least two posts is built.
    pub path: Option<Arc<PathGeometry>>,
    pub metrics: Option<Arc<PathMetrics>>,
    pub params: TransportParams,
    pub profile: SonicProfile,
    /// Physical position of the tape.
    pub playhead: Playhead,
    /// Playhead position converted to drawing units.
    pub playhead_distance: f64,
    pub record_head: Option<HeadMarker>,
    pub play_head: Option<HeadMarker>,
}

impl LoopSnapshot {
    /// Snapshot of a loop that has never been built.
    pub fn empty() -> Self {
        Self {
            revision: 0,
            path: None,
            metrics: None,
            params: TransportParams::default(),
            profile: SonicProfile::classify(0.0, 0.0),
            playhead: Playhead::default(),
            playhead_distance: 0.0,
            record_head: None,
            play_head: None,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.metrics.is_none()
    }

    /// Path length in drawing units, 0 when there is no path.
    pub fn total_length(&self) -> f64 {
        self.metrics.as_ref().map_or(0.0, |m| m.total_length())
    }

    pub fn point_at_distance(&self, d: f64) -> Option<Point> {
        self.metrics.as_ref().map(|m| m.point_at_distance(d))
    }

    /// Where the moving tape marker is drawn.
    pub fn playhead_point(&self) -> Option<Point> {
        self.point_at_distance(self.playhead_distance)
    }

    pub fn nearest_segment(&self, p: Point) -> Option<SegmentHit> {
        self.metrics.as_ref().and_then(|m| m.nearest_segment(p))
    }

    /// Wrapped start and end of the highlighted stretch around the playhead.
    pub fn active_window(&self, span: f64) -> Option<(f64, f64)> {
        self.metrics
            .as_ref()
            .map(|m| m.active_window(self.playhead_distance, span))
    }
}

impl Default for LoopSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// Cloneable, lock-free handle to the latest [`LoopSnapshot`].
#[derive(Clone)]
pub struct SnapshotReader {
    snapshot: Arc<ArcSwap<LoopSnapshot>>,
}

impl SnapshotReader {
    pub(crate) fn new(snapshot: Arc<ArcSwap<LoopSnapshot>>) -> Self {
        Self { snapshot }
    }

    /// Cheap, wait-free load for per-frame reads.
    #[inline]
    pub fn load(&self) -> arc_swap::Guard<Arc<LoopSnapshot>> {
        self.snapshot.load()
    }

    /// Owned handle, for keeping a snapshot across frames.
    pub fn load_full(&self) -> Arc<LoopSnapshot> {
        self.snapshot.load_full()
    }
}

impl std::fmt::Debug for SnapshotReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotReader")
            .field("revision", &self.snapshot.load().revision)
            .finish()
    }
}
