//! Rebuild pipeline state machine.
//!
//! ```text
//! Idle ─Mutate─▶ Dirty ─Rebuild─▶ Rebuilding ─PathBuilt─▶ Built | FallbackBuilt
//!   ▲                                  │                          │
//!   │                               NoPath                     Measure
//!   │                                  ▼                          ▼
//!   └──────Settle──── Parameterized ◀─Parameterize──────── Measured ◀─Retune─ Idle
//! ```
//!
//! A mutation re-enters at `Dirty` from any state. Events that make no sense
//! in the current state are ignored and reported as [`TransitionResult::None`].

use serde::{Deserialize, Serialize};
use tapeloop_geometry::PathMode;

/// Where the engine is in turning guides into transport parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PipelineState {
    /// Everything derived is current.
    #[default]
    Idle,
    /// Guides changed since the last build.
    Dirty,
    /// Tangents are being solved.
    Rebuilding,
    /// Tangent construction succeeded for every pair.
    Built,
    /// At least one pair was degenerate; the rounded polygon was used.
    FallbackBuilt,
    /// Metrics are current, transport parameters are not.
    Measured,
    /// Transport parameters derived; the snapshot is about to be published.
    Parameterized,
}

impl PipelineState {
    /// True when the geometry has to be rebuilt before it can be queried.
    #[inline]
    pub fn needs_rebuild(self) -> bool {
        matches!(self, PipelineState::Dirty | PipelineState::Rebuilding)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineEvent {
    /// A guide was added, removed or moved.
    Mutate,
    /// Start solving the dirty geometry.
    Rebuild,
    /// A path came back, built the way the mode says.
    PathBuilt(PathMode),
    /// Fewer than two posts; nothing to draw or measure.
    NoPath,
    /// Path metrics were computed.
    Measure,
    /// Transport controls changed; geometry is still valid.
    Retune,
    /// Transport parameters were derived from the metrics.
    Parameterize,
    /// The snapshot went out.
    Settle,
}

/// Outcome of [`PipelineFsm::transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionResult {
    /// The event was ignored.
    None,
    StateChanged(PipelineState),
}

#[derive(Debug, Clone, Default)]
pub struct PipelineFsm {
    state: PipelineState,
    last_mode: Option<PathMode>,
    builds: u64,
}

impl PipelineFsm {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Mode of the most recent successful build.
    #[inline]
    pub fn last_mode(&self) -> Option<PathMode> {
        self.last_mode
    }

    /// Completed builds, counting empty ones.
    #[inline]
    pub fn builds(&self) -> u64 {
        self.builds
    }

    /// Apply `event`. Events that don't fit the current state leave it unchanged.
    pub fn transition(&mut self, event: PipelineEvent) -> TransitionResult {
        use PipelineEvent::*;
        use PipelineState::*;

        let next = match (self.state, event) {
            (Dirty, Mutate) => None,
            (_, Mutate) => Some(Dirty),

            (Dirty, Rebuild) => Some(Rebuilding),

            (Rebuilding, PathBuilt(mode)) => {
                self.last_mode = Some(mode);
                self.builds += 1;
                Some(match mode {
                    PathMode::Tangent => Built,
                    PathMode::Fallback => FallbackBuilt,
                })
            }
            (Rebuilding, NoPath) => {
                self.last_mode = None;
                self.builds += 1;
                Some(Measured)
            }

            (Built | FallbackBuilt, Measure) => Some(Measured),

            (Idle | Parameterized, Retune) => Some(Measured),

            (Measured, Parameterize) => Some(Parameterized),

            (Parameterized, Settle) => Some(Idle),

            _ => None,
        };

        match next {
            Some(state) => {
                self.state = state;
                TransitionResult::StateChanged(state)
            }
            None => TransitionResult::None,
        }
    }
}
