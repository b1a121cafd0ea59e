//! # Tapeloop - Tape Loop Geometry & Transport Engine
//!
//! Models a tape loop threaded over movable circular guide posts and derives
//! the transport parameters of a tape-loop instrument from its shape.
//!
//! ## Architecture
//!
//! Tapeloop is an umbrella crate that coordinates:
//! - **tapeloop-geometry** - Guide registry, tangent solver, path builder
//!   (with rounded-polygon fallback), path metrics
//! - **tapeloop-transport** - Loop duration, head delay, tone and flutter
//!   parameters, playhead accumulator
//!
//! ```text
//! guides ─▶ tangents ─▶ path ─▶ metrics ─▶ transport params ─▶ LoopSnapshot
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use tapeloop::prelude::*;
//!
//! let mut engine = TapeLoopEngine::builder()
//!     .anchors(Point::new(195.0, 180.0), Point::new(445.0, 180.0))
//!     .speed(7.5)
//!     .build()?;
//!
//! // Two anchors 250 apart with radius 12: (500 + 24π) / 5 ≈ 115.1
//! let params = engine.params();
//! assert!((params.physical_length - 115.08).abs() < 0.01);
//! assert!((params.loop_duration_seconds - 15.34).abs() < 0.01);
//!
//! // Once per frame
//! engine.tick(1.0 / 60.0);
//! let snapshot = engine.snapshot();
//! let _dot = snapshot.playhead_point();
//! # Ok::<(), tapeloop::Error>(())
//! ```

/// Re-export of tapeloop-geometry for direct access
pub use tapeloop_geometry as geometry;

/// Re-export of tapeloop-transport for direct access
pub use tapeloop_transport as transport;

pub use tapeloop_geometry::{
    GuidePost, GuideRegistry, PathGeometry, PathMetrics, PathMode, Point, PostId, Rect,
    SegmentHit, TangentSegment, Vec2, Winding,
};
pub use tapeloop_transport::{Direction, Playhead, SonicProfile, TransportParams};

mod error;
pub use error::{Error, Result};

mod config;
pub use config::LoopConfig;

pub mod pipeline;
pub use pipeline::{PipelineEvent, PipelineFsm, PipelineState, TransitionResult};

mod snapshot;
pub use snapshot::{HeadMarker, LoopSnapshot, SnapshotReader};

mod builder;
pub use builder::{TapeLoopEngineBuilder, DEFAULT_ANCHOR_SPAN};

mod engine;
pub use engine::TapeLoopEngine;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Direction, Error, LoopConfig, LoopSnapshot, PathMode, PipelineState, Point, PostId,
        Result, SnapshotReader, SonicProfile, TapeLoopEngine, TapeLoopEngineBuilder,
        TransportParams, Vec2,
    };
}
