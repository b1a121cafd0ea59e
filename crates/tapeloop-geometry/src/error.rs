//! Error types for tapeloop-geometry.

use crate::guide::PostId;
use thiserror::Error;

/// Rejected guide registry mutations.
///
/// Degenerate geometry is not an error: see [`TangentResult`](crate::TangentResult)
/// and [`PathMode`](crate::PathMode).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Unknown guide: {0}")]
    UnknownGuide(PostId),

    #[error("Guide {0} is a locked drive anchor")]
    AnchorLocked(PostId),

    #[error("Guide limit reached ({max} movable guides)")]
    GuideLimitReached { max: usize },

    #[error("Invalid wrap radius: {0}. Must be positive and finite")]
    InvalidRadius(f64),

    #[error("Guide position must be finite")]
    NonFinitePosition,
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
