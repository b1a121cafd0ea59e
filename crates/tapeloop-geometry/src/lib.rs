//! Loop geometry for a tape threaded over circular guide posts.
//!
//! # Pipeline
//!
//! - [`GuideRegistry`]: ordered posts, two locked drive anchors
//! - [`solve_tangent`]: outer tangent between consecutive posts
//! - [`build_loop_path`]: tangents and wrap arcs stitched into one closed
//!   path, or [`build_fallback_path`] when any pair is degenerate
//! - [`measure`]: total length, point-at-distance, nearest-segment queries
//!
//! Every stage is a pure function of its input. Plane types are `kurbo`'s,
//! and [`PathGeometry::to_bez_path`] hands a finished loop to any `kurbo`
//! based renderer.
//!
//! # Example
//!
//! ```
//! use tapeloop_geometry::{build_loop_path, measure, GuideRegistry, Point};
//!
//! let guides = GuideRegistry::new(Point::new(0.0, 0.0), Point::new(250.0, 0.0), 12.0, 8)?;
//! let path = build_loop_path(guides.posts()).expect("two anchors");
//! let metrics = measure(&path);
//!
//! let head = metrics.point_at_distance(40.0);
//! assert!(metrics.total_length() > 500.0);
//! # let _ = head;
//! # Ok::<(), tapeloop_geometry::Error>(())
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod point;
pub use point::{clamp_to, has_area, wrap_angle, Point, Rect, Vec2, DEFAULT_WORKSPACE, EPSILON};

pub mod guide;
pub use guide::{GuidePost, GuideRegistry, PostId};

pub mod winding;
pub use winding::{signed_area, turn_at, winding_of, Winding};

pub mod tangent;
pub use tangent::{solve_tangent, TangentResult, TangentSegment};

pub mod path;
pub use path::{
    arc_sweep, build_fallback_path, build_loop_path, ArcSegment, LineSegment, PathGeometry,
    PathMode, PathSegment,
};

pub mod metrics;
pub use metrics::{measure, measure_with_spacing, PathMetrics, PathSample, SegmentHit};
