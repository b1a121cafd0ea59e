//! Closed loop path construction.
//!
//! [`build_loop_path`] solves an outer tangent for every cyclic pair of posts
//! and stitches arcs around each post between the incoming and outgoing
//! contact points. If any pair is degenerate the whole pass is abandoned in
//! favour of [`build_fallback_path`]; the two strategies are never mixed
//! within one path.

mod fallback;

pub use fallback::build_fallback_path;

use crate::guide::{GuidePost, PostId};
use crate::point::{wrap_angle, Point, Vec2, EPSILON};
use crate::tangent::{solve_tangent, TangentResult, TangentSegment};
use crate::winding::{turn_at, winding_of, Winding};
use core::f64::consts::TAU;
use kurbo::{Arc, BezPath};
use serde::{Deserialize, Serialize};

/// Sweeps smaller than this collapse to a zero-length straight segment.
pub const ANGLE_EPSILON: f64 = 1e-9;

/// How a path was constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathMode {
    /// Outer tangents and wrap arcs.
    Tangent,
    /// Rounded-corner polygon through the post centers.
    Fallback,
}

/// Straight piece of the path: a tangent run, or the zero-length joint
/// left where a post needs no wrap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub start: Point,
    pub end: Point,
    /// Cached `start.distance(end)`.
    pub length: f64,
}

impl LineSegment {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            length: start.distance(end),
        }
    }

    /// Point `s` units from `start`, clamped to the segment.
    #[inline]
    pub fn point_at(&self, s: f64) -> Point {
        if self.length <= EPSILON {
            return self.start;
        }
        self.start.lerp(self.end, (s / self.length).clamp(0.0, 1.0))
    }
}

/// Circular piece of the path wrapping a post (or cutting a corner).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcSegment {
    /// Post being wrapped. Fallback corner arcs carry the corner's post.
    pub post: PostId,
    /// Arc center; the post center for a wrap, the fillet center for a corner.
    pub center: Point,
    pub radius: f64,
    /// Angle of the entry point as seen from `center`.
    pub start_angle: f64,
    /// Signed sweep in radians; positive is counter-clockwise.
    pub sweep: f64,
    /// `radius * |sweep|`.
    pub length: f64,
}

impl ArcSegment {
    pub fn new(post: PostId, center: Point, radius: f64, start_angle: f64, sweep: f64) -> Self {
        Self {
            post,
            center,
            radius,
            start_angle,
            sweep,
            length: radius * sweep.abs(),
        }
    }

    #[inline]
    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.sweep
    }

    /// +1 for a counter-clockwise sweep, -1 for clockwise.
    #[inline]
    pub fn orientation(&self) -> f64 {
        if self.sweep < 0.0 {
            -1.0
        } else {
            1.0
        }
    }

    #[inline]
    pub fn start_point(&self) -> Point {
        self.point_at_angle(self.start_angle)
    }

    #[inline]
    pub fn end_point(&self) -> Point {
        self.point_at_angle(self.end_angle())
    }

    /// Point `s` units along the arc from its start, clamped to the arc.
    #[inline]
    pub fn point_at(&self, s: f64) -> Point {
        if self.length <= EPSILON {
            return self.start_point();
        }
        let t = (s / self.length).clamp(0.0, 1.0);
        self.point_at_angle(self.start_angle + self.sweep * t)
    }

    #[inline]
    fn point_at_angle(&self, angle: f64) -> Point {
        self.center + Vec2::from_angle(angle) * self.radius
    }

    /// The same arc as a circular `kurbo::Arc`.
    pub fn to_arc(&self) -> Arc {
        Arc {
            center: self.center,
            radii: Vec2::new(self.radius, self.radius),
            start_angle: self.start_angle,
            sweep_angle: self.sweep,
            x_rotation: 0.0,
        }
    }
}

/// One piece of a [`PathGeometry`], in travel order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathSegment {
    Line(LineSegment),
    Arc(ArcSegment),
}

impl PathSegment {
    #[inline]
    pub fn length(&self) -> f64 {
        match self {
            PathSegment::Line(l) => l.length,
            PathSegment::Arc(a) => a.length,
        }
    }

    pub fn start(&self) -> Point {
        match self {
            PathSegment::Line(l) => l.start,
            PathSegment::Arc(a) => a.start_point(),
        }
    }

    pub fn end(&self) -> Point {
        match self {
            PathSegment::Line(l) => l.end,
            PathSegment::Arc(a) => a.end_point(),
        }
    }

    /// Point `s` drawing units from the start of this segment.
    #[inline]
    pub fn point_at(&self, s: f64) -> Point {
        match self {
            PathSegment::Line(l) => l.point_at(s),
            PathSegment::Arc(a) => a.point_at(s),
        }
    }
}

/// Closed path wrapping every post, in loop order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathGeometry {
    pub mode: PathMode,
    /// Shared by every tangent and arc of the path.
    pub winding: Winding,
    /// Line, arc, line, arc ... starting at the first post's outgoing run.
    pub segments: Vec<PathSegment>,
    /// Straight runs between consecutive posts, used for hit-testing.
    pub tangents: Vec<TangentSegment>,
    /// Every arc in `segments`, in the same order.
    pub arcs: Vec<ArcSegment>,
    /// Sum of all segment lengths, in drawing units.
    pub total_length: f64,
}

impl PathGeometry {
    pub(crate) fn from_segments(
        mode: PathMode,
        winding: Winding,
        segments: Vec<PathSegment>,
        tangents: Vec<TangentSegment>,
    ) -> Self {
        let arcs = segments
            .iter()
            .filter_map(|s| match s {
                PathSegment::Arc(a) => Some(*a),
                PathSegment::Line(_) => None,
            })
            .collect();
        let total_length = segments.iter().map(PathSegment::length).sum();

        Self {
            mode,
            winding,
            segments,
            tangents,
            arcs,
            total_length,
        }
    }

    #[inline]
    pub fn is_fallback(&self) -> bool {
        self.mode == PathMode::Fallback
    }

    pub fn start_point(&self) -> Point {
        self.segments
            .first()
            .map(PathSegment::start)
            .unwrap_or(Point::ZERO)
    }

    pub fn tangent_length(&self) -> f64 {
        self.tangents.iter().map(|t| t.length).sum()
    }

    pub fn arc_length(&self) -> f64 {
        self.arcs.iter().map(|a| a.length).sum()
    }

    /// The longest straight run, where a new guide is placed by default.
    pub fn longest_tangent(&self) -> Option<&TangentSegment> {
        self.tangents
            .iter()
            .max_by(|a, b| a.length.total_cmp(&b.length))
    }

    /// Closed Bezier outline for drawing, arcs approximated within `tolerance`.
    pub fn to_bez_path(&self, tolerance: f64) -> BezPath {
        let mut bez = BezPath::new();
        let Some(first) = self.segments.first() else {
            return bez;
        };
        bez.move_to(first.start());
        for segment in &self.segments {
            match segment {
                PathSegment::Line(line) => bez.line_to(line.end),
                PathSegment::Arc(arc) => {
                    for el in arc.to_arc().append_iter(tolerance) {
                        bez.push(el);
                    }
                }
            }
        }
        bez.close_path();
        bez
    }
}

/// Build the closed loop path for posts in winding order.
///
/// Returns `None` for fewer than two posts. Never fails otherwise: a
/// degenerate pair switches the whole path to the fallback construction.
pub fn build_loop_path(posts: &[GuidePost]) -> Option<PathGeometry> {
    if posts.len() < 2 {
        return None;
    }

    let winding = winding_of(posts);
    match solve_all(posts, winding) {
        Some(tangents) => Some(stitch(posts, winding, tangents)),
        None => {
            tracing::debug!(
                posts = posts.len(),
                "degenerate post pair, using fallback path"
            );
            build_fallback_path(posts, winding)
        }
    }
}

fn solve_all(posts: &[GuidePost], winding: Winding) -> Option<Vec<TangentSegment>> {
    let n = posts.len();
    let mut tangents = Vec::with_capacity(n);
    for i in 0..n {
        match solve_tangent(&posts[i], &posts[(i + 1) % n], winding) {
            TangentResult::Tangent(t) => tangents.push(t),
            TangentResult::Degenerate => return None,
        }
    }
    Some(tangents)
}

fn stitch(posts: &[GuidePost], winding: Winding, tangents: Vec<TangentSegment>) -> PathGeometry {
    let n = posts.len();
    let mut segments = Vec::with_capacity(n * 2);

    for i in 0..n {
        let incoming = &tangents[i];
        let next = (i + 1) % n;
        let outgoing = &tangents[next];
        let post = &posts[next];
        let turn = turn_at(
            posts[i].center,
            post.center,
            posts[(next + 1) % n].center,
            winding,
        );

        segments.push(PathSegment::Line(LineSegment::new(
            incoming.start,
            incoming.end,
        )));

        let sweep = arc_sweep(
            incoming.contact_angle,
            outgoing.contact_angle,
            winding,
            turn,
        );
        if sweep.abs() < ANGLE_EPSILON {
            segments.push(PathSegment::Line(LineSegment::new(
                incoming.end,
                outgoing.start,
            )));
        } else {
            segments.push(PathSegment::Arc(ArcSegment::new(
                post.id,
                post.center,
                post.radius,
                incoming.contact_angle,
                sweep,
            )));
        }
    }

    PathGeometry::from_segments(PathMode::Tangent, winding, segments, tangents)
}

/// Signed sweep from contact angle `from` to `to` around a post.
///
/// `turn` is the center polygon's turn at the post from [`turn_at`]. The
/// wrap differs from that turn by less than a half circle (the radius
/// difference to each neighbour tilts the tangents by under a quarter turn
/// each), so of all sweeps reaching `to` the one nearest `turn` is taken.
/// A convex post therefore wraps in the winding direction, by more than a
/// half turn when the radii call for it, and a reflex post is touched the
/// short way back. Sweeps within [`ANGLE_EPSILON`] of zero come out as 0.
pub fn arc_sweep(from: f64, to: f64, winding: Winding, turn: f64) -> f64 {
    let sign = winding.sign();
    let forward = wrap_angle(sign * (to - from));
    let laps = ((forward - turn) / TAU).round();
    let sweep = forward - laps * TAU;
    if sweep.abs() < ANGLE_EPSILON {
        0.0
    } else {
        sign * sweep
    }
}
