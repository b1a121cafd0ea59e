//! Outer tangent between two guide posts.
//!
//! For a loop traversed counter-clockwise every post sits on the left of the
//! direction of travel, so the tape leaves and meets each circle on its right.
//! The contact normal is the center-to-center bearing rotated by
//! `-sign * acos((ra - rb) / d)`; both contact points share that normal,
//! which is what makes the line an outer tangent.

use crate::guide::{GuidePost, PostId};
use crate::point::{Point, Vec2, EPSILON};
use crate::winding::Winding;
use kurbo::{Line, ParamCurve, ParamCurveNearest};
use serde::{Deserialize, Serialize};

/// Center distance must exceed `|ra - rb|` by this much.
pub const DEGENERATE_EPSILON: f64 = 1e-6;

/// A straight run of tape between two posts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TangentSegment {
    /// Post the tape leaves.
    pub from: PostId,
    /// Post the tape reaches.
    pub to: PostId,
    /// Contact point on `from`.
    pub start: Point,
    /// Contact point on `to`.
    pub end: Point,
    /// Angle of the outward normal at both contact points, used to stitch arcs.
    pub contact_angle: f64,
    /// Distance between the contact points.
    pub length: f64,
}

impl TangentSegment {
    /// Direction of travel along the segment.
    pub fn heading(&self) -> f64 {
        (self.end - self.start).atan2()
    }

    /// Halfway between the contact points; the default spot for a new guide.
    pub fn midpoint(&self) -> Point {
        self.start.midpoint(self.end)
    }

    /// The run as a `kurbo` line.
    #[inline]
    pub fn line(&self) -> Line {
        Line::new(self.start, self.end)
    }

    /// Perpendicular projection of `p`, clamped to the segment.
    ///
    /// Returns the projected point and its distance from `p`.
    pub fn project(&self, p: Point) -> (Point, f64) {
        if self.start.distance(self.end) <= EPSILON {
            return (self.start, self.start.distance(p));
        }
        let line = self.line();
        let nearest = line.nearest(p, EPSILON);
        (line.eval(nearest.t), nearest.distance_sq.sqrt())
    }
}

/// Outcome of a tangent solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TangentResult {
    /// The outer tangent exists.
    Tangent(TangentSegment),
    /// One circle contains (or nearly contains) the other.
    Degenerate,
}

impl TangentResult {
    pub fn tangent(self) -> Option<TangentSegment> {
        match self {
            TangentResult::Tangent(t) => Some(t),
            TangentResult::Degenerate => None,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self, TangentResult::Degenerate)
    }
}

/// Outer tangent from `a` to `b` on the side selected by `winding`.
pub fn solve_tangent(a: &GuidePost, b: &GuidePost, winding: Winding) -> TangentResult {
    let delta = b.center - a.center;
    let d = delta.length();
    let dr = a.radius - b.radius;

    if !d.is_finite() || d <= dr.abs() + DEGENERATE_EPSILON {
        return TangentResult::Degenerate;
    }

    let bearing = delta.atan2();
    let offset = (dr / d).clamp(-1.0, 1.0).acos();
    let contact_angle = bearing - winding.sign() * offset;
    let normal = Vec2::from_angle(contact_angle);

    let start = a.center + normal * a.radius;
    let end = b.center + normal * b.radius;

    TangentResult::Tangent(TangentSegment {
        from: a.id,
        to: b.id,
        start,
        end,
        contact_angle,
        length: start.distance(end),
    })
}
