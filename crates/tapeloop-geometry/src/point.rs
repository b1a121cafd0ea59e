//! Plane primitives shared by every stage.
//!
//! Points, vectors and the workspace rectangle are `kurbo` types. Coordinates
//! are read as y-up; the arc and tangent angles below use the same
//! `(cos θ, sin θ)` convention as `kurbo::Arc`.

use core::f64::consts::TAU;

pub use kurbo::{Point, Rect, Vec2};

/// Lengths below this are treated as zero.
pub const EPSILON: f64 = 1e-9;

/// Workspace used when no other is configured.
pub const DEFAULT_WORKSPACE: Rect = Rect::new(0.0, 0.0, 640.0, 360.0);

/// Unit vector and length, or `None` for a (near) zero or non-finite vector.
///
/// `kurbo`'s own `normalize` yields NaN on the zero vector, which callers
/// here need to branch on instead.
#[inline]
pub fn unit(v: Vec2) -> Option<(Vec2, f64)> {
    let len = v.length();
    if len <= EPSILON || !len.is_finite() {
        return None;
    }
    Some((v / len, len))
}

/// `v` rotated a quarter turn counter-clockwise.
#[inline]
pub fn perp(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Wrap an angle into [0, 2π).
#[inline]
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// True when `rect` encloses a positive area.
#[inline]
pub fn has_area(rect: &Rect) -> bool {
    let rect = rect.abs();
    rect.width() > 0.0 && rect.height() > 0.0
}

/// Clamp `p` into `workspace`, keeping `margin` from every edge when it fits.
pub fn clamp_to(workspace: &Rect, p: Point, margin: f64) -> Point {
    let rect = workspace.abs();
    let mx = margin.clamp(0.0, rect.width().max(0.0) / 2.0);
    let my = margin.clamp(0.0, rect.height().max(0.0) / 2.0);
    Point::new(
        p.x.clamp(rect.x0 + mx, (rect.x1 - mx).max(rect.x0 + mx)),
        p.y.clamp(rect.y0 + my, (rect.y1 - my).max(rect.y0 + my)),
    )
}
