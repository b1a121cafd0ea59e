//! Loop winding orientation from the signed area of the post polygon.

use crate::guide::GuidePost;
use crate::point::{Point, EPSILON};
use core::f64::consts::PI;
use serde::{Deserialize, Serialize};

/// Rotational sense shared by every tangent and arc of one path.
///
/// Coordinates are taken as y-up: a positive signed area is counter-clockwise.
/// With a y-down screen the on-screen sense is mirrored, but the
/// construction stays consistent either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Winding {
    #[default]
    CounterClockwise,
    Clockwise,
}

impl Winding {
    /// +1 for counter-clockwise, -1 for clockwise.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Winding::CounterClockwise => 1.0,
            Winding::Clockwise => -1.0,
        }
    }

    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Winding::CounterClockwise => Winding::Clockwise,
            Winding::Clockwise => Winding::CounterClockwise,
        }
    }

    /// Winding of a polygon with the given signed area. Zero area
    /// (two posts, collinear posts) resolves to counter-clockwise.
    #[inline]
    pub fn from_area(area: f64) -> Self {
        if area < 0.0 {
            Winding::Clockwise
        } else {
            Winding::CounterClockwise
        }
    }
}

/// Shoelace signed area of a closed polygon.
pub fn signed_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| points[i].to_vec2().cross(points[(i + 1) % n].to_vec2()))
        .sum();
    twice / 2.0
}

/// Winding of the polygon through the post centers, in loop order.
pub fn winding_of(posts: &[GuidePost]) -> Winding {
    let centers: Vec<Point> = posts.iter().map(|p| p.center).collect();
    Winding::from_area(signed_area(&centers))
}

/// Signed turn of the center polygon at `at`, in (-π, π].
///
/// Positive turns go with the winding (a convex post), negative ones
/// against it (a reflex post). Running straight back, as at either end of a
/// two-post loop, is a half turn with the winding.
pub fn turn_at(prev: Point, at: Point, next: Point, winding: Winding) -> f64 {
    let (inbound, outbound) = (at - prev, next - at);
    let cross = inbound.cross(outbound);
    let dot = inbound.dot(outbound);
    if cross.abs() <= EPSILON && dot < 0.0 {
        return PI;
    }
    winding.sign() * cross.atan2(dot)
}
