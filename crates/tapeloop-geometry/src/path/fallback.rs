//! Rounded-corner polygon through the post centers.
//!
//! Used when tangents are undefined for some pair. Each corner is cut back
//! along both edges by at most `min(incoming, outgoing) / 2.2` (and by at
//! most the post's wrap radius) and bridged with an arc tangent to both
//! edges. Near-straight and near-reversing corners pass through unrounded.
//! The result is approximate but always a closed path.

use super::{ArcSegment, LineSegment, PathGeometry, PathMode, PathSegment};
use crate::guide::GuidePost;
use crate::point::{perp, unit, Point, EPSILON};
use crate::tangent::TangentSegment;
use crate::winding::Winding;
use core::f64::consts::{FRAC_PI_2, PI};

/// Corners turning less than this (or within this of a full reversal) are not rounded.
pub const STRAIGHT_TURN: f64 = 0.5 * PI / 180.0;

/// Corner cut is bounded by the shorter adjacent edge divided by this.
pub const CORNER_EDGE_DIVISOR: f64 = 2.2;

#[derive(Debug, Clone, Copy)]
struct Corner {
    /// Where the incoming edge stops.
    entry: Point,
    /// Where the outgoing edge starts.
    exit: Point,
    arc: Option<ArcSegment>,
}

impl Corner {
    fn pass_through(at: Point) -> Self {
        Self {
            entry: at,
            exit: at,
            arc: None,
        }
    }
}

fn round_corner(prev: &GuidePost, post: &GuidePost, next: &GuidePost) -> Corner {
    let Some((u_in, len_in)) = unit(post.center - prev.center) else {
        return Corner::pass_through(post.center);
    };
    let Some((u_out, len_out)) = unit(next.center - post.center) else {
        return Corner::pass_through(post.center);
    };

    let turn = u_in.cross(u_out).atan2(u_in.dot(u_out));
    if turn.abs() < STRAIGHT_TURN || turn.abs() > PI - STRAIGHT_TURN {
        return Corner::pass_through(post.center);
    }

    let cut = (len_in.min(len_out) / CORNER_EDGE_DIVISOR).min(post.radius);
    if cut <= EPSILON {
        return Corner::pass_through(post.center);
    }

    let entry = post.center - u_in * cut;
    let exit = post.center + u_out * cut;

    // Arc tangent to both edges at the cut points.
    let fillet = cut / (turn.abs() / 2.0).tan();
    let side = turn.signum();
    let center = entry + perp(u_in) * (side * fillet);
    let start_angle = (entry - center).atan2();

    Corner {
        entry,
        exit,
        arc: Some(ArcSegment::new(post.id, center, fillet, start_angle, turn)),
    }
}

/// Build the fallback path for posts in winding order.
///
/// `winding` is recorded on the result; corner sweep directions come from
/// the local turn at each post. Returns `None` for fewer than two posts.
pub fn build_fallback_path(posts: &[GuidePost], winding: Winding) -> Option<PathGeometry> {
    let n = posts.len();
    if n < 2 {
        return None;
    }

    let corners: Vec<Corner> = (0..n)
        .map(|i| round_corner(&posts[(i + n - 1) % n], &posts[i], &posts[(i + 1) % n]))
        .collect();

    let mut segments = Vec::with_capacity(n * 2);
    let mut tangents = Vec::with_capacity(n);

    for i in 0..n {
        let next = (i + 1) % n;
        let line = LineSegment::new(corners[i].exit, corners[next].entry);
        segments.push(PathSegment::Line(line));
        tangents.push(TangentSegment {
            from: posts[i].id,
            to: posts[next].id,
            start: line.start,
            end: line.end,
            contact_angle: (line.end - line.start).atan2() - winding.sign() * FRAC_PI_2,
            length: line.length,
        });

        if let Some(arc) = corners[next].arc {
            segments.push(PathSegment::Arc(arc));
        }
    }

    Some(PathGeometry::from_segments(
        PathMode::Fallback,
        winding,
        segments,
        tangents,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guide::PostId;
    use approx::assert_abs_diff_eq;

    fn post(id: u32, x: f64, y: f64, r: f64) -> GuidePost {
        GuidePost::new(PostId(id), Point::new(x, y), r)
    }

    #[test]
    fn test_two_posts_form_a_doubled_line() {
        let posts = [post(0, 0.0, 0.0, 10.0), post(1, 100.0, 0.0, 10.0)];
        let path = build_fallback_path(&posts, Winding::CounterClockwise).unwrap();

        assert_eq!(path.mode, PathMode::Fallback);
        assert!(path.arcs.is_empty());
        assert_abs_diff_eq!(path.total_length, 200.0, epsilon = 1e-9);
    }

    #[test]
    fn test_identical_centers_give_zero_length_path() {
        let posts = [post(0, 50.0, 50.0, 12.0), post(1, 50.0, 50.0, 12.0)];
        let path = build_fallback_path(&posts, Winding::CounterClockwise).unwrap();

        assert_eq!(path.total_length, 0.0);
        for seg in &path.segments {
            assert!(seg.start().is_finite());
            assert!(seg.end().is_finite());
        }
    }

    #[test]
    fn test_square_corners_are_rounded_and_connected() {
        let posts = [
            post(0, 0.0, 0.0, 10.0),
            post(1, 100.0, 0.0, 10.0),
            post(2, 100.0, 100.0, 10.0),
            post(3, 0.0, 100.0, 10.0),
        ];
        let path = build_fallback_path(&posts, Winding::CounterClockwise).unwrap();

        assert_eq!(path.arcs.len(), 4);
        for arc in &path.arcs {
            // Cut of 10 on a right angle gives a fillet radius of 10.
            assert_abs_diff_eq!(arc.radius, 10.0, epsilon = 1e-9);
            assert_abs_diff_eq!(arc.sweep, FRAC_PI_2, epsilon = 1e-9);
        }

        let n = path.segments.len();
        for i in 0..n {
            let gap = path.segments[i].end().distance(path.segments[(i + 1) % n].start());
            assert!(gap < 1e-9, "gap {} after segment {}", gap, i);
        }

        // Each corner swaps 20 of straight edge for a quarter circle of radius 10.
        let expected = 400.0 - 4.0 * 20.0 + 4.0 * 10.0 * FRAC_PI_2;
        assert_abs_diff_eq!(path.total_length, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_corner_cut_bounded_by_short_edges() {
        let posts = [
            post(0, 0.0, 0.0, 50.0),
            post(1, 11.0, 0.0, 50.0),
            post(2, 11.0, 11.0, 50.0),
        ];
        let path = build_fallback_path(&posts, Winding::CounterClockwise).unwrap();
        assert_eq!(path.arcs.len(), 3);
        // Corner at post 1: edges of 11, cut = 5.
        let corner = path
            .segments
            .iter()
            .find(|s| matches!(s, PathSegment::Arc(a) if a.post == PostId(1)))
            .unwrap();
        assert_abs_diff_eq!(corner.start().x, 6.0, epsilon = 1e-9);
    }

    #[test]
    fn test_right_turn_sweeps_clockwise() {
        let posts = [
            post(0, 0.0, 100.0, 10.0),
            post(1, 100.0, 100.0, 10.0),
            post(2, 100.0, 0.0, 10.0),
        ];
        let path = build_fallback_path(&posts, Winding::Clockwise).unwrap();
        let arc = path.arcs.iter().find(|a| a.post == PostId(1)).unwrap();
        assert!(arc.sweep < 0.0);
        assert_abs_diff_eq!(arc.start_point().distance(Point::new(90.0, 100.0)), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(arc.end_point().distance(Point::new(100.0, 90.0)), 0.0, epsilon = 1e-9);
    }
}
