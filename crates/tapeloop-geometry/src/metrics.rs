//! Path metrics: total length, point-at-distance and hit-testing.
//!
//! [`measure`] records the cumulative start distance of every segment for
//! exact lookups and builds a uniform sampling table (16 to 512 points,
//! roughly one per [`DEFAULT_SAMPLE_SPACING`] drawing units) for renderers
//! that want a polyline.

use crate::guide::PostId;
use crate::path::{PathGeometry, PathSegment};
use crate::point::{Point, EPSILON};
use crate::tangent::TangentSegment;
use serde::{Deserialize, Serialize};

/// Fewest entries in a sampling table, however short the loop.
pub const MIN_SAMPLES: usize = 16;
/// Most entries in a sampling table.
pub const MAX_SAMPLES: usize = 512;

/// Target distance between sampling table entries, in drawing units.
pub const DEFAULT_SAMPLE_SPACING: f64 = 2.0;

/// One entry of the sampling table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathSample {
    /// Distance from the path origin, in `[0, total_length)`.
    pub distance: f64,
    pub point: Point,
}

/// Closest straight run to a query point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentHit {
    /// Index into [`PathMetrics::tangents`].
    pub index: usize,
    /// Post the run leaves.
    pub from: PostId,
    /// Post the run reaches.
    pub to: PostId,
    /// Distance from the query point to `projection`.
    pub distance: f64,
    /// Closest point on the run.
    pub projection: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct MeasuredSegment {
    offset: f64,
    segment: PathSegment,
}

/// Measured, queryable view of a [`PathGeometry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathMetrics {
    total_length: f64,
    origin: Point,
    segments: Vec<MeasuredSegment>,
    tangents: Vec<TangentSegment>,
    samples: Vec<PathSample>,
}

/// Measure a path with the default sample spacing.
pub fn measure(path: &PathGeometry) -> PathMetrics {
    measure_with_spacing(path, DEFAULT_SAMPLE_SPACING)
}

/// Measure a path, sampling roughly every `spacing` drawing units.
///
/// Non-positive or non-finite spacing falls back to [`DEFAULT_SAMPLE_SPACING`].
pub fn measure_with_spacing(path: &PathGeometry, spacing: f64) -> PathMetrics {
    let mut offset = 0.0;
    let segments: Vec<MeasuredSegment> = path
        .segments
        .iter()
        .map(|segment| {
            let measured = MeasuredSegment {
                offset,
                segment: *segment,
            };
            offset += segment.length();
            measured
        })
        .collect();

    let mut metrics = PathMetrics {
        total_length: offset,
        origin: path.start_point(),
        segments,
        tangents: path.tangents.clone(),
        samples: Vec::new(),
    };

    metrics.samples = if metrics.total_length <= EPSILON {
        vec![PathSample {
            distance: 0.0,
            point: metrics.origin,
        }]
    } else {
        let count = sample_count(metrics.total_length, spacing);
        (0..count)
            .map(|i| {
                let distance = metrics.total_length * i as f64 / count as f64;
                PathSample {
                    distance,
                    point: metrics.point_at_distance(distance),
                }
            })
            .collect()
    };

    metrics
}

fn sample_count(total_length: f64, spacing: f64) -> usize {
    let spacing = if spacing > 0.0 && spacing.is_finite() {
        spacing
    } else {
        DEFAULT_SAMPLE_SPACING
    };
    let wanted = (total_length / spacing).ceil();
    if wanted.is_finite() {
        (wanted as usize).clamp(MIN_SAMPLES, MAX_SAMPLES)
    } else {
        MAX_SAMPLES
    }
}

impl PathMetrics {
    /// Sum of all segment lengths, in drawing units.
    #[inline]
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    /// Where distance 0 lies.
    #[inline]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Uniform sampling table, ordered by distance.
    #[inline]
    pub fn samples(&self) -> &[PathSample] {
        &self.samples
    }

    #[inline]
    pub fn tangents(&self) -> &[TangentSegment] {
        &self.tangents
    }

    /// Wrap `d` into `[0, total_length)`; negative input wraps forward.
    pub fn wrap_distance(&self, d: f64) -> f64 {
        if self.total_length <= EPSILON || !d.is_finite() {
            return 0.0;
        }
        let wrapped = d.rem_euclid(self.total_length);
        if wrapped >= self.total_length {
            0.0
        } else {
            wrapped
        }
    }

    /// Exact point `d` drawing units along the loop.
    ///
    /// A zero-length path returns its single point.
    pub fn point_at_distance(&self, d: f64) -> Point {
        if self.segments.is_empty() || self.total_length <= EPSILON {
            return self.origin;
        }
        let d = self.wrap_distance(d);
        let index = self
            .segments
            .partition_point(|s| s.offset <= d)
            .saturating_sub(1);
        let measured = &self.segments[index];
        measured.segment.point_at(d - measured.offset)
    }

    /// Point `d` along the loop, interpolated from the sampling table.
    pub fn sampled_point_at_distance(&self, d: f64) -> Point {
        if self.samples.len() < 2 {
            return self.origin;
        }
        let d = self.wrap_distance(d);
        let index = self
            .samples
            .partition_point(|s| s.distance <= d)
            .saturating_sub(1);
        let a = self.samples[index];
        let (b_point, b_distance) = match self.samples.get(index + 1) {
            Some(b) => (b.point, b.distance),
            None => (self.samples[0].point, self.total_length),
        };
        let span = b_distance - a.distance;
        if span <= EPSILON {
            return a.point;
        }
        a.point.lerp(b_point, (d - a.distance) / span)
    }

    /// Length of the closed polyline through the sampling table.
    pub fn sampled_length(&self) -> f64 {
        let n = self.samples.len();
        if n < 2 {
            return 0.0;
        }
        (0..n)
            .map(|i| self.samples[i].point.distance(self.samples[(i + 1) % n].point))
            .sum()
    }

    /// Closest straight run to `p` by perpendicular projection.
    pub fn nearest_segment(&self, p: Point) -> Option<SegmentHit> {
        self.tangents
            .iter()
            .enumerate()
            .map(|(index, t)| {
                let (projection, distance) = t.project(p);
                SegmentHit {
                    index,
                    from: t.from,
                    to: t.to,
                    distance,
                    projection,
                }
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// [`nearest_segment`](Self::nearest_segment), only if within `threshold`.
    pub fn pick_segment(&self, p: Point, threshold: f64) -> Option<SegmentHit> {
        self.nearest_segment(p).filter(|hit| hit.distance <= threshold)
    }

    /// Wrapped start and end distances of a stretch `span` long centered on `center`.
    pub fn active_window(&self, center: f64, span: f64) -> (f64, f64) {
        let half = (span.max(0.0) / 2.0).min(self.total_length / 2.0);
        (
            self.wrap_distance(center - half),
            self.wrap_distance(center + half),
        )
    }
}
