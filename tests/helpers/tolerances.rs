//! Tolerance constants for float comparisons.
//!
//! - `GEOMETRY_EPSILON`: closed-form geometry (tangent contacts, stadium lengths)
//! - `WRAP_EPSILON`: points compared after wrapping by whole loop lengths
//! - `SAMPLED_LENGTH_RATIO`: sampled polyline length vs analytic length
//! - `TIME_EPSILON`: derived durations in seconds

pub const GEOMETRY_EPSILON: f64 = 1e-9;

pub const WRAP_EPSILON: f64 = 1e-6;

/// Relative, i.e. 0.5%.
pub const SAMPLED_LENGTH_RATIO: f64 = 0.005;

pub const TIME_EPSILON: f64 = 1e-9;
