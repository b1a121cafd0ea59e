//! Transport parameters derived from loop length and tape speed.
//!
//! [`derive`] is a pure function: path length in drawing units plus the
//! transport controls in, the scalar parameters the audio chain consumes
//! out. Every division is guarded so a zero speed or a zero-length loop
//! yields zeros rather than NaN or infinity.

use crate::parameter::{ParameterRange, ParameterScale};
use serde::{Deserialize, Serialize};

/// Transport speed control, in physical units per second.
pub const SPEED_RANGE: ParameterRange = ParameterRange {
    min: 0.0,
    max: 30.0,
    default: 7.5,
    scale: ParameterScale::Linear,
};

/// User flutter multiplier.
pub const FLUTTER_RANGE: ParameterRange = ParameterRange {
    min: 0.0,
    max: 3.0,
    default: 1.0,
    scale: ParameterScale::Linear,
};

/// Tone cutoff, reached as the speed ratio rises.
pub const TONE_RANGE: ParameterRange = ParameterRange {
    min: 1200.0,
    max: 16000.0,
    default: 7400.0,
    scale: ParameterScale::Logarithmic,
};

/// How quickly the tone opens up with speed ratio.
const TONE_SLOPE: f64 = 1.2;

const DEPTH_BASE: f64 = 0.15;
const DEPTH_PER_GUIDE: f64 = 0.12;
const DEPTH_PER_UNIT_LENGTH: f64 = 0.004;
const MAX_DEPTH: f64 = 1.0;

const RATE_FLOOR_HZ: f64 = 0.35;
const RATE_PER_RATIO_HZ: f64 = 0.9;
const RATE_PER_GUIDE_HZ: f64 = 0.25;
const MAX_RATE_HZ: f64 = 8.0;
const MAX_RATE_RATIO: f64 = 4.0;

/// Everything [`derive`] needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransportInput {
    /// Path length in drawing units.
    pub total_length: f64,
    /// Drawing units per physical distance unit.
    pub units_per_inch: f64,
    /// Physical units per second.
    pub speed: f64,
    /// Speed at which playback runs at ratio 1.
    pub reference_speed: f64,
    /// Physical distance from the path start to the record head.
    pub record_offset: f64,
    /// Requested record-to-play head separation, physical units.
    pub head_separation: f64,
    /// Minimum physical gap kept after the play head.
    pub guard_gap: f64,
    /// Movable guides beyond the two anchors.
    pub guide_count: usize,
    /// Wow and flutter amount, clamped to `FLUTTER_RANGE`.
    pub flutter: f64,
}

impl Default for TransportInput {
    fn default() -> Self {
        Self {
            total_length: 0.0,
            units_per_inch: 5.0,
            speed: SPEED_RANGE.default,
            reference_speed: 7.5,
            record_offset: 4.0,
            head_separation: 12.0,
            guard_gap: 2.0,
            guide_count: 0,
            flutter: FLUTTER_RANGE.default,
        }
    }
}

/// Scalar parameters handed to the audio chain once per change.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TransportParams {
    /// Loop length in physical units.
    pub physical_length: f64,
    /// Speed over the reference speed; 1.0 plays back unchanged.
    pub playback_speed_ratio: f64,
    /// Time for one pass of the whole loop past a head.
    pub loop_duration_seconds: f64,
    /// Separation after clamping, physical units.
    pub head_separation: f64,
    /// Largest separation the loop leaves room for.
    pub max_head_separation: f64,
    /// Echo delay between record and play heads.
    pub head_delay_seconds: f64,
    /// Low-pass corner that opens up with speed.
    pub tone_cutoff_hz: f64,
    /// Normalized 0..1.
    pub modulation_depth: f64,
    pub modulation_rate_hz: f64,
}

impl TransportParams {
    /// True when every field is finite.
    pub fn is_finite(&self) -> bool {
        [
            self.physical_length,
            self.playback_speed_ratio,
            self.loop_duration_seconds,
            self.head_separation,
            self.max_head_separation,
            self.head_delay_seconds,
            self.tone_cutoff_hz,
            self.modulation_depth,
            self.modulation_rate_hz,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Derive all transport parameters.
pub fn derive(input: &TransportInput) -> TransportParams {
    let physical_length = physical_length(input.total_length, input.units_per_inch);
    let speed = sanitize(input.speed);
    let max_sep = max_head_separation(physical_length, input.record_offset, input.guard_gap);
    let head_separation = sanitize(input.head_separation).clamp(0.0, max_sep);
    let ratio = speed_ratio(speed, input.reference_speed);

    TransportParams {
        physical_length,
        playback_speed_ratio: ratio,
        loop_duration_seconds: loop_duration(physical_length, speed),
        head_separation,
        max_head_separation: max_sep,
        head_delay_seconds: head_delay(head_separation, speed),
        tone_cutoff_hz: tone_cutoff_hz(ratio),
        modulation_depth: modulation_depth(input.guide_count, physical_length, input.flutter),
        modulation_rate_hz: modulation_rate_hz(ratio, input.guide_count),
    }
}

/// Non-finite and negative values collapse to 0.
#[inline]
fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

#[inline]
pub fn physical_length(total_length: f64, units_per_inch: f64) -> f64 {
    if units_per_inch > 0.0 && units_per_inch.is_finite() {
        sanitize(total_length / units_per_inch)
    } else {
        0.0
    }
}

#[inline]
pub fn loop_duration(physical_length: f64, speed: f64) -> f64 {
    if physical_length > 0.0 && speed > 0.0 {
        sanitize(physical_length / speed)
    } else {
        0.0
    }
}

#[inline]
pub fn head_delay(head_separation: f64, speed: f64) -> f64 {
    if head_separation > 0.0 && speed > 0.0 {
        sanitize(head_separation / speed)
    } else {
        0.0
    }
}

/// Largest separation that still leaves the record offset and guard gap on the loop.
#[inline]
pub fn max_head_separation(physical_length: f64, record_offset: f64, guard_gap: f64) -> f64 {
    sanitize(physical_length - sanitize(record_offset) - sanitize(guard_gap))
}

#[inline]
pub fn speed_ratio(speed: f64, reference_speed: f64) -> f64 {
    if speed > 0.0 && reference_speed > 0.0 {
        sanitize(speed / reference_speed)
    } else {
        0.0
    }
}

/// Faster tape, brighter tone. Starts at the bottom of [`TONE_RANGE`] at standstill.
pub fn tone_cutoff_hz(speed_ratio: f64) -> f64 {
    let opened = 1.0 - (-TONE_SLOPE * sanitize(speed_ratio)).exp();
    TONE_RANGE.denormalize(opened)
}

/// Wow depth grows with every extra guide and with loop length, scaled by flutter.
///
/// Saturates towards `MAX_DEPTH`; zero flutter gives zero depth.
pub fn modulation_depth(guide_count: usize, physical_length: f64, flutter: f64) -> f64 {
    let flutter = FLUTTER_RANGE.clamp(flutter);
    let raw = (DEPTH_BASE
        + DEPTH_PER_GUIDE * guide_count as f64
        + DEPTH_PER_UNIT_LENGTH * sanitize(physical_length))
        * flutter;
    MAX_DEPTH * (1.0 - (-raw).exp())
}

/// Flutter rate rises with speed ratio and guide count, capped at `MAX_RATE_HZ`.
pub fn modulation_rate_hz(speed_ratio: f64, guide_count: usize) -> f64 {
    let ratio = sanitize(speed_ratio).min(MAX_RATE_RATIO);
    (RATE_FLOOR_HZ + RATE_PER_RATIO_HZ * ratio + RATE_PER_GUIDE_HZ * guide_count as f64)
        .min(MAX_RATE_HZ)
}
