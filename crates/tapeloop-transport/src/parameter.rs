//! Bounded transport controls and their 0..1 mapping.
//!
//! A [`ParameterRange`] is what a knob or slider on the transport maps onto:
//! hard limits, a resting value, and a curve between them.
//!
//! ```
//! use tapeloop_transport::{ParameterRange, ParameterScale};
//!
//! let tone = ParameterRange::new(1200.0, 16000.0, 4000.0, ParameterScale::Logarithmic);
//!
//! // Halfway up a logarithmic range is the geometric mean.
//! let hz = tone.denormalize(0.5);
//! assert!((hz - (1200.0f64 * 16000.0).sqrt()).abs() < 1e-6);
//! assert!((tone.normalize(hz) - 0.5).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

/// Curve between the ends of a [`ParameterRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParameterScale {
    /// Equal steps in value per step of the control.
    #[default]
    Linear,
    /// Equal ratios per step of the control. Needs `min > 0`; a range that
    /// breaks this behaves linearly.
    Logarithmic,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterRange {
    /// Lowest accepted value
    pub min: f64,
    /// Highest accepted value
    pub max: f64,
    /// Value a control rests at, and what NaN input collapses to.
    pub default: f64,
    pub scale: ParameterScale,
}

impl ParameterRange {
    /// `default` is pulled inside `[min, max]`.
    pub fn new(min: f64, max: f64, default: f64, scale: ParameterScale) -> Self {
        debug_assert!(min < max, "empty parameter range {}..{}", min, max);
        Self {
            min,
            max,
            default: default.max(min).min(max),
            scale,
        }
    }

    pub fn linear(min: f64, max: f64, default: f64) -> Self {
        Self::new(min, max, default, ParameterScale::Linear)
    }

    pub fn logarithmic(min: f64, max: f64, default: f64) -> Self {
        debug_assert!(min > 0.0, "logarithmic range must start above zero");
        Self::new(min, max, default, ParameterScale::Logarithmic)
    }

    #[inline]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Pull `value` inside the range. NaN becomes the default.
    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            self.default
        } else {
            value.max(self.min).min(self.max)
        }
    }

    /// Position of `value` along the control, in `[0, 1]`.
    pub fn normalize(&self, value: f64) -> f64 {
        if self.span() <= 0.0 {
            return 0.0;
        }
        let value = self.clamp(value);
        match self.log_bounds() {
            Some((lo, hi)) => (value.ln() - lo) / (hi - lo),
            None => (value - self.min) / self.span(),
        }
    }

    /// Value at `position` along the control. Out-of-range positions are
    /// clamped, NaN reads as the bottom of the range.
    pub fn denormalize(&self, position: f64) -> f64 {
        let t = if position.is_nan() {
            0.0
        } else {
            position.max(0.0).min(1.0)
        };
        match self.log_bounds() {
            Some((lo, hi)) => (lo + t * (hi - lo)).exp(),
            None => self.min + t * self.span(),
        }
    }

    /// Natural-log ends of a usable logarithmic range.
    fn log_bounds(&self) -> Option<(f64, f64)> {
        match self.scale {
            ParameterScale::Logarithmic if self.min > 0.0 => Some((self.min.ln(), self.max.ln())),
            _ => None,
        }
    }
}

impl Default for ParameterRange {
    /// Unit range resting in the middle.
    fn default() -> Self {
        Self::linear(0.0, 1.0, 0.5)
    }
}
