//! Loop engine configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tapeloop_geometry::{has_area, Rect, DEFAULT_WORKSPACE};

/// Fixed conversions and limits for one tape loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Drawing units per physical distance unit.
    pub units_per_inch: f64,
    /// Transport speed that plays back at ratio 1.0.
    pub reference_speed: f64,
    /// Physical distance from the path start to the record head.
    pub record_offset: f64,
    /// Physical gap always left after the play head.
    pub guard_gap: f64,
    /// Max drawing-unit distance for a click to land on the path.
    pub pick_threshold: f64,
    /// Movable guides allowed besides the two anchors.
    pub max_guides: usize,
    /// Wrap radius of both drive anchors, fixed for the engine's lifetime.
    pub anchor_radius: f64,
    /// Radius given to newly added guides.
    pub guide_radius: f64,
    /// Rectangle every movable guide is clamped to.
    pub workspace: Rect,
    /// Drawing units between sampler table points.
    pub sample_spacing: f64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            units_per_inch: 5.0,
            reference_speed: 7.5,
            record_offset: 4.0,
            guard_gap: 2.0,
            pick_threshold: 14.0,
            max_guides: 12,
            anchor_radius: 12.0,
            guide_radius: 10.0,
            workspace: DEFAULT_WORKSPACE,
            sample_spacing: 2.0,
        }
    }
}

impl LoopConfig {
    /// Reject non-finite or out-of-range values and a workspace without area.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("units_per_inch", self.units_per_inch),
            ("reference_speed", self.reference_speed),
            ("anchor_radius", self.anchor_radius),
            ("guide_radius", self.guide_radius),
            ("sample_spacing", self.sample_spacing),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        let non_negative = [
            ("record_offset", self.record_offset),
            ("guard_gap", self.guard_gap),
            ("pick_threshold", self.pick_threshold),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }

        if !has_area(&self.workspace) {
            return Err(Error::InvalidConfig(format!(
                "workspace {}x{} is empty",
                self.workspace.width(),
                self.workspace.height()
            )));
        }
        Ok(())
    }
}
