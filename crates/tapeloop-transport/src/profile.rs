//! Coarse sonic character of a loop from its duration and tape speed.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SonicProfile {
    /// At most 6 s at a speed of 9 or more.
    UltraShort,
    /// At most 12 s.
    Short,
    /// At most 45 s.
    Mid,
    /// At most 120 s.
    Long,
    UltraLong,
}

impl SonicProfile {
    pub fn classify(loop_duration_seconds: f64, speed: f64) -> Self {
        let duration = loop_duration_seconds;
        if duration <= 6.0 && speed >= 9.0 {
            SonicProfile::UltraShort
        } else if duration <= 12.0 {
            SonicProfile::Short
        } else if duration <= 45.0 {
            SonicProfile::Mid
        } else if duration <= 120.0 {
            SonicProfile::Long
        } else {
            SonicProfile::UltraLong
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SonicProfile::UltraShort => "Ultra-short",
            SonicProfile::Short => "Short",
            SonicProfile::Mid => "Mid-length",
            SonicProfile::Long => "Long",
            SonicProfile::UltraLong => "Ultra-long",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SonicProfile::UltraShort => {
                "Ultra-short loops blur into pitched tones with metallic grit."
            }
            SonicProfile::Short => "Short repetitions emphasize rhythm and clipped figures.",
            SonicProfile::Mid => {
                "Mid-length loops balance groove and atmosphere while still evolving."
            }
            SonicProfile::Long => "Long pathways soften repetition into slow-moving textures.",
            SonicProfile::UltraLong => "Ultra-long loops behave like evolving environments.",
        }
    }
}
