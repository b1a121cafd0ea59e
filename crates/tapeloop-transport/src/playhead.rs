//! Running "distance traveled" along the loop.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Forwards,
    Backwards,
}

impl Direction {
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forwards => 1.0,
            Direction::Backwards => -1.0,
        }
    }

    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Direction::Forwards => Direction::Backwards,
            Direction::Backwards => Direction::Forwards,
        }
    }
}

/// Tape position along a loop whose length may change at any time.
///
/// Position is in physical units and always lies in `[0, loop_length)`,
/// or is exactly 0 for an empty loop.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Playhead {
    traveled: f64,
    loop_length: f64,
}

impl Playhead {
    pub fn new(loop_length: f64) -> Self {
        Self {
            traveled: 0.0,
            loop_length: valid_length(loop_length),
        }
    }

    #[inline]
    pub fn traveled(&self) -> f64 {
        self.traveled
    }

    #[inline]
    pub fn loop_length(&self) -> f64 {
        self.loop_length
    }

    /// Position as a fraction of the loop, in `[0, 1)`.
    #[inline]
    pub fn phase(&self) -> f64 {
        if self.loop_length > 0.0 {
            self.traveled / self.loop_length
        } else {
            0.0
        }
    }

    /// Move `speed * dt` along the loop in `direction`, wrapping at either end.
    ///
    /// `dt = 0` leaves the position untouched.
    pub fn advance(&mut self, speed: f64, dt: f64, direction: Direction) -> f64 {
        let step = speed * dt * direction.sign();
        if self.loop_length <= 0.0 {
            self.traveled = 0.0;
        } else if step.is_finite() && step != 0.0 {
            self.traveled = wrap(self.traveled + step, self.loop_length);
        }
        self.traveled
    }

    /// Adopt a new loop length, keeping the same relative position.
    pub fn set_loop_length(&mut self, loop_length: f64) {
        let new_length = valid_length(loop_length);
        if new_length == self.loop_length {
            return;
        }

        let old_length = self.loop_length;
        self.traveled = if old_length > 0.0 && new_length > 0.0 {
            wrap(self.traveled / old_length * new_length, new_length)
        } else {
            0.0
        };
        self.loop_length = new_length;

        tracing::trace!(
            old_length,
            new_length,
            traveled = self.traveled,
            "playhead rescaled"
        );
    }

    /// Jump to `position`, wrapped into the loop.
    pub fn locate(&mut self, position: f64) {
        self.traveled = if self.loop_length > 0.0 && position.is_finite() {
            wrap(position, self.loop_length)
        } else {
            0.0
        };
    }

    pub fn reset(&mut self) {
        self.traveled = 0.0;
    }
}

#[inline]
fn valid_length(length: f64) -> f64 {
    if length.is_finite() && length > 0.0 {
        length
    } else {
        0.0
    }
}

#[inline]
fn wrap(position: f64, length: f64) -> f64 {
    let wrapped = position.rem_euclid(length);
    if wrapped >= length {
        0.0
    } else {
        wrapped
    }
}
