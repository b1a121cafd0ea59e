//! Tape transport model: loop duration, head delay, tone and flutter
//! parameters derived from loop length and tape speed, plus the wrapping
//! playhead accumulator.
//!
//! # Example
//!
//! ```
//! use tapeloop_transport::{derive, TransportInput};
//!
//! let params = derive(&TransportInput {
//!     total_length: 575.4, // drawing units
//!     units_per_inch: 5.0,
//!     speed: 7.5,
//!     ..TransportInput::default()
//! });
//! assert!((params.loop_duration_seconds - 15.344).abs() < 0.01);
//! ```

pub mod parameter;
pub use parameter::{ParameterRange, ParameterScale};

pub mod params;
pub use params::{derive, TransportInput, TransportParams, FLUTTER_RANGE, SPEED_RANGE, TONE_RANGE};

mod playhead;
pub use playhead::{Direction, Playhead};

mod profile;
pub use profile::SonicProfile;
