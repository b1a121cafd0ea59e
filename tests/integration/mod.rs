//! Integration test modules for tapeloop
//!
//! Test categories:
//! - geometry: path construction, fallback switching, metrics queries
//! - transport: parameter derivation and playhead behavior through the engine
//! - engine: guide lifecycle, pipeline states, snapshots

pub mod engine;
pub mod geometry;
pub mod transport;
