//! Input/output helpers.
//!
//! - waveform CSV export and re-import (`export`)

pub mod export;

pub use export::*;
