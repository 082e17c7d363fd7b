//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - generator inputs (`Approximant`, `SampleRate`, `WaveformRequest`) and their bounds
//! - generator outputs (`WaveformSample`, `SensitivityCurve`)
//! - derived quantities and feature toggles (`DerivedScalars`, `FeatureFlags`)

pub mod params;
pub mod types;

pub use params::*;
pub use types::*;
