//! Collaborators that produce the heavy data: waveforms and noise curves.
//!
//! Neither is computed in this crate. The pipeline only sees the traits
//! below; [`ExternalBackend`] implements both by driving a helper process.

use crate::domain::{WaveformRequest, WaveformSample};
use crate::error::GenerationFailure;

pub mod external;

pub use external::ExternalBackend;

/// Produces a time-domain waveform for a request.
pub trait WaveformGenerator {
    fn generate(&self, request: &WaveformRequest) -> Result<WaveformSample, GenerationFailure>;
}

/// Produces detector noise PSD values at `k * delta_f` for `k in 0..length`.
pub trait NoiseModel {
    fn psd(&self, length: usize, delta_f: f64, f_lower: f64) -> Result<Vec<f64>, GenerationFailure>;
}
