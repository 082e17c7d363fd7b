//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - handed from the backend to the pipeline
//! - rendered by the CLI and the TUI
//! - exported to CSV and read back for plotting

use clap::ValueEnum;
use thiserror::Error;

/// Waveform model passed to the external generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Approximant {
    #[default]
    #[value(name = "SEOBNRv4")]
    Seobnrv4,
    #[value(name = "IMRPhenomPv2")]
    Imrphenompv2,
    #[value(name = "IMRPhenomD")]
    Imrphenomd,
    #[value(name = "TaylorT4")]
    Taylort4,
    #[value(name = "TaylorF2")]
    Taylorf2,
}

impl Approximant {
    pub const ALL: [Approximant; 5] = [
        Approximant::Seobnrv4,
        Approximant::Imrphenompv2,
        Approximant::Imrphenomd,
        Approximant::Taylort4,
        Approximant::Taylorf2,
    ];

    /// The model name understood by the generator.
    pub fn model_name(self) -> &'static str {
        match self {
            Approximant::Seobnrv4 => "SEOBNRv4",
            Approximant::Imrphenompv2 => "IMRPhenomPv2",
            Approximant::Imrphenomd => "IMRPhenomD",
            Approximant::Taylort4 => "TaylorT4",
            Approximant::Taylorf2 => "TaylorF2",
        }
    }

    pub fn next(self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|&a| a == self).unwrap_or(0)
    }
}

impl std::fmt::Display for Approximant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.model_name())
    }
}

/// Sampling rate of the generated series; `delta_t` is its reciprocal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SampleRate {
    #[default]
    #[value(name = "4096")]
    Hz4096,
    #[value(name = "8192")]
    Hz8192,
    #[value(name = "16384")]
    Hz16384,
}

impl SampleRate {
    pub const ALL: [SampleRate; 3] = [SampleRate::Hz4096, SampleRate::Hz8192, SampleRate::Hz16384];

    pub fn hz(self) -> u32 {
        match self {
            SampleRate::Hz4096 => 4096,
            SampleRate::Hz8192 => 8192,
            SampleRate::Hz16384 => 16384,
        }
    }

    pub fn delta_t(self) -> f64 {
        1.0 / f64::from(self.hz())
    }

    pub fn next(self) -> Self {
        match self {
            SampleRate::Hz4096 => SampleRate::Hz8192,
            SampleRate::Hz8192 | SampleRate::Hz16384 => SampleRate::Hz16384,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            SampleRate::Hz16384 => SampleRate::Hz8192,
            SampleRate::Hz8192 | SampleRate::Hz4096 => SampleRate::Hz4096,
        }
    }

    /// Label in the form `1/4096 s`.
    pub fn delta_t_label(self) -> String {
        format!("1/{} s", self.hz())
    }
}

/// One sample of the two strain polarizations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrainPoint {
    pub time: f64,
    pub h_plus: f64,
    pub h_cross: f64,
}

/// Why a set of series could not form a [`WaveformSample`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SampleError {
    #[error("waveform has no samples")]
    Empty,
    #[error("h+ and hx lengths differ ({h_plus} vs {h_cross})")]
    LengthMismatch { h_plus: usize, h_cross: usize },
    #[error("invalid sampling interval {0}")]
    InvalidDeltaT(f64),
    #[error("non-finite value at sample {0}")]
    NonFinite(usize),
    #[error("sample times are not strictly increasing at sample {0}")]
    NotIncreasing(usize),
}

/// A generated time-domain waveform.
///
/// Invariants: non-empty, all values finite, times strictly increasing.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformSample {
    points: Vec<StrainPoint>,
    delta_t: f64,
}

impl WaveformSample {
    /// Build from two polarization series sharing the same time grid
    /// `start_time + i * delta_t`.
    pub fn from_series(
        start_time: f64,
        delta_t: f64,
        h_plus: &[f64],
        h_cross: &[f64],
    ) -> Result<Self, SampleError> {
        if h_plus.len() != h_cross.len() {
            return Err(SampleError::LengthMismatch {
                h_plus: h_plus.len(),
                h_cross: h_cross.len(),
            });
        }
        let points = h_plus
            .iter()
            .zip(h_cross)
            .enumerate()
            .map(|(i, (&hp, &hc))| StrainPoint {
                time: start_time + i as f64 * delta_t,
                h_plus: hp,
                h_cross: hc,
            })
            .collect();
        Self::from_points(points, delta_t)
    }

    /// Build from already-timed points (e.g. read back from CSV).
    pub fn from_points(points: Vec<StrainPoint>, delta_t: f64) -> Result<Self, SampleError> {
        if !(delta_t.is_finite() && delta_t > 0.0) {
            return Err(SampleError::InvalidDeltaT(delta_t));
        }
        if points.is_empty() {
            return Err(SampleError::Empty);
        }
        for (i, p) in points.iter().enumerate() {
            if !(p.time.is_finite() && p.h_plus.is_finite() && p.h_cross.is_finite()) {
                return Err(SampleError::NonFinite(i));
            }
            if i > 0 && p.time <= points[i - 1].time {
                return Err(SampleError::NotIncreasing(i));
            }
        }
        Ok(Self { points, delta_t })
    }

    pub fn points(&self) -> &[StrainPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn delta_t(&self) -> f64 {
        self.delta_t
    }

    /// Duration covered by the samples, `len * delta_t` seconds.
    pub fn duration(&self) -> f64 {
        self.points.len() as f64 * self.delta_t
    }

    /// Frequency resolution matching the waveform duration.
    pub fn delta_f(&self) -> f64 {
        1.0 / self.duration()
    }

    pub fn nyquist(&self) -> f64 {
        1.0 / (2.0 * self.delta_t)
    }

    pub fn start_time(&self) -> f64 {
        self.points[0].time
    }

    pub fn end_time(&self) -> f64 {
        self.points[self.points.len() - 1].time
    }

    /// Largest absolute strain across both polarizations.
    pub fn peak_strain(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.h_plus.abs().max(p.h_cross.abs()))
            .fold(0.0, f64::max)
    }

    pub fn h_plus_series(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.time, p.h_plus)).collect()
    }

    pub fn h_cross_series(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.time, p.h_cross)).collect()
    }
}

/// Closed-form quantities derived from the component masses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedScalars {
    /// Chirp mass in solar masses.
    pub chirp_mass: f64,
    /// ISCO radius in km, when enabled.
    pub isco_radius_km: Option<f64>,
}

/// Detector noise PSD restricted to the displayable band.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SensitivityCurve {
    pub points: Vec<(f64, f64)>,
}

impl SensitivityCurve {
    /// Pair raw PSD values with `k * delta_f` and keep `f_lower < f < nyquist`.
    pub fn from_psd(values: &[f64], delta_f: f64, f_lower: f64, nyquist: f64) -> Self {
        let points = values
            .iter()
            .enumerate()
            .map(|(k, &v)| (k as f64 * delta_f, v))
            .filter(|&(f, _)| f > f_lower && f < nyquist)
            .collect();
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Optional outputs of a cycle.
///
/// The default enables everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    pub include_isco: bool,
    pub include_sensitivity_curve: bool,
    pub enable_export: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            include_isco: true,
            include_sensitivity_curve: true,
            enable_export: true,
        }
    }
}
