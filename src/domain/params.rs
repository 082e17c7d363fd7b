//! Parameter bounds and the validated waveform request.

use crate::domain::{Approximant, SampleRate};
use crate::error::AppError;

/// A closed numeric range with a default and a slider step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
}

impl ParamRange {
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && (self.min..=self.max).contains(&value)
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Move `value` by `steps` slider steps, staying inside the range.
    pub fn nudge(&self, value: f64, steps: i32) -> f64 {
        self.clamp(value + f64::from(steps) * self.step)
    }

    fn check(&self, field: &str, value: f64) -> Result<f64, AppError> {
        if self.contains(value) {
            Ok(value)
        } else {
            Err(AppError::usage(format!(
                "{field} must be within [{}, {}] (got {value})",
                self.min, self.max
            )))
        }
    }
}

/// Component mass in solar masses.
pub const MASS_RANGE: ParamRange = ParamRange {
    name: "mass",
    min: 1.0,
    max: 100.0,
    default: 30.0,
    step: 1.0,
};

/// Luminosity distance in megaparsecs.
pub const DISTANCE_RANGE: ParamRange = ParamRange {
    name: "distance",
    min: 1.0,
    max: 1000.0,
    default: 100.0,
    step: 1.0,
};

/// Lower frequency cutoff in Hz.
pub const F_LOWER_RANGE: ParamRange = ParamRange {
    name: "f_lower",
    min: 10.0,
    max: 100.0,
    default: 30.0,
    step: 1.0,
};

/// A fully populated, in-range set of generation parameters.
///
/// Built fresh for every interaction cycle and passed by value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveformRequest {
    mass1: f64,
    mass2: f64,
    approximant: Approximant,
    distance: f64,
    sample_rate: SampleRate,
    f_lower: f64,
}

impl WaveformRequest {
    pub fn new(
        mass1: f64,
        mass2: f64,
        approximant: Approximant,
        distance: f64,
        sample_rate: SampleRate,
        f_lower: f64,
    ) -> Result<Self, AppError> {
        Ok(Self {
            mass1: MASS_RANGE.check("mass1", mass1)?,
            mass2: MASS_RANGE.check("mass2", mass2)?,
            approximant,
            distance: DISTANCE_RANGE.check(DISTANCE_RANGE.name, distance)?,
            sample_rate,
            f_lower: F_LOWER_RANGE.check(F_LOWER_RANGE.name, f_lower)?,
        })
    }

    pub fn mass1(&self) -> f64 {
        self.mass1
    }

    pub fn mass2(&self) -> f64 {
        self.mass2
    }

    pub fn total_mass(&self) -> f64 {
        self.mass1 + self.mass2
    }

    pub fn approximant(&self) -> Approximant {
        self.approximant
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    /// Sampling interval in seconds.
    pub fn delta_t(&self) -> f64 {
        self.sample_rate.delta_t()
    }

    pub fn f_lower(&self) -> f64 {
        self.f_lower
    }
}

impl Default for WaveformRequest {
    fn default() -> Self {
        Self {
            mass1: MASS_RANGE.default,
            mass2: MASS_RANGE.default,
            approximant: Approximant::default(),
            distance: DISTANCE_RANGE.default,
            sample_rate: SampleRate::default(),
            f_lower: F_LOWER_RANGE.default,
        }
    }
}
