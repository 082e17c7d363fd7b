//! Shared "interaction cycle" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! request -> generate -> derive -> sensitivity curve
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use log::{debug, info};

use crate::backend::{NoiseModel, WaveformGenerator};
use crate::domain::{DerivedScalars, FeatureFlags, SensitivityCurve, WaveformRequest, WaveformSample};
use crate::error::GenerationFailure;
use crate::physics::derive_scalars;

/// Everything one successful cycle produces.
#[derive(Debug, Clone)]
pub struct CycleOutput {
    pub request: WaveformRequest,
    pub sample: WaveformSample,
    pub scalars: DerivedScalars,
    pub sensitivity: Option<SensitivityCurve>,
}

/// Run one full cycle.
///
/// Either every enabled output is produced or the cycle fails as a whole;
/// there is no partial result.
pub fn run_cycle<B>(
    request: WaveformRequest,
    features: &FeatureFlags,
    backend: &B,
) -> Result<CycleOutput, GenerationFailure>
where
    B: WaveformGenerator + NoiseModel + ?Sized,
{
    info!(
        "generating {} m1={} m2={} d={}Mpc dt={} f_lower={}Hz",
        request.approximant(),
        request.mass1(),
        request.mass2(),
        request.distance(),
        request.delta_t(),
        request.f_lower()
    );

    // 1) Waveform from the external generator.
    let sample = backend.generate(&request)?;
    debug!("received {} samples ({:.3}s)", sample.len(), sample.duration());

    // 2) Closed-form scalars.
    let scalars = derive_scalars(&request, features);

    // 3) Noise curve at the waveform's frequency resolution.
    let sensitivity = if features.include_sensitivity_curve {
        let values = backend.psd(sample.len(), sample.delta_f(), request.f_lower())?;
        let curve = SensitivityCurve::from_psd(&values, sample.delta_f(), request.f_lower(), sample.nyquist());
        debug!("sensitivity curve: {} of {} bins displayable", curve.len(), values.len());
        Some(curve)
    } else {
        None
    };

    Ok(CycleOutput {
        request,
        sample,
        scalars,
        sensitivity,
    })
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::domain::{Approximant, SampleRate};
    use crate::error::FailureStage;

    /// Ten samples of a ramp; PSD is flat.
    struct Fake {
        psd_calls: Cell<usize>,
        fail_psd: bool,
    }

    impl Fake {
        fn new() -> Self {
            Self {
                psd_calls: Cell::new(0),
                fail_psd: false,
            }
        }
    }

    impl WaveformGenerator for Fake {
        fn generate(&self, request: &WaveformRequest) -> Result<WaveformSample, GenerationFailure> {
            if request.approximant() == Approximant::Taylorf2 {
                return Err(GenerationFailure::new(FailureStage::Waveform, "TaylorF2 is frequency-domain only"));
            }
            let hp: Vec<f64> = (0..10).map(f64::from).collect();
            let hc: Vec<f64> = hp.iter().map(|v| -v).collect();
            WaveformSample::from_series(-1.0, request.delta_t(), &hp, &hc)
                .map_err(|e| GenerationFailure::new(FailureStage::Waveform, e.to_string()))
        }
    }

    impl NoiseModel for Fake {
        fn psd(&self, length: usize, _delta_f: f64, _f_lower: f64) -> Result<Vec<f64>, GenerationFailure> {
            self.psd_calls.set(self.psd_calls.get() + 1);
            if self.fail_psd {
                return Err(GenerationFailure::new(FailureStage::Sensitivity, "psd unavailable"));
            }
            Ok(vec![1e-46; length])
        }
    }

    fn request(approximant: Approximant) -> WaveformRequest {
        WaveformRequest::new(30.0, 30.0, approximant, 100.0, SampleRate::Hz4096, 30.0).unwrap()
    }

    #[test]
    fn full_cycle_produces_every_output() {
        let backend = Fake::new();
        let out = run_cycle(request(Approximant::Imrphenomd), &FeatureFlags::default(), &backend).unwrap();
        assert_eq!(out.sample.len(), 10);
        assert!((out.scalars.chirp_mass - 26.11).abs() < 1e-2);
        assert!(out.scalars.isco_radius_km.is_some());
        assert!(out.sensitivity.is_some());
        assert_eq!(backend.psd_calls.get(), 1);
    }

    #[test]
    fn disabled_features_are_skipped() {
        let backend = Fake::new();
        let features = FeatureFlags {
            include_isco: false,
            include_sensitivity_curve: false,
            enable_export: false,
        };
        let out = run_cycle(request(Approximant::Seobnrv4), &features, &backend).unwrap();
        assert_eq!(out.scalars.isco_radius_km, None);
        assert!(out.sensitivity.is_none());
        assert_eq!(backend.psd_calls.get(), 0);
    }

    #[test]
    fn rejected_request_fails_the_cycle() {
        let backend = Fake::new();
        let err = run_cycle(request(Approximant::Taylorf2), &FeatureFlags::default(), &backend).unwrap_err();
        assert_eq!(err.stage(), FailureStage::Waveform);
        assert_eq!(backend.psd_calls.get(), 0);
    }

    #[test]
    fn sensitivity_failure_fails_the_cycle() {
        let backend = Fake {
            psd_calls: Cell::new(0),
            fail_psd: true,
        };
        let err = run_cycle(request(Approximant::Imrphenomd), &FeatureFlags::default(), &backend).unwrap_err();
        assert_eq!(err.stage(), FailureStage::Sensitivity);
    }
}
