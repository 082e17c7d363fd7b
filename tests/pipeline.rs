//! End-to-end cycle tests with an in-memory generator and noise model.

use gw_viz::app::pipeline::run_cycle;
use gw_viz::backend::{NoiseModel, WaveformGenerator};
use gw_viz::domain::{Approximant, FeatureFlags, SampleRate, WaveformRequest, WaveformSample};
use gw_viz::error::{FailureStage, GenerationFailure};
use gw_viz::io::{read_waveform_csv, write_waveform_csv};

/// Damped chirp-like series, one second long, and a PSD rising with frequency.
struct Synthetic;

impl WaveformGenerator for Synthetic {
    fn generate(&self, request: &WaveformRequest) -> Result<WaveformSample, GenerationFailure> {
        if request.approximant() == Approximant::Taylorf2 {
            return Err(GenerationFailure::new(
                FailureStage::Waveform,
                "Approximant TaylorF2 not available in the time domain",
            ));
        }
        let dt = request.delta_t();
        let n = (1.0 / dt) as usize;
        let amp = 1e-21 * 100.0 / request.distance();
        let hp: Vec<f64> = (0..n)
            .map(|i| {
                let t = i as f64 * dt;
                amp * t * (2.0 * std::f64::consts::PI * (request.f_lower() + 200.0 * t) * t).cos()
            })
            .collect();
        let hc: Vec<f64> = (0..n)
            .map(|i| {
                let t = i as f64 * dt;
                amp * t * (2.0 * std::f64::consts::PI * (request.f_lower() + 200.0 * t) * t).sin()
            })
            .collect();
        WaveformSample::from_series(-1.0, dt, &hp, &hc)
            .map_err(|e| GenerationFailure::new(FailureStage::Waveform, e.to_string()))
    }
}

impl NoiseModel for Synthetic {
    fn psd(&self, length: usize, delta_f: f64, f_lower: f64) -> Result<Vec<f64>, GenerationFailure> {
        Ok((0..length)
            .map(|k| {
                let f = k as f64 * delta_f;
                if f < f_lower { 0.0 } else { 1e-47 * (1.0 + f / 100.0) }
            })
            .collect())
    }
}

fn request(approximant: Approximant, rate: SampleRate, f_lower: f64) -> WaveformRequest {
    WaveformRequest::new(30.0, 30.0, approximant, 100.0, rate, f_lower).unwrap()
}

#[test]
fn sensitivity_frequencies_stay_inside_band() {
    for rate in SampleRate::ALL {
        for f_lower in [10.0, 30.0, 100.0] {
            let req = request(Approximant::Imrphenomd, rate, f_lower);
            let out = run_cycle(req, &FeatureFlags::default(), &Synthetic).unwrap();
            let curve = out.sensitivity.expect("sensitivity enabled");
            let nyquist = 1.0 / (2.0 * req.delta_t());

            assert!(!curve.is_empty());
            for &(f, _) in &curve.points {
                assert!(f > f_lower, "{f} <= {f_lower}");
                assert!(f < nyquist, "{f} >= {nyquist}");
            }
        }
    }
}

#[test]
fn invalid_combination_reports_one_error_and_no_output() {
    let req = request(Approximant::Taylorf2, SampleRate::Hz4096, 30.0);
    let result = run_cycle(req, &FeatureFlags::default(), &Synthetic);
    let err = result.expect_err("TaylorF2 has no time-domain waveform");
    assert_eq!(
        err.to_string(),
        "Error generating time-domain waveform: Approximant TaylorF2 not available in the time domain"
    );
}

#[test]
fn exported_cycle_reads_back_identically() {
    let req = request(Approximant::Seobnrv4, SampleRate::Hz8192, 20.0);
    let features = FeatureFlags {
        include_sensitivity_curve: false,
        ..FeatureFlags::default()
    };
    let out = run_cycle(req, &features, &Synthetic).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("waveform.csv");
    write_waveform_csv(&path, &out.sample).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), out.sample.len() + 1);

    let back = read_waveform_csv(&path).unwrap();
    assert_eq!(back.points(), out.sample.points());
}

#[test]
fn derived_scalars_follow_masses_only() {
    let a = run_cycle(
        WaveformRequest::new(10.0, 40.0, Approximant::Taylort4, 500.0, SampleRate::Hz4096, 40.0).unwrap(),
        &FeatureFlags::default(),
        &Synthetic,
    )
    .unwrap();
    let b = run_cycle(
        WaveformRequest::new(40.0, 10.0, Approximant::Imrphenompv2, 5.0, SampleRate::Hz16384, 15.0).unwrap(),
        &FeatureFlags::default(),
        &Synthetic,
    )
    .unwrap();
    assert_eq!(a.scalars, b.scalars);
    assert_eq!(a.scalars.isco_radius_km, Some(6.0 * 50.0 * 1.477));
}
