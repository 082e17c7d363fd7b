//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the pipeline stays free of presentation concerns
//! - CLI and TUI show the same wording for the same quantities

use std::path::Path;

use crate::app::pipeline::CycleOutput;
use crate::domain::{DerivedScalars, WaveformRequest};
use crate::error::AppError;

pub fn format_chirp_mass(scalars: &DerivedScalars) -> String {
    format!("Chirp Mass: {:.2} Solar Masses", scalars.chirp_mass)
}

pub fn format_isco_radius(scalars: &DerivedScalars) -> Option<String> {
    scalars.isco_radius_km.map(|r| format!("ISCO Radius: {r:.2} km"))
}

/// One-line description of a request.
pub fn format_request(request: &WaveformRequest) -> String {
    format!(
        "{} | m1={} m2={} Msun | d={} Mpc | dt={} | f_lower={} Hz",
        request.approximant(),
        request.mass1(),
        request.mass2(),
        request.distance(),
        request.sample_rate().delta_t_label(),
        request.f_lower(),
    )
}

/// Full summary of a successful cycle.
pub fn format_cycle_summary(out: &CycleOutput) -> String {
    let mut lines = vec![
        "=== Gravitational Waveform Visualizer ===".to_string(),
        format_request(&out.request),
        String::new(),
        format_chirp_mass(&out.scalars),
    ];
    if let Some(isco) = format_isco_radius(&out.scalars) {
        lines.push(isco);
    }

    lines.push(String::new());
    lines.push(format!(
        "Waveform: n={} | t=[{:.4}, {:.4}] s | duration={:.4} s | peak |h|={:.3e}",
        out.sample.len(),
        out.sample.start_time(),
        out.sample.end_time(),
        out.sample.duration(),
        out.sample.peak_strain(),
    ));

    if let Some(curve) = &out.sensitivity {
        lines.push(format!(
            "Sensitivity: {} bins in ({:.0}, {:.0}) Hz | delta_f={:.4} Hz",
            curve.len(),
            out.request.f_lower(),
            out.sample.nyquist(),
            out.sample.delta_f(),
        ));
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Status line after an export attempt.
pub fn export_status(path: &Path, result: &Result<(), AppError>) -> String {
    match result {
        Ok(()) => format!("Waveform data saved as '{}'", path.display()),
        Err(err) => format!("Failed to save waveform data: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Approximant, SampleRate, SensitivityCurve, WaveformSample};

    fn output() -> CycleOutput {
        let request = WaveformRequest::new(30.0, 30.0, Approximant::Imrphenomd, 100.0, SampleRate::Hz4096, 30.0).unwrap();
        CycleOutput {
            request,
            sample: WaveformSample::from_series(0.0, 0.5, &[1e-21, -2e-21], &[0.0, 0.0]).unwrap(),
            scalars: DerivedScalars {
                chirp_mass: 26.1165,
                isco_radius_km: Some(531.72),
            },
            sensitivity: Some(SensitivityCurve::default()),
        }
    }

    #[test]
    fn summary_lists_derived_scalars() {
        let text = format_cycle_summary(&output());
        assert!(text.contains("Chirp Mass: 26.12 Solar Masses"), "{text}");
        assert!(text.contains("ISCO Radius: 531.72 km"), "{text}");
        assert!(text.contains("IMRPhenomD | m1=30 m2=30 Msun | d=100 Mpc | dt=1/4096 s | f_lower=30 Hz"));
        assert!(text.contains("Waveform: n=2"));
        assert!(text.contains("Sensitivity: 0 bins"));
    }

    #[test]
    fn summary_omits_disabled_outputs() {
        let mut out = output();
        out.scalars.isco_radius_km = None;
        out.sensitivity = None;
        let text = format_cycle_summary(&out);
        assert!(!text.contains("ISCO"));
        assert!(!text.contains("Sensitivity"));
    }

    #[test]
    fn request_line_keeps_fractional_inputs() {
        let request =
            WaveformRequest::new(12.5, 30.0, Approximant::Imrphenomd, 250.75, SampleRate::Hz8192, 20.5).unwrap();
        assert_eq!(
            format_request(&request),
            "IMRPhenomD | m1=12.5 m2=30 Msun | d=250.75 Mpc | dt=1/8192 s | f_lower=20.5 Hz"
        );
    }

    #[test]
    fn export_status_messages() {
        let path = Path::new("waveform.csv");
        assert_eq!(export_status(path, &Ok(())), "Waveform data saved as 'waveform.csv'");
        let err = Err(AppError::usage("disk full"));
        assert_eq!(export_status(path, &err), "Failed to save waveform data: disk full");
    }
}
