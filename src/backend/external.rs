//! Helper-process backend.
//!
//! The helper is any executable that understands two subcommands and answers
//! with JSON on stdout:
//!
//! ```text
//! <cmd> waveform --approximant A --mass1 M1 --mass2 M2 --delta-t DT --f-lower F --distance D
//!     -> {"start_time": .., "delta_t": .., "hp": [..], "hc": [..]}
//! <cmd> psd --length N --delta-f DF --f-lower F
//!     -> {"delta_f": .., "values": [..]}
//! ```
//!
//! A non-zero exit status is a rejection; the last non-empty stderr line is
//! reported as the cause. `scripts/gw_backend.py` is the PyCBC-based helper.

use std::process::Command;

use log::{debug, warn};
use serde::Deserialize;

use crate::backend::{NoiseModel, WaveformGenerator};
use crate::domain::{WaveformRequest, WaveformSample};
use crate::error::{AppError, FailureStage, GenerationFailure};

/// Environment variable holding the helper command line.
pub const BACKEND_ENV: &str = "GWVIZ_BACKEND";
pub const DEFAULT_BACKEND_COMMAND: &str = "python3 scripts/gw_backend.py";

#[derive(Debug, Deserialize)]
struct WaveformPayload {
    start_time: f64,
    delta_t: f64,
    hp: Vec<f64>,
    hc: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct PsdPayload {
    delta_f: f64,
    values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalBackend {
    program: String,
    args: Vec<String>,
}

impl ExternalBackend {
    /// Read the helper command from `GWVIZ_BACKEND` (`.env` is honoured).
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let line = std::env::var(BACKEND_ENV).unwrap_or_else(|_| DEFAULT_BACKEND_COMMAND.to_string());
        Self::from_command_line(&line)
    }

    /// Split a whitespace-separated command line into program + leading args.
    pub fn from_command_line(line: &str) -> Result<Self, AppError> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| AppError::usage(format!("{BACKEND_ENV} is set but empty.")))?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn invoke(&self, stage: FailureStage, extra: &[String]) -> Result<Vec<u8>, GenerationFailure> {
        debug!("running backend: {} {}", self.command_line(), extra.join(" "));
        let output = Command::new(&self.program)
            .args(&self.args)
            .args(extra)
            .output()
            .map_err(|e| {
                GenerationFailure::new(stage, format!("failed to run backend '{}': {e}", self.command_line()))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let cause = last_line(&stderr)
                .map(str::to_string)
                .unwrap_or_else(|| format!("backend exited with {}", output.status));
            warn!("backend rejected request: {cause}");
            return Err(GenerationFailure::new(stage, cause));
        }

        Ok(output.stdout)
    }
}

impl WaveformGenerator for ExternalBackend {
    fn generate(&self, request: &WaveformRequest) -> Result<WaveformSample, GenerationFailure> {
        let args = vec![
            "waveform".to_string(),
            "--approximant".to_string(),
            request.approximant().model_name().to_string(),
            "--mass1".to_string(),
            request.mass1().to_string(),
            "--mass2".to_string(),
            request.mass2().to_string(),
            "--delta-t".to_string(),
            request.delta_t().to_string(),
            "--f-lower".to_string(),
            request.f_lower().to_string(),
            "--distance".to_string(),
            request.distance().to_string(),
        ];
        let stdout = self.invoke(FailureStage::Waveform, &args)?;
        let sample = parse_waveform(&stdout)?;
        if (sample.delta_t() - request.delta_t()).abs() > 1e-12 {
            warn!(
                "backend returned delta_t={} for requested {}",
                sample.delta_t(),
                request.delta_t()
            );
        }
        Ok(sample)
    }
}

impl NoiseModel for ExternalBackend {
    fn psd(&self, length: usize, delta_f: f64, f_lower: f64) -> Result<Vec<f64>, GenerationFailure> {
        let args = vec![
            "psd".to_string(),
            "--length".to_string(),
            length.to_string(),
            "--delta-f".to_string(),
            delta_f.to_string(),
            "--f-lower".to_string(),
            f_lower.to_string(),
        ];
        let stdout = self.invoke(FailureStage::Sensitivity, &args)?;
        parse_psd(&stdout, delta_f)
    }
}

fn parse_waveform(stdout: &[u8]) -> Result<WaveformSample, GenerationFailure> {
    let payload: WaveformPayload = serde_json::from_slice(stdout).map_err(|e| {
        GenerationFailure::new(FailureStage::Waveform, format!("malformed backend output: {e}"))
    })?;
    WaveformSample::from_series(payload.start_time, payload.delta_t, &payload.hp, &payload.hc)
        .map_err(|e| GenerationFailure::new(FailureStage::Waveform, e.to_string()))
}

fn parse_psd(stdout: &[u8], requested_delta_f: f64) -> Result<Vec<f64>, GenerationFailure> {
    let payload: PsdPayload = serde_json::from_slice(stdout).map_err(|e| {
        GenerationFailure::new(FailureStage::Sensitivity, format!("malformed backend output: {e}"))
    })?;
    let tolerance = requested_delta_f.abs() * 1e-9;
    if (payload.delta_f - requested_delta_f).abs() > tolerance {
        return Err(GenerationFailure::new(
            FailureStage::Sensitivity,
            format!(
                "backend used delta_f={} but {requested_delta_f} was requested",
                payload.delta_f
            ),
        ));
    }
    Ok(payload.values)
}

fn last_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).last()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_splits_program_and_args() {
        let backend = ExternalBackend::from_command_line("  python3   scripts/gw_backend.py ").unwrap();
        assert_eq!(backend.program, "python3");
        assert_eq!(backend.args, vec!["scripts/gw_backend.py".to_string()]);
        assert_eq!(backend.command_line(), "python3 scripts/gw_backend.py");
        assert!(ExternalBackend::from_command_line("   ").is_err());
    }

    #[test]
    fn parses_waveform_payload() {
        let json = br#"{"start_time": -0.5, "delta_t": 0.25, "hp": [1e-21, 2e-21], "hc": [0.0, -1e-21]}"#;
        let sample = parse_waveform(json).unwrap();
        assert_eq!(sample.len(), 2);
        assert_eq!(sample.points()[1].time, -0.25);
        assert_eq!(sample.points()[1].h_cross, -1e-21);
    }

    #[test]
    fn malformed_payloads_are_generation_failures() {
        let err = parse_waveform(b"Traceback").unwrap_err();
        assert_eq!(err.stage(), FailureStage::Waveform);
        assert!(err.cause().starts_with("malformed backend output"));

        let err = parse_waveform(br#"{"start_time": 0, "delta_t": 1, "hp": [1], "hc": []}"#).unwrap_err();
        assert!(err.cause().contains("lengths differ"), "{err}");

        let err = parse_psd(br#"{"delta_f": 0.5, "values": [1]}"#, 0.25).unwrap_err();
        assert_eq!(err.stage(), FailureStage::Sensitivity);
    }

    #[test]
    fn last_stderr_line_is_the_cause() {
        let stderr = "Traceback (most recent call last):\n  ...\nValueError: Approximant TaylorF2 not available\n\n";
        assert_eq!(last_line(stderr), Some("ValueError: Approximant TaylorF2 not available"));
        assert_eq!(last_line("\n  \n"), None);
    }

    #[test]
    fn missing_program_is_reported_not_panicked() {
        let backend = ExternalBackend::from_command_line("gwviz-backend-that-does-not-exist").unwrap();
        let err = backend.generate(&WaveformRequest::default()).unwrap_err();
        assert_eq!(err.stage(), FailureStage::Waveform);
        assert!(err.cause().contains("failed to run backend"), "{err}");
    }

    #[cfg(unix)]
    #[test]
    fn drives_a_helper_script() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("helper.sh");
        let mut file = std::fs::File::create(&script).unwrap();
        writeln!(
            file,
            r#"case "$1" in
  waveform) echo '{{"start_time": 0.0, "delta_t": 0.5, "hp": [1.0, 2.0, 3.0, 4.0], "hc": [4.0, 3.0, 2.0, 1.0]}}' ;;
  psd) echo '{{"delta_f": 0.5, "values": [0.0, 1.0, 2.0, 3.0]}}' ;;
  *) echo "unknown command $1" >&2; exit 1 ;;
esac"#
        )
        .unwrap();
        drop(file);

        let backend = ExternalBackend::from_command_line(&format!("sh {}", script.display())).unwrap();
        let sample = backend.generate(&WaveformRequest::default()).unwrap();
        assert_eq!(sample.len(), 4);
        assert_eq!(sample.duration(), 2.0);

        let psd = backend.psd(4, 0.5, 10.0).unwrap();
        assert_eq!(psd, vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[cfg(unix)]
    #[test]
    fn helper_rejection_carries_stderr() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("reject.sh");
        let mut file = std::fs::File::create(&script).unwrap();
        writeln!(file, "echo 'RuntimeError: Internal function call failed: Input domain error' >&2\nexit 1").unwrap();
        drop(file);

        let backend = ExternalBackend::from_command_line(&format!("sh {}", script.display())).unwrap();
        let err = backend.generate(&WaveformRequest::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error generating time-domain waveform: RuntimeError: Internal function call failed: Input domain error"
        );
    }
}
