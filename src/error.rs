//! Error types.
//!
//! Two kinds of failure exist:
//!
//! - [`GenerationFailure`]: the external generator (or noise model) rejected a
//!   request. This is an expected outcome of an interaction cycle, not a crash.
//! - [`AppError`]: everything else (bad CLI input, terminal I/O, CSV I/O),
//!   carrying the process exit code.

use thiserror::Error;

/// Exit code for usage, input and file errors.
pub const EXIT_USAGE: u8 = 2;
/// Exit code for a failed generation in one-shot mode.
pub const EXIT_GENERATION: u8 = 3;
/// Exit code for terminal/runtime errors.
pub const EXIT_RUNTIME: u8 = 4;

#[derive(Clone, Error)]
#[error("{message}")]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

/// Which external call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Waveform,
    Sensitivity,
}

/// The generator could not produce output for the requested parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationFailure {
    #[error("Error generating time-domain waveform: {0}")]
    Waveform(String),
    #[error("Error generating sensitivity curve: {0}")]
    Sensitivity(String),
}

impl GenerationFailure {
    pub fn new(stage: FailureStage, cause: impl Into<String>) -> Self {
        match stage {
            FailureStage::Waveform => Self::Waveform(cause.into()),
            FailureStage::Sensitivity => Self::Sensitivity(cause.into()),
        }
    }

    pub fn stage(&self) -> FailureStage {
        match self {
            Self::Waveform(_) => FailureStage::Waveform,
            Self::Sensitivity(_) => FailureStage::Sensitivity,
        }
    }

    /// The underlying cause reported by the collaborator.
    pub fn cause(&self) -> &str {
        match self {
            Self::Waveform(cause) | Self::Sensitivity(cause) => cause,
        }
    }
}

impl From<GenerationFailure> for AppError {
    fn from(err: GenerationFailure) -> Self {
        AppError::new(EXIT_GENERATION, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_message_embeds_cause() {
        let err = GenerationFailure::new(FailureStage::Waveform, "Approximant TaylorF2 not available");
        assert_eq!(
            err.to_string(),
            "Error generating time-domain waveform: Approximant TaylorF2 not available"
        );
        assert_eq!(err.stage(), FailureStage::Waveform);
        assert_eq!(err.cause(), "Approximant TaylorF2 not available");
    }

    #[test]
    fn failure_maps_to_generation_exit_code() {
        let err: AppError = GenerationFailure::new(FailureStage::Sensitivity, "boom").into();
        assert_eq!(err.exit_code(), EXIT_GENERATION);
        assert!(err.to_string().contains("boom"));
    }
}
