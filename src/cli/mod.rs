//! Command-line parsing for the waveform visualizer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the pipeline code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{
    Approximant, DISTANCE_RANGE, F_LOWER_RANGE, FeatureFlags, MASS_RANGE, SampleRate, WaveformRequest,
};
use crate::error::AppError;
use crate::io::DEFAULT_EXPORT_FILE;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "gwviz", version, about = "Gravitational waveform visualizer")]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive TUI (the default when no subcommand is given).
    Tui(SessionArgs),
    /// Generate once, print the derived quantities and plots, optionally save CSV.
    Generate(GenerateArgs),
    /// Plot a previously saved waveform CSV.
    Plot(PlotArgs),
}

/// Binary parameters handed to the generator.
#[derive(Debug, Args, Clone)]
pub struct WaveformArgs {
    /// Mass of the first component (solar masses, 1-100).
    #[arg(long, default_value_t = MASS_RANGE.default)]
    pub mass1: f64,

    /// Mass of the second component (solar masses, 1-100).
    #[arg(long, default_value_t = MASS_RANGE.default)]
    pub mass2: f64,

    /// Waveform approximant.
    #[arg(short = 'a', long, value_enum, default_value_t = Approximant::Seobnrv4)]
    pub approximant: Approximant,

    /// Luminosity distance (megaparsecs, 1-1000).
    #[arg(short = 'd', long, default_value_t = DISTANCE_RANGE.default)]
    pub distance: f64,

    /// Sampling rate in Hz; the time step is its reciprocal.
    #[arg(long, value_enum, default_value_t = SampleRate::Hz4096)]
    pub sample_rate: SampleRate,

    /// Lower frequency cutoff (Hz, 10-100).
    #[arg(long, default_value_t = F_LOWER_RANGE.default)]
    pub f_lower: f64,
}

impl WaveformArgs {
    pub fn to_request(&self) -> Result<WaveformRequest, AppError> {
        WaveformRequest::new(
            self.mass1,
            self.mass2,
            self.approximant,
            self.distance,
            self.sample_rate,
            self.f_lower,
        )
    }
}

/// Optional outputs.
#[derive(Debug, Args, Clone, Default)]
pub struct FeatureArgs {
    /// Do not compute the ISCO radius.
    #[arg(long)]
    pub no_isco: bool,

    /// Do not request or plot the detector sensitivity curve.
    #[arg(long)]
    pub no_psd: bool,

    /// Disable saving the waveform to CSV.
    #[arg(long)]
    pub no_export: bool,
}

impl FeatureArgs {
    pub fn flags(&self) -> FeatureFlags {
        FeatureFlags {
            include_isco: !self.no_isco,
            include_sensitivity_curve: !self.no_psd,
            enable_export: !self.no_export,
        }
    }
}

/// Options for the interactive session.
#[derive(Debug, Args, Clone)]
pub struct SessionArgs {
    #[command(flatten)]
    pub waveform: WaveformArgs,

    #[command(flatten)]
    pub features: FeatureArgs,

    /// Where `s` saves the waveform.
    #[arg(short, long, default_value = DEFAULT_EXPORT_FILE)]
    pub output: PathBuf,
}

/// Options for a one-shot generation.
#[derive(Debug, Args, Clone)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub waveform: WaveformArgs,

    #[command(flatten)]
    pub features: FeatureArgs,

    /// Save the waveform to CSV.
    #[arg(long)]
    pub save: bool,

    /// CSV path used by --save.
    #[arg(short, long, default_value = DEFAULT_EXPORT_FILE)]
    pub output: PathBuf,

    /// Skip the ASCII plots.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

/// Options for plotting a saved waveform.
#[derive(Debug, Args)]
pub struct PlotArgs {
    /// Waveform CSV produced by `gwviz generate --save` or the TUI.
    #[arg(value_name = "CSV", default_value = DEFAULT_EXPORT_FILE)]
    pub csv: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}
