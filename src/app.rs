//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - builds the generator backend from the environment
//! - runs one cycle (CLI) or the interactive session (TUI)
//! - prints reports/plots and writes optional exports

use std::fs::File;
use std::path::Path;

use clap::Parser;
use log::info;

use crate::backend::ExternalBackend;
use crate::cli::{Command, GenerateArgs, PlotArgs, SessionArgs};
use crate::domain::WaveformSample;
use crate::error::{AppError, EXIT_RUNTIME};

pub mod pipeline;

/// Log file used while the TUI owns the terminal.
pub const TUI_LOG_FILE: &str = "gwviz.log";

/// Entry point for the `gwviz` binary.
pub fn run() -> Result<(), AppError> {
    // We want `gwviz` and `gwviz --mass1 40` to behave like `gwviz tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let is_tui = matches!(cli.command, Command::Tui(_));
    init_logging(cli.verbose, is_tui)?;

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Generate(args) => handle_generate(args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn init_logging(verbosity: u8, to_file: bool) -> Result<(), AppError> {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level));

    // stderr would draw over the alternate screen.
    if to_file {
        if verbosity == 0 && std::env::var_os("RUST_LOG").is_none() {
            builder.filter_level(log::LevelFilter::Off);
        } else {
            let file = File::create(TUI_LOG_FILE)
                .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to create {TUI_LOG_FILE}: {e}")))?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
    }

    // A second init (e.g. from tests) is harmless.
    let _ = builder.try_init();
    Ok(())
}

fn handle_tui(args: SessionArgs) -> Result<(), AppError> {
    let request = args.waveform.to_request()?;
    let backend = ExternalBackend::from_env()?;
    info!("backend: {}", backend.command_line());
    crate::tui::run(request, args.features.flags(), args.output, backend)
}

fn handle_generate(args: GenerateArgs) -> Result<(), AppError> {
    let request = args.waveform.to_request()?;
    let features = args.features.flags();
    if args.save && !features.enable_export {
        return Err(AppError::usage("--save cannot be combined with --no-export."));
    }

    let backend = ExternalBackend::from_env()?;
    info!("backend: {}", backend.command_line());

    // A rejected request is reported as one message; nothing else is shown.
    let out = pipeline::run_cycle(request, &features, &backend)?;

    print!("{}", crate::report::format_cycle_summary(&out));

    if !args.no_plot {
        println!();
        println!("Generated Time-Domain Gravitational Waveform");
        print!("{}", crate::plot::render_strain_plot(&out.sample, args.width, args.height));

        if let Some(curve) = &out.sensitivity {
            println!();
            println!("aLIGO Zero-Detuned High Power Sensitivity");
            print!("{}", crate::plot::render_sensitivity_plot(curve, args.width, args.height));
        }
    }

    if args.save {
        let status = save_waveform(&args.output, &out.sample)?;
        println!();
        println!("{status}");
    }

    Ok(())
}

/// Export and return the status line. A failed export carries the status line
/// as its message, so `main` reports it exactly once.
fn save_waveform(path: &Path, sample: &WaveformSample) -> Result<String, AppError> {
    let result = crate::io::write_waveform_csv(path, sample);
    let status = crate::report::export_status(path, &result);
    match result {
        Ok(()) => Ok(status),
        Err(err) => Err(AppError::new(err.exit_code(), status)),
    }
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let sample = crate::io::read_waveform_csv(&args.csv)?;
    println!("{} ({} samples)", args.csv.display(), sample.len());
    print!("{}", crate::plot::render_strain_plot(&sample, args.width, args.height));
    Ok(())
}

/// Rewrite argv so `gwviz` defaults to `gwviz tui`.
///
/// Rules:
/// - `gwviz`                         -> `gwviz tui`
/// - `gwviz --mass1 40 ...`          -> `gwviz tui --mass1 40 ...`
/// - `gwviz --help/--version/-h`     -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "generate" | "plot");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
