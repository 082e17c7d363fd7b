//! Export a generated waveform to CSV and read it back.
//!
//! Layout: header `Time (s),h+,hx`, then one row per sample in generation
//! order. Floats are written in shortest round-trip form, so reading the file
//! back yields exactly the exported values.

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::domain::{SampleRate, StrainPoint, WaveformSample};
use crate::error::AppError;

/// Default export file name.
pub const DEFAULT_EXPORT_FILE: &str = "waveform.csv";

#[derive(Debug, Serialize, Deserialize)]
struct WaveformRow {
    #[serde(rename = "Time (s)")]
    time: f64,
    #[serde(rename = "h+")]
    h_plus: f64,
    #[serde(rename = "hx")]
    h_cross: f64,
}

/// Write the waveform to `path`, replacing any existing file.
pub fn write_waveform_csv(path: &Path, sample: &WaveformSample) -> Result<(), AppError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(path)
        .map_err(|e| AppError::usage(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    for p in sample.points() {
        writer
            .serialize(WaveformRow {
                time: p.time,
                h_plus: p.h_plus,
                h_cross: p.h_cross,
            })
            .map_err(|e| AppError::usage(format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::usage(format!("Failed to write export CSV '{}': {e}", path.display())))?;

    info!("wrote {} samples to {}", sample.len(), path.display());
    Ok(())
}

/// Read a file produced by [`write_waveform_csv`].
///
/// The sampling interval is taken from the first two rows. A single-sample
/// file carries no spacing, so it falls back to the default sampling rate.
pub fn read_waveform_csv(path: &Path) -> Result<WaveformSample, AppError> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| AppError::usage(format!("Failed to open waveform CSV '{}': {e}", path.display())))?;

    let mut points = Vec::new();
    for (idx, row) in reader.deserialize::<WaveformRow>().enumerate() {
        let row = row.map_err(|e| AppError::usage(format!("Invalid waveform CSV row {}: {e}", idx + 1)))?;
        points.push(StrainPoint {
            time: row.time,
            h_plus: row.h_plus,
            h_cross: row.h_cross,
        });
    }

    let delta_t = match points.as_slice() {
        [first, second, ..] => second.time - first.time,
        _ => SampleRate::default().delta_t(),
    };
    WaveformSample::from_points(points, delta_t)
        .map_err(|e| AppError::usage(format!("Invalid waveform CSV '{}': {e}", path.display())))
}
