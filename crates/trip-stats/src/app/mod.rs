//! Application module
//!
//! Loads the requested histories, runs the trip statistics engine over every
//! device in parallel and writes the results:
//! - JSON history exports and GPX tracks as input
//! - Optional device filter and chronological ordering policy
//! - Text, JSON or activity-report output

mod input;
mod report;
pub(crate) mod settings;

pub use input::DeviceHistory;
pub use report::DeviceReport;
pub use settings::{OutputFormat, Settings};

use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;
use trip_stats_lib::{Config, TripError, compute_stats_parallel, history};

#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Trip(#[from] TripError),

    #[error("History of device {device_id} is not chronologically ordered (first at fix #{index})")]
    UnorderedHistory { device_id: String, index: usize },

    #[error("No history found for device {0}")]
    UnknownDevice(String),

    #[error("Unsupported input file {0:?}: expected a .json or .gpx extension")]
    UnsupportedInput(PathBuf),
}

/// Run the whole pipeline with the given settings, writing results to `out`
pub fn run<W: Write>(settings: &Settings, out: &mut W) -> Result<(), CliError> {
    profiling::scope!("run");

    let config = settings.config();
    config.validate()?;
    tracing::debug!(?config, "Using thresholds");

    let histories = input::load_files(&settings.files)?;
    let histories = input::select_devices(histories, &settings.devices)?;
    let histories = apply_ordering(histories, settings)?;

    let reports = analyze(histories, &config);
    let today = time::OffsetDateTime::now_utc().date();
    report::write_reports(out, &reports, settings.format, today)?;
    Ok(())
}

/// Compute statistics for every history in parallel
pub fn analyze(histories: Vec<DeviceHistory>, config: &Config) -> Vec<DeviceReport> {
    let fix_counts: Vec<usize> = histories.iter().map(|h| h.fixes.len()).collect();
    let keyed: Vec<(String, Vec<_>)> = histories
        .into_iter()
        .map(|h| (h.device_id, h.fixes))
        .collect();

    compute_stats_parallel(keyed, config)
        .into_iter()
        .zip(fix_counts)
        .map(|((device_id, stats), fix_count)| DeviceReport::new(device_id, fix_count, stats))
        .collect()
}

/// Sort, reject or pass through histories according to the ordering flags
fn apply_ordering(
    mut histories: Vec<DeviceHistory>,
    settings: &Settings,
) -> Result<Vec<DeviceHistory>, CliError> {
    for h in &mut histories {
        let Some(index) = history::first_out_of_order(&h.fixes) else {
            continue;
        };
        if settings.sort {
            tracing::info!("Sorting history of device {} by timestamp", h.device_id);
            history::sort_chronologically(&mut h.fixes);
        } else if settings.require_ordered {
            return Err(CliError::UnorderedHistory {
                device_id: h.device_id.clone(),
                index,
            });
        } else {
            tracing::warn!(
                "History of device {} is not chronologically ordered (first at fix #{}); \
                 durations may be understated",
                h.device_id,
                index
            );
        }
    }
    Ok(histories)
}
