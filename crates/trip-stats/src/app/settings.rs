use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use trip_stats_lib::{Config, ConfigOverrides};

/// How results are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One summary line per device
    #[default]
    Text,
    /// JSON array with formatted and numeric statistics
    Json,
    /// Plain-text activity report per device
    Report,
}

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Trip Stats - Summarize GPS tracking histories into distance, stops and trip time
pub struct Settings {
    /// History files to analyze (`.json` history exports or `.gpx` tracks)
    #[clap(short, long = "file", value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Only analyze these device ids (JSON exports; GPX files use the file name)
    #[clap(short, long = "device", value_name = "ID")]
    pub devices: Vec<String>,

    /// Distance in km below which a segment is considered stationary [default: 0.05]
    #[clap(long)]
    pub stop_radius_km: Option<f64>,

    /// Minimum stationary time in ms for a run to count as a stop [default: 300000]
    #[clap(long)]
    pub stop_time_ms: Option<i64>,

    /// Output format
    #[clap(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Sort each history by timestamp before analyzing it
    #[clap(long, default_value = "false")]
    pub sort: bool,

    /// Fail instead of warning when a history is not chronologically ordered
    #[clap(long, default_value = "false", conflicts_with = "sort")]
    pub require_ordered: bool,
}

impl Settings {
    /// Parse from the command line, exiting with usage on error
    pub fn from_cli() -> Self {
        match Settings::try_parse() {
            Ok(args) => args,
            Err(e) => e.exit(),
        }
    }

    /// Engine thresholds: defaults merged with the flags that were given
    pub fn config(&self) -> Config {
        Config::from_overrides(ConfigOverrides {
            stop_radius_km: self.stop_radius_km,
            stop_time_ms: self.stop_time_ms,
        })
    }
}
