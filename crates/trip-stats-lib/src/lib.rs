//! Trip Stats Library - Trajectory analytics for GPS fix histories
//!
//! Given the ordered fixes reported by one tracked entity over one period, this library
//! computes the summary statistics shown on dashboards and activity reports: total distance
//! traveled, number of stops, total time stationary and total elapsed trip time.
//!
//! # Architecture
//!
//! - **[`geodesy`]**: Haversine great-circle distance between coordinates
//! - **[`StopSegmenter`]**: Single-pass moving/stationary state machine with stop commits
//! - **[`format_duration`]**: Millisecond durations rendered as `"Hh Mm"`
//! - **[`compute_stats`]**: Pairwise scan driving the above and assembling [`TripStats`]
//! - **[`history`]**: Decoding helpers (GPX import, ordering checks) for fix sequences
//!
//! # Performance Characteristics
//!
//! - **Time**: O(N) in the number of fixes, a single linear pass
//! - **Memory**: O(1) beyond the input slice
//! - **Parallelism**: independent histories can be processed concurrently with
//!   [`compute_stats_parallel`]

mod aggregator;
mod config;
mod duration;
mod fix;
pub mod geodesy;
pub mod history;
mod segmentation;

// Public API exports
pub use aggregator::{TripStats, TripSummary, compute_stats, compute_stats_parallel, compute_summary};
pub use config::{Config, ConfigOverrides};
pub use duration::format_duration;
pub use fix::{Fix, FixRecord};
pub use segmentation::{SegmentationState, StopSegmenter, StopTotals};

/// Error types for the trip statistics library
#[derive(Debug, thiserror::Error)]
pub enum TripError {
    #[error("Invalid coordinate: lat={lat}, lng={lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("GPX parsing error: {0}")]
    GpxParse(#[from] gpx::errors::GpxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TripError>;
