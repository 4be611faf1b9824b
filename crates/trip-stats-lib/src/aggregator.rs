//! Trip statistics over an ordered fix sequence
//!
//! This module drives the pairwise scan: every pair of adjacent fixes forms a
//! segment whose haversine length is added to the total distance and fed,
//! together with its elapsed time, to the [`StopSegmenter`].

use crate::{Config, Fix, StopSegmenter, format_duration, geodesy};
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Statistics computed for one fix sequence
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TripStats {
    /// Sum of all valid segment lengths in kilometers
    pub total_distance_km: f64,
    /// Number of committed stops
    pub stop_count: u32,
    /// Total duration of committed stops in milliseconds
    pub total_stop_duration_ms: i64,
    /// Time between the first and last fix in milliseconds
    pub trip_duration_ms: i64,
}

/// Display-ready form of [`TripStats`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TripSummary {
    /// Distance with one decimal, e.g. `"12.3 km"`
    pub distance: String,
    pub stops: u32,
    /// Stationary time, e.g. `"0h 6m"`
    pub stop_time: String,
    /// Trip duration, e.g. `"1h 5m"`
    pub trip_time: String,
}

impl TripStats {
    /// Format distance and durations for presentation
    pub fn summary(&self) -> TripSummary {
        TripSummary {
            distance: format_km(self.total_distance_km),
            stops: self.stop_count,
            stop_time: format_duration(self.total_stop_duration_ms),
            trip_time: format_duration(self.trip_duration_ms),
        }
    }
}

/// Kilometers with one decimal, exact ties rounded up (`0.25` → `"0.3 km"`)
///
/// `format!("{:.1}")` rounds ties to even. A product that only looks like a tie
/// after scaling (`0.15 * 10.0 == 1.5`) is resolved from the exact rounding
/// error of the multiplication.
fn format_km(km: f64) -> String {
    let scaled = km * 10.0;
    let tenths = if scaled.fract().abs() == 0.5 {
        if km.mul_add(10.0, -scaled) < 0.0 {
            scaled.floor()
        } else {
            scaled.ceil()
        }
    } else {
        scaled.round()
    };
    format!("{:.1} km", tenths / 10.0)
}

impl From<TripStats> for TripSummary {
    fn from(stats: TripStats) -> Self {
        stats.summary()
    }
}

impl fmt::Display for TripSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {} stops, {} stopped, {} total",
            self.distance, self.stops, self.stop_time, self.trip_time
        )
    }
}

/// Compute trip statistics for an ordered fix sequence
///
/// Fewer than two fixes yield [`TripStats::default`]. Segments with a missing or
/// invalid coordinate on either endpoint are skipped entirely: they add no
/// distance and do not affect stop detection. Out-of-order timestamps are not
/// rejected; their negative elapsed times flow into the computation as-is.
///
/// This function never fails.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn compute_stats(fixes: &[Fix], config: &Config) -> TripStats {
    let (first, last) = match fixes {
        [first, .., last] => (first, last),
        _ => return TripStats::default(),
    };

    let mut total_distance_km = 0.0;
    let mut segmenter = StopSegmenter::new(config);
    let mut skipped = 0usize;
    let mut backwards = 0usize;

    for (index, pair) in fixes.windows(2).enumerate() {
        let (prev, next) = (&pair[0], &pair[1]);

        let distance_km = match segment_distance_km(prev, next) {
            Some(distance_km) => distance_km,
            None => {
                tracing::debug!("Skipping segment {} with invalid endpoint", index);
                skipped += 1;
                continue;
            }
        };
        total_distance_km += distance_km;

        let elapsed_ms = next.millis_since(prev);
        if elapsed_ms < 0 {
            backwards += 1;
        }
        segmenter.observe(distance_km, elapsed_ms);
    }

    if skipped > 0 {
        tracing::warn!(
            "Skipped {} of {} segments with missing or invalid coordinates",
            skipped,
            fixes.len() - 1
        );
    }
    if backwards > 0 {
        tracing::warn!(
            "{} segments go backwards in time; fixes are not chronologically ordered",
            backwards
        );
    }

    let totals = segmenter.finish();

    TripStats {
        total_distance_km,
        stop_count: totals.stop_count,
        total_stop_duration_ms: totals.total_stop_duration_ms,
        trip_duration_ms: last.millis_since(first),
    }
}

/// [`compute_stats`] followed by [`TripStats::summary`]
pub fn compute_summary(fixes: &[Fix], config: &Config) -> TripSummary {
    compute_stats(fixes, config).summary()
}

/// Compute statistics for many independent histories in parallel
///
/// Each entry is keyed (e.g. by device id); results keep the input order.
pub fn compute_stats_parallel<K, F>(histories: Vec<(K, F)>, config: &Config) -> Vec<(K, TripStats)>
where
    K: Send,
    F: AsRef<[Fix]> + Send,
{
    #[cfg(feature = "profiling")]
    profiling::scope!("aggregator::compute_stats_parallel");

    histories
        .into_par_iter()
        .map(|(key, fixes)| {
            let stats = compute_stats(fixes.as_ref(), config);
            (key, stats)
        })
        .collect()
}

/// Segment length, or `None` if either endpoint lacks a valid coordinate
#[inline]
fn segment_distance_km(a: &Fix, b: &Fix) -> Option<f64> {
    let (lat_a, lng_a) = a.lat_lng()?;
    let (lat_b, lng_b) = b.lat_lng()?;
    geodesy::distance_km(lat_a, lng_a, lat_b, lng_b).ok()
}
