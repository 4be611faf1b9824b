//! Stop segmentation state machine
//!
//! Consumes segments (the interval between two adjacent fixes) one at a time and
//! classifies each as moving or stationary from its length alone:
//!
//! - A segment shorter than the stop radius starts or extends a potential stop,
//!   accumulating its elapsed time.
//! - A segment at or above the radius ends the potential stop. The run is
//!   committed as one stop if its accumulated time reaches the stop threshold.
//! - [`StopSegmenter::finish`] commits a run that is still open at the end of
//!   the sequence.
//!
//! Stationarity is judged per segment, not as displacement from where the run
//! started, so a slow drift made of many short segments is reported as a single
//! long stop. This is a known approximation.

use crate::Config;

/// Current classification of the entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentationState {
    /// No stop is accumulating
    #[default]
    Moving,
    /// Stationary since entering this state, for `elapsed_ms` in total
    PotentialStop { elapsed_ms: i64 },
}

/// Committed stop totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StopTotals {
    /// Number of committed stops
    pub stop_count: u32,
    /// Sum of the durations of all committed stops
    pub total_stop_duration_ms: i64,
}

/// Single-pass stop detector
#[derive(Debug, Clone)]
pub struct StopSegmenter {
    stop_radius_km: f64,
    stop_time_ms: i64,
    state: SegmentationState,
    totals: StopTotals,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl StopSegmenter {
    /// Create a segmenter in the [`SegmentationState::Moving`] state
    pub fn new(config: &Config) -> Self {
        Self {
            stop_radius_km: config.stop_radius_km,
            stop_time_ms: config.stop_time_ms,
            state: SegmentationState::Moving,
            totals: StopTotals::default(),
        }
    }

    /// Current state
    #[inline]
    pub fn state(&self) -> SegmentationState {
        self.state
    }

    /// Stops committed so far (excludes a still-open potential stop)
    #[inline]
    pub fn totals(&self) -> StopTotals {
        self.totals
    }

    /// Feed one segment
    ///
    /// # Arguments
    /// * `distance_km` - Length of the segment
    /// * `elapsed_ms` - Time between the segment's two fixes
    pub fn observe(&mut self, distance_km: f64, elapsed_ms: i64) {
        if distance_km < self.stop_radius_km {
            self.state = match self.state {
                SegmentationState::Moving => SegmentationState::PotentialStop {
                    elapsed_ms,
                },
                SegmentationState::PotentialStop { elapsed_ms: acc } => {
                    SegmentationState::PotentialStop {
                        elapsed_ms: acc.saturating_add(elapsed_ms),
                    }
                }
            };
        } else {
            self.commit_if_long_enough();
            self.state = SegmentationState::Moving;
        }
    }

    /// Flush a trailing potential stop and return the final totals
    pub fn finish(mut self) -> StopTotals {
        self.commit_if_long_enough();
        self.totals
    }

    fn commit_if_long_enough(&mut self) {
        if let SegmentationState::PotentialStop { elapsed_ms } = self.state
            && elapsed_ms >= self.stop_time_ms
        {
            self.totals.stop_count += 1;
            self.totals.total_stop_duration_ms =
                self.totals.total_stop_duration_ms.saturating_add(elapsed_ms);
            tracing::debug!(
                "Committed stop #{} lasting {} ms",
                self.totals.stop_count,
                elapsed_ms
            );
        }
    }
}
