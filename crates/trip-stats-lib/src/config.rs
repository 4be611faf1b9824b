//! Segmentation thresholds and per-call overrides

use crate::{Result, TripError};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default distance (km) below which a segment counts as stationary: 50 meters
pub const DEFAULT_STOP_RADIUS_KM: f64 = 0.05;

/// Default minimum stationary duration (ms) for a run to count as a stop: 5 minutes
pub const DEFAULT_STOP_TIME_MS: i64 = 300_000;

/// Thresholds governing stop detection
///
/// A segment whose length is strictly below `stop_radius_km` is considered stationary.
/// A contiguous run of stationary segments is committed as one stop when its
/// accumulated duration reaches `stop_time_ms` (inclusive).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct Config {
    /// Stationary segment threshold in kilometers. Default: 0.05
    pub stop_radius_km: f64,
    /// Minimum stop duration in milliseconds. Default: 300000
    pub stop_time_ms: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stop_radius_km: DEFAULT_STOP_RADIUS_KM,
            stop_time_ms: DEFAULT_STOP_TIME_MS,
        }
    }
}

/// Caller-supplied partial configuration; unset fields fall back to the base config
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct ConfigOverrides {
    pub stop_radius_km: Option<f64>,
    pub stop_time_ms: Option<i64>,
}

impl Config {
    /// Defaults merged with the given overrides
    pub fn from_overrides(overrides: ConfigOverrides) -> Self {
        Self::default().merged(overrides)
    }

    /// Return a copy of `self` with every set override applied
    pub fn merged(self, overrides: ConfigOverrides) -> Self {
        Self {
            stop_radius_km: overrides.stop_radius_km.unwrap_or(self.stop_radius_km),
            stop_time_ms: overrides.stop_time_ms.unwrap_or(self.stop_time_ms),
        }
    }

    /// Reject thresholds that would make stop detection meaningless
    ///
    /// The engine itself accepts any values; front ends call this before running it.
    pub fn validate(&self) -> Result<()> {
        if !self.stop_radius_km.is_finite() || self.stop_radius_km < 0.0 {
            return Err(TripError::InvalidConfig(format!(
                "stop radius must be a non-negative number of km, got {}",
                self.stop_radius_km
            )));
        }
        if self.stop_time_ms < 0 {
            return Err(TripError::InvalidConfig(format!(
                "stop time must be a non-negative number of ms, got {}",
                self.stop_time_ms
            )));
        }
        Ok(())
    }
}
