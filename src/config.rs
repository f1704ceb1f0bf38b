//! Simulation settings.

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::models::Ticks;

/// Ticks per time unit: three fractional digits of input precision.
pub const DEFAULT_TIME_SCALE: u64 = 1000;

/// Settings for one simulation run.
///
/// # Time Representation
/// Task parameters arrive as decimal time units. The engine multiplies them by
/// `time_scale` and rounds to integer ticks; finer input precision is lost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Ticks per time unit.
    pub time_scale: u64,
    /// Record a [`TraceEvent`](crate::models::TraceEvent) for each decision.
    pub record_trace: bool,
}

impl SimulationConfig {
    /// Creates a config with the default time scale and tracing off.
    pub fn new() -> Self {
        Self {
            time_scale: DEFAULT_TIME_SCALE,
            record_trace: false,
        }
    }

    /// Sets the number of ticks per time unit.
    pub fn with_time_scale(mut self, time_scale: u64) -> Self {
        self.time_scale = time_scale;
        self
    }

    /// Enables or disables trace recording.
    pub fn with_trace(mut self, record_trace: bool) -> Self {
        self.record_trace = record_trace;
        self
    }

    /// Converts a decimal time value to ticks.
    ///
    /// Returns `None` for non-finite, non-positive, or sub-tick values.
    pub fn to_ticks(&self, value: f64) -> Option<Ticks> {
        if !value.is_finite() || value <= 0.0 {
            return None;
        }
        let scaled = (value * self.time_scale as f64).round();
        if scaled < 1.0 || scaled > u64::MAX as f64 {
            return None;
        }
        Some(scaled as Ticks)
    }

    /// Converts ticks back to decimal time units.
    pub fn to_units(&self, ticks: Ticks) -> f64 {
        ticks as f64 / self.time_scale as f64
    }

    pub(crate) fn check(&self) -> Result<(), SimError> {
        if self.time_scale == 0 {
            return Err(SimError::InvalidTimeScale);
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}
