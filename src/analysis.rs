//! Utilization analysis.
//!
//! Closed-form indicators to read alongside a simulation verdict.
//!
//! | Indicator | Definition |
//! |-----------|-----------|
//! | Utilization | Σ exec_time / period |
//! | Liu & Layland bound | n · (2^(1/n) − 1) |
//! | Harmonic | every period divides every larger period |
//!
//! Utilization at or below the Liu & Layland bound guarantees RM
//! schedulability with implicit deadlines. Harmonic sets with implicit
//! deadlines are schedulable up to a utilization of 1. Between the bound and
//! 1, or with any deadline differing from its period, only the simulation
//! decides.
//!
//! # Reference
//! Liu & Layland (1973), "Scheduling Algorithms for Multiprogramming in a
//! Hard-Real-Time Environment"

use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::models::TaskSpec;

/// Total processor demand of a task set.
pub fn utilization(tasks: &[TaskSpec]) -> f64 {
    tasks.iter().map(TaskSpec::utilization).sum()
}

/// Liu & Layland utilization bound for `n` tasks.
///
/// `1.0` for a single task, `0.0` for none.
pub fn liu_layland_bound(n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let nf = n as f64;
    nf * (2.0_f64.powf(1.0 / nf) - 1.0)
}

/// Whether every pair of periods divides evenly, compared in ticks at the
/// default time scale.
pub fn is_harmonic(tasks: &[TaskSpec]) -> bool {
    is_harmonic_with(tasks, &SimulationConfig::new())
}

/// [`is_harmonic`] at the tick resolution of `config`.
///
/// A period that does not convert to ticks makes the set non-harmonic.
pub fn is_harmonic_with(tasks: &[TaskSpec], config: &SimulationConfig) -> bool {
    let Some(mut periods) = tasks
        .iter()
        .map(|t| config.to_ticks(t.period))
        .collect::<Option<Vec<_>>>()
    else {
        return false;
    };
    periods.sort_unstable();
    periods.windows(2).all(|w| w[1] % w[0] == 0)
}

/// Whether every deadline equals its period once both are in ticks.
pub fn has_implicit_deadlines(tasks: &[TaskSpec], config: &SimulationConfig) -> bool {
    tasks.iter().all(|t| match config.to_ticks(t.period) {
        Some(period) => config.to_ticks(t.deadline) == Some(period),
        None => false,
    })
}

/// Summary of the closed-form indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilizationReport {
    /// Number of tasks.
    pub task_count: usize,
    /// Σ exec_time / period.
    pub utilization: f64,
    /// Liu & Layland bound for `task_count` tasks.
    pub liu_layland_bound: f64,
    /// Periods pairwise divisible.
    pub harmonic: bool,
    /// Every deadline equals its period.
    pub implicit_deadlines: bool,
}

impl UtilizationReport {
    /// Computes the indicators for a task set at the default time scale.
    pub fn calculate(tasks: &[TaskSpec]) -> Self {
        Self::calculate_with(tasks, &SimulationConfig::new())
    }

    /// Computes the indicators, comparing times in ticks of `config`.
    pub fn calculate_with(tasks: &[TaskSpec], config: &SimulationConfig) -> Self {
        Self {
            task_count: tasks.len(),
            utilization: utilization(tasks),
            liu_layland_bound: liu_layland_bound(tasks.len()),
            harmonic: is_harmonic_with(tasks, config),
            implicit_deadlines: has_implicit_deadlines(tasks, config),
        }
    }

    /// Demand exceeds the processor: no scheduler can succeed.
    pub fn overloaded(&self) -> bool {
        self.utilization > 1.0 + 1e-9
    }

    /// Schedulability follows without simulating.
    ///
    /// Always `false` for constrained or arbitrary deadlines; both bounds
    /// assume each deadline equals its period.
    pub fn guaranteed(&self) -> bool {
        self.implicit_deadlines
            && (self.utilization <= self.liu_layland_bound
                || (self.harmonic && !self.overloaded()))
    }
}
