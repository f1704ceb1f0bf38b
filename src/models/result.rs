//! Simulation outcome.

use serde::{Deserialize, Serialize};

use super::{Task, Ticks, TraceEvent};

/// Verdict of a feasibility run.
///
/// The two ways a run can fail (an instance finishing past the hyperperiod,
/// or a deadline check finding too few completions) are not distinguished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeasibilityResult {
    /// Every instance met its deadline within the hyperperiod.
    Feasible {
        /// Lifetime preemption count per task, indexed by `task_num`.
        preemptions: Vec<u64>,
    },
    /// Some instance missed its deadline or overran the hyperperiod.
    Infeasible,
}

impl FeasibilityResult {
    /// Whether the task set is schedulable.
    pub fn is_feasible(&self) -> bool {
        matches!(self, Self::Feasible { .. })
    }

    /// Preemption counts, only when feasible.
    pub fn preemptions(&self) -> Option<&[u64]> {
        match self {
            Self::Feasible { preemptions } => Some(preemptions),
            Self::Infeasible => None,
        }
    }
}

/// Everything a finished run leaves behind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    /// The verdict.
    pub result: FeasibilityResult,
    /// Hyperperiod the run covered (ticks).
    pub hyperperiod: Ticks,
    /// Simulated time of the last processed event (ticks).
    pub end_time: Ticks,
    /// Number of events applied, stale completions included.
    pub events_processed: u64,
    /// Final registry state.
    pub tasks: Vec<Task>,
    /// Recorded decisions; empty unless tracing was enabled.
    pub trace: Vec<TraceEvent>,
}

impl SimulationReport {
    /// Total preemptions across all tasks.
    pub fn total_preemptions(&self) -> u64 {
        self.tasks.iter().map(|t| t.times_preempted).sum()
    }
}
