//! Scheduling decision trace.

use serde::{Deserialize, Serialize};

use super::{TaskNum, Ticks};

/// One decision taken by the engine, recorded when tracing is enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceEvent {
    /// A periodic instance became ready.
    Released {
        time: Ticks,
        task: TaskNum,
        instance: u64,
    },
    /// A task was given the processor.
    Dispatched {
        time: Ticks,
        task: TaskNum,
        /// Compute still needed for the instance.
        remaining: Ticks,
    },
    /// A task was placed in the ready queue.
    Queued { time: Ticks, task: TaskNum },
    /// The running task lost the processor to a higher-priority release.
    Preempted {
        time: Ticks,
        task: TaskNum,
        by: TaskNum,
        remaining: Ticks,
        /// `false` when the victim was dispatched at this very instant.
        counted: bool,
    },
    /// An instance finished.
    Completed { time: Ticks, task: TaskNum },
    /// The processor has nothing to run.
    Idle { time: Ticks },
    /// A completion left over from an earlier preemption was skipped.
    StaleCompletion { time: Ticks, task: TaskNum },
    /// A deadline check passed.
    DeadlineMet {
        time: Ticks,
        task: TaskNum,
        instance: u64,
    },
    /// A deadline check failed; the run stops here.
    DeadlineMissed {
        time: Ticks,
        task: TaskNum,
        instance: u64,
    },
    /// An instance would finish after the hyperperiod; the run stops here.
    Overrun { time: Ticks, task: TaskNum },
}

impl TraceEvent {
    /// Simulated time of the decision.
    pub fn time(&self) -> Ticks {
        match *self {
            Self::Released { time, .. }
            | Self::Dispatched { time, .. }
            | Self::Queued { time, .. }
            | Self::Preempted { time, .. }
            | Self::Completed { time, .. }
            | Self::Idle { time }
            | Self::StaleCompletion { time, .. }
            | Self::DeadlineMet { time, .. }
            | Self::DeadlineMissed { time, .. }
            | Self::Overrun { time, .. } => time,
        }
    }
}
