//! Timeline events.
//!
//! Events sort by time, then by kind rank, then by task number. At one
//! instant a finishing instance frees the processor before any new release is
//! considered, and every release resolves before any deadline is checked.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::{TaskNum, Ticks};

/// What happens at an event's instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// The running instance finishes. Only honored if `generation` still
    /// matches the task's generation.
    Completion {
        /// Generation the completion was scheduled under.
        generation: u64,
    },
    /// Instance `instance` of the task becomes ready.
    Release {
        /// Zero-based activation index.
        instance: u64,
    },
    /// Instance `instance` of the task must have completed.
    Deadline {
        /// Zero-based activation index.
        instance: u64,
    },
}

impl EventKind {
    /// Same-instant ordering rank.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Completion { .. } => 0,
            Self::Release { .. } => 1,
            Self::Deadline { .. } => 2,
        }
    }

    fn payload(&self) -> u64 {
        match *self {
            Self::Completion { generation } => generation,
            Self::Release { instance } | Self::Deadline { instance } => instance,
        }
    }
}

/// A point on the simulation timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    /// Absolute time (ticks).
    pub time: Ticks,
    /// Event kind and payload.
    pub kind: EventKind,
    /// Task the event belongs to.
    pub task_num: TaskNum,
}

impl Event {
    /// Completion of `task_num` at `time`, stamped with `generation`.
    pub fn completion(time: Ticks, task_num: TaskNum, generation: u64) -> Self {
        Self {
            time,
            kind: EventKind::Completion { generation },
            task_num,
        }
    }

    /// Release of instance `instance` of `task_num`.
    pub fn release(time: Ticks, task_num: TaskNum, instance: u64) -> Self {
        Self {
            time,
            kind: EventKind::Release { instance },
            task_num,
        }
    }

    /// Deadline of instance `instance` of `task_num`.
    pub fn deadline(time: Ticks, task_num: TaskNum, instance: u64) -> Self {
        Self {
            time,
            kind: EventKind::Deadline { instance },
            task_num,
        }
    }

    fn sort_key(&self) -> (Ticks, u8, TaskNum, u64) {
        (self.time, self.kind.rank(), self.task_num, self.kind.payload())
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
