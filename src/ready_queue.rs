//! Ready queue.
//!
//! Instances waiting for the processor, ordered by `(priority, task_num)`:
//! the smallest period first, the smaller task number among equal periods.
//! A task may appear more than once when several of its instances are
//! pending.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::models::{TaskNum, Ticks};

/// A waiting instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReadyEntry {
    /// Task priority (its period in ticks).
    pub priority: Ticks,
    /// Task index.
    pub task_num: TaskNum,
}

/// Min-priority queue of waiting instances.
#[derive(Debug, Clone, Default)]
pub struct ReadyQueue {
    heap: BinaryHeap<Reverse<ReadyEntry>>,
}

impl ReadyQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an instance of `task_num`.
    pub fn push(&mut self, priority: Ticks, task_num: TaskNum) {
        self.heap.push(Reverse(ReadyEntry { priority, task_num }));
    }

    /// Removes the most urgent entry.
    pub fn pop(&mut self) -> Option<ReadyEntry> {
        self.heap.pop().map(|Reverse(e)| e)
    }

    /// Most urgent entry without removing it.
    pub fn peek(&self) -> Option<&ReadyEntry> {
        self.heap.peek().map(|Reverse(e)| e)
    }

    /// Number of waiting instances.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Whether any instance of `task_num` is waiting.
    pub fn contains(&self, task_num: TaskNum) -> bool {
        self.heap.iter().any(|Reverse(e)| e.task_num == task_num)
    }
}
