//! Event timeline.
//!
//! A binary min-heap of [`Event`]s. The initial contents are every release
//! below the hyperperiod and the deadline paired with each release; the
//! engine adds completions as it dispatches.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::models::{Event, Task, Ticks};

/// Pending events in global order.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    heap: BinaryHeap<Reverse<Event>>,
}

impl Timeline {
    /// Creates an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the release/deadline schedule for one hyperperiod.
    ///
    /// Task `i` is released at `0, p, 2p, ...` strictly below `hyperperiod`.
    /// Each release `k` gets its own deadline at `k·p + deadline`, which may
    /// land past the hyperperiod.
    pub fn generate(tasks: &[Task], hyperperiod: Ticks) -> Self {
        let mut timeline = Self::new();

        for task in tasks {
            let mut release: Ticks = 0;
            let mut instance = 0;
            while release < hyperperiod {
                timeline.push(Event::release(release, task.task_num, instance));
                timeline.push(Event::deadline(
                    release.saturating_add(task.deadline),
                    task.task_num,
                    instance,
                ));
                instance += 1;
                // No representable release lies beyond u64::MAX.
                match release.checked_add(task.period) {
                    Some(next) => release = next,
                    None => break,
                }
            }
        }

        timeline
    }

    /// Adds an event.
    pub fn push(&mut self, event: Event) {
        self.heap.push(Reverse(event));
    }

    /// Removes and returns the earliest event.
    pub fn pop(&mut self) -> Option<Event> {
        self.heap.pop().map(|Reverse(e)| e)
    }

    /// Earliest event without removing it.
    pub fn peek(&self) -> Option<&Event> {
        self.heap.peek().map(|Reverse(e)| e)
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether no events remain.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
