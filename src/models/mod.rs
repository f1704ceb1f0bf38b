//! Simulation domain models.
//!
//! | Type | Role |
//! |------|------|
//! | `TaskSpec` | Input triple in decimal time units |
//! | `Task` | Registry entry: constant parameters in ticks plus engine state |
//! | `Event` | Release, deadline or completion on the timeline |
//! | `FeasibilityResult` | Verdict with per-task preemption counts |
//! | `SimulationReport` | Verdict plus final registry and trace |
//! | `TraceEvent` | One recorded scheduling decision |

mod event;
mod result;
mod task;
mod trace;

pub use event::{Event, EventKind};
pub use result::{FeasibilityResult, SimulationReport};
pub use task::{Task, TaskNum, TaskSpec, Ticks};
pub use trace::TraceEvent;
