//! Rate-monotonic feasibility checking by discrete-event simulation.
//!
//! Given periodic tasks `(exec_time, period, deadline)` on one processor under
//! preemptive fixed-priority scheduling (shorter period = higher priority),
//! simulates one hyperperiod and reports whether every instance meets its
//! deadline, together with how often each task was preempted.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `TaskSpec`, `Task`, `Event`,
//!   `FeasibilityResult`, `SimulationReport`, `TraceEvent`
//! - **`engine`**: The simulation state machine and the `run` entry points
//! - **`hyperperiod`**: LCM of periods at integer tick precision
//! - **`timeline`**: Release/deadline event heap
//! - **`ready_queue`**: Priority-ordered waiting instances
//! - **`validation`**: Input integrity checks (empty sets, bad parameters)
//! - **`loader`**: Text task files
//! - **`analysis`**: Utilization and the Liu & Layland bound
//! - **`generator`**: Random harmonic task sets
//!
//! # Example
//!
//! ```
//! use rm_sim::models::{FeasibilityResult, TaskSpec};
//!
//! let tasks = [TaskSpec::new(1.0, 4.0, 4.0), TaskSpec::new(2.0, 6.0, 6.0)];
//! let result = rm_sim::run(&tasks).unwrap();
//! assert_eq!(result, FeasibilityResult::Feasible { preemptions: vec![0, 0] });
//! ```
//!
//! # References
//!
//! - Liu & Layland (1973), "Scheduling Algorithms for Multiprogramming in a
//!   Hard-Real-Time Environment"
//! - Buttazzo (2011), "Hard Real-Time Computing Systems", Ch. 4

pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod hyperperiod;
pub mod loader;
pub mod models;
pub mod ready_queue;
pub mod timeline;
pub mod validation;

pub use config::SimulationConfig;
pub use engine::{run, run_with_config, RunStatus, Simulation};
pub use error::SimError;
