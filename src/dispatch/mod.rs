//! Dispatch policy: per-task state tracking and resource selection.
//!
//! The engine folds each batch of simulation events into a per-task state
//! table, classifies every ready task's urgency from its slack, and ranks
//! the competitors for the CPU and the I/O device with pure key functions.
//!
//! # Usage
//!
//! ```
//! use rt_dispatch::dispatch::DispatchEngine;
//! use rt_dispatch::models::{Event, Priority, Task, TaskId};
//!
//! let mut engine = DispatchEngine::new();
//! let batch = vec![Event::Arrival {
//!     time: 0,
//!     task: Task::new(TaskId(1), Priority::Normal, 25),
//! }];
//! let action = engine.decide(&batch, TaskId::IDLE, TaskId::IDLE);
//! assert_eq!(action.cpu_task, TaskId(1));
//! ```
//!
//! # References
//!
//! - Liu & Layland (1973), "Scheduling Algorithms for Multiprogramming in
//!   a Hard-Real-Time Environment"
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

mod engine;
mod rank;
mod state;
mod stats;

pub use engine::DispatchEngine;
pub use state::{Urgency, DEFAULT_IO_ESTIMATE};
pub use stats::TableStats;
