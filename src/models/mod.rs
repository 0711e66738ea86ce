//! Harness-facing domain types.
//!
//! These are the wire types exchanged with the simulation harness: the
//! [`Task`] payload, the [`Event`] stream, and the [`Action`] decision.
//! All derive serde so a harness can deliver batches as JSON.
//!
//! Times are plain `i64` simulation units relative to the epoch (t=0);
//! the harness defines what one unit means.

mod action;
mod event;
mod task;

pub use action::Action;
pub use event::Event;
pub use task::{Priority, Task, TaskId};
