//! Simulation events consumed by the dispatch engine.

use serde::{Deserialize, Serialize};

use super::{Task, TaskId};

/// One discrete simulation event.
///
/// Delivered by the harness in batches, in occurrence order. Every event
/// carries a timestamp; arrival events carry the full [`Task`] payload,
/// the other task-scoped events only the id.
///
/// Events referencing ids the engine does not know (finish, I/O request,
/// I/O end) are tolerated as no-ops — the harness is the trusted producer
/// and may re-deliver or reorder across batches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A new task enters the system.
    Arrival { time: i64, task: Task },
    /// A task completed and leaves the system.
    Finish { time: i64, task: TaskId },
    /// A task starts waiting on the I/O device.
    IoRequest { time: i64, task: TaskId },
    /// The I/O device finished serving a task.
    IoEnd { time: i64, task: TaskId },
    /// Clock tick: slack and I/O estimates advance.
    Timer { time: i64 },
}

impl Event {
    /// Timestamp of the event.
    pub fn time(&self) -> i64 {
        match self {
            Event::Arrival { time, .. }
            | Event::Finish { time, .. }
            | Event::IoRequest { time, .. }
            | Event::IoEnd { time, .. }
            | Event::Timer { time } => *time,
        }
    }

    /// The task id the event refers to, if any.
    pub fn task_id(&self) -> Option<TaskId> {
        match self {
            Event::Arrival { task, .. } => Some(task.id),
            Event::Finish { task, .. }
            | Event::IoRequest { task, .. }
            | Event::IoEnd { task, .. } => Some(*task),
            Event::Timer { .. } => None,
        }
    }
}
