//! Task model and identifiers.
//!
//! A task is the unit of dispatch: the harness announces it with an
//! arrival event and the policy tracks it until the matching finish event.
//!
//! # Reference
//! Liu & Layland (1973), "Scheduling Algorithms for Multiprogramming in a
//! Hard-Real-Time Environment"

use serde::{Deserialize, Serialize};

/// Identifier of a task.
///
/// The value 0 is reserved: it never names a live task and denotes an
/// idle CPU or I/O slot in [`crate::models::Action`] and in the
/// `current_cpu` / `current_io` inputs.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TaskId(pub u32);

impl TaskId {
    /// The reserved "no task" identifier.
    pub const IDLE: TaskId = TaskId(0);

    /// Whether this id is the idle sentinel.
    pub fn is_idle(self) -> bool {
        self == Self::IDLE
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Priority class of a task.
///
/// Binary bands: `High` strictly outranks `Normal` in every selection,
/// regardless of slack. Slack only orders tasks within a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Normal,
}

impl Priority {
    /// Rank for sorting: lower = dispatched first.
    pub(crate) fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Normal => 1,
        }
    }
}

/// A task as announced by an arrival event.
///
/// Immutable once created: priority and deadline never change after
/// arrival. The arrival time is the timestamp of the event that carried
/// the task, not a field of the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique, non-zero task identifier.
    pub id: TaskId,
    /// Priority band.
    pub priority: Priority,
    /// Absolute deadline (time units from the simulation epoch).
    pub deadline: i64,
}

impl Task {
    /// Creates a task with the given id, priority, and absolute deadline.
    pub fn new(id: TaskId, priority: Priority, deadline: i64) -> Self {
        Self {
            id,
            priority,
            deadline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_sentinel() {
        assert!(TaskId::IDLE.is_idle());
        assert!(!TaskId(7).is_idle());
        assert_eq!(TaskId::IDLE, TaskId(0));
    }

    #[test]
    fn test_priority_rank() {
        assert!(Priority::High.rank() < Priority::Normal.rank());
    }

    #[test]
    fn test_task_payload_json() {
        // Shape the harness delivers inside an arrival event.
        let task: Task =
            serde_json::from_str(r#"{"id": 3, "priority": "high", "deadline": 20}"#).unwrap();
        assert_eq!(task, Task::new(TaskId(3), Priority::High, 20));
    }
}
