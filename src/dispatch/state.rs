//! Per-task scheduling state and urgency classification.
//!
//! One [`TaskState`] exists per live task id, created on arrival and
//! removed on finish. It is private to the engine's table — nothing
//! outside the engine holds a reference to it.

use serde::{Deserialize, Serialize};

use crate::models::{Priority, Task};

/// Fixed I/O duration estimate assigned on every I/O request.
///
/// The policy does not model variable I/O cost: each request resets the
/// estimate to this constant, discarding any prior value.
pub const DEFAULT_IO_ESTIMATE: i64 = 10;

/// Slack at or below this is `Critical`.
const CRITICAL_SLACK: i64 = 0;
/// Slack at or below this is at least `Elevated`.
const ELEVATED_SLACK: i64 = 5;
/// High-priority tasks are raised to at least `Elevated` at this slack.
const HIGH_PRIORITY_EARLY_SLACK: i64 = 10;

/// Discretized slack classification.
///
/// The primary non-priority ranking key for CPU selection: `Critical`
/// dispatches before `Elevated` before `Relaxed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Relaxed,
    Elevated,
    Critical,
}

impl Urgency {
    /// Classifies slack for a task of the given priority.
    ///
    /// High-priority tasks enter `Elevated` earlier (slack ≤ 10) so they
    /// start competing on urgency before their slack actually runs out.
    /// The override never lowers a `Critical` classification.
    pub fn classify(slack: i64, priority: Priority) -> Self {
        let mut urgency = if slack <= CRITICAL_SLACK {
            Urgency::Critical
        } else if slack <= ELEVATED_SLACK {
            Urgency::Elevated
        } else {
            Urgency::Relaxed
        };
        if priority == Priority::High && slack <= HIGH_PRIORITY_EARLY_SLACK {
            urgency = urgency.max(Urgency::Elevated);
        }
        urgency
    }

    /// Rank for sorting: lower = dispatched first.
    pub(crate) fn rank(self) -> u8 {
        match self {
            Urgency::Critical => 0,
            Urgency::Elevated => 1,
            Urgency::Relaxed => 2,
        }
    }
}

/// Scheduling state tracked per live task.
#[derive(Debug, Clone)]
pub struct TaskState {
    /// Task snapshot from the arrival event. Priority and deadline never
    /// change after arrival.
    pub task: Task,
    /// Timestamp of the arrival event that created this entry.
    pub arrived_at: i64,
    /// True while the task is waiting on or performing I/O.
    pub io_active: bool,
    /// Estimated CPU work remaining, initialized to deadline − arrival.
    ///
    /// Never decremented afterwards: slack decays purely from elapsed
    /// time, not from CPU actually consumed. Observed reference behavior,
    /// kept as-is.
    pub remaining_time: i64,
    /// deadline − current_time − remaining_time, recomputed on timer
    /// events while the task is not I/O-active. Stale during I/O.
    pub slack_time: i64,
    /// Estimated I/O time left; meaningful only while `io_active`.
    pub io_remaining: i64,
    /// Classification of `slack_time`; stale during I/O, like the slack
    /// it was derived from.
    pub urgency: Urgency,
}

impl TaskState {
    /// Fresh state for a task arriving at `arrived_at`.
    pub fn on_arrival(task: Task, arrived_at: i64) -> Self {
        let budget = task.deadline - arrived_at;
        Self {
            task,
            arrived_at,
            io_active: false,
            remaining_time: budget,
            slack_time: budget,
            io_remaining: 0,
            urgency: Urgency::Relaxed,
        }
    }

    /// Timer update for a non-I/O task: recompute slack and urgency.
    pub fn reclassify(&mut self, now: i64) {
        self.slack_time = self.task.deadline - now - self.remaining_time;
        self.urgency = Urgency::classify(self.slack_time, self.task.priority);
    }
}
