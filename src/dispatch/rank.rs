//! Pure ranking keys for CPU and I/O selection.
//!
//! Each key is computed once per task before sorting, so the sort never
//! reads the state table mid-comparison. Lexicographic `Ord` on the key
//! fields encodes the tie-break chain; **lower key = dispatched first**,
//! following priority-rule convention.
//!
//! # Reference
//! Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

use super::state::TaskState;

/// CPU ranking key: priority band, then urgency, then ascending slack.
///
/// Ties beyond slack are left to the stable sort, so tasks with fully
/// equal keys resolve in table insertion order (first inserted wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct CpuKey {
    priority: u8,
    urgency: u8,
    slack: i64,
}

impl CpuKey {
    pub(crate) fn for_task(state: &TaskState) -> Self {
        Self {
            priority: state.task.priority.rank(),
            urgency: state.urgency.rank(),
            slack: state.slack_time,
        }
    }
}

/// I/O ranking key: priority band, then shortest remaining I/O first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct IoKey {
    priority: u8,
    io_remaining: i64,
}

impl IoKey {
    pub(crate) fn for_task(state: &TaskState) -> Self {
        Self {
            priority: state.task.priority.rank(),
            io_remaining: state.io_remaining,
        }
    }
}
