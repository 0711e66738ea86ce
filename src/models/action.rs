//! Dispatch decision returned to the harness.

use serde::{Deserialize, Serialize};

use super::TaskId;

/// One dispatch decision: who holds the CPU and the I/O device next.
///
/// Either slot may be [`TaskId::IDLE`] when no eligible task exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Action {
    /// Task to occupy the CPU, or idle.
    pub cpu_task: TaskId,
    /// Task to occupy the I/O device, or idle.
    pub io_task: TaskId,
}

impl Action {
    /// A fully idle decision.
    pub fn idle() -> Self {
        Self::default()
    }
}
