//! Read-only summaries of the engine's state table.
//!
//! For harness telemetry: counts of ready and I/O-active tasks, the
//! urgency histogram, and the tightest slack among ready tasks. Collecting
//! stats never mutates policy state.

use super::engine::DispatchEngine;
use super::state::Urgency;

/// Snapshot of the live task table at a decision point.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableStats {
    /// Tasks eligible for CPU dispatch.
    pub ready: usize,
    /// Tasks waiting on or performing I/O.
    pub io_active: usize,
    /// Ready tasks classified `Critical`.
    pub critical: usize,
    /// Ready tasks classified `Elevated`.
    pub elevated: usize,
    /// Ready tasks classified `Relaxed`.
    pub relaxed: usize,
    /// Smallest slack among ready tasks. `None` when none are ready.
    pub min_slack: Option<i64>,
}

impl TableStats {
    /// Collects stats from the engine's current table.
    pub fn collect(engine: &DispatchEngine) -> Self {
        let mut stats = TableStats::default();
        for state in engine.states() {
            if state.io_active {
                stats.io_active += 1;
                continue;
            }
            stats.ready += 1;
            match state.urgency {
                Urgency::Critical => stats.critical += 1,
                Urgency::Elevated => stats.elevated += 1,
                Urgency::Relaxed => stats.relaxed += 1,
            }
            stats.min_slack = Some(match stats.min_slack {
                Some(min) => min.min(state.slack_time),
                None => state.slack_time,
            });
        }
        stats
    }
}
