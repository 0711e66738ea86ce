//! Diagnostic audit of event batches.
//!
//! The policy engine deliberately tolerates malformed references — an
//! unknown id in a finish or I/O event is a silent no-op, because the
//! harness is the trusted producer and may re-deliver across batches.
//! This module makes that tolerance observable: it inspects a batch
//! against the engine's current table and reports every anomaly the
//! engine would swallow, without changing policy behavior. The engine
//! itself never calls it.
//!
//! Detects:
//! - Finish / I/O events referencing unknown task ids
//! - Arrivals overwriting a live task id
//! - Non-monotonic timestamps within the batch
//! - Arrival payloads using the reserved id 0
//! - Arrival payloads whose deadline precedes their arrival time

use std::collections::HashSet;

use crate::dispatch::DispatchEngine;
use crate::models::{Event, TaskId};

/// Audit result.
pub type AuditResult = Result<(), Vec<BatchAnomaly>>;

/// An anomaly found in an event batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchAnomaly {
    /// Anomaly category.
    pub kind: AnomalyKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of batch anomalies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnomalyKind {
    /// A finish or I/O event names a task the engine would not know at
    /// that point in the batch.
    UnknownTask,
    /// An arrival names an id that is still live.
    DuplicateArrival,
    /// An event's timestamp precedes its predecessor's.
    NonMonotonicTime,
    /// An arrival payload uses the reserved idle id 0.
    ReservedId,
    /// An arrival payload's deadline lies before its arrival time.
    DeadlineBeforeArrival,
}

impl BatchAnomaly {
    fn new(kind: AnomalyKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for BatchAnomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Audits a batch against the engine's current table.
///
/// Replays the batch's arrivals and finishes over a shadow copy of the
/// live id set, so an event is judged against what the engine would know
/// when it reaches it, not against the pre-batch table.
///
/// # Returns
/// `Ok(())` if the batch is clean, `Err(anomalies)` with all findings.
pub fn audit_batch(engine: &DispatchEngine, events: &[Event]) -> AuditResult {
    let mut anomalies = Vec::new();
    let mut live: HashSet<TaskId> = engine.states().map(|s| s.task.id).collect();
    let mut last_time: Option<i64> = None;

    for event in events {
        if let Some(prev) = last_time {
            if event.time() < prev {
                anomalies.push(BatchAnomaly::new(
                    AnomalyKind::NonMonotonicTime,
                    format!("Event at t={} follows one at t={prev}", event.time()),
                ));
            }
        }
        last_time = Some(event.time());

        match event {
            Event::Arrival { time, task } => {
                if task.id.is_idle() {
                    anomalies.push(BatchAnomaly::new(
                        AnomalyKind::ReservedId,
                        "Arrival uses the reserved id 0",
                    ));
                }
                if task.deadline < *time {
                    anomalies.push(BatchAnomaly::new(
                        AnomalyKind::DeadlineBeforeArrival,
                        format!(
                            "Task {} arrives at t={time} with deadline {}",
                            task.id, task.deadline
                        ),
                    ));
                }
                if !live.insert(task.id) {
                    anomalies.push(BatchAnomaly::new(
                        AnomalyKind::DuplicateArrival,
                        format!("Arrival overwrites live task {}", task.id),
                    ));
                }
            }
            Event::Finish { task, .. } => {
                if !live.remove(task) {
                    anomalies.push(BatchAnomaly::new(
                        AnomalyKind::UnknownTask,
                        format!("Finish for unknown task {task}"),
                    ));
                }
            }
            Event::IoRequest { task, .. } | Event::IoEnd { task, .. } => {
                if !live.contains(task) {
                    anomalies.push(BatchAnomaly::new(
                        AnomalyKind::UnknownTask,
                        format!("I/O event for unknown task {task}"),
                    ));
                }
            }
            Event::Timer { .. } => {}
        }
    }

    if anomalies.is_empty() {
        Ok(())
    } else {
        Err(anomalies)
    }
}
