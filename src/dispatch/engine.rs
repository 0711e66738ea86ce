//! The dispatch policy engine.
//!
//! # Algorithm
//!
//! Each decision call:
//! 1. Folds the event batch into the per-task state table, in order.
//! 2. Ranks ready (non-I/O) tasks by [`CpuKey`] and picks the first.
//! 3. Keeps the current I/O occupant if any, otherwise ranks I/O-active
//!    tasks by [`IoKey`] and picks the first.
//!
//! CPU dispatch approximates deadline-monotonic scheduling (slack-based
//! EDF) layered under a hard priority band; I/O dispatch is shortest
//! remaining I/O first within a band, sticky while the device is busy.
//!
//! # Reference
//! Liu & Layland (1973); Audsley et al. (1993), "Applying New Scheduling
//! Theory to Static Priority Pre-emptive Scheduling"

use indexmap::IndexMap;

use super::rank::{CpuKey, IoKey};
use super::state::{TaskState, DEFAULT_IO_ESTIMATE};
use crate::models::{Action, Event, TaskId};

/// Dispatch policy engine with its per-task state table.
///
/// Owned by the caller and passed by `&mut` reference into each decision,
/// so lifetime and exclusive access are explicit. Created empty; the task
/// set is learned entirely from the event stream.
///
/// One caller, one call at a time: the engine has no internal
/// synchronization and every call runs to completion without blocking.
///
/// # Example
/// ```
/// use rt_dispatch::dispatch::DispatchEngine;
/// use rt_dispatch::models::{Event, Priority, Task, TaskId};
///
/// let mut engine = DispatchEngine::new();
/// let batch = vec![
///     Event::Arrival { time: 0, task: Task::new(TaskId(1), Priority::High, 20) },
///     Event::Arrival { time: 0, task: Task::new(TaskId(2), Priority::Normal, 8) },
/// ];
/// let action = engine.decide(&batch, TaskId::IDLE, TaskId::IDLE);
/// assert_eq!(action.cpu_task, TaskId(1));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DispatchEngine {
    /// Live tasks in arrival order. Insertion order is the documented
    /// final tie-break: first inserted wins.
    states: IndexMap<TaskId, TaskState>,
}

impl DispatchEngine {
    /// Creates an engine with an empty state table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live tasks.
    pub fn task_count(&self) -> usize {
        self.states.len()
    }

    /// Whether the given id is a live task.
    pub fn contains(&self, id: TaskId) -> bool {
        self.states.contains_key(&id)
    }

    pub(crate) fn states(&self) -> impl Iterator<Item = &TaskState> {
        self.states.values()
    }

    /// Makes one dispatch decision.
    ///
    /// Folds `events` into the state table in delivery order, then selects
    /// occupants for both resources. `current_cpu` / `current_io` are the
    /// harness's view of who holds each resource right now
    /// ([`TaskId::IDLE`] = free).
    ///
    /// The CPU choice is recomputed from scratch on every call — there is
    /// no incumbent advantage. The I/O choice is sticky: while
    /// `current_io` is non-idle it is returned unchanged, until the
    /// harness reports completion via an [`Event::IoEnd`] and passes an
    /// idle `current_io` in a later call.
    pub fn decide(&mut self, events: &[Event], current_cpu: TaskId, current_io: TaskId) -> Action {
        for event in events {
            self.apply(event);
        }
        Action {
            cpu_task: self.select_cpu(),
            io_task: self.select_io(current_cpu, current_io),
        }
    }

    /// Applies one event to the state table.
    ///
    /// Finish, I/O-request, and I/O-end events naming unknown ids are
    /// deliberate no-ops: the harness is trusted, and duplicate or
    /// out-of-order delivery must not fault the policy. Do not tighten
    /// this into validation without noting the behavior change.
    fn apply(&mut self, event: &Event) {
        match event {
            Event::Arrival { time, task } => {
                // Re-arrival overwrites in place, keeping the original
                // table position for tie-break purposes.
                self.states
                    .insert(task.id, TaskState::on_arrival(task.clone(), *time));
            }
            Event::Finish { task, .. } => {
                // shift_remove keeps the remaining entries in order.
                self.states.shift_remove(task);
            }
            Event::IoRequest { task, .. } => {
                if let Some(state) = self.states.get_mut(task) {
                    state.io_active = true;
                    state.io_remaining = DEFAULT_IO_ESTIMATE;
                }
            }
            Event::IoEnd { task, .. } => {
                if let Some(state) = self.states.get_mut(task) {
                    state.io_active = false;
                    state.io_remaining = 0;
                }
            }
            Event::Timer { time } => {
                for state in self.states.values_mut() {
                    if state.io_active {
                        if state.io_remaining > 0 {
                            state.io_remaining -= 1;
                        }
                    } else {
                        state.reclassify(*time);
                    }
                }
            }
        }
    }

    /// Ranks the ready set and returns the best task, or idle.
    fn select_cpu(&self) -> TaskId {
        // min_by_key returns the first minimum, so equal keys resolve in
        // insertion order.
        self.states
            .values()
            .filter(|s| !s.io_active)
            .min_by_key(|s| CpuKey::for_task(s))
            .map(|s| s.task.id)
            .unwrap_or(TaskId::IDLE)
    }

    /// Ranks the I/O-waiting set, honoring stickiness.
    fn select_io(&self, current_cpu: TaskId, current_io: TaskId) -> TaskId {
        if !current_io.is_idle() {
            return current_io;
        }
        // A task already dispatched to the CPU is never simultaneously
        // handed the I/O device, even if flagged active.
        self.states
            .values()
            .filter(|s| s.io_active && s.task.id != current_cpu)
            .min_by_key(|s| IoKey::for_task(s))
            .map(|s| s.task.id)
            .unwrap_or(TaskId::IDLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Priority, Task};

    fn arrival(id: u32, priority: Priority, deadline: i64, time: i64) -> Event {
        Event::Arrival {
            time,
            task: Task::new(TaskId(id), priority, deadline),
        }
    }

    fn idle() -> TaskId {
        TaskId::IDLE
    }

    #[test]
    fn test_empty_table_idles_both() {
        let mut engine = DispatchEngine::new();
        let action = engine.decide(&[], idle(), idle());
        assert_eq!(action, Action::idle());
    }

    #[test]
    fn test_arrival_priority_tie_break() {
        // A (High, d=20) and B (Normal, d=8) at t=0, no timer yet:
        // both Relaxed, priority decides.
        let mut engine = DispatchEngine::new();
        let batch = vec![
            arrival(1, Priority::High, 20, 0),
            arrival(2, Priority::Normal, 8, 0),
        ];
        let action = engine.decide(&batch, idle(), idle());
        assert_eq!(action.cpu_task, TaskId(1));
    }

    #[test]
    fn test_equal_keys_first_inserted_wins() {
        // Same priority, same deadline, same arrival: keys are fully
        // equal after the timer, so table order decides.
        let mut engine = DispatchEngine::new();
        let batch = vec![
            arrival(5, Priority::Normal, 20, 0),
            arrival(3, Priority::Normal, 20, 0),
            Event::Timer { time: 15 },
        ];
        let action = engine.decide(&batch, idle(), idle());
        assert_eq!(action.cpu_task, TaskId(5));
    }

    #[test]
    fn test_priority_dominates_slack() {
        // Both go Critical after the timer (equal slack, since slack
        // decays purely with elapsed time); priority decides.
        let mut engine = DispatchEngine::new();
        let batch = vec![
            arrival(1, Priority::Normal, 8, 0),
            arrival(2, Priority::High, 200, 0),
            Event::Timer { time: 15 },
        ];
        let action = engine.decide(&batch, idle(), idle());
        assert_eq!(action.cpu_task, TaskId(2));
    }

    #[test]
    fn test_urgency_then_slack_within_band() {
        let mut engine = DispatchEngine::new();
        let batch = vec![
            arrival(1, Priority::Normal, 100, 10), // remaining 90, slack at 25 = -15
            arrival(2, Priority::Normal, 100, 0),  // remaining 100, slack at 25 = -25
            Event::Timer { time: 25 },
        ];
        let action = engine.decide(&batch, idle(), idle());
        // Both Critical; task 2 has the smaller slack.
        assert_eq!(action.cpu_task, TaskId(2));
    }

    #[test]
    fn test_finished_task_never_selected() {
        let mut engine = DispatchEngine::new();
        engine.decide(&[arrival(1, Priority::High, 50, 0)], idle(), idle());
        let action = engine.decide(&[Event::Finish { time: 5, task: TaskId(1) }], idle(), idle());
        assert_eq!(action.cpu_task, idle());
        assert_eq!(action.io_task, idle());
        assert!(!engine.contains(TaskId(1)));

        // Stays gone across later batches until it re-arrives.
        let action = engine.decide(&[Event::Timer { time: 6 }], idle(), idle());
        assert_eq!(action.cpu_task, idle());

        let action = engine.decide(&[arrival(1, Priority::High, 90, 7)], idle(), idle());
        assert_eq!(action.cpu_task, TaskId(1));
    }

    #[test]
    fn test_empty_batch_is_idempotent() {
        let mut engine = DispatchEngine::new();
        let batch = vec![
            arrival(1, Priority::Normal, 30, 0),
            arrival(2, Priority::High, 40, 0),
            Event::Timer { time: 3 },
        ];
        let first = engine.decide(&batch, idle(), idle());
        let again = engine.decide(&[], idle(), idle());
        assert_eq!(first, again);
        assert_eq!(engine.task_count(), 2);
    }

    #[test]
    fn test_io_active_task_leaves_ready_set() {
        let mut engine = DispatchEngine::new();
        let batch = vec![
            arrival(1, Priority::High, 50, 0),
            arrival(2, Priority::Normal, 50, 0),
            Event::IoRequest { time: 1, task: TaskId(1) },
        ];
        let action = engine.decide(&batch, idle(), idle());
        // Task 1 outranks task 2 but is blocked on I/O.
        assert_eq!(action.cpu_task, TaskId(2));
        assert_eq!(action.io_task, TaskId(1));
    }

    #[test]
    fn test_io_stickiness() {
        let mut engine = DispatchEngine::new();
        let batch = vec![
            arrival(1, Priority::High, 50, 0),
            arrival(2, Priority::Normal, 50, 0),
            Event::IoRequest { time: 1, task: TaskId(2) },
        ];
        // Device busy with task 7 (harness's view): returned unchanged,
        // task 2 has to wait even though it is waiting on the device.
        let action = engine.decide(&batch, idle(), TaskId(7));
        assert_eq!(action.io_task, TaskId(7));

        // Once the harness reports the device free, task 2 gets it.
        let action = engine.decide(&[], idle(), idle());
        assert_eq!(action.io_task, TaskId(2));
    }

    #[test]
    fn test_io_decrement_scenario() {
        // C requests I/O (estimate 10); two timer ticks bring it to 8;
        // with the device free and C not on the CPU, C is dispatched.
        let mut engine = DispatchEngine::new();
        let batch = vec![
            arrival(3, Priority::Normal, 100, 0),
            Event::IoRequest { time: 1, task: TaskId(3) },
            Event::Timer { time: 2 },
            Event::Timer { time: 3 },
        ];
        let action = engine.decide(&batch, idle(), idle());
        assert_eq!(action.io_task, TaskId(3));
        let state = engine.states().find(|s| s.task.id == TaskId(3)).unwrap();
        assert_eq!(state.io_remaining, 8);
    }

    #[test]
    fn test_cpu_holder_excluded_from_io() {
        let mut engine = DispatchEngine::new();
        let batch = vec![
            arrival(1, Priority::High, 50, 0),
            arrival(2, Priority::Normal, 50, 0),
            Event::IoRequest { time: 1, task: TaskId(1) },
            Event::IoRequest { time: 1, task: TaskId(2) },
        ];
        // Harness says task 1 currently holds the CPU: never also handed
        // the device, so task 2 gets it despite lower priority.
        let action = engine.decide(&batch, TaskId(1), idle());
        assert_eq!(action.io_task, TaskId(2));
    }

    #[test]
    fn test_io_selection_priority_then_shortest() {
        let mut engine = DispatchEngine::new();
        let batch = vec![
            arrival(1, Priority::Normal, 100, 0),
            arrival(2, Priority::Normal, 100, 0),
            arrival(3, Priority::High, 100, 0),
            // Task 1 starts I/O first and ticks down to 8 before the
            // others request at the full estimate.
            Event::IoRequest { time: 1, task: TaskId(1) },
            Event::Timer { time: 2 },
            Event::Timer { time: 3 },
            Event::IoRequest { time: 4, task: TaskId(2) },
            Event::IoRequest { time: 4, task: TaskId(3) },
        ];
        let action = engine.decide(&batch, idle(), idle());
        // High priority beats the shorter remaining estimate.
        assert_eq!(action.io_task, TaskId(3));

        // Without task 3, shortest remaining I/O wins within the band.
        let action = engine.decide(
            &[Event::Finish { time: 5, task: TaskId(3) }],
            idle(),
            idle(),
        );
        assert_eq!(action.io_task, TaskId(1));
    }

    #[test]
    fn test_io_end_restores_ready() {
        let mut engine = DispatchEngine::new();
        let batch = vec![
            arrival(1, Priority::High, 50, 0),
            Event::IoRequest { time: 1, task: TaskId(1) },
        ];
        let action = engine.decide(&batch, idle(), idle());
        assert_eq!(action.cpu_task, idle());

        let batch = vec![Event::IoEnd { time: 4, task: TaskId(1) }];
        let action = engine.decide(&batch, idle(), idle());
        assert_eq!(action.cpu_task, TaskId(1));
        assert_eq!(action.io_task, idle());
    }

    #[test]
    fn test_unknown_ids_are_no_ops() {
        let mut engine = DispatchEngine::new();
        let batch = vec![
            arrival(1, Priority::Normal, 30, 0),
            Event::Finish { time: 1, task: TaskId(99) },
            Event::IoRequest { time: 1, task: TaskId(99) },
            Event::IoEnd { time: 1, task: TaskId(99) },
        ];
        let action = engine.decide(&batch, idle(), idle());
        assert_eq!(action.cpu_task, TaskId(1));
        assert_eq!(engine.task_count(), 1);
    }

    #[test]
    fn test_rearrival_overwrites_state() {
        let mut engine = DispatchEngine::new();
        let batch = vec![
            arrival(1, Priority::Normal, 10, 0),
            Event::IoRequest { time: 1, task: TaskId(1) },
            // Harness re-announces the task with a new deadline: fresh
            // state, I/O flag cleared.
            arrival(1, Priority::High, 60, 2),
        ];
        let action = engine.decide(&batch, idle(), idle());
        assert_eq!(action.cpu_task, TaskId(1));
        assert_eq!(action.io_task, idle());
        assert_eq!(engine.task_count(), 1);
    }

    #[test]
    fn test_slack_stale_during_io() {
        let mut engine = DispatchEngine::new();
        let batch = vec![
            arrival(1, Priority::Normal, 20, 0), // remaining 20
            Event::Timer { time: 2 },            // slack = -2, Critical
            Event::IoRequest { time: 3, task: TaskId(1) },
            Event::Timer { time: 10 }, // no reclassify while I/O-active
        ];
        engine.decide(&batch, idle(), idle());
        let state = engine.states().next().unwrap();
        assert_eq!(state.slack_time, -2);
        assert_eq!(state.io_remaining, 9);
    }

    #[test]
    fn test_io_remaining_floors_at_zero() {
        let mut engine = DispatchEngine::new();
        let mut batch = vec![
            arrival(1, Priority::Normal, 100, 0),
            Event::IoRequest { time: 1, task: TaskId(1) },
        ];
        for t in 2..20 {
            batch.push(Event::Timer { time: t });
        }
        engine.decide(&batch, idle(), idle());
        let state = engine.states().next().unwrap();
        assert_eq!(state.io_remaining, 0);
        assert!(state.io_active);
    }

    #[test]
    fn test_repeated_io_request_resets_estimate() {
        let mut engine = DispatchEngine::new();
        let batch = vec![
            arrival(1, Priority::Normal, 100, 0),
            Event::IoRequest { time: 1, task: TaskId(1) },
            Event::Timer { time: 2 },
            Event::Timer { time: 3 },
            // Duplicate request resets the estimate to the full constant.
            Event::IoRequest { time: 4, task: TaskId(1) },
        ];
        engine.decide(&batch, idle(), idle());
        let state = engine.states().next().unwrap();
        assert_eq!(state.io_remaining, super::DEFAULT_IO_ESTIMATE);
    }

    #[test]
    fn test_urgency_monotone_under_advancing_time() {
        // Running clock only ever raises urgency while remaining_time is
        // fixed.
        let mut engine = DispatchEngine::new();
        engine.decide(&[arrival(1, Priority::Normal, 30, 0)], idle(), idle());

        let mut last = crate::dispatch::Urgency::Relaxed;
        for t in 1..40 {
            engine.decide(&[Event::Timer { time: t }], idle(), idle());
            let urgency = engine.states().next().unwrap().urgency;
            assert!(urgency >= last, "urgency dropped at t={t}");
            last = urgency;
        }
        assert_eq!(last, crate::dispatch::Urgency::Critical);
    }
}
