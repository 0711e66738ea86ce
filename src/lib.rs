//! Real-time dispatch policy engine.
//!
//! Given one batch of discrete simulation events (task arrivals and
//! finishes, I/O requests and completions, timer ticks) plus the tasks
//! currently holding the CPU and the I/O device, the engine decides which
//! task should occupy each resource next. Event generation, time
//! advancement, and carrying out the decision belong to the simulation
//! harness; this crate is only the policy.
//!
//! # Modules
//!
//! - **`models`**: harness-facing types — `Task`, `Event`, `Action`,
//!   `TaskId`, `Priority`
//! - **`dispatch`**: the policy engine — per-task state table, urgency
//!   classification, CPU and I/O ranking, table statistics
//! - **`validation`**: diagnostic audit of event batches (anomalies the
//!   engine tolerates silently)
//!
//! # Policy
//!
//! CPU dispatch approximates deadline-monotonic scheduling: slack-based
//! EDF within an inviolable binary priority band. I/O dispatch is shortest
//! remaining I/O first within a band, and sticky while the device is busy.
//!
//! # References
//!
//! - Liu & Layland (1973), "Scheduling Algorithms for Multiprogramming in
//!   a Hard-Real-Time Environment"
//! - Audsley et al. (1993), "Applying New Scheduling Theory to Static
//!   Priority Pre-emptive Scheduling"

pub mod dispatch;
pub mod models;
pub mod validation;
