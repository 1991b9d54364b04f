//! Scheduler failure taxonomy (§4.5, §7).

use thiserror::Error;

/// Failures the controlled scheduler can raise.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Every live operation is `Waiting` and none can progress (§4.5
    /// "Deadlock detection").
    #[error("deadlock: blocked on {blocked:?}")]
    Deadlock { blocked: Vec<String> },

    /// A task the runtime observed but never registered as an operation
    /// (§7 "Uncontrolled task").
    #[error("uncontrolled task observed: {label}")]
    UncontrolledTask { label: String },

    /// A saved schedule could not be replayed verbatim (§4.5 "Replay").
    #[error("replay diverged at step {step}: expected {expected}, got {actual}")]
    ReplayDivergence {
        step: usize,
        expected: String,
        actual: String,
    },

    /// Any invariant violation in scheduler bookkeeping (§7 "Internal error").
    #[error("internal scheduler error: {message}")]
    Internal { message: String },
}
