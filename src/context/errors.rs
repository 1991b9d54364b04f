//! Execution-context failure taxonomy (§4.4, §7).

use thiserror::Error;

use crate::collections::DataRace;
use crate::monitor::MonitorError;
use crate::scheduler::SchedulerError;

/// Failures the execution context surfaces to the harness (§7).
#[derive(Debug, Error)]
pub enum ContextError {
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error(transparent)]
    Collection(#[from] DataRace),

    #[error(transparent)]
    Monitor(#[from] MonitorError),

    #[error("actor id already bound: {id}")]
    DuplicateActorId { id: String },

    #[error("unknown actor: {id}")]
    UnknownActor { id: String },

    #[error("must-handle event dropped: {id} is already halted")]
    ActorHalted { id: String },

    #[error("no monitor of this type is registered")]
    UnknownMonitor,

    #[error("assertion failed: {message}")]
    Assertion { message: String },

    #[error("unhandled exception in {actor}, state {state}, action {action}: {message}")]
    ActionFailed {
        actor: String,
        state: String,
        action: String,
        message: String,
    },
}
