// Layer 1: Standard library imports
use std::fmt::Debug;

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::inbox::InboxError;
use crate::statemachine::StateMachineError;

/// Unifies the two failure sources an [`crate::actor::ActorRuntime`] step can
/// raise: a transition/dispatch failure from the state-machine engine, an
/// inbox policy violation (must-handle, max-instance), or the actor's own
/// action error.
#[derive(Debug, Error)]
pub enum ActorRuntimeError<E: Debug> {
    #[error(transparent)]
    StateMachine(#[from] StateMachineError),

    #[error(transparent)]
    Inbox(#[from] InboxError),

    #[error("action failed: {0:?}")]
    Action(E),
}
