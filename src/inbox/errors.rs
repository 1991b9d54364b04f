// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
// (none)

/// Failures an [`crate::inbox::Inbox`] operation can raise (§4.1, §7).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InboxError {
    #[error("there are more than {bound} instances of '{event_type}' in the input queue of {actor}")]
    TooManyInstances {
        actor: String,
        event_type: &'static str,
        bound: usize,
    },

    #[error("{actor} halted before dequeueing must-handle event '{event_type}'")]
    HaltedBeforeHandlingMustHandle {
        actor: String,
        event_type: &'static str,
    },

    #[error("a Receive is already pending on {actor}")]
    ReceiveAlreadyPending { actor: String },
}
