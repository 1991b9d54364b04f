// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::statemachine::StateMachineError;

/// A monitor transition failure; any assertion violation inside a monitor
/// action propagates as one of these (§4.6 "assertion failures propagate as
/// controlled failures").
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error(transparent)]
    Transition(#[from] StateMachineError),

    #[error("monitor {name} observed an event after reaching its terminal state")]
    AlreadyHalted { name: String },
}
