// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::event::EventType;
use crate::statemachine::def::StateId;

/// Failures raised while building or driving a [`crate::statemachine::StateMachineInstance`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateMachineError {
    #[error("state '{state}' redeclares handler for '{event_type}' already declared by its base")]
    DuplicateHandler { state: StateId, event_type: String },

    #[error("state '{state}' declares more than one wildcard handler")]
    DuplicateWildcard { state: StateId },

    #[error("state machine definition has no start state")]
    MissingStartState,

    #[error("state machine definition declares more than one start state: '{first}' and '{second}'")]
    MultipleStartStates { first: StateId, second: StateId },

    #[error("unknown base state '{base}' referenced by state '{state}'")]
    UnknownBaseState { state: StateId, base: StateId },

    #[error("unhandled event '{event_type}' in actor '{actor}'")]
    UnhandledEvent { actor: String, event_type: String },

    #[error("action '{action}' failed in actor '{actor}', state '{state}': {message}")]
    ActionFailed {
        actor: String,
        state: StateId,
        action: &'static str,
        message: String,
    },
}

impl StateMachineError {
    pub fn unhandled(actor: impl Into<String>, event_type: EventType) -> Self {
        Self::UnhandledEvent {
            actor: actor.into(),
            event_type: event_type.name().to_string(),
        }
    }
}
