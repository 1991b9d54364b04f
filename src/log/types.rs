//! The structured [`LogRecord`] surface (§6 "Log records").

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc};

// Layer 3: Internal module imports
use crate::event::EventType;
use crate::statemachine::StateId;
use crate::util::ActorId;

/// Every structured event the runtime can emit onto the log surface (§6).
/// This is the replayable projection of runtime activity; it is distinct
/// from the free-form `tracing` spans emitted alongside it.
#[derive(Debug, Clone)]
pub enum LogRecord {
    CreateActor { actor: ActorId },
    CreateStateMachine { actor: ActorId },
    SendEvent { from: Option<ActorId>, to: ActorId, event_type: EventType },
    EnqueueEvent { actor: ActorId, event_type: EventType, started: bool },
    DequeueEvent { actor: ActorId, event_type: Option<EventType>, is_default: bool },
    RaiseEvent { actor: ActorId, event_type: EventType },
    HandleRaisedEvent { actor: ActorId, event_type: EventType },
    ReceiveEvent { actor: ActorId, was_blocked: bool },
    WaitEvent { actor: ActorId, types: Vec<EventType> },
    EnterState { actor: ActorId, state: StateId },
    ExitState { actor: ActorId, state: StateId },
    PopState { actor: ActorId, state: StateId },
    GotoState { actor: ActorId, from: StateId, to: StateId },
    PushState { actor: ActorId, from: StateId, to: StateId },
    ExecuteAction { actor: ActorId, state: StateId, action: &'static str },
    Random { actor: ActorId, value: i64, caller: &'static str },
    DroppedEvent { actor: ActorId, event_type: EventType, must_handle: bool },
    EventHandlerTerminated { actor: ActorId, status: String },
    Halt { actor: ActorId },
}

/// A [`LogRecord`] stamped with when it was produced.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub record: LogRecord,
}

impl LogEntry {
    pub fn new(record: LogRecord) -> Self {
        Self {
            timestamp: Utc::now(), // §3.2
            record,
        }
    }
}
