//! [`ControlledOperation`]: the runtime descriptor for one cooperative task
//! (§4.5).

// Layer 1: Standard library imports
use std::sync::atomic::{AtomicU64, Ordering};

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::event::EventType;
use crate::util::ActorId;

static NEXT_OPERATION_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque handle to a [`ControlledOperation`] in the scheduler's registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationId(u64);

impl OperationId {
    pub fn next() -> Self {
        Self(NEXT_OPERATION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw counter value, stable across a replay of the same program
    /// (registration order is deterministic) and used to match
    /// [`crate::scheduler::replay::TraceRecord::SchedulePick`] entries back
    /// to live operations.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// What an operation represents: one actor's cooperative task, or one of
/// the handful of system-level pseudo-operations (§4.5).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationKind {
    /// An actor's handler-loop task.
    Actor(ActorId),
    Create,
    Send,
    Receive,
    Default,
    Join,
    Stop,
}

/// Why an operation is currently `Waiting` (§4.5).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitCondition {
    /// Completed when the inbox yields a matching event.
    AwaitingReceive { types: Vec<EventType> },
    /// Completed when `other`'s current drain ends.
    AwaitingQuiescence { other: OperationId },
}

/// The status of a [`ControlledOperation`] (§4.5).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationStatus {
    Enabled,
    Waiting(WaitCondition),
    Completed,
}

/// The scheduler's descriptor for one cooperative task (§4.5).
#[derive(Debug, Clone)]
pub struct ControlledOperation {
    id: OperationId,
    kind: OperationKind,
    status: OperationStatus,
}

impl ControlledOperation {
    pub fn new(kind: OperationKind) -> Self {
        Self {
            id: OperationId::next(),
            kind,
            status: OperationStatus::Enabled,
        }
    }

    pub fn id(&self) -> OperationId {
        self.id
    }

    pub fn kind(&self) -> &OperationKind {
        &self.kind
    }

    pub fn status(&self) -> &OperationStatus {
        &self.status
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self.status, OperationStatus::Enabled)
    }

    pub fn is_waiting(&self) -> bool {
        matches!(self.status, OperationStatus::Waiting(_))
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.status, OperationStatus::Completed)
    }

    pub fn set_status(&mut self, status: OperationStatus) {
        self.status = status;
    }

    pub fn label(&self) -> String {
        match &self.kind {
            OperationKind::Actor(id) => id.to_string(),
            other => format!("{other:?}"),
        }
    }
}
