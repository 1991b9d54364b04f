//! Registry bookkeeping shared by [`super::ExecutionContext`]: the per-actor
//! mailbox handle and the type-erased monitor slot.

// Layer 1: Standard library imports
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Layer 2: Third-party crate imports
use tokio::sync::{mpsc, oneshot};

// Layer 3: Internal module imports
use crate::event::{BoxedEvent, Event, EventGroupId, SendOptions};
use crate::inbox::EnqueueStatus;
use crate::monitor::{MonitorError, MonitorOutcome};
use crate::scheduler::OperationId;

/// One instruction delivered to an actor's own cooperative task.
pub enum ActorCommand {
    Deliver {
        event: BoxedEvent,
        group: Option<EventGroupId>,
        options: SendOptions,
        reply: oneshot::Sender<EnqueueStatus>,
        quiescent: Option<oneshot::Sender<()>>,
    },
    Stop,
}

/// What the execution context keeps about a live actor: a mailbox sender
/// plus bookkeeping. There is no `task_handle` field since this runtime
/// never needs to join an actor's task directly.
pub struct ActorEntry {
    pub tx: mpsc::UnboundedSender<ActorCommand>,
    pub op: OperationId,
    pub halted: Arc<AtomicBool>,
    pub type_name: &'static str,
}

impl ActorEntry {
    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::Acquire)
    }
}

/// Object-safe façade over a `Mutex<Monitor<T>>`, letting the context keep a
/// single `DashMap<TypeId, Box<dyn DynMonitor>>` despite `Monitor<T>` being
/// generic.
pub trait DynMonitor: Send + Sync {
    fn observe_dyn(&self, event: &dyn Event) -> Result<MonitorOutcome, MonitorError>;
}

impl<T: crate::statemachine::StateMachineActions + Send + 'static> DynMonitor
    for std::sync::Mutex<crate::monitor::Monitor<T>>
{
    fn observe_dyn(&self, event: &dyn Event) -> Result<MonitorOutcome, MonitorError> {
        let mut monitor = self.lock().expect("monitor mutex poisoned");
        monitor.observe(event)
    }
}
