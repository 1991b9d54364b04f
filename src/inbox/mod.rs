//! Per-actor FIFO event queue with defer/ignore/must-handle/wildcard
//! policies and a `ReceiveAsync`-style pending-receive slot (§3 "Inbox",
//! §4.1).

pub mod errors;

// Layer 1: Standard library imports
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::event::{BoxedEvent, Event, EventEnvelope, EventGroupId, EventType, SendOptions};
use crate::log::{LogRecord, LogSink};
use crate::util::ActorId;

use tracing::{trace, warn};

pub use errors::InboxError;

/// Outcome of [`Inbox::enqueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueStatus {
    Enqueued,
    EnqueuedAndStarted,
    /// Satisfied a pending `ReceiveAsync` instead of joining the FIFO; the
    /// handler loop was suspended and must resume its drain (§4.1).
    ReceiveSatisfied,
    Dropped,
}

/// Outcome of [`Inbox::dequeue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DequeueStatus {
    Success,
    Default,
    NotAvailable,
}

/// A pending `ReceiveAsync(types, predicate?)` installed by the actor
/// (§4.1). At most one may be outstanding at a time.
pub struct PendingReceive {
    types: Vec<EventType>,
    predicate: Option<Box<dyn Fn(&dyn Event) -> bool + Send>>,
}

impl PendingReceive {
    pub fn new(types: Vec<EventType>, predicate: Option<Box<dyn Fn(&dyn Event) -> bool + Send>>) -> Self {
        Self { types, predicate }
    }

    pub fn types(&self) -> &[EventType] {
        &self.types
    }

    fn matches(&self, envelope: &EventEnvelope) -> bool {
        let type_matches = self.types.iter().any(|t| *t == envelope.event_type());
        type_matches && self.predicate.as_ref().map(|p| p(envelope.event())).unwrap_or(true)
    }
}

/// Entries dropped when an inbox is flushed on halt (§4.2 "halt
/// housekeeping"), paired with whether each was must-handle.
pub struct DroppedEntry {
    pub event_type: EventType,
    pub was_must_handle: bool,
}

/// Where [`Inbox`] sends §6 log records. Set once by
/// [`crate::actor::ActorRuntime::with_log`]; absent by default so unit
/// tests constructing an `Inbox` directly don't need a sink.
struct LogHandle {
    sink: Arc<dyn LogSink>,
    actor: ActorId,
}

/// A per-actor FIFO event queue (§3 "Inbox").
pub struct Inbox {
    actor_label: String,
    queue: VecDeque<EventEnvelope>,
    deferred: HashSet<EventType>,
    ignored: HashSet<EventType>,
    raised: Option<EventEnvelope>,
    pending_receive: Option<PendingReceive>,
    running: bool,
    halted: bool,
    default_handler_installed: bool,
    log: Option<LogHandle>,
}

impl Inbox {
    pub fn new(actor_label: impl Into<String>) -> Self {
        Self {
            actor_label: actor_label.into(),
            queue: VecDeque::new(),
            deferred: HashSet::new(),
            ignored: HashSet::new(),
            raised: None,
            pending_receive: None,
            running: false,
            halted: false,
            default_handler_installed: false,
            log: None,
        }
    }

    /// Attach the §6 log surface (see [`crate::actor::ActorRuntime::with_log`]).
    pub fn attach_log(&mut self, sink: Arc<dyn LogSink>, actor: ActorId) {
        self.log = Some(LogHandle { sink, actor });
    }

    fn emit(&self, build: impl FnOnce(&ActorId) -> LogRecord) {
        if let Some(handle) = &self.log {
            let _ = handle.sink.record(build(&handle.actor));
        }
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// Replace the deferred/ignored sets and default-handler flag to match
    /// the state machine's current frame; called by the actor runtime after
    /// every transition.
    pub fn sync_policy(&mut self, deferred: Vec<EventType>, ignored: Vec<EventType>, has_default: bool) {
        self.deferred = deferred.into_iter().collect();
        self.ignored = ignored.into_iter().collect();
        self.default_handler_installed = has_default;
    }

    fn count_of_type(&self, event_type: EventType) -> usize {
        self.queue.iter().filter(|e| e.event_type() == event_type).count()
    }

    /// `Enqueue(e, group, info) → {Enqueued, EnqueuedAndStarted, Dropped}` (§4.1).
    pub fn enqueue(
        &mut self,
        event: BoxedEvent,
        group: Option<EventGroupId>,
        options: SendOptions,
    ) -> Result<EnqueueStatus, InboxError> {
        let event_type = event.event_type();

        if self.halted {
            self.emit(|actor| LogRecord::DroppedEvent { actor: actor.clone(), event_type, must_handle: options.is_must_handle() });
            return Ok(EnqueueStatus::Dropped);
        }
        if self.ignored.contains(&event_type) {
            self.emit(|actor| LogRecord::DroppedEvent { actor: actor.clone(), event_type, must_handle: options.is_must_handle() });
            return Ok(EnqueueStatus::Dropped);
        }
        if let Some(bound) = options.max_instances_bound() {
            let existing = self.count_of_type(event_type);
            if existing >= bound {
                warn!(actor = %self.actor_label, event_type = %event_type.name(), bound, "max-instance bound exceeded");
                return Err(InboxError::TooManyInstances {
                    actor: self.actor_label.clone(),
                    event_type: event_type.name(),
                    bound,
                });
            }
        }

        let envelope = EventEnvelope::new(event, group, options);

        if let Some(pending) = &self.pending_receive {
            if pending.matches(&envelope) {
                self.pending_receive = None;
                self.running = true;
                self.queue.push_front(envelope);
                self.emit(|actor| LogRecord::ReceiveEvent { actor: actor.clone(), was_blocked: true });
                return Ok(EnqueueStatus::ReceiveSatisfied);
            }
        }

        let was_idle = !self.running;
        self.queue.push_back(envelope);
        self.emit(|actor| LogRecord::EnqueueEvent { actor: actor.clone(), event_type, started: was_idle });
        if was_idle {
            self.running = true;
            trace!(actor = %self.actor_label, event_type = %event_type.name(), "enqueued, starting drain");
            Ok(EnqueueStatus::EnqueuedAndStarted)
        } else {
            trace!(actor = %self.actor_label, event_type = %event_type.name(), "enqueued");
            Ok(EnqueueStatus::Enqueued)
        }
    }

    /// `Dequeue() → {event, DequeueStatus}` (§4.1).
    pub fn dequeue(&mut self) -> (Option<EventEnvelope>, DequeueStatus) {
        if let Some(pos) = self.queue.iter().position(|e| !self.deferred.contains(&e.event_type())) {
            let envelope = self.queue.remove(pos).expect("position just found");
            self.emit(|actor| LogRecord::DequeueEvent { actor: actor.clone(), event_type: Some(envelope.event_type()), is_default: false });
            return (Some(envelope), DequeueStatus::Success);
        }

        if self.default_handler_installed {
            self.emit(|actor| LogRecord::DequeueEvent { actor: actor.clone(), event_type: None, is_default: true });
            return (None, DequeueStatus::Default);
        }

        self.running = false;
        (None, DequeueStatus::NotAvailable)
    }

    /// `RaiseEvent(e, group)`: single-slot holder consumed before the next
    /// dequeue, never stored in the FIFO (§4.1).
    pub fn raise_event(&mut self, event: BoxedEvent, group: Option<EventGroupId>) {
        let event_type = event.event_type();
        self.raised = Some(EventEnvelope::new(event, group, SendOptions::new()));
        self.emit(|actor| LogRecord::RaiseEvent { actor: actor.clone(), event_type });
    }

    pub fn take_raised(&mut self) -> Option<EventEnvelope> {
        let raised = self.raised.take();
        if let Some(envelope) = &raised {
            let event_type = envelope.event_type();
            self.emit(|actor| LogRecord::HandleRaisedEvent { actor: actor.clone(), event_type });
        }
        raised
    }

    /// `ReceiveAsync(types, predicate?)`: sweeps the queue first; installs a
    /// pending receive and suspends otherwise (§4.1).
    pub fn receive_async(&mut self, pending: PendingReceive) -> Result<Option<EventEnvelope>, InboxError> {
        if self.pending_receive.is_some() {
            return Err(InboxError::ReceiveAlreadyPending {
                actor: self.actor_label.clone(),
            });
        }
        if let Some(pos) = self.queue.iter().position(|e| pending.matches(e)) {
            let envelope = self.queue.remove(pos).expect("position just found");
            self.emit(|actor| LogRecord::ReceiveEvent { actor: actor.clone(), was_blocked: false });
            return Ok(Some(envelope));
        }
        let types = pending.types().to_vec();
        self.pending_receive = Some(pending);
        self.emit(|actor| LogRecord::WaitEvent { actor: actor.clone(), types });
        Ok(None)
    }

    pub fn has_pending_receive(&self) -> bool {
        self.pending_receive.is_some()
    }

    /// Flush the inbox on halt, firing `EventDropped` for every surviving
    /// entry; returns an error if any surviving entry was must-handle
    /// (§4.1 "Must-handle policy").
    pub fn flush_on_halt(&mut self) -> (Vec<DroppedEntry>, Option<InboxError>) {
        self.halted = true;
        self.running = false;
        let mut dropped = Vec::new();
        let mut first_violation = None;
        while let Some(envelope) = self.queue.pop_front() {
            let was_must_handle = envelope.is_must_handle();
            let event_type = envelope.event_type();
            if was_must_handle && first_violation.is_none() {
                first_violation = Some(InboxError::HaltedBeforeHandlingMustHandle {
                    actor: self.actor_label.clone(),
                    event_type: event_type.name(),
                });
            }
            self.emit(|actor| LogRecord::DroppedEvent { actor: actor.clone(), event_type, must_handle: was_must_handle });
            dropped.push(DroppedEntry {
                event_type,
                was_must_handle,
            });
        }
        if !dropped.is_empty() {
            trace!(actor = %self.actor_label, count = dropped.len(), "flushed inbox on halt");
        }
        (dropped, first_violation)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Ping;
    #[derive(Debug)]
    struct Pong;

    #[test]
    fn enqueue_on_idle_inbox_starts_it() {
        let mut inbox = Inbox::new("A()");
        let status = inbox.enqueue(Box::new(Ping), None, SendOptions::new()).unwrap();
        assert_eq!(status, EnqueueStatus::EnqueuedAndStarted);
        assert!(inbox.is_running());
    }

    #[test]
    fn enqueue_while_running_does_not_restart() {
        let mut inbox = Inbox::new("A()");
        inbox.enqueue(Box::new(Ping), None, SendOptions::new()).unwrap();
        let status = inbox.enqueue(Box::new(Pong), None, SendOptions::new()).unwrap();
        assert_eq!(status, EnqueueStatus::Enqueued);
    }

    #[test]
    fn enqueue_on_halted_inbox_drops() {
        let mut inbox = Inbox::new("A()");
        inbox.flush_on_halt();
        let status = inbox.enqueue(Box::new(Ping), None, SendOptions::new()).unwrap();
        assert_eq!(status, EnqueueStatus::Dropped);
    }

    #[test]
    fn ignored_type_is_dropped_on_enqueue() {
        let mut inbox = Inbox::new("A()");
        inbox.sync_policy(vec![], vec![EventType::of::<Ping>()], false);
        let status = inbox.enqueue(Box::new(Ping), None, SendOptions::new()).unwrap();
        assert_eq!(status, EnqueueStatus::Dropped);
        assert_eq!(inbox.len(), 0);
    }

    #[test]
    fn deferred_type_is_skipped_but_retained_in_fifo_order() {
        let mut inbox = Inbox::new("A()");
        inbox.sync_policy(vec![EventType::of::<Ping>()], vec![], false);
        inbox.enqueue(Box::new(Ping), None, SendOptions::new()).unwrap();
        inbox.enqueue(Box::new(Pong), None, SendOptions::new()).unwrap();

        let (event, status) = inbox.dequeue();
        assert_eq!(status, DequeueStatus::Success);
        assert_eq!(event.unwrap().event_type(), EventType::of::<Pong>());

        inbox.sync_policy(vec![], vec![], false);
        let (event, status) = inbox.dequeue();
        assert_eq!(status, DequeueStatus::Success);
        assert_eq!(event.unwrap().event_type(), EventType::of::<Ping>());
    }

    #[test]
    fn max_instances_bound_is_enforced() {
        let mut inbox = Inbox::new("A()");
        let options = SendOptions::new().max_instances(1);
        inbox.enqueue(Box::new(Ping), None, options).unwrap();
        let err = inbox.enqueue(Box::new(Ping), None, options).unwrap_err();
        assert!(matches!(err, InboxError::TooManyInstances { bound: 1, .. }));
    }

    #[test]
    fn must_handle_entry_surviving_halt_is_reported() {
        let mut inbox = Inbox::new("A()");
        inbox.enqueue(Box::new(Ping), None, SendOptions::new().must_handle()).unwrap();
        let (dropped, violation) = inbox.flush_on_halt();
        assert_eq!(dropped.len(), 1);
        assert!(matches!(violation, Some(InboxError::HaltedBeforeHandlingMustHandle { .. })));
    }

    #[test]
    fn receive_async_completes_synchronously_when_already_queued() {
        let mut inbox = Inbox::new("A()");
        inbox.enqueue(Box::new(Pong), None, SendOptions::new()).unwrap();
        let pending = PendingReceive::new(vec![EventType::of::<Pong>()], None);
        let result = inbox.receive_async(pending).unwrap();
        assert!(result.is_some());
        assert!(!inbox.has_pending_receive());
    }

    #[test]
    fn receive_async_suspends_when_nothing_matches() {
        let mut inbox = Inbox::new("A()");
        let pending = PendingReceive::new(vec![EventType::of::<Pong>()], None);
        let result = inbox.receive_async(pending).unwrap();
        assert!(result.is_none());
        assert!(inbox.has_pending_receive());
    }

    #[test]
    fn second_receive_async_while_pending_errors() {
        let mut inbox = Inbox::new("A()");
        inbox
            .receive_async(PendingReceive::new(vec![EventType::of::<Pong>()], None))
            .unwrap();
        let err = inbox
            .receive_async(PendingReceive::new(vec![EventType::of::<Ping>()], None))
            .unwrap_err();
        assert!(matches!(err, InboxError::ReceiveAlreadyPending { .. }));
    }

    #[test]
    fn enqueue_matching_pending_receive_completes_it() {
        let mut inbox = Inbox::new("A()");
        inbox
            .receive_async(PendingReceive::new(vec![EventType::of::<Pong>()], None))
            .unwrap();
        let status = inbox.enqueue(Box::new(Pong), None, SendOptions::new()).unwrap();
        assert_eq!(status, EnqueueStatus::ReceiveSatisfied);
        assert!(!inbox.has_pending_receive());
    }
}
