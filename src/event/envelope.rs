//! [`EventEnvelope`]: the `(Event, optional EventGroup, optional EventInfo)`
//! triple an inbox actually stores (§3 "Inbox").

// Layer 1: Standard library imports
use std::fmt::{self, Debug};

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc};

// Layer 3: Internal module imports
use crate::event::traits::{BoxedEvent, Event, EventType};
use crate::util::EventGroupId;

/// Per-send options controlling must-handle and max-instance policy (§4.1).
///
/// Constructed with a builder, mirroring the envelope-builder convention used
/// throughout this crate: `SendOptions::default().must_handle().max_instances(1)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SendOptions {
    must_handle: bool,
    max_instances: Option<usize>,
}

impl SendOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the event as must-handle: if it survives in the inbox when the
    /// target halts, `HaltedBeforeHandlingMustHandle` is raised.
    pub fn must_handle(mut self) -> Self {
        self.must_handle = true;
        self
    }

    /// Assert that at most `k` instances of this event's type are ever
    /// simultaneously queued; violating enqueues raise `TooManyInstances`.
    pub fn max_instances(mut self, k: usize) -> Self {
        self.max_instances = Some(k);
        self
    }

    pub fn is_must_handle(&self) -> bool {
        self.must_handle
    }

    pub fn max_instances_bound(&self) -> Option<usize> {
        self.max_instances
    }
}

/// The auxiliary metadata carried alongside a queued event (§3 "Inbox",
/// §4.1 "Must-handle policy", "Max-instance policy").
#[derive(Debug, Clone, Copy)]
pub struct EventInfo {
    pub must_handle: bool,
    pub max_instances: Option<usize>,
    pub enqueued_at: DateTime<Utc>,
}

impl EventInfo {
    pub fn from_options(options: SendOptions) -> Self {
        Self {
            must_handle: options.must_handle,
            max_instances: options.max_instances,
            enqueued_at: Utc::now(),
        }
    }
}

/// A single inbox entry: the boxed event, its optional causality group, and
/// optional must-handle / max-instance metadata.
pub struct EventEnvelope {
    event: BoxedEvent,
    group: Option<EventGroupId>,
    info: Option<EventInfo>,
}

impl EventEnvelope {
    pub fn new(event: BoxedEvent, group: Option<EventGroupId>, options: SendOptions) -> Self {
        let info = if options.must_handle || options.max_instances.is_some() {
            Some(EventInfo::from_options(options))
        } else {
            None
        };
        Self { event, group, info }
    }

    pub fn event_type(&self) -> EventType {
        self.event.event_type()
    }

    pub fn event(&self) -> &dyn Event {
        self.event.as_ref()
    }

    pub fn into_event(self) -> BoxedEvent {
        self.event
    }

    pub fn group(&self) -> Option<EventGroupId> {
        self.group
    }

    pub fn info(&self) -> Option<&EventInfo> {
        self.info.as_ref()
    }

    pub fn is_must_handle(&self) -> bool {
        self.info.map(|info| info.must_handle).unwrap_or(false)
    }

    pub fn max_instances(&self) -> Option<usize> {
        self.info.and_then(|info| info.max_instances)
    }
}

impl Debug for EventEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEnvelope")
            .field("event_type", &self.event_type())
            .field("group", &self.group)
            .field("must_handle", &self.is_must_handle())
            .field("max_instances", &self.max_instances())
            .finish()
    }
}
