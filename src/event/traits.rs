//! The [`Event`] trait and the runtime-type handle [`EventType`] used to key
//! handler maps, defer/ignore sets and max-instance bounds.

// Layer 1: Standard library imports
use std::any::{Any, TypeId};
use std::fmt::{self, Debug};

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
// (none)

/// Immutable, runtime-typed handle identifying an [`Event`]'s concrete type.
///
/// Two `EventType`s compare equal iff they were produced from the same Rust
/// type, regardless of payload; this is the key used for handler-map lookups,
/// deferred/ignored sets and the max-instance bound.
#[derive(Clone, Copy)]
pub struct EventType {
    type_id: TypeId,
    name: &'static str,
}

impl EventType {
    /// The `EventType` of `T`.
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The fully qualified Rust type name, used in log records and assertion
    /// messages (e.g. `"There are more than 1 instances of 'T' ..."`).
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for EventType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for EventType {}

impl std::hash::Hash for EventType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl Debug for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EventType").field(&self.name).finish()
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// An immutable message payload, identified by its runtime type (§3 C1).
///
/// Every value an actor can enqueue, raise or receive — including the
/// internal [`crate::event::control`] markers — implements `Event` via the
/// blanket implementation below; user code never implements it by hand.
pub trait Event: Any + Send + Sync + Debug {
    /// The runtime type of this event, used for handler-map dispatch.
    fn event_type(&self) -> EventType;

    /// Upcast to `&dyn Any` so the inbox can downcast back to a concrete
    /// event type when a `ReceiveAsync` predicate needs to inspect payload.
    fn as_any(&self) -> &dyn Any;
}

impl<T> Event for T
where
    T: Any + Send + Sync + Debug,
{
    fn event_type(&self) -> EventType {
        EventType::of::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A boxed, type-erased event as stored in an inbox entry.
pub type BoxedEvent = Box<dyn Event>;

/// Attempt to downcast a boxed event back to a concrete type `T`.
pub fn downcast_event<T: 'static>(event: &dyn Event) -> Option<&T> {
    event.as_any().downcast_ref::<T>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Ping;

    #[derive(Debug)]
    struct Pong(u32);

    #[test]
    fn event_type_equality_is_by_concrete_type() {
        assert_eq!(EventType::of::<Ping>(), EventType::of::<Ping>());
        assert_ne!(EventType::of::<Ping>(), EventType::of::<Pong>());
    }

    #[test]
    fn boxed_event_reports_its_type() {
        let boxed: BoxedEvent = Box::new(Pong(7));
        assert_eq!(boxed.event_type(), EventType::of::<Pong>());
    }

    #[test]
    fn downcast_recovers_payload() {
        let boxed: BoxedEvent = Box::new(Pong(42));
        let recovered: &Pong = downcast_event(boxed.as_ref()).expect("downcast");
        assert_eq!(recovered.0, 42);
    }

    #[test]
    fn downcast_rejects_wrong_type() {
        let boxed: BoxedEvent = Box::new(Ping);
        assert!(downcast_event::<Pong>(boxed.as_ref()).is_none());
    }
}
