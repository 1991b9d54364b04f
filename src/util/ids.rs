// Layer 1: Standard library imports
use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Layer 3: Internal module imports
// (none)

static NEXT_CONTEXT_HANDLE: AtomicU64 = AtomicU64::new(1);
static NEXT_ACTOR_VALUE: AtomicU64 = AtomicU64::new(1);

/// Opaque handle identifying an [`crate::context::ExecutionContext`] instance.
///
/// A fresh handle is allocated every time a context is constructed. It has no
/// meaning outside the process and is never serialized; it lets an
/// [`ActorId`] record "which context minted me" without an actual back
/// reference, which would make the id non-`Copy` and self-referential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextHandle(u64);

impl ContextHandle {
    /// Allocate a new, never-before-used context handle.
    pub fn next() -> Self {
        Self(NEXT_CONTEXT_HANDLE.fetch_add(1, Ordering::Relaxed))
    }
}

/// Globally unique, hashable handle to an actor.
///
/// Two `ActorId`s compare equal, and hash identically, when either:
/// - both carry the same interned `name`, or
/// - neither carries a name and both carry the same numeric `value`.
///
/// Named ids are interned per context by the caller (the context's name
/// registry); a named id is never equal to an unnamed one even if their
/// numeric values happen to coincide, since numeric values are allocated
/// from a single process-wide counter independent of naming.
#[derive(Debug, Clone)]
pub struct ActorId {
    value: u64,
    name: Option<Arc<str>>,
    type_name: &'static str,
    context: ContextHandle,
}

impl ActorId {
    /// Allocate a fresh, anonymous (unnamed) actor id.
    pub fn new(type_name: &'static str, context: ContextHandle) -> Self {
        Self {
            value: NEXT_ACTOR_VALUE.fetch_add(1, Ordering::Relaxed),
            name: None,
            type_name,
            context,
        }
    }

    /// Construct a named actor id. Callers (the context's name registry) are
    /// responsible for interning so repeated calls with the same name within
    /// a context return ids that compare equal.
    pub fn named(name: Arc<str>, type_name: &'static str, context: ContextHandle) -> Self {
        Self {
            value: NEXT_ACTOR_VALUE.fetch_add(1, Ordering::Relaxed),
            name: Some(name),
            type_name,
            context,
        }
    }

    /// The raw numeric value. Stable for the lifetime of the actor, but not
    /// meaningful for equality when a name is present.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// The actor's unique name, if one was supplied at creation.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Fully qualified type name of the actor this id was minted for.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The context that minted this id.
    pub fn context(&self) -> ContextHandle {
        self.context
    }
}

impl PartialEq for ActorId {
    fn eq(&self, other: &Self) -> bool {
        match (&self.name, &other.name) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.value == other.value,
            _ => false,
        }
    }
}

impl Eq for ActorId {}

impl Hash for ActorId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.name {
            Some(name) => {
                0u8.hash(state);
                name.hash(state);
            }
            None => {
                1u8.hash(state);
                self.value.hash(state);
            }
        }
    }
}

impl Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name}()"),
            None => write!(f, "{}({})", self.type_name, self.value),
        }
    }
}

/// Causality-propagating correlation id.
///
/// Allocated by a user action and attached to the event it directly
/// produces; sending an event propagates the sender's group to events it
/// transitively causes unless the caller overrides it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventGroupId(Uuid);

impl EventGroupId {
    /// Allocate a new, random event group id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventGroupId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for EventGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_ids_compare_by_value() {
        let ctx = ContextHandle::next();
        let a = ActorId::new("pkg::Client", ctx);
        let b = ActorId::new("pkg::Client", ctx);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn named_ids_compare_by_name_regardless_of_value() {
        let ctx = ContextHandle::next();
        let name: Arc<str> = Arc::from("server");
        let a = ActorId::named(name.clone(), "pkg::Server", ctx);
        let b = ActorId::named(name, "pkg::Server", ctx);
        assert_ne!(a.value(), b.value());
        assert_eq!(a, b);
    }

    #[test]
    fn named_and_anonymous_never_equal() {
        let ctx = ContextHandle::next();
        let named = ActorId::named(Arc::from("x"), "pkg::T", ctx);
        let anon = ActorId::new("pkg::T", ctx);
        assert_ne!(named, anon);
    }

    #[test]
    fn display_named_vs_anonymous() {
        let ctx = ContextHandle::next();
        let named = ActorId::named(Arc::from("srv"), "pkg::Server", ctx);
        assert_eq!(named.to_string(), "srv()");
        let anon = ActorId::new("pkg::Server", ctx);
        assert!(anon.to_string().starts_with("pkg::Server("));
    }

    #[test]
    fn event_group_ids_are_unique() {
        assert_ne!(EventGroupId::new(), EventGroupId::new());
    }

    #[test]
    fn context_handles_are_unique() {
        assert_ne!(ContextHandle::next(), ContextHandle::next());
    }
}
