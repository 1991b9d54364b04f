//! Well-known internal events (§3, §9 "Tagged transitions").
//!
//! `GotoState`, `PushState`, `Halt`, `Default` and `TimerElapsed` are
//! represented as a closed, ordinary Rust sum type rather than discovered via
//! reflection; they flow through the same [`crate::event::Event`] channel as
//! user events so the inbox and dispatch loop need no special case for them,
//! but user code never constructs arbitrary variants of them outside this
//! module's constructors.

// Layer 1: Standard library imports
use std::time::Duration;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::statemachine::StateId;

/// Terminates the actor that receives it (§3, §4.3 `dispatch`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Halt;

/// Auto-injected by the inbox when every entry is deferred (or the queue is
/// empty) and a default handler is installed in the current state (§4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DefaultEvent;

/// Requests a `goto` transition to state `target` (§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GotoState {
    pub target: StateId,
}

impl GotoState {
    pub fn new(target: StateId) -> Self {
        Self { target }
    }
}

/// Requests a `push` transition onto state `target` (§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PushState {
    pub target: StateId,
}

impl PushState {
    pub fn new(target: StateId) -> Self {
        Self { target }
    }
}

/// Metadata attached to a `TimerElapsed` event: which timer fired, and
/// whether it was periodic (in which case the mock timer re-arms it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerInfo {
    pub timer_id: u64,
    pub period: Option<Duration>,
}

/// Delivered via the ordinary send path when a mock timer fires (§5
/// "Cancellation and timeout": no real-time guarantee, interleaved by the
/// scheduler like any other event).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerElapsed(pub TimerInfo);
