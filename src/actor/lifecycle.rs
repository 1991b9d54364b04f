//! `Created → Initializing → Running ↔ Idle → Halting → Halted` (§3 "Actor
//! lifecycle"). `Running ↔ Idle` alternates as the inbox becomes empty and
//! refills; `Halted` is terminal.

// Layer 1: Standard library imports
use std::fmt;

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc}; // §3.2 MANDATORY

// Layer 3: Internal module imports
// (none)

/// The actor lifecycle state (§3).
///
/// # Examples
///
/// ```rust
/// use conductor_rt::actor::ActorState;
///
/// let state = ActorState::Created;
/// assert_eq!(state, ActorState::Created);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorState {
    /// Allocated and registered, `Initialize` not yet run.
    Created,
    /// `Initialize(initial_event)` is in progress.
    Initializing,
    /// The handler loop is actively draining the inbox.
    Running,
    /// The inbox is empty; the handler loop has exited and awaits the next
    /// enqueue.
    Idle,
    /// `Halt` has been dispatched; halt housekeeping is in progress.
    Halting,
    /// Terminal. The execution context removes the actor from its registry.
    Halted,
}

impl Default for ActorState {
    fn default() -> Self {
        Self::Created
    }
}

impl fmt::Display for ActorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Created => "Created",
            Self::Initializing => "Initializing",
            Self::Running => "Running",
            Self::Idle => "Idle",
            Self::Halting => "Halting",
            Self::Halted => "Halted",
        };
        write!(f, "{label}")
    }
}

/// Lifecycle tracker: current state plus when it last changed.
///
/// # Examples
///
/// ```rust
/// use conductor_rt::actor::{ActorLifecycle, ActorState};
///
/// let mut lifecycle = ActorLifecycle::new();
/// assert_eq!(lifecycle.state(), ActorState::Created);
///
/// lifecycle.transition_to(ActorState::Initializing);
/// assert_eq!(lifecycle.state(), ActorState::Initializing);
/// ```
#[derive(Debug, Clone)]
pub struct ActorLifecycle {
    state: ActorState,
    last_state_change: DateTime<Utc>,
}

impl ActorLifecycle {
    pub fn new() -> Self {
        Self {
            state: ActorState::Created,
            last_state_change: Utc::now(), // §3.2
        }
    }

    pub fn transition_to(&mut self, new_state: ActorState) {
        self.state = new_state;
        self.last_state_change = Utc::now(); // §3.2
    }

    pub fn state(&self) -> ActorState {
        self.state
    }

    pub fn last_state_change(&self) -> DateTime<Utc> {
        self.last_state_change
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.state, ActorState::Halted)
    }

    pub fn is_running(&self) -> bool {
        self.state == ActorState::Running
    }
}

impl Default for ActorLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_new() {
        let lifecycle = ActorLifecycle::new();
        assert_eq!(lifecycle.state(), ActorState::Created);
        assert!(!lifecycle.is_terminal());
        assert!(!lifecycle.is_running());
    }

    #[test]
    fn test_lifecycle_default() {
        let lifecycle = ActorLifecycle::default();
        assert_eq!(lifecycle.state(), ActorState::Created);
    }

    #[test]
    fn test_state_transition() {
        let mut lifecycle = ActorLifecycle::new();

        lifecycle.transition_to(ActorState::Running);
        assert_eq!(lifecycle.state(), ActorState::Running);
        assert!(lifecycle.is_running());

        lifecycle.transition_to(ActorState::Idle);
        assert_eq!(lifecycle.state(), ActorState::Idle);
        assert!(!lifecycle.is_running());
    }

    #[test]
    fn test_terminal_states() {
        let mut lifecycle = ActorLifecycle::new();
        assert!(!lifecycle.is_terminal());

        lifecycle.transition_to(ActorState::Running);
        assert!(!lifecycle.is_terminal());

        lifecycle.transition_to(ActorState::Halted);
        assert!(lifecycle.is_terminal());
    }

    #[test]
    fn test_is_running() {
        let mut lifecycle = ActorLifecycle::new();
        assert!(!lifecycle.is_running());

        lifecycle.transition_to(ActorState::Running);
        assert!(lifecycle.is_running());

        lifecycle.transition_to(ActorState::Idle);
        assert!(!lifecycle.is_running());
    }

    #[test]
    fn test_last_state_change_updates() {
        let mut lifecycle = ActorLifecycle::new();
        let first_timestamp = lifecycle.last_state_change();

        std::thread::sleep(std::time::Duration::from_millis(10));
        lifecycle.transition_to(ActorState::Running);
        let second_timestamp = lifecycle.last_state_change();

        assert!(second_timestamp > first_timestamp);
    }

    #[test]
    fn test_state_equality() {
        assert_eq!(ActorState::Created, ActorState::Created);
        assert_ne!(ActorState::Running, ActorState::Halted);
    }

    #[test]
    fn test_state_default() {
        assert_eq!(ActorState::default(), ActorState::Created);
    }

    #[test]
    fn test_lifecycle_clone() {
        let lifecycle = ActorLifecycle::new();
        let cloned = lifecycle.clone();
        assert_eq!(lifecycle.state(), cloned.state());
    }
}
