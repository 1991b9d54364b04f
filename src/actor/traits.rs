//! The [`Actor`] trait: the public surface of C4 (§4.2) — creation,
//! messaging, halting, random oracles and timers, all executed inside the
//! actor's own cooperative task.
//!
//! # Design Philosophy
//!
//! - An `Actor` is implemented here as a [`crate::statemachine::StateMachineInstance`]
//!   with exactly one declared state: §4.2's "base Actor dispatch" (action
//!   binding, else wildcard, else `Halt`, else `UnhandledEvent`) is precisely
//!   what `dispatch(e)` (§4.3) does when the state stack never grows beyond
//!   depth one. `StateMachine` (C5) is the same engine with more than one
//!   declared state and push/goto transitions available.
//! - An associated error type on `Actor` keeps each implementation's
//!   failure type concrete without forcing a shared error enum. There is no
//!   restart/resume story for actions (§7): an action's error always ends
//!   the actor's schedule as a controlled failure, surfaced through the
//!   execution context's failure sink rather than through a recovery hook.

// Layer 1: Standard library imports
use std::fmt::Debug;

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
use crate::event::Event;
use crate::statemachine::{StateMachineActions, TransitionContext};

/// A single-threaded event handler with exclusive access to its own state
/// (§3 "Actor", Glossary).
///
/// Implementors provide the named entry/exit/action callbacks their
/// [`crate::statemachine::StateMachineDef`] declares by implementing
/// [`StateMachineActions`]; `Actor` adds the lifecycle hooks the execution
/// context calls at well-known points.
///
/// # Example
///
/// ```rust,ignore
/// use conductor_rt::actor::Actor;
/// use conductor_rt::statemachine::{StateMachineActions, TransitionContext};
///
/// struct PingActor { pongs_seen: u32 }
///
/// impl StateMachineActions for PingActor {
///     fn invoke_entry(&mut self, _: &'static str, _: &mut TransitionContext) -> Result<(), conductor_rt::statemachine::StateMachineError> { Ok(()) }
///     fn invoke_exit(&mut self, _: &'static str, _: &mut TransitionContext) -> Result<(), conductor_rt::statemachine::StateMachineError> { Ok(()) }
///     fn invoke_action(&mut self, action: &'static str, _event: &dyn conductor_rt::event::Event, _ctx: &mut TransitionContext) -> Result<(), conductor_rt::statemachine::StateMachineError> {
///         if action == "on_pong" { self.pongs_seen += 1; }
///         Ok(())
///     }
/// }
///
/// impl Actor for PingActor {
///     type Error = std::convert::Infallible;
/// }
/// ```
#[async_trait]
pub trait Actor: StateMachineActions + Send + 'static {
    /// The error type this actor's actions can fail with.
    type Error: Debug + Send + 'static;

    /// Called once, before the handler loop starts draining the inbox
    /// (§4.4 `CreateActor` step 3: "run `Initialize(initial_event)`").
    async fn initialize(&mut self, _initial_event: Option<&dyn Event>) -> Result<(), Self::Error> {
        Ok(())
    }

    /// `OnHalt(last_event)` (§4.2): called once, before halt housekeeping
    /// flushes the inbox.
    async fn on_halt(&mut self, _last_event: Option<&dyn Event>) {}

    /// Called for every event dropped during halt housekeeping (§4.2
    /// "`OnHaltComplete` ... flushes the inbox, firing `EventDropped`
    /// callbacks for every remaining entry").
    fn on_event_dropped(&mut self, _event_type: crate::event::EventType) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statemachine::StateMachineError;

    #[derive(Debug)]
    struct TestError;

    #[derive(Default)]
    struct TestActor {
        actions_invoked: Vec<&'static str>,
    }

    impl StateMachineActions for TestActor {
        fn invoke_entry(&mut self, action: &'static str, _ctx: &mut TransitionContext) -> Result<(), StateMachineError> {
            self.actions_invoked.push(action);
            Ok(())
        }
        fn invoke_exit(&mut self, action: &'static str, _ctx: &mut TransitionContext) -> Result<(), StateMachineError> {
            self.actions_invoked.push(action);
            Ok(())
        }
        fn invoke_action(
            &mut self,
            action: &'static str,
            _event: &dyn Event,
            _ctx: &mut TransitionContext,
        ) -> Result<(), StateMachineError> {
            self.actions_invoked.push(action);
            Ok(())
        }
    }

    #[async_trait]
    impl Actor for TestActor {
        type Error = TestError;
    }

    #[tokio::test]
    async fn default_initialize_succeeds() {
        let mut actor = TestActor::default();
        assert!(actor.initialize(None).await.is_ok());
    }
}
