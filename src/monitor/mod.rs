//! C6: passive state machines observing actor activity for safety-property
//! assertions (§3 "Monitor", §4.6).
//!
//! A [`Monitor`] is registered once per execution context via
//! `RegisterMonitor<T>` and then driven synchronously, on the caller's
//! thread, every time a matching event crosses the system (`Monitor<T>(e)`).
//! It reuses the §4.3 state-machine engine verbatim — same handler-map
//! precedence, same entry/exit/action dispatch — but never owns an inbox,
//! never sends or receives, and never halts on its own initiative. A
//! transition into a `Halt`-style terminal state only stops that monitor
//! from observing further events; it does not affect the actor that
//! triggered it.

pub mod errors;

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::event::Event;
use crate::statemachine::{DispatchOutcome, StateMachineActions, StateMachineDef, StateMachineInstance};

pub use errors::MonitorError;

/// Outcome of a single [`Monitor::observe`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorOutcome {
    /// The event matched a live transition; the monitor may still observe
    /// further events.
    Observed,
    /// The monitor's state stack emptied; it is now inert.
    Halted,
}

/// A synchronously-driven observer state machine (§4.6).
pub struct Monitor<T: StateMachineActions> {
    actions: T,
    machine: StateMachineInstance,
    name: String,
    halted: bool,
}

impl<T: StateMachineActions> Monitor<T> {
    /// `RegisterMonitor<T>`: instantiate once and run the start state's
    /// entry action.
    pub fn new(mut actions: T, def: Arc<StateMachineDef>, name: impl Into<String>) -> Result<Self, MonitorError> {
        let name = name.into();
        let mut machine = StateMachineInstance::new(def, name.clone());
        machine.enter_start(&mut actions)?;
        Ok(Self {
            actions,
            machine,
            name,
            halted: false,
        })
    }

    /// `Monitor<T>(e)`: run the transition logic synchronously on the
    /// calling thread.
    pub fn observe(&mut self, event: &dyn Event) -> Result<MonitorOutcome, MonitorError> {
        if self.halted {
            return Err(MonitorError::AlreadyHalted {
                name: self.name.clone(),
            });
        }
        let (outcome, _effects) = self.machine.dispatch(event, &mut self.actions)?;
        match outcome {
            DispatchOutcome::Handled => Ok(MonitorOutcome::Observed),
            DispatchOutcome::Halted => {
                self.halted = true;
                Ok(MonitorOutcome::Halted)
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn actions(&self) -> &T {
        &self.actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Halt;
    use crate::statemachine::{HandlerDecl, StateDef, StateId, StateMachineError, TransitionContext};

    #[derive(Debug)]
    struct Violation;

    struct Safe;
    struct Tripped;

    #[derive(Default)]
    struct SingleViolationRule {
        observed: u32,
    }

    impl StateMachineActions for SingleViolationRule {
        fn invoke_entry(&mut self, _action: &'static str, _ctx: &mut TransitionContext) -> Result<(), StateMachineError> {
            Ok(())
        }
        fn invoke_exit(&mut self, _action: &'static str, _ctx: &mut TransitionContext) -> Result<(), StateMachineError> {
            Ok(())
        }
        fn invoke_action(
            &mut self,
            _action: &'static str,
            _event: &dyn Event,
            _ctx: &mut TransitionContext,
        ) -> Result<(), StateMachineError> {
            self.observed += 1;
            Ok(())
        }
    }

    fn build_def() -> Arc<StateMachineDef> {
        let safe = StateId::of::<Safe>();
        let tripped = StateId::of::<Tripped>();
        Arc::new(
            StateMachineDef::builder()
                .add_state(
                    StateDef::builder(safe)
                        .start()
                        .on_event(
                            crate::event::EventType::of::<Violation>(),
                            HandlerDecl::Goto {
                                target: tripped,
                                on_exit: None,
                            },
                        )
                        .build(),
                )
                .add_state(StateDef::builder(tripped).on_event(crate::event::EventType::of::<Halt>(), HandlerDecl::Action("noop")).build())
                .build()
                .expect("valid def"),
        )
    }

    #[test]
    fn base_halt_event_halts_the_monitor() {
        let mut monitor = Monitor::new(SingleViolationRule::default(), build_def(), "NoDoubleViolation()").unwrap();
        let outcome = monitor.observe(&Halt).unwrap();
        assert_eq!(outcome, MonitorOutcome::Halted);
        assert!(monitor.is_halted());

        let err = monitor.observe(&Halt).unwrap_err();
        assert!(matches!(err, MonitorError::AlreadyHalted { .. }));
    }

    #[test]
    fn violation_transitions_to_tripped_state() {
        let mut monitor = Monitor::new(SingleViolationRule::default(), build_def(), "NoDoubleViolation()").unwrap();
        let outcome = monitor.observe(&Violation).unwrap();
        assert_eq!(outcome, MonitorOutcome::Observed);
        assert!(!monitor.is_halted());
    }
}
