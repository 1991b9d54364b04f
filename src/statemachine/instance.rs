//! The runtime state stack and the `dispatch(e)` transition algorithm
//! (§4.3).

// Layer 1: Standard library imports
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::event::control::{GotoState, Halt, PushState};
use crate::event::traits::downcast_event;
use crate::event::{Event, EventGroupId, EventType};
use crate::log::{LogRecord, LogSink};
use crate::statemachine::def::{ActionName, HandlerDecl, HandlerKey, StateId, StateMachineDef};
use crate::statemachine::errors::StateMachineError;
use crate::statemachine::handler_table::HandlerTable;
use crate::event::BoxedEvent;
use crate::util::ActorId;

use tracing::trace;

/// What a dispatched event resulted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Handled,
    Halted,
}

static NEXT_TIMER_ID: AtomicU64 = AtomicU64::new(1);

/// Side effects an action requested while it ran, collected for the
/// dispatch loop (and, for timers, the handler loop above it) to apply once
/// the action returns (§4.3 "Raised events ... Pop may be issued inside an
/// action; it takes effect only at action boundary", §4.4 public surface).
#[derive(Default)]
pub struct ActionEffects {
    pub raised: Option<(BoxedEvent, Option<EventGroupId>)>,
    pub receive_request: Option<Vec<EventType>>,
    pub timer_starts: Vec<(u64, Duration)>,
    pub timer_stops: Vec<u64>,
}

pub struct TransitionContext {
    current_state: StateId,
    pop_requested: bool,
    raised: Option<(BoxedEvent, Option<EventGroupId>)>,
    receive_requested: Option<Vec<EventType>>,
    timer_starts: Vec<(u64, Duration)>,
    timer_stops: Vec<u64>,
}

impl TransitionContext {
    fn new(current_state: StateId) -> Self {
        Self {
            current_state,
            pop_requested: false,
            raised: None,
            receive_requested: None,
            timer_starts: Vec::new(),
            timer_stops: Vec::new(),
        }
    }

    pub fn current_state(&self) -> StateId {
        self.current_state
    }

    /// Request that the current frame be popped once this action returns.
    pub fn pop(&mut self) {
        self.pop_requested = true;
    }

    /// Raise an event for immediate delivery after this action completes,
    /// before the next ordinary dequeue (§4.1 `RaiseEvent`).
    pub fn raise(&mut self, event: BoxedEvent, group: Option<EventGroupId>) {
        self.raised = Some((event, group));
    }

    /// `ReceiveAsync(types)` (§4.1): request that the handler loop suspend
    /// this actor's drain until a matching event is enqueued, once this
    /// action returns. At most one may be requested per action.
    pub fn receive(&mut self, types: Vec<EventType>) {
        self.receive_requested = Some(types);
    }

    /// `StartPeriodicTimer(period)` (§4.4): mints a timer id and requests
    /// that the handler loop arm a mock timer re-firing every `period`
    /// until stopped (§5 "no real-time guarantee").
    pub fn start_periodic_timer(&mut self, period: Duration) -> u64 {
        let id = NEXT_TIMER_ID.fetch_add(1, Ordering::Relaxed);
        self.timer_starts.push((id, period));
        id
    }

    /// `StopTimer(timer_id)` (§4.4).
    pub fn stop_timer(&mut self, timer_id: u64) {
        self.timer_stops.push(timer_id);
    }

    fn take_effects(&mut self) -> ActionEffects {
        ActionEffects {
            raised: self.raised.take(),
            receive_request: self.receive_requested.take(),
            timer_starts: std::mem::take(&mut self.timer_starts),
            timer_stops: std::mem::take(&mut self.timer_stops),
        }
    }
}

/// Invokes the named entry/exit/action callbacks declared by a
/// [`crate::statemachine::StateDef`]; implemented by the concrete actor type
/// that owns this state machine.
pub trait StateMachineActions: Send {
    fn invoke_entry(
        &mut self,
        action: ActionName,
        ctx: &mut TransitionContext,
    ) -> Result<(), StateMachineError>;

    fn invoke_exit(
        &mut self,
        action: ActionName,
        ctx: &mut TransitionContext,
    ) -> Result<(), StateMachineError>;

    fn invoke_action(
        &mut self,
        action: ActionName,
        event: &dyn Event,
        ctx: &mut TransitionContext,
    ) -> Result<(), StateMachineError>;
}

struct Frame {
    state: StateId,
    effective: Arc<HandlerTable>,
}

/// Where [`StateMachineInstance`] sends §6 transition log records. Absent
/// for [`crate::monitor::Monitor`], which drives the same `dispatch()` but
/// has no `ActorId` and is not on the actor-level log surface.
struct LogHandle {
    sink: Arc<dyn LogSink>,
    actor: ActorId,
}

/// A running hierarchical state machine: a stack of states and their merged
/// effective handler maps (§3, §4.3).
pub struct StateMachineInstance {
    def: Arc<StateMachineDef>,
    stack: Vec<Frame>,
    actor_label: String,
    log: Option<LogHandle>,
}

impl StateMachineInstance {
    pub fn new(def: Arc<StateMachineDef>, actor_label: impl Into<String>) -> Self {
        let start = def.start_state();
        let effective = Arc::new(def.canonical_handlers(start).clone());
        Self {
            def,
            stack: vec![Frame {
                state: start,
                effective,
            }],
            actor_label: actor_label.into(),
            log: None,
        }
    }

    /// Attach the §6 log surface; called once by [`crate::actor::ActorRuntime`]
    /// before the first dispatch. Never called for a [`crate::monitor::Monitor`].
    pub fn attach_log(&mut self, sink: Arc<dyn LogSink>, actor: ActorId) {
        self.log = Some(LogHandle { sink, actor });
    }

    fn emit(&self, build: impl FnOnce(&ActorId) -> LogRecord) {
        if let Some(handle) = &self.log {
            let _ = handle.sink.record(build(&handle.actor));
        }
    }

    pub fn current_state(&self) -> StateId {
        self.stack.last().expect("stack never empty while running").state
    }

    pub fn is_halted(&self) -> bool {
        self.stack.is_empty()
    }

    /// Event types the current frame defers (the inbox consults this after
    /// every transition to recompute its deferred set).
    pub fn deferred_types(&self) -> Vec<crate::event::EventType> {
        self.current_effective()
            .keys_with(|decl| matches!(decl, HandlerDecl::Defer))
    }

    /// Event types the current frame ignores.
    pub fn ignored_types(&self) -> Vec<crate::event::EventType> {
        self.current_effective()
            .keys_with(|decl| matches!(decl, HandlerDecl::Ignore))
    }

    /// Whether the current frame declares a binding for [`crate::event::DefaultEvent`]
    /// (the inbox synthesizes one once every queued entry is deferred).
    pub fn has_default_handler(&self) -> bool {
        let key = HandlerKey::Type(crate::event::EventType::of::<crate::event::DefaultEvent>());
        self.current_effective().get(&key).is_some()
    }

    fn current_effective(&self) -> &HandlerTable {
        &self.stack.last().expect("stack never empty while running").effective
    }

    /// Run entry action of the start state; call once before the first
    /// dispatch.
    pub fn enter_start(&mut self, actions: &mut dyn StateMachineActions) -> Result<(), StateMachineError> {
        let start = self.def.start_state();
        self.run_entry(start, actions)
    }

    /// The §4.3 `dispatch(e)` algorithm. [`ActionEffects`] carries whatever
    /// the dispatched action requested via its [`TransitionContext`]:
    /// raised event, `ReceiveAsync`, timer starts/stops.
    pub fn dispatch(
        &mut self,
        event: &dyn Event,
        actions: &mut dyn StateMachineActions,
    ) -> Result<(DispatchOutcome, ActionEffects), StateMachineError> {
        if let Some(goto) = downcast_event::<GotoState>(event) {
            self.goto(goto.target, None, actions)?;
            return Ok((DispatchOutcome::Handled, ActionEffects::default()));
        }
        if let Some(push) = downcast_event::<PushState>(event) {
            self.push(push.target, actions)?;
            return Ok((DispatchOutcome::Handled, ActionEffects::default()));
        }

        let event_type = event.event_type();
        loop {
            if self.stack.is_empty() {
                return Err(StateMachineError::unhandled(self.actor_label.clone(), event_type));
            }
            let table = self.current_effective().clone();
            let key = HandlerKey::Type(event_type);
            let decl = table.get(&key).cloned().or_else(|| table.wildcard().cloned());

            if let Some(decl) = decl {
                return self.apply_decl(decl, event, actions);
            }

            if downcast_event::<Halt>(event).is_some() && self.stack.len() == 1 {
                self.halt(actions)?;
                return Ok((DispatchOutcome::Halted, ActionEffects::default()));
            }

            // Unhandled in this frame: pop and retry against the enclosing one.
            self.run_exit_top(None, actions)?;
            self.stack.pop();
        }
    }

    fn apply_decl(
        &mut self,
        decl: HandlerDecl,
        event: &dyn Event,
        actions: &mut dyn StateMachineActions,
    ) -> Result<(DispatchOutcome, ActionEffects), StateMachineError> {
        match decl {
            HandlerDecl::Goto { target, on_exit } => {
                self.goto(target, on_exit, actions)?;
                Ok((DispatchOutcome::Handled, ActionEffects::default()))
            }
            HandlerDecl::Push { target } => {
                self.push(target, actions)?;
                Ok((DispatchOutcome::Handled, ActionEffects::default()))
            }
            HandlerDecl::Action(name) => {
                let state = self.current_state();
                self.emit(|actor| LogRecord::ExecuteAction { actor: actor.clone(), state, action: name });
                let mut ctx = TransitionContext::new(state);
                actions.invoke_action(name, event, &mut ctx)?;
                let effects = ctx.take_effects();
                if ctx.pop_requested {
                    self.pop(actions)?;
                }
                if self.stack.is_empty() {
                    Ok((DispatchOutcome::Halted, effects))
                } else {
                    Ok((DispatchOutcome::Handled, effects))
                }
            }
            HandlerDecl::Defer | HandlerDecl::Ignore => {
                self.run_exit_top(None, actions)?;
                self.stack.pop();
                if self.stack.is_empty() {
                    Err(StateMachineError::unhandled(self.actor_label.clone(), event.event_type()))
                } else {
                    self.dispatch(event, actions)
                }
            }
        }
    }

    fn goto(
        &mut self,
        target: StateId,
        on_exit: Option<ActionName>,
        actions: &mut dyn StateMachineActions,
    ) -> Result<(), StateMachineError> {
        let from = self.current_state();
        self.run_exit_top(on_exit, actions)?;
        self.stack.pop();
        let parent = self
            .stack
            .last()
            .map(|f| (*f.effective).clone())
            .unwrap_or_else(HandlerTable::empty);
        let merged = HandlerTable::merge(&parent, self.def.canonical_handlers(target));
        self.stack.push(Frame {
            state: target,
            effective: Arc::new(merged),
        });
        trace!(actor = %self.actor_label, target = %target.name(), "goto");
        self.emit(|actor| LogRecord::GotoState { actor: actor.clone(), from, to: target });
        self.run_entry(target, actions)
    }

    fn push(&mut self, target: StateId, actions: &mut dyn StateMachineActions) -> Result<(), StateMachineError> {
        let from = self.current_state();
        let parent = self.current_effective().clone();
        let merged = HandlerTable::merge(&parent, self.def.canonical_handlers(target));
        self.stack.push(Frame {
            state: target,
            effective: Arc::new(merged),
        });
        trace!(actor = %self.actor_label, target = %target.name(), depth = self.stack.len(), "push");
        self.emit(|actor| LogRecord::PushState { actor: actor.clone(), from, to: target });
        self.run_entry(target, actions)
    }

    fn pop(&mut self, actions: &mut dyn StateMachineActions) -> Result<(), StateMachineError> {
        let state = self.current_state();
        self.run_exit_top(None, actions)?;
        self.stack.pop();
        trace!(actor = %self.actor_label, depth = self.stack.len(), "pop");
        self.emit(|actor| LogRecord::PopState { actor: actor.clone(), state });
        Ok(())
    }

    fn halt(&mut self, actions: &mut dyn StateMachineActions) -> Result<(), StateMachineError> {
        while !self.stack.is_empty() {
            self.run_exit_top(None, actions)?;
            self.stack.pop();
        }
        trace!(actor = %self.actor_label, "halted");
        self.emit(|actor| LogRecord::Halt { actor: actor.clone() });
        Ok(())
    }

    fn run_entry(&mut self, state: StateId, actions: &mut dyn StateMachineActions) -> Result<(), StateMachineError> {
        self.emit(|actor| LogRecord::EnterState { actor: actor.clone(), state });
        let entry = self.def.state(state).and_then(|s| s.entry());
        if let Some(name) = entry {
            let mut ctx = TransitionContext::new(state);
            actions.invoke_entry(name, &mut ctx)?;
        }
        Ok(())
    }

    fn run_exit_top(
        &mut self,
        override_action: Option<ActionName>,
        actions: &mut dyn StateMachineActions,
    ) -> Result<(), StateMachineError> {
        let Some(frame) = self.stack.last() else {
            return Ok(());
        };
        let state = frame.state;
        self.emit(|actor| LogRecord::ExitState { actor: actor.clone(), state });
        let exit = override_action.or_else(|| self.def.state(state).and_then(|s| s.exit()));
        if let Some(name) = exit {
            let mut ctx = TransitionContext::new(state);
            actions.invoke_exit(name, &mut ctx)?;
        }
        Ok(())
    }
}
