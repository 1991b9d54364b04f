//! The actor's handler loop (§4.2): drains the inbox one event at a time,
//! driving the underlying [`StateMachineInstance`] and performing halt
//! housekeeping. The execution context calls [`ActorRuntime::step`] once per
//! scheduling turn; it owns when (and whether) to call it again.

// Layer 1: Standard library imports
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use tracing::{debug, trace};

// Layer 3: Internal module imports
use crate::actor::errors::ActorRuntimeError;
use crate::actor::lifecycle::{ActorLifecycle, ActorState};
use crate::actor::traits::Actor;
use crate::event::{BoxedEvent, DefaultEvent, EventGroupId, EventType, SendOptions};
use crate::inbox::{DequeueStatus, EnqueueStatus, Inbox, PendingReceive};
use crate::log::LogSink;
use crate::statemachine::{ActionEffects, DispatchOutcome, StateMachineDef, StateMachineInstance};
use crate::util::ActorId;

fn collect_timer_commands(effects: &ActionEffects, out: &mut Vec<TimerCommand>) {
    for &(timer_id, period) in &effects.timer_starts {
        out.push(TimerCommand::Start { timer_id, period });
    }
    for &timer_id in &effects.timer_stops {
        out.push(TimerCommand::Stop { timer_id });
    }
}

/// What happened during one [`ActorRuntime::step`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// An event was dispatched and the actor is still alive.
    Handled,
    /// The inbox has nothing runnable; the actor is now `Idle`.
    Idle,
    /// The dispatched action issued `ReceiveAsync(types)` and no queued
    /// event satisfied it; the handler loop is suspended until one does
    /// (§4.1, §4.5 `AwaitingReceive`).
    Waiting(Vec<EventType>),
    /// `Halt` reached the base frame; housekeeping has completed.
    Halted,
}

/// `StartPeriodicTimer`/`StopTimer` requests surfaced out of a [`Self::step`]
/// call; the handler loop owns the actor's mailbox sender and so is the one
/// that can actually arm or cancel the underlying mock timer task (§4.4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerCommand {
    Start { timer_id: u64, period: Duration },
    Stop { timer_id: u64 },
}

/// Owns one actor's inbox, state machine and lifecycle, and drives its
/// handler loop (§4.2).
pub struct ActorRuntime<A: Actor> {
    actor: A,
    inbox: Inbox,
    machine: StateMachineInstance,
    lifecycle: ActorLifecycle,
    label: String,
}

impl<A: Actor> ActorRuntime<A> {
    pub fn new(actor: A, def: Arc<StateMachineDef>, label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            actor,
            inbox: Inbox::new(label.clone()),
            machine: StateMachineInstance::new(def, label.clone()),
            lifecycle: ActorLifecycle::new(),
            label,
        }
    }

    /// Attach the §6 log surface; call before [`Self::initialize`]. Threads
    /// straight through to the underlying state machine and inbox so
    /// `EnterState`/`ExitState`/`ExecuteAction`/... and
    /// `EnqueueEvent`/`DequeueEvent`/... records reach the same sink.
    pub fn with_log(mut self, log: Arc<dyn LogSink>, actor: ActorId) -> Self {
        self.machine.attach_log(log.clone(), actor.clone());
        self.inbox.attach_log(log, actor);
        self
    }

    pub fn lifecycle(&self) -> &ActorLifecycle {
        &self.lifecycle
    }

    pub fn actor(&self) -> &A {
        &self.actor
    }

    pub fn actor_mut(&mut self) -> &mut A {
        &mut self.actor
    }

    pub fn inbox_mut(&mut self) -> &mut Inbox {
        &mut self.inbox
    }

    pub fn inbox(&self) -> &Inbox {
        &self.inbox
    }

    /// Enqueue an event for this actor (§4.1 `Enqueue`).
    pub fn enqueue(
        &mut self,
        event: BoxedEvent,
        group: Option<EventGroupId>,
        options: SendOptions,
    ) -> Result<EnqueueStatus, ActorRuntimeError<A::Error>> {
        Ok(self.inbox.enqueue(event, group, options)?)
    }

    /// `Initialize(initial_event)` (§4.4 `CreateActor` step 3), followed by
    /// the start state's entry action.
    pub async fn initialize(
        &mut self,
        initial_event: Option<BoxedEvent>,
    ) -> Result<(), ActorRuntimeError<A::Error>> {
        self.lifecycle.transition_to(ActorState::Initializing);
        self.actor
            .initialize(initial_event.as_deref().map(|e| e.as_ref()))
            .await
            .map_err(ActorRuntimeError::Action)?;
        self.machine.enter_start(&mut self.actor)?;
        self.inbox.sync_policy(
            self.machine.deferred_types(),
            self.machine.ignored_types(),
            self.machine.has_default_handler(),
        );
        self.lifecycle.transition_to(ActorState::Idle);
        Ok(())
    }

    pub fn receive_async(
        &mut self,
        pending: PendingReceive,
    ) -> Result<Option<crate::event::EventEnvelope>, ActorRuntimeError<A::Error>> {
        Ok(self.inbox.receive_async(pending)?)
    }

    /// Drain exactly one event (or the synthesized `Default`) from the
    /// inbox and dispatch it. Returns [`StepOutcome::Idle`] without doing
    /// any work if nothing is runnable. Any `StartPeriodicTimer`/`StopTimer`
    /// requests the dispatched action made are returned alongside for the
    /// caller to act on, since only it holds the actor's mailbox sender.
    pub async fn step(&mut self) -> Result<(StepOutcome, Vec<TimerCommand>), ActorRuntimeError<A::Error>> {
        if self.lifecycle.state() == ActorState::Halted {
            return Ok((StepOutcome::Halted, Vec::new()));
        }

        let envelope = if let Some(raised) = self.inbox.take_raised() {
            trace!(actor = %self.label, "dispatching raised event");
            Some(raised)
        } else {
            let (envelope, status) = self.inbox.dequeue();
            match status {
                DequeueStatus::NotAvailable => {
                    self.lifecycle.transition_to(ActorState::Idle);
                    return Ok((StepOutcome::Idle, Vec::new()));
                }
                DequeueStatus::Default => Some(crate::event::EventEnvelope::new(
                    Box::new(DefaultEvent),
                    None,
                    SendOptions::new(),
                )),
                DequeueStatus::Success => envelope,
            }
        };

        let Some(envelope) = envelope else {
            self.lifecycle.transition_to(ActorState::Idle);
            return Ok((StepOutcome::Idle, Vec::new()));
        };

        self.lifecycle.transition_to(ActorState::Running);
        let event = envelope.into_event();
        let (mut outcome, mut effects) = self.machine.dispatch(event.as_ref(), &mut self.actor)?;
        let mut timer_cmds = Vec::new();

        // `ReceiveAsync(types)` (§4.1): a matching event already queued
        // completes it synchronously, re-entering dispatch with it; nothing
        // queued suspends the handler loop instead.
        while let Some(types) = effects.receive_request.take() {
            collect_timer_commands(&effects, &mut timer_cmds);
            let pending = PendingReceive::new(types.clone(), None);
            match self.inbox.receive_async(pending)? {
                Some(matched) => {
                    trace!(actor = %self.label, "receive satisfied synchronously");
                    if let Some((raised_event, raised_group)) = effects.raised.take() {
                        self.inbox.raise_event(raised_event, raised_group);
                    }
                    let matched_event = matched.into_event();
                    let (o, e) = self.machine.dispatch(matched_event.as_ref(), &mut self.actor)?;
                    outcome = o;
                    effects = e;
                }
                None => {
                    if let Some((raised_event, raised_group)) = effects.raised.take() {
                        self.inbox.raise_event(raised_event, raised_group);
                    }
                    self.inbox.sync_policy(
                        self.machine.deferred_types(),
                        self.machine.ignored_types(),
                        self.machine.has_default_handler(),
                    );
                    trace!(actor = %self.label, "suspended on receive");
                    return Ok((StepOutcome::Waiting(types), timer_cmds));
                }
            }
        }
        collect_timer_commands(&effects, &mut timer_cmds);

        if let Some((raised_event, raised_group)) = effects.raised {
            self.inbox.raise_event(raised_event, raised_group);
        }
        self.inbox.sync_policy(
            self.machine.deferred_types(),
            self.machine.ignored_types(),
            self.machine.has_default_handler(),
        );

        match outcome {
            DispatchOutcome::Handled => Ok((StepOutcome::Handled, timer_cmds)),
            DispatchOutcome::Halted => {
                let outcome = self.finish_halt().await?;
                Ok((outcome, timer_cmds))
            }
        }
    }

    async fn finish_halt(&mut self) -> Result<StepOutcome, ActorRuntimeError<A::Error>> {
        self.lifecycle.transition_to(ActorState::Halting);
        self.actor.on_halt(None).await;
        let (dropped, violation) = self.inbox.flush_on_halt();
        for entry in dropped {
            debug!(actor = %self.label, event_type = %entry.event_type, must_handle = entry.was_must_handle, "event dropped on halt");
            self.actor.on_event_dropped(entry.event_type);
        }
        self.lifecycle.transition_to(ActorState::Halted);
        if let Some(err) = violation {
            return Err(err.into());
        }
        Ok(StepOutcome::Halted)
    }
}
