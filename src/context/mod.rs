//! The execution context (C8, §4.4): registry of live actors, factory for
//! actor creation, router of `SendEvent`, and the integration point with
//! the scheduler and the log surface.
//!
//! Two usage modes share one type rather than two parallel trait
//! hierarchies (see `DESIGN.md` for the rationale): a `controlled` context
//! inserts the §4.5 scheduling points before `CreateActor` and `SendEvent`;
//! an uncontrolled one skips them and lets actor tasks free-run, each on
//! its own tokio task with its own mailbox.

pub mod errors;
pub mod failure;
pub mod registry;

// Layer 1: Standard library imports
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Layer 2: Third-party crate imports
use dashmap::DashMap;
use parking_lot::RwLock as PlRwLock;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

// Layer 3: Internal module imports
use crate::actor::{Actor, ActorRuntime, StepOutcome, TimerCommand};
use crate::event::{BoxedEvent, Event, EventGroupId, SendOptions, TimerElapsed, TimerInfo};
use crate::inbox::EnqueueStatus;
use crate::log::{LogRecord, LogSink, NoopLogSink};
use crate::monitor::Monitor;
use crate::scheduler::{OperationId, OperationKind, OperationStatus, RandomOracle, Scheduler, SchedulingOracle, WaitCondition};
use crate::statemachine::{StateMachineActions, StateMachineDef};
use crate::util::{ActorId, ContextHandle};

pub use errors::ContextError;
pub use failure::{FailureRecord, FailureSink};
pub use registry::{ActorCommand, ActorEntry, DynMonitor};

/// Registry of live actors (C8) plus the scheduler and log sink it shares
/// with everything it creates (§4.4).
pub struct ExecutionContext {
    handle: ContextHandle,
    controlled: bool,
    scheduler: Arc<Scheduler>,
    actors: DashMap<ActorId, ActorEntry>,
    names: DashMap<String, ActorId>,
    monitors: DashMap<TypeId, Box<dyn DynMonitor>>,
    log: PlRwLock<Arc<dyn LogSink>>,
    failures: Arc<FailureSink>,
}

impl ExecutionContext {
    /// A controlled (testing) context: every `CreateActor` / `SendEvent`
    /// passes through the scheduler (§4.5).
    pub fn controlled(oracle: Box<dyn SchedulingOracle>, seed: u64) -> Self {
        Self::new(true, Arc::new(Scheduler::new(oracle, Box::new(RandomOracle::new(seed)))))
    }

    /// An uncontrolled context: actor tasks free-run on the tokio pool
    /// (§4.4 "two variants of the context coexist").
    pub fn uncontrolled(seed: u64) -> Self {
        Self::new(
            false,
            Arc::new(Scheduler::new(
                Box::new(crate::scheduler::DfsOracle::new()),
                Box::new(RandomOracle::new(seed)),
            )),
        )
    }

    fn new(controlled: bool, scheduler: Arc<Scheduler>) -> Self {
        Self {
            handle: ContextHandle::next(),
            controlled,
            scheduler,
            actors: DashMap::new(),
            names: DashMap::new(),
            monitors: DashMap::new(),
            log: PlRwLock::new(Arc::new(NoopLogSink::new())),
            failures: Arc::new(FailureSink::new()),
        }
    }

    pub fn handle(&self) -> ContextHandle {
        self.handle
    }

    pub fn is_controlled(&self) -> bool {
        self.controlled
    }

    /// `RegisterLog` (§4.4).
    pub fn register_log(&self, sink: Arc<dyn LogSink>) {
        *self.log.write() = sink;
    }

    /// Every actor failure reported so far (§7 `OnFailure`): an
    /// `initialize`/`step` error a spawned actor task raised, in report
    /// order.
    pub fn failures(&self) -> Vec<FailureRecord> {
        self.failures.failures()
    }

    /// Whether any actor has failed since this context was created.
    pub fn has_failed(&self) -> bool {
        self.failures.has_failed()
    }

    /// Install the `OnFailure` hook (§7): invoked synchronously on the
    /// failing actor's own task, once per failure.
    pub fn on_failure(&self, hook: impl Fn(&FailureRecord) + Send + Sync + 'static) {
        self.failures.on_failure(hook);
    }

    fn log(&self, record: LogRecord) {
        if let Err(err) = self.log.read().record(record) {
            warn!(error = %err, "failed to record log entry");
        }
    }

    /// `CreateActorIdFromName`: interns a name so repeated calls return the
    /// same id (§3 "ActorId").
    pub fn actor_id_from_name(&self, name: &str, type_name: &'static str) -> ActorId {
        if let Some(existing) = self.names.get(name) {
            return existing.clone();
        }
        let id = ActorId::named(Arc::from(name), type_name, self.handle);
        self.names.insert(name.to_string(), id.clone());
        id
    }

    /// `Assert(condition, message)` (§4.4).
    pub fn assert(&self, condition: bool, message: impl Into<String>) -> Result<(), ContextError> {
        if condition {
            Ok(())
        } else {
            Err(ContextError::Assertion { message: message.into() })
        }
    }

    /// `RandomBoolean(max=2)` (§4.4, §4.5: recorded for replay regardless of
    /// whether this context is controlled).
    pub async fn random_boolean(&self, caller: OperationId) -> Result<bool, ContextError> {
        if self.controlled {
            self.scheduler.schedule_next(caller).await?;
        }
        let value = self.scheduler.random_bool()?;
        self.log(LogRecord::Random {
            actor: ActorId::new("bool", self.handle),
            value: value as i64,
            caller: "RandomBoolean",
        });
        Ok(value)
    }

    /// `RandomInteger(max)` (§4.4).
    pub async fn random_integer(&self, caller: OperationId, max: i64) -> Result<i64, ContextError> {
        if self.controlled {
            self.scheduler.schedule_next(caller).await?;
        }
        let value = self.scheduler.random_int(max)?;
        self.log(LogRecord::Random {
            actor: ActorId::new("int", self.handle),
            value,
            caller: "RandomInteger",
        });
        Ok(value)
    }

    /// `RegisterMonitor<T>` (§4.6): instantiated once, keyed by the monitor
    /// action type.
    pub fn register_monitor<T>(&self, actions: T, def: Arc<StateMachineDef>, name: impl Into<String>) -> Result<(), ContextError>
    where
        T: StateMachineActions + Send + 'static,
    {
        let monitor = Monitor::new(actions, def, name)?;
        self.monitors
            .insert(TypeId::of::<T>(), Box::new(std::sync::Mutex::new(monitor)));
        Ok(())
    }

    /// `Monitor<T>(e)` (§4.6): runs synchronously on the calling task.
    pub fn observe<T: 'static>(&self, event: &dyn Event) -> Result<crate::monitor::MonitorOutcome, ContextError> {
        let entry = self.monitors.get(&TypeId::of::<T>()).ok_or(ContextError::UnknownMonitor)?;
        Ok(entry.observe_dyn(event)?)
    }

    /// `CreateActor(type, name?, id?, initial_event?, group?)` (§4.4).
    pub async fn create_actor<A: Actor>(
        &self,
        actor: A,
        def: Arc<StateMachineDef>,
        name: Option<&str>,
        initial_event: Option<BoxedEvent>,
        caller: OperationId,
    ) -> Result<ActorId, ContextError> {
        let type_name = std::any::type_name::<A>();
        let id = match name {
            Some(name) => self.actor_id_from_name(name, type_name),
            None => ActorId::new(type_name, self.handle),
        };
        self.create_actor_by_id(id.clone(), actor, def, initial_event, caller).await?;
        Ok(id)
    }

    /// `CreateActorById`: same as `CreateActor` but the id is already known
    /// (e.g. minted via [`Self::actor_id_from_name`]) (§4.4 step 1: "if
    /// supplied, assert not already bound").
    pub async fn create_actor_by_id<A: Actor>(
        &self,
        id: ActorId,
        actor: A,
        def: Arc<StateMachineDef>,
        initial_event: Option<BoxedEvent>,
        caller: OperationId,
    ) -> Result<(), ContextError> {
        if self.controlled {
            self.scheduler.schedule_next(caller).await?;
        }
        if self.actors.contains_key(&id) {
            return Err(ContextError::DuplicateActorId { id: id.to_string() });
        }

        let op = self.scheduler.register(OperationKind::Actor(id.clone())).await;
        let (tx, rx) = mpsc::unbounded_channel();
        let self_tx = tx.clone();
        let halted = Arc::new(AtomicBool::new(false));

        self.log(LogRecord::CreateActor { actor: id.clone() });
        self.log(LogRecord::CreateStateMachine { actor: id.clone() });

        self.actors.insert(
            id.clone(),
            ActorEntry {
                tx,
                op,
                halted: halted.clone(),
                type_name: std::any::type_name::<A>(),
            },
        );

        let log = self.log.read().clone();
        let runtime = ActorRuntime::new(actor, def, id.to_string()).with_log(log.clone(), id.clone());
        let scheduler = self.scheduler.clone();
        let controlled = self.controlled;
        let failures = self.failures.clone();
        let label = id.to_string();
        let actor_id = id.clone();

        tokio::spawn(async move {
            run_actor_task(
                runtime, rx, self_tx, op, scheduler, controlled, halted, log, failures, actor_id, label, initial_event,
            )
            .await;
        });

        Ok(())
    }

    /// `SendEvent(target, e, group?, options?)` (§4.4).
    pub async fn send_event(
        &self,
        target: &ActorId,
        event: BoxedEvent,
        group: Option<EventGroupId>,
        options: SendOptions,
        caller: OperationId,
    ) -> Result<EnqueueStatus, ContextError> {
        if self.controlled {
            self.scheduler.schedule_next(caller).await?;
        }

        let event_type = event.event_type();
        let Some(entry) = self.actors.get(target) else {
            self.log(LogRecord::DroppedEvent {
                actor: target.clone(),
                event_type,
                must_handle: options.is_must_handle(),
            });
            if options.is_must_handle() {
                return Err(ContextError::UnknownActor { id: target.to_string() });
            }
            return Ok(EnqueueStatus::Dropped);
        };

        if entry.is_halted() {
            self.log(LogRecord::DroppedEvent {
                actor: target.clone(),
                event_type,
                must_handle: options.is_must_handle(),
            });
            if options.is_must_handle() {
                return Err(ContextError::ActorHalted { id: target.to_string() });
            }
            return Ok(EnqueueStatus::Dropped);
        }

        self.log(LogRecord::SendEvent {
            from: None,
            to: target.clone(),
            event_type,
        });

        let (reply_tx, reply_rx) = oneshot::channel();
        entry
            .tx
            .send(ActorCommand::Deliver {
                event,
                group,
                options,
                reply: reply_tx,
                quiescent: None,
            })
            .ok();
        reply_rx.await.map_err(|_| ContextError::UnknownActor { id: target.to_string() })
    }

    /// `SendEventAndExecute`: like [`Self::send_event`], but suspends the
    /// caller until the target's triggered drain reaches quiescence (§4.4).
    pub async fn send_event_and_execute(
        &self,
        target: &ActorId,
        event: BoxedEvent,
        group: Option<EventGroupId>,
        options: SendOptions,
        caller: OperationId,
    ) -> Result<EnqueueStatus, ContextError> {
        if self.controlled {
            self.scheduler.schedule_next(caller).await?;
        }

        let Some(entry) = self.actors.get(target) else {
            return Ok(EnqueueStatus::Dropped);
        };
        if entry.is_halted() {
            return Ok(EnqueueStatus::Dropped);
        }

        let (reply_tx, reply_rx) = oneshot::channel();
        let (quiescent_tx, quiescent_rx) = oneshot::channel();
        entry
            .tx
            .send(ActorCommand::Deliver {
                event,
                group,
                options,
                reply: reply_tx,
                quiescent: Some(quiescent_tx),
            })
            .ok();
        let status = reply_rx.await.map_err(|_| ContextError::UnknownActor { id: target.to_string() })?;

        if self.controlled {
            self.scheduler
                .set_status(caller, OperationStatus::Waiting(WaitCondition::AwaitingQuiescence { other: entry.op }))
                .await;
        }
        let _ = quiescent_rx.await;
        if self.controlled {
            self.scheduler.set_status(caller, OperationStatus::Enabled).await;
        }
        Ok(status)
    }

    /// `Stop` (§4.4, §5 "Cancellation and timeout"): marks every live
    /// operation `Completed` and asks every actor task to exit.
    pub async fn stop(&self) {
        for entry in self.actors.iter() {
            self.scheduler.complete(entry.op).await;
            let _ = entry.tx.send(ActorCommand::Stop);
        }
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    pub fn is_halted(&self, id: &ActorId) -> bool {
        self.actors.get(id).map(|e| e.is_halted()).unwrap_or(true)
    }
}

/// Arms (or cancels) the mock timers a dispatched action requested,
/// self-delivering `TimerElapsed` through the actor's own mailbox each time
/// the period elapses (§4.4 `StartPeriodicTimer`/`StopTimer`, §5 "no
/// real-time guarantee" — these run on the tokio clock, not the scheduler).
fn apply_timer_commands(cmds: Vec<TimerCommand>, timers: &mut HashMap<u64, JoinHandle<()>>, self_tx: &mpsc::UnboundedSender<ActorCommand>) {
    for cmd in cmds {
        match cmd {
            TimerCommand::Start { timer_id, period } => {
                let tx = self_tx.clone();
                let handle = tokio::spawn(async move {
                    loop {
                        tokio::time::sleep(period).await;
                        let (reply_tx, _reply_rx) = oneshot::channel();
                        let sent = tx.send(ActorCommand::Deliver {
                            event: Box::new(TimerElapsed(TimerInfo { timer_id, period: Some(period) })),
                            group: None,
                            options: SendOptions::new(),
                            reply: reply_tx,
                            quiescent: None,
                        });
                        if sent.is_err() {
                            break;
                        }
                    }
                });
                if let Some(old) = timers.insert(timer_id, handle) {
                    old.abort();
                }
            }
            TimerCommand::Stop { timer_id } => {
                if let Some(handle) = timers.remove(&timer_id) {
                    handle.abort();
                }
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_actor_task<A: Actor>(
    mut runtime: ActorRuntime<A>,
    mut rx: mpsc::UnboundedReceiver<ActorCommand>,
    self_tx: mpsc::UnboundedSender<ActorCommand>,
    op: OperationId,
    scheduler: Arc<Scheduler>,
    controlled: bool,
    halted: Arc<AtomicBool>,
    log: Arc<dyn LogSink>,
    failures: Arc<FailureSink>,
    actor_id: ActorId,
    label: String,
    initial_event: Option<BoxedEvent>,
) {
    let mut timers: HashMap<u64, JoinHandle<()>> = HashMap::new();
    let abort_timers = |timers: &mut HashMap<u64, JoinHandle<()>>| {
        for (_, handle) in timers.drain() {
            handle.abort();
        }
    };

    let record_termination = |status: &str| {
        let _ = log.record(LogRecord::EventHandlerTerminated {
            actor: actor_id.clone(),
            status: status.to_string(),
        });
    };
    let record_failure = |message: String| {
        failures.record(FailureRecord { actor: actor_id.clone(), message });
    };

    if let Err(err) = runtime.initialize(initial_event).await {
        warn!(actor = %label, error = ?err, "actor initialization failed");
        record_failure(err.to_string());
        halted.store(true, Ordering::Release);
        scheduler.complete(op).await;
        record_termination("initialization failed");
        return;
    }

    while let Some(cmd) = rx.recv().await {
        match cmd {
            ActorCommand::Deliver { event, group, options, reply, quiescent } => {
                let status = match runtime.enqueue(event, group, options) {
                    Ok(status) => status,
                    Err(err) => {
                        warn!(actor = %label, error = ?err, "enqueue failed");
                        record_failure(err.to_string());
                        let _ = reply.send(EnqueueStatus::Dropped);
                        if let Some(q) = quiescent {
                            let _ = q.send(());
                        }
                        continue;
                    }
                };
                let _ = reply.send(status);

                if matches!(status, EnqueueStatus::ReceiveSatisfied) {
                    scheduler.set_status(op, OperationStatus::Enabled).await;
                }

                if matches!(status, EnqueueStatus::EnqueuedAndStarted | EnqueueStatus::ReceiveSatisfied) {
                    let mut first_dequeue = true;
                    loop {
                        if controlled && !first_dequeue {
                            let _ = scheduler.schedule_next(op).await;
                        }
                        first_dequeue = false;

                        match runtime.step().await {
                            Ok((StepOutcome::Handled, timer_cmds)) => {
                                apply_timer_commands(timer_cmds, &mut timers, &self_tx);
                                continue;
                            }
                            Ok((StepOutcome::Idle, timer_cmds)) => {
                                apply_timer_commands(timer_cmds, &mut timers, &self_tx);
                                break;
                            }
                            Ok((StepOutcome::Waiting(types), timer_cmds)) => {
                                apply_timer_commands(timer_cmds, &mut timers, &self_tx);
                                debug!(actor = %label, "actor suspended on receive");
                                scheduler
                                    .set_status(op, OperationStatus::Waiting(WaitCondition::AwaitingReceive { types }))
                                    .await;
                                break;
                            }
                            Ok((StepOutcome::Halted, timer_cmds)) => {
                                apply_timer_commands(timer_cmds, &mut timers, &self_tx);
                                debug!(actor = %label, "actor halted");
                                abort_timers(&mut timers);
                                halted.store(true, Ordering::Release);
                                scheduler.complete(op).await;
                                record_termination("halted");
                                if let Some(q) = quiescent {
                                    let _ = q.send(());
                                }
                                return;
                            }
                            Err(err) => {
                                warn!(actor = %label, error = ?err, "actor step failed");
                                record_failure(err.to_string());
                                abort_timers(&mut timers);
                                halted.store(true, Ordering::Release);
                                scheduler.complete(op).await;
                                record_termination("error");
                                if let Some(q) = quiescent {
                                    let _ = q.send(());
                                }
                                return;
                            }
                        }
                    }
                }

                if let Some(q) = quiescent {
                    let _ = q.send(());
                }
            }
            ActorCommand::Stop => {
                abort_timers(&mut timers);
                halted.store(true, Ordering::Release);
                scheduler.complete(op).await;
                record_termination("stopped");
                return;
            }
        }
    }

    abort_timers(&mut timers);
}
