//! # conductor-rt — a controlled-concurrency actor runtime
//!
//! A runtime for actor-style programs in which *every* source of
//! nondeterminism a program can observe — which actor runs next, which
//! branch a random choice takes, when a timer fires — is routed through a
//! central [`scheduler`]. User code is expressed as [`actor`]s
//! (single-threaded event handlers) and [`statemachine`]s (hierarchical
//! actors with push/pop state stacks, entry/exit actions and
//! event-triggered transitions) communicating exclusively by asynchronous
//! message passing through an [`inbox`]. A pluggable exploration strategy
//! drives the scheduler to systematically reproduce schedules, enabling
//! bug-finding, safety-property checking ([`monitor`]) and trace
//! ([`scheduler::replay`]).
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use conductor_rt::prelude::*;
//! use async_trait::async_trait;
//!
//! #[derive(Debug)]
//! struct Ping;
//!
//! struct Idle;
//!
//! #[derive(Default)]
//! struct PingActor;
//!
//! impl StateMachineActions for PingActor {
//!     fn invoke_entry(&mut self, _: &'static str, _: &mut TransitionContext) -> Result<(), StateMachineError> { Ok(()) }
//!     fn invoke_exit(&mut self, _: &'static str, _: &mut TransitionContext) -> Result<(), StateMachineError> { Ok(()) }
//!     fn invoke_action(&mut self, _: &'static str, _: &dyn Event, _: &mut TransitionContext) -> Result<(), StateMachineError> { Ok(()) }
//! }
//!
//! #[async_trait]
//! impl Actor for PingActor {
//!     type Error = std::convert::Infallible;
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let context = ExecutionContext::uncontrolled(0);
//!     // build a StateMachineDef, then context.create_actor(...).await
//! }
//! ```
//!
//! # Module Organization
//!
//! ## Core runtime (§3-4)
//! - [`event`] — event payloads and the runtime-type machinery used to route them (C1)
//! - [`inbox`] — per-actor FIFO queue with defer/ignore/must-handle/wildcard policy (C3)
//! - [`actor`] — the single-threaded actor handler loop (C4)
//! - [`statemachine`] — hierarchical state machines: handler-map merge, push/pop (C5)
//! - [`monitor`] — passive, synchronously-driven safety-property observers (C6)
//! - [`scheduler`] — the controlled scheduler and pluggable exploration strategies (C7)
//! - [`context`] — the execution context: actor registry, `CreateActor`/`SendEvent` (C8)
//! - [`collections`] — data-race-policed shared collections (C9)
//!
//! ## Ambient stack
//! - [`log`] — the structured, replayable log surface
//! - [`config`] — runtime configuration (scheduling strategy, iteration/step bounds)
//! - [`util`] — `ActorId`, `EventGroupId` and other small identifier types
//!
//! # Standards Compliance
//!
//! This crate follows the workspace conventions documented in `DESIGN.md`:
//! - 3-layer import organization (std → third-party → internal)
//! - `chrono::DateTime<Utc>` for all timestamps
//! - `thiserror` error enums at every module boundary
//! - `tracing` spans/events alongside the structured log surface

pub mod actor;
pub mod collections;
pub mod config;
pub mod context;
pub mod event;
pub mod inbox;
pub mod log;
pub mod monitor;
pub mod scheduler;
pub mod statemachine;
pub mod util;

pub mod prelude;

// Re-export commonly used types
pub use actor::{Actor, ActorLifecycle, ActorRuntime, ActorRuntimeError, ActorState, StepOutcome, TimerCommand};
pub use collections::{Controlled, ControlledMap, ControlledSeq, ControlledSet, DataRace};
pub use config::{ConfigError, DelayRangeMs, RuntimeConfig, SchedulingStrategyKind};
pub use context::{ContextError, ExecutionContext};
pub use event::{
    downcast_event, BoxedEvent, DefaultEvent, Event, EventGroupId, EventType, GotoState, Halt, PushState, SendOptions, TimerElapsed,
    TimerInfo,
};
pub use inbox::{DequeueStatus, EnqueueStatus, Inbox, InboxError};
pub use log::{LogEntry, LogError, LogRecord, LogSink, NoopLogSink, VecLogSink};
pub use monitor::{Monitor, MonitorError, MonitorOutcome};
pub use scheduler::{
    ControlledOperation, DfsOracle, OperationId, OperationKind, OperationStatus, RandomOracle,
    RandomOracleSource, Scheduler, SchedulerError, SchedulingOracle, WaitCondition,
};
pub use statemachine::{
    DispatchOutcome, HandlerDecl, HandlerKey, StateDef, StateId, StateMachineActions,
    StateMachineDef, StateMachineError, StateMachineInstance, TransitionContext,
};
pub use util::{ActorId, ContextHandle};
