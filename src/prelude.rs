//! Prelude module for convenient imports.
//!
//! Re-exports the types most actor/state-machine implementations need.
//! Import this module to get started quickly:
//!
//! ```rust
//! use conductor_rt::prelude::*;
//! ```

// Core actor system
pub use crate::actor::{Actor, ActorLifecycle, ActorRuntime, ActorRuntimeError, ActorState, StepOutcome, TimerCommand};

// Events
pub use crate::event::{
    downcast_event, BoxedEvent, DefaultEvent, Event, EventGroupId, EventType, GotoState, Halt, PushState, SendOptions, TimerElapsed,
    TimerInfo,
};

// Inbox
pub use crate::inbox::{DequeueStatus, EnqueueStatus, Inbox, InboxError};

// Hierarchical state machines
pub use crate::statemachine::{
    DispatchOutcome, HandlerDecl, HandlerKey, StateDef, StateId, StateMachineActions,
    StateMachineDef, StateMachineError, StateMachineInstance, TransitionContext,
};

// Monitors
pub use crate::monitor::{Monitor, MonitorError, MonitorOutcome};

// Scheduler
pub use crate::scheduler::{
    ControlledOperation, DfsOracle, OperationId, OperationKind, OperationStatus, RandomOracle,
    RandomOracleSource, Scheduler, SchedulerError, SchedulingOracle, WaitCondition,
};

// Execution context
pub use crate::context::{ContextError, ExecutionContext};

// Controlled collections
pub use crate::collections::{Controlled, ControlledMap, ControlledSeq, ControlledSet, DataRace};

// Configuration
pub use crate::config::{ConfigError, DelayRangeMs, RuntimeConfig, SchedulingStrategyKind};

// Log surface
pub use crate::log::{LogEntry, LogError, LogRecord, LogSink, NoopLogSink, VecLogSink};

// Utilities
pub use crate::util::{ActorId, ContextHandle};
