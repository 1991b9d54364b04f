//! The controlled scheduler (C7, §4.5).
//!
//! Every source of nondeterminism a program can observe — which actor runs
//! next, which branch a random choice takes — is routed through a
//! [`controlled::Scheduler`] rather than left to the OS or the async
//! runtime's own task scheduling. Strategy selection is pluggable, echoed
//! here in [`strategies`].

pub mod controlled;
pub mod errors;
pub mod operation;
pub mod replay;
pub mod strategies;

pub use controlled::Scheduler;
pub use errors::SchedulerError;
pub use operation::{ControlledOperation, OperationId, OperationKind, OperationStatus, WaitCondition};
pub use replay::{RandomKind, ReplayOracle, ScheduleTrace, TraceRecord};
pub use strategies::{DfsOracle, RandomOracle, RandomOracleSource, SchedulingOracle};
