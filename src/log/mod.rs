//! The structured log surface (§6 "Log records", §A.1).
//!
//! [`LogRecord`] is the replayable, structured projection of runtime
//! activity — every inbox transition, scheduling decision and state-machine
//! step the controlled execution context performs. It is captured by a
//! [`LogSink`] and is distinct from the free-form `tracing` spans/events
//! emitted alongside it for human consumption.

pub mod error;
pub mod noop;
pub mod traits;
pub mod types;
pub mod vec;

pub use error::LogError;
pub use noop::NoopLogSink;
pub use traits::LogSink;
pub use types::{LogEntry, LogRecord};
pub use vec::VecLogSink;
