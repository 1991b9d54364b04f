//! Zero-overhead [`LogSink`] for production use where the structured log
//! surface isn't consumed.

use super::error::LogError;
use super::traits::LogSink;
use super::types::{LogEntry, LogRecord};

/// Discards every record with zero overhead (§A.1).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogSink;

impl NoopLogSink {
    #[inline(always)]
    pub fn new() -> Self {
        Self
    }
}

impl LogSink for NoopLogSink {
    #[inline(always)]
    fn record(&self, _record: LogRecord) -> Result<(), LogError> {
        Ok(())
    }

    #[inline(always)]
    fn entries(&self) -> Vec<LogEntry> {
        Vec::new()
    }
}
