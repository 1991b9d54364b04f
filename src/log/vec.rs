//! In-memory, order-preserving [`LogSink`] used by tests and the replay
//! differ (§A.1).

use parking_lot::Mutex;

use super::error::LogError;
use super::traits::LogSink;
use super::types::{LogEntry, LogRecord};

/// Collects every record into an in-process `Vec`, in arrival order. The
/// replay differ needs the full ordered sequence, not aggregate stats.
#[derive(Debug, Default)]
pub struct VecLogSink {
    entries: Mutex<Vec<LogEntry>>,
}

impl VecLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl LogSink for VecLogSink {
    fn record(&self, record: LogRecord) -> Result<(), LogError> {
        self.entries.lock().push(LogEntry::new(record));
        Ok(())
    }

    fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor() -> crate::util::ActorId {
        crate::util::ActorId::new("pkg::A", crate::util::ContextHandle::next())
    }

    #[test]
    fn records_accumulate_in_order() {
        let sink = VecLogSink::new();
        sink.record(LogRecord::CreateActor { actor: actor() }).unwrap();
        sink.record(LogRecord::Halt { actor: actor() }).unwrap();

        let entries = sink.entries();
        assert_eq!(entries.len(), 2);
        assert!(matches!(entries[0].record, LogRecord::CreateActor { .. }));
        assert!(matches!(entries[1].record, LogRecord::Halt { .. }));
    }

    #[test]
    fn clear_empties_the_sink() {
        let sink = VecLogSink::new();
        sink.record(LogRecord::Halt { actor: actor() }).unwrap();
        sink.clear();
        assert!(sink.is_empty());
    }
}
