//! Shared reader/writer bookkeeping for controlled collections (§4.7).
//!
//! Composition, not inheritance: each wrapper in this module owns a
//! [`Controlled<T>`] rather than a container subclass. The scheduling point
//! lands *between* the counter bump and its matching decrement so that a
//! deterministic exploration can actually land on the interleaving the
//! counters are there to police.

// Layer 1: Standard library imports
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::collections::errors::DataRace;
use crate::scheduler::{OperationId, Scheduler};

use tracing::warn;

/// Wraps an inner container with `reader_count` / `writer_count` counters
/// and the collection's name, used only for [`DataRace`] messages.
pub struct Controlled<T> {
    inner: Mutex<T>,
    reader_count: AtomicI64,
    writer_count: AtomicI64,
    name: &'static str,
}

impl<T> Controlled<T> {
    pub fn new(name: &'static str, value: T) -> Self {
        Self {
            inner: Mutex::new(value),
            reader_count: AtomicI64::new(0),
            writer_count: AtomicI64::new(0),
            name,
        }
    }

    fn begin_read(&self) -> Result<(), DataRace> {
        self.reader_count.fetch_add(1, Ordering::SeqCst);
        if self.writer_count.load(Ordering::SeqCst) > 0 {
            self.reader_count.fetch_sub(1, Ordering::SeqCst);
            warn!(collection = self.name, "data race: read while writer active");
            return Err(DataRace::new(self.name));
        }
        Ok(())
    }

    fn end_read(&self) {
        self.reader_count.fetch_sub(1, Ordering::SeqCst);
    }

    fn begin_write(&self) -> Result<(), DataRace> {
        let previous = self.writer_count.fetch_add(1, Ordering::SeqCst);
        if previous > 0 || self.reader_count.load(Ordering::SeqCst) > 0 {
            self.writer_count.fetch_sub(1, Ordering::SeqCst);
            warn!(collection = self.name, "data race: concurrent writer or reader active");
            return Err(DataRace::new(self.name));
        }
        Ok(())
    }

    fn end_write(&self) {
        self.writer_count.fetch_sub(1, Ordering::SeqCst);
    }

    /// Run `f` against the inner container as a read: bump `reader_count`,
    /// yield to the scheduler, run `f`, then release.
    pub async fn read<R>(
        &self,
        scheduler: &Scheduler,
        op: OperationId,
        f: impl FnOnce(&T) -> R,
    ) -> Result<R, DataRace> {
        self.begin_read()?;
        let _ = scheduler.schedule_next(op).await;
        let result = f(&self.inner.lock().expect("controlled collection poisoned"));
        self.end_read();
        Ok(result)
    }

    /// Run `f` against the inner container as a write: bump `writer_count`,
    /// yield to the scheduler, run `f`, then release.
    pub async fn write<R>(
        &self,
        scheduler: &Scheduler,
        op: OperationId,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<R, DataRace> {
        self.begin_write()?;
        let _ = scheduler.schedule_next(op).await;
        let result = f(&mut self.inner.lock().expect("controlled collection poisoned"));
        self.end_write();
        Ok(result)
    }

    /// An uncontrolled peek, bypassing the scheduler entirely. Used only by
    /// the uncontrolled execution context (§4.4) and by tests.
    pub fn read_uncontrolled<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.lock().expect("controlled collection poisoned"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{DfsOracle, OperationKind};

    #[tokio::test]
    async fn read_and_write_round_trip() {
        let scheduler = Scheduler::new(Box::new(DfsOracle::new()), Box::new(DfsOracle::new()));
        let op = scheduler.register(OperationKind::Create).await;
        let controlled = Controlled::new("test", 0i32);
        controlled.write(&scheduler, op, |v| *v += 1).await.unwrap();
        let value = controlled.read(&scheduler, op, |v| *v).await.unwrap();
        assert_eq!(value, 1);
    }

    #[test]
    fn concurrent_writers_are_rejected() {
        let controlled = Controlled::new("test", 0i32);
        assert!(controlled.begin_write().is_ok());
        assert!(controlled.begin_write().is_err());
        controlled.end_write();
    }

    #[test]
    fn writer_excludes_readers() {
        let controlled = Controlled::new("test", 0i32);
        assert!(controlled.begin_write().is_ok());
        assert!(controlled.begin_read().is_err());
        controlled.end_write();
        assert!(controlled.begin_read().is_ok());
        controlled.end_read();
    }
}
