//! A controlled ordered sequence (§4.7).

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::collections::errors::DataRace;
use crate::collections::guard::Controlled;
use crate::scheduler::{OperationId, Scheduler};

/// A `Vec` wrapper that asserts data-race-freedom and inserts a scheduling
/// point on every access (§4.7).
pub struct ControlledSeq<T> {
    inner: Controlled<Vec<T>>,
}

impl<T: Clone> ControlledSeq<T> {
    pub fn new() -> Self {
        Self {
            inner: Controlled::new("Seq", Vec::new()),
        }
    }

    pub async fn push(&self, scheduler: &Scheduler, op: OperationId, value: T) -> Result<(), DataRace> {
        self.inner.write(scheduler, op, move |seq| seq.push(value)).await
    }

    pub async fn pop(&self, scheduler: &Scheduler, op: OperationId) -> Result<Option<T>, DataRace> {
        self.inner.write(scheduler, op, |seq| seq.pop()).await
    }

    pub async fn get(&self, scheduler: &Scheduler, op: OperationId, index: usize) -> Result<Option<T>, DataRace> {
        self.inner.read(scheduler, op, move |seq| seq.get(index).cloned()).await
    }

    pub async fn len(&self, scheduler: &Scheduler, op: OperationId) -> Result<usize, DataRace> {
        self.inner.read(scheduler, op, |seq| seq.len()).await
    }
}

impl<T: Clone> Default for ControlledSeq<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{DfsOracle, OperationKind};

    #[tokio::test]
    async fn push_then_pop_is_lifo() {
        let scheduler = Scheduler::new(Box::new(DfsOracle::new()), Box::new(DfsOracle::new()));
        let op = scheduler.register(OperationKind::Create).await;
        let seq: ControlledSeq<i32> = ControlledSeq::new();
        seq.push(&scheduler, op, 1).await.unwrap();
        seq.push(&scheduler, op, 2).await.unwrap();
        assert_eq!(seq.pop(&scheduler, op).await.unwrap(), Some(2));
        assert_eq!(seq.len(&scheduler, op).await.unwrap(), 1);
    }
}
