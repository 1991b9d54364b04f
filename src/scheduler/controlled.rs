//! The controlled scheduler: serializes every cooperative task through a
//! single scheduling lock and hands control to exactly one enabled
//! operation at a time (§4.5).

// Layer 1: Standard library imports
use std::collections::HashMap;
use std::sync::Arc;

// Layer 2: Third-party crate imports
use tokio::sync::{Mutex, Notify};
use tracing::{debug, trace};

// Layer 3: Internal module imports
use crate::scheduler::errors::SchedulerError;
use crate::scheduler::operation::{ControlledOperation, OperationId, OperationKind, OperationStatus};
use crate::scheduler::strategies::{RandomOracleSource, SchedulingOracle};

struct Registry {
    operations: HashMap<OperationId, ControlledOperation>,
    wakers: HashMap<OperationId, Arc<Notify>>,
}

/// Owns the registry of live [`ControlledOperation`]s and drives
/// `ScheduleNext` (§4.5). Only the controlled execution context talks to
/// this type; the uncontrolled context bypasses it entirely.
pub struct Scheduler {
    oracle: Box<dyn SchedulingOracle>,
    random: Box<dyn RandomOracleSource>,
    registry: Mutex<Registry>,
}

impl Scheduler {
    pub fn new(oracle: Box<dyn SchedulingOracle>, random: Box<dyn RandomOracleSource>) -> Self {
        Self {
            oracle,
            random,
            registry: Mutex::new(Registry {
                operations: HashMap::new(),
                wakers: HashMap::new(),
            }),
        }
    }

    /// Register a new cooperative task as a scheduling point (§4.5
    /// "immediately before every `CreateActor` registers the new op").
    pub async fn register(&self, kind: OperationKind) -> OperationId {
        let op = ControlledOperation::new(kind);
        let id = op.id();
        let mut registry = self.registry.lock().await;
        registry.operations.insert(id, op);
        registry.wakers.insert(id, Arc::new(Notify::new()));
        trace!(operation = ?id, "registered controlled operation");
        id
    }

    pub async fn set_status(&self, id: OperationId, status: OperationStatus) {
        let mut registry = self.registry.lock().await;
        if let Some(op) = registry.operations.get_mut(&id) {
            op.set_status(status);
        }
    }

    pub async fn complete(&self, id: OperationId) {
        self.set_status(id, OperationStatus::Completed).await;
    }

    /// `RandomBoolean` / `RandomInteger` (§4.5: "the scheduler invokes the
    /// strategy's random oracle ... the value is recorded for replay").
    pub fn random_bool(&self) -> Result<bool, SchedulerError> {
        self.random.next_bool()
    }

    pub fn random_int(&self, max: i64) -> Result<i64, SchedulerError> {
        self.random.next_int(max)
    }

    /// `ScheduleNext`: yields control, letting the strategy pick the next
    /// enabled operation; suspends the caller until it is chosen again
    /// (§4.5).
    pub async fn schedule_next(&self, calling: OperationId) -> Result<(), SchedulerError> {
        let (chosen, waker) = {
            let registry = self.registry.lock().await;
            let enabled: Vec<&ControlledOperation> = registry
                .operations
                .values()
                .filter(|op| op.is_enabled())
                .collect();

            if enabled.is_empty() {
                let blocked: Vec<String> = registry
                    .operations
                    .values()
                    .filter(|op| op.is_waiting())
                    .map(|op| op.label())
                    .collect();
                if blocked.is_empty() {
                    return Ok(());
                }
                return Err(SchedulerError::Deadlock { blocked });
            }

            let index = self.oracle.pick(&enabled)?;
            let chosen = enabled[index].id();
            let waker = registry
                .wakers
                .get(&chosen)
                .cloned()
                .ok_or_else(|| SchedulerError::Internal {
                    message: format!("no waker registered for operation {chosen:?}"),
                })?;
            (chosen, waker)
        };

        debug!(chosen = ?chosen, caller = ?calling, "scheduler picked next operation");

        if chosen == calling {
            return Ok(());
        }

        waker.notify_one();

        let my_waker = {
            let registry = self.registry.lock().await;
            registry
                .wakers
                .get(&calling)
                .cloned()
                .ok_or_else(|| SchedulerError::Internal {
                    message: format!("no waker registered for operation {calling:?}"),
                })?
        };
        my_waker.notified().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::strategies::DfsOracle;

    #[tokio::test]
    async fn schedule_next_returns_immediately_when_caller_is_only_enabled_op() {
        let scheduler = Scheduler::new(Box::new(DfsOracle::new()), Box::new(DfsOracle::new()));
        let id = scheduler.register(OperationKind::Create).await;
        scheduler.schedule_next(id).await.unwrap();
    }

    #[tokio::test]
    async fn schedule_next_reports_deadlock_when_nothing_is_enabled() {
        let scheduler = Scheduler::new(Box::new(DfsOracle::new()), Box::new(DfsOracle::new()));
        let id = scheduler.register(OperationKind::Create).await;
        scheduler
            .set_status(
                id,
                OperationStatus::Waiting(crate::scheduler::operation::WaitCondition::AwaitingReceive { types: vec![] }),
            )
            .await;
        let err = scheduler.schedule_next(id).await.unwrap_err();
        assert!(matches!(err, SchedulerError::Deadlock { .. }));
    }
}
