//! Pluggable scheduling and random oracles (§4.5, §A.3).
//!
//! Picking an actual exploration algorithm is out of this repository's
//! scope (§1 "Non-goals"); what's specified is the interface the controlled
//! context drives. `RandomOracle` and `DfsOracle` are the two strategies
//! shipped here, sufficient to exercise the scheduler end to end and to
//! drive the deadlock/replay tests.

// Layer 1: Standard library imports
use std::sync::Mutex;

// Layer 2: Third-party crate imports
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// Layer 3: Internal module imports
use crate::scheduler::errors::SchedulerError;
use crate::scheduler::operation::ControlledOperation;

/// Picks the next enabled operation to resume. Pure with respect to
/// scheduler state: given the same enabled set (and, for stateful
/// strategies, the same internal state), it returns the same pick.
pub trait SchedulingOracle: Send + Sync {
    /// Returns the index, into `enabled`, of the operation to resume.
    /// `enabled` is never empty — the caller only invokes this when at
    /// least one operation is runnable. Fallible so a [`ReplayOracle`](
    /// crate::scheduler::replay::ReplayOracle) can report a diverged trace
    /// instead of panicking the calling task.
    fn pick(&self, enabled: &[&ControlledOperation]) -> Result<usize, SchedulerError>;
}

/// Produces the nondeterministic boolean/integer values `RandomBoolean` /
/// `RandomInteger` return, recording each for replay (§4.5 "Program
/// counter"). Fallible for the same reason as [`SchedulingOracle::pick`].
pub trait RandomOracleSource: Send + Sync {
    fn next_bool(&self) -> Result<bool, SchedulerError>;
    fn next_int(&self, max: i64) -> Result<i64, SchedulerError>;
}

/// Uniformly-random scheduling and random-value oracle, seeded for
/// reproducibility (§A.3).
pub struct RandomOracle {
    rng: Mutex<StdRng>,
}

impl RandomOracle {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl SchedulingOracle for RandomOracle {
    fn pick(&self, enabled: &[&ControlledOperation]) -> Result<usize, SchedulerError> {
        let mut rng = self.rng.lock().expect("scheduler rng poisoned");
        Ok(rng.gen_range(0..enabled.len()))
    }
}

impl RandomOracleSource for RandomOracle {
    fn next_bool(&self) -> Result<bool, SchedulerError> {
        let mut rng = self.rng.lock().expect("scheduler rng poisoned");
        Ok(rng.gen_bool(0.5))
    }

    fn next_int(&self, max: i64) -> Result<i64, SchedulerError> {
        let mut rng = self.rng.lock().expect("scheduler rng poisoned");
        Ok(rng.gen_range(0..=max.max(0)))
    }
}

/// Deterministic, always-first-enabled-operation strategy used to explore
/// schedules depth-first (§A.3).
#[derive(Debug, Default)]
pub struct DfsOracle;

impl DfsOracle {
    pub fn new() -> Self {
        Self
    }
}

impl SchedulingOracle for DfsOracle {
    fn pick(&self, _enabled: &[&ControlledOperation]) -> Result<usize, SchedulerError> {
        Ok(0)
    }
}

impl RandomOracleSource for DfsOracle {
    fn next_bool(&self) -> Result<bool, SchedulerError> {
        Ok(false)
    }

    fn next_int(&self, _max: i64) -> Result<i64, SchedulerError> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::operation::OperationKind;

    #[test]
    fn dfs_oracle_always_picks_first() {
        let oracle = DfsOracle::new();
        let a = ControlledOperation::new(OperationKind::Create);
        let b = ControlledOperation::new(OperationKind::Stop);
        let refs = vec![&a, &b];
        assert_eq!(oracle.pick(&refs).unwrap(), 0);
    }

    #[test]
    fn random_oracle_picks_within_bounds() {
        let oracle = RandomOracle::new(42);
        let a = ControlledOperation::new(OperationKind::Create);
        let b = ControlledOperation::new(OperationKind::Stop);
        let c = ControlledOperation::new(OperationKind::Join);
        let refs = vec![&a, &b, &c];
        for _ in 0..20 {
            assert!(oracle.pick(&refs).unwrap() < 3);
        }
    }

    #[test]
    fn random_oracle_is_seed_reproducible() {
        let one = RandomOracle::new(7);
        let other = RandomOracle::new(7);
        for _ in 0..10 {
            assert_eq!(one.next_int(100).unwrap(), other.next_int(100).unwrap());
        }
    }
}
