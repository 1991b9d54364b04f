//! Persisted replay traces (§6 "Persisted replay trace", §4.5 "Replay").
//!
//! A trace is an ordered sequence of tagged records capturing every
//! scheduling decision and random-oracle output a controlled run produced.
//! Replaying it drives the same oracle interface ([`SchedulingOracle`] /
//! [`RandomOracleSource`]) but by consuming the recorded sequence instead of
//! making a live choice, failing loudly the moment the live run's enabled
//! set no longer contains the recorded pick.

// Layer 1: Standard library imports
use std::sync::Mutex;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::scheduler::errors::SchedulerError;
use crate::scheduler::operation::ControlledOperation;
use crate::scheduler::strategies::{RandomOracleSource, SchedulingOracle};

/// Which random-producing operation a [`TraceRecord::RandomPick`] recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RandomKind {
    Boolean,
    Integer,
}

/// One entry in a persisted replay trace (§6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceRecord {
    /// The scheduler picked the operation with this raw id.
    SchedulePick(u64),
    /// The random oracle produced this value.
    RandomPick(RandomKind, i64),
}

/// An ordered, persisted sequence of [`TraceRecord`]s (§6).
#[derive(Debug, Clone, Default)]
pub struct ScheduleTrace {
    records: Vec<TraceRecord>,
}

impl ScheduleTrace {
    pub fn new(records: Vec<TraceRecord>) -> Self {
        Self { records }
    }

    pub fn push(&mut self, record: TraceRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }
}

struct Cursor {
    trace: ScheduleTrace,
    position: usize,
}

/// Drives a [`ScheduleTrace`] back through the scheduler, asserting that the
/// enabled set at each scheduling point still contains the recorded pick.
/// Trailing records past the end of execution are tolerated and simply
/// never consumed (§6).
pub struct ReplayOracle {
    cursor: Mutex<Cursor>,
}

impl ReplayOracle {
    pub fn new(trace: ScheduleTrace) -> Self {
        Self {
            cursor: Mutex::new(Cursor { trace, position: 0 }),
        }
    }

    /// `true` once every record in the trace has been consumed.
    pub fn is_exhausted(&self) -> bool {
        let cursor = self.cursor.lock().expect("replay cursor poisoned");
        cursor.position >= cursor.trace.records.len()
    }

    fn next_schedule_pick(&self) -> Result<u64, SchedulerError> {
        let mut cursor = self.cursor.lock().expect("replay cursor poisoned");
        let position = cursor.position;
        match cursor.trace.records.get(position) {
            Some(TraceRecord::SchedulePick(raw)) => {
                cursor.position += 1;
                Ok(*raw)
            }
            Some(other) => Err(SchedulerError::ReplayDivergence {
                step: position,
                expected: "SchedulePick".to_string(),
                actual: format!("{other:?}"),
            }),
            None => Err(SchedulerError::ReplayDivergence {
                step: position,
                expected: "SchedulePick".to_string(),
                actual: "end of trace".to_string(),
            }),
        }
    }

    fn next_random_pick(&self, kind: RandomKind) -> Result<i64, SchedulerError> {
        let mut cursor = self.cursor.lock().expect("replay cursor poisoned");
        let position = cursor.position;
        match cursor.trace.records.get(position) {
            Some(TraceRecord::RandomPick(recorded_kind, value)) if *recorded_kind == kind => {
                cursor.position += 1;
                Ok(*value)
            }
            other => Err(SchedulerError::ReplayDivergence {
                step: position,
                expected: format!("RandomPick({kind:?}, _)"),
                actual: format!("{other:?}"),
            }),
        }
    }
}

impl SchedulingOracle for ReplayOracle {
    fn pick(&self, enabled: &[&ControlledOperation]) -> Result<usize, SchedulerError> {
        let raw = self.next_schedule_pick()?;
        enabled
            .iter()
            .position(|op| op.id().raw() == raw)
            .ok_or_else(|| SchedulerError::ReplayDivergence {
                step: 0,
                expected: format!("operation {raw} in enabled set"),
                actual: format!("enabled = {:?}", enabled.iter().map(|op| op.id()).collect::<Vec<_>>()),
            })
    }
}

impl RandomOracleSource for ReplayOracle {
    fn next_bool(&self) -> Result<bool, SchedulerError> {
        Ok(self.next_random_pick(RandomKind::Boolean)? != 0)
    }

    fn next_int(&self, _max: i64) -> Result<i64, SchedulerError> {
        self.next_random_pick(RandomKind::Integer)
    }
}
