//! The failure surface a spawned actor task reports through (§7): every
//! terminal error an actor's initialization or step loop raises lands here,
//! once per actor, retrievable after the fact instead of only a `warn!` log
//! line nobody can query.

// Layer 1: Standard library imports
use std::sync::Mutex;

// Layer 3: Internal module imports
use crate::util::ActorId;

/// One actor's terminal failure: the id and a rendered message (the
/// originating error's `Display`, already spec-worded by `InboxError`,
/// `StateMachineError` and `ActorRuntimeError`).
#[derive(Debug, Clone)]
pub struct FailureRecord {
    pub actor: ActorId,
    pub message: String,
}

/// Collects every actor failure a context's spawned tasks report and fires
/// an optional `OnFailure` hook once per failure (§7).
pub struct FailureSink {
    records: Mutex<Vec<FailureRecord>>,
    hook: Mutex<Option<Box<dyn Fn(&FailureRecord) + Send + Sync>>>,
}

impl FailureSink {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            hook: Mutex::new(None),
        }
    }

    /// Install the `OnFailure` callback (§7). Replaces any previously
    /// installed hook; fires once per call to [`Self::record`].
    pub fn on_failure(&self, hook: impl Fn(&FailureRecord) + Send + Sync + 'static) {
        *self.hook.lock().expect("failure sink hook mutex poisoned") = Some(Box::new(hook));
    }

    /// Record a failure, firing the installed hook (if any) before storing.
    pub fn record(&self, record: FailureRecord) {
        if let Some(hook) = self.hook.lock().expect("failure sink hook mutex poisoned").as_ref() {
            hook(&record);
        }
        self.records.lock().expect("failure sink mutex poisoned").push(record);
    }

    /// Every failure recorded so far, in the order it was reported.
    pub fn failures(&self) -> Vec<FailureRecord> {
        self.records.lock().expect("failure sink mutex poisoned").clone()
    }

    pub fn has_failed(&self) -> bool {
        !self.records.lock().expect("failure sink mutex poisoned").is_empty()
    }
}

impl Default for FailureSink {
    fn default() -> Self {
        Self::new()
    }
}
