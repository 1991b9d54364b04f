//! A controlled mapping (§4.7).

// Layer 1: Standard library imports
use std::collections::HashMap;
use std::hash::Hash;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::collections::errors::DataRace;
use crate::collections::guard::Controlled;
use crate::scheduler::{OperationId, Scheduler};

/// A `HashMap` wrapper that asserts data-race-freedom and inserts a
/// scheduling point on every access (§4.7).
pub struct ControlledMap<K, V> {
    inner: Controlled<HashMap<K, V>>,
}

impl<K: Eq + Hash + Clone, V: Clone> ControlledMap<K, V> {
    pub fn new() -> Self {
        Self {
            inner: Controlled::new("Map", HashMap::new()),
        }
    }

    pub async fn get(&self, scheduler: &Scheduler, op: OperationId, key: &K) -> Result<Option<V>, DataRace> {
        let key = key.clone();
        self.inner.read(scheduler, op, move |map| map.get(&key).cloned()).await
    }

    pub async fn insert(
        &self,
        scheduler: &Scheduler,
        op: OperationId,
        key: K,
        value: V,
    ) -> Result<Option<V>, DataRace> {
        self.inner.write(scheduler, op, move |map| map.insert(key, value)).await
    }

    pub async fn remove(&self, scheduler: &Scheduler, op: OperationId, key: &K) -> Result<Option<V>, DataRace> {
        let key = key.clone();
        self.inner.write(scheduler, op, move |map| map.remove(&key)).await
    }

    pub async fn contains_key(&self, scheduler: &Scheduler, op: OperationId, key: &K) -> Result<bool, DataRace> {
        let key = key.clone();
        self.inner.read(scheduler, op, move |map| map.contains_key(&key)).await
    }

    pub async fn len(&self, scheduler: &Scheduler, op: OperationId) -> Result<usize, DataRace> {
        self.inner.read(scheduler, op, |map| map.len()).await
    }

    pub fn len_uncontrolled(&self) -> usize {
        self.inner.read_uncontrolled(|map| map.len())
    }
}

impl<K: Eq + Hash + Clone, V: Clone> Default for ControlledMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
