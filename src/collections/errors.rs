//! Controlled-collection failure taxonomy (§4.7).

use thiserror::Error;

/// A violated reader/writer invariant on a controlled collection (§4.7:
/// `writer_count <= 1`, `reader_count > 0 => writer_count == 0`).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("data race detected on controlled {collection}")]
pub struct DataRace {
    pub collection: &'static str,
}

impl DataRace {
    pub fn new(collection: &'static str) -> Self {
        Self { collection }
    }
}
