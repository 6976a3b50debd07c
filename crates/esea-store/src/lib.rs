//! Persistence boundary for extracted game records.
//!
//! Stores accept one [`GameRecord`] per call. Extraction never depends on a
//! store; the CLI wires one in after a record has been produced.

mod jsonl;
mod memory;

use std::path::PathBuf;

use esea_core::GameRecord;
use thiserror::Error;

pub use jsonl::JsonlStore;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize game record for match {match_id}: {source}")]
    Serialize {
        match_id: esea_core::MatchId,
        #[source]
        source: serde_json::Error,
    },

    #[error("store lock poisoned")]
    Poisoned,
}

/// Sink for extracted game records.
pub trait GameStore {
    /// Persists one record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the record cannot be serialized or written.
    fn save(&self, record: &GameRecord) -> Result<(), StoreError>;
}
