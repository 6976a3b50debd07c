use std::sync::Mutex;

use esea_core::GameRecord;

use crate::{GameStore, StoreError};

/// Keeps saved records in memory, in save order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<GameRecord>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies of every record saved so far.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Poisoned`] if a writer panicked.
    pub fn records(&self) -> Result<Vec<GameRecord>, StoreError> {
        self.records
            .lock()
            .map(|r| r.clone())
            .map_err(|_| StoreError::Poisoned)
    }
}

impl GameStore for MemoryStore {
    fn save(&self, record: &GameRecord) -> Result<(), StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .push(record.clone());
        Ok(())
    }
}
