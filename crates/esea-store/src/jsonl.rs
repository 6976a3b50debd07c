use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use esea_core::GameRecord;

use crate::{GameStore, StoreError};

/// Appends each record as one JSON line to a file.
///
/// The file is created on first write. Existing lines are never rewritten, so
/// re-scraping a match appends a second line for it.
#[derive(Debug)]
pub struct JsonlStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl GameStore for JsonlStore {
    fn save(&self, record: &GameRecord) -> Result<(), StoreError> {
        let mut line = serde_json::to_string(record).map_err(|source| StoreError::Serialize {
            match_id: record.match_id,
            source,
        })?;
        line.push('\n');

        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        file.write_all(line.as_bytes())
            .map_err(|e| self.io_error(e))?;

        tracing::debug!(
            match_id = %record.match_id,
            path = %self.path.display(),
            "appended game record"
        );
        Ok(())
    }
}
