use std::path::PathBuf;

use esea_core::MatchId;

use super::{PageFetcher, RenderedPage};
use crate::error::FetchError;

/// Reads previously rendered pages saved as `{dir}/{match_id}.html`.
#[derive(Debug, Clone)]
pub struct SnapshotDirFetcher {
    dir: PathBuf,
}

impl SnapshotDirFetcher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn path_for(&self, match_id: MatchId) -> PathBuf {
        self.dir.join(format!("{match_id}.html"))
    }
}

impl PageFetcher for SnapshotDirFetcher {
    async fn fetch(&self, match_id: MatchId) -> Result<RenderedPage, FetchError> {
        let path = self.path_for(match_id);
        let html = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| FetchError::Snapshot {
                path: path.clone(),
                source,
            })?;
        tracing::debug!(%match_id, path = %path.display(), bytes = html.len(), "loaded page snapshot");
        Ok(RenderedPage { match_id, html })
    }
}
