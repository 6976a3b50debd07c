//! Chooses where pages come from: the live site or a snapshot directory.

use anyhow::Context;
use esea_core::{AppConfig, MatchId};
use esea_scraper::{FetchError, HttpFetcher, PageFetcher, RenderedPage, SnapshotDirFetcher};

#[derive(Debug)]
pub(crate) enum PageSource {
    Http(HttpFetcher),
    Snapshots(SnapshotDirFetcher),
}

impl PageSource {
    /// `ESEA_SNAPSHOT_DIR` wins over the network when set.
    pub(crate) fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        if let Some(dir) = &config.snapshot_dir {
            tracing::info!(dir = %dir.display(), "reading match pages from snapshot directory");
            return Ok(Self::Snapshots(SnapshotDirFetcher::new(dir)));
        }
        let fetcher = HttpFetcher::from_config(config).context("failed to build HTTP fetcher")?;
        tracing::info!(base_url = %config.base_url, "fetching match pages over HTTP");
        Ok(Self::Http(fetcher))
    }
}

impl PageFetcher for PageSource {
    async fn fetch(&self, match_id: MatchId) -> Result<RenderedPage, FetchError> {
        match self {
            Self::Http(fetcher) => fetcher.fetch(match_id).await,
            Self::Snapshots(fetcher) => fetcher.fetch(match_id).await,
        }
    }
}
