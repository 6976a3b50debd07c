//! Page acquisition at the system boundary.
//!
//! A [`PageFetcher`] turns a match id into the rendered markup of its match
//! page. Classification and extraction never see the network; they only see
//! the [`RenderedPage`] a fetcher returned.

mod http;
mod retry;
mod session;
mod snapshot_dir;

use std::future::Future;

use esea_core::MatchId;

use crate::error::FetchError;

pub use http::HttpFetcher;
pub use session::{FetchSession, SessionTracker};
pub use snapshot_dir::SnapshotDirFetcher;

/// Raw markup of a fully rendered match page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub match_id: MatchId,
    pub html: String,
}

/// Source of rendered match pages.
pub trait PageFetcher {
    /// Fetches the rendered page for `match_id`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the page cannot be obtained. Retries, if
    /// any, happen inside the implementation.
    fn fetch(
        &self,
        match_id: MatchId,
    ) -> impl Future<Output = Result<RenderedPage, FetchError>> + Send;
}
