use std::time::Duration;

use esea_core::{AppConfig, MatchId};
use reqwest::{Client, StatusCode, Url};

use super::retry::retry_with_backoff;
use super::{PageFetcher, RenderedPage};
use crate::error::FetchError;

/// Fetches match pages from the ladder site over HTTP.
///
/// Rate limits (429), server errors (5xx) and network failures are retried
/// with exponential backoff up to `max_retries` additional attempts. A 404 is
/// reported as [`FetchError::NotFound`] without retrying.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: String,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl HttpFetcher {
    /// Creates a fetcher for pages under `base_url`.
    ///
    /// # Errors
    ///
    /// - [`FetchError::InvalidBaseUrl`] if `base_url` is not an absolute
    ///   http(s) URL.
    /// - [`FetchError::Http`] if the underlying `reqwest::Client` cannot be
    ///   built.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, FetchError> {
        let invalid = |reason: String| FetchError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason,
        };
        let parsed = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {:?}", parsed.scheme())));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            max_retries,
            backoff_base_secs,
        })
    }

    /// Builds a fetcher from the `ESEA_BASE_URL` and `ESEA_FETCH_*` settings.
    ///
    /// # Errors
    ///
    /// Same as [`HttpFetcher::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        Self::new(
            &config.base_url,
            config.fetch_timeout_secs,
            &config.fetch_user_agent,
            config.fetch_max_retries,
            config.fetch_retry_backoff_base_secs,
        )
    }

    #[must_use]
    pub fn match_url(&self, match_id: MatchId) -> String {
        format!("{}/match/{match_id}", self.base_url)
    }

    async fn fetch_once(&self, match_id: MatchId, url: String) -> Result<RenderedPage, FetchError> {
        let response = self
            .client
            .get(&url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            // No hint means the plain backoff decides.
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(0);
            return Err(FetchError::RateLimited {
                url,
                retry_after_secs,
            });
        }
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound { url });
        }
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let html = response.text().await?;
        if html.trim().is_empty() {
            return Err(FetchError::EmptyBody { url });
        }
        Ok(RenderedPage { match_id, html })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, match_id: MatchId) -> Result<RenderedPage, FetchError> {
        let url = self.match_url(match_id);
        tracing::debug!(%match_id, %url, "fetching match page");

        let page = retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            self.fetch_once(match_id, url.clone())
        })
        .await?;

        tracing::debug!(%match_id, bytes = page.html.len(), "fetched match page");
        Ok(page)
    }
}
