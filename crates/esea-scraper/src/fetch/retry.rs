//! Exponential backoff for transient fetch failures.

use std::future::Future;
use std::time::Duration;

use crate::error::FetchError;

/// Upper bound on a server-requested `Retry-After` wait.
const MAX_RETRY_AFTER_SECS: u64 = 60;

/// Rate limits, server errors and network failures are transient. A 404 or
/// any other 4xx would return the same answer on a retry.
fn is_retriable(err: &FetchError) -> bool {
    match err {
        FetchError::RateLimited { .. } | FetchError::Http(_) => true,
        FetchError::UnexpectedStatus { status, .. } => *status >= 500,
        FetchError::NotFound { .. }
        | FetchError::EmptyBody { .. }
        | FetchError::Snapshot { .. }
        | FetchError::InvalidBaseUrl { .. } => false,
    }
}

/// Seconds to wait before retry number `attempt + 1`: `base * 2^attempt`, or
/// the server's `Retry-After` (capped at [`MAX_RETRY_AFTER_SECS`]) when that
/// is longer.
fn delay_secs(err: &FetchError, attempt: u32, backoff_base_secs: u64) -> u64 {
    let backoff = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
    match err {
        FetchError::RateLimited {
            retry_after_secs, ..
        } => backoff.max((*retry_after_secs).min(MAX_RETRY_AFTER_SECS)),
        _ => backoff,
    }
}

/// Runs `operation`, retrying transient errors up to `max_retries` more times.
///
/// The wait before the n-th retry is `backoff_base_secs * 2^(n-1)` seconds,
/// stretched to the server's `Retry-After` on a 429. Non-retriable errors
/// are returned at once; when retries run out the last error is returned.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if !is_retriable(&err) || attempt >= max_retries => return Err(err),
            Err(err) => err,
        };

        let delay_secs = delay_secs(&err, attempt, backoff_base_secs);
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient fetch error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
