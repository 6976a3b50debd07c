//! Scoped fetch sessions.
//!
//! A [`FetchSession`] is held for the whole fetch, classify and extract cycle
//! of one match and released when it is dropped, whichever way the cycle
//! ends. [`SessionTracker`] counts the sessions still open.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use esea_core::MatchId;

#[derive(Debug, Clone, Default)]
pub struct SessionTracker {
    open: Arc<AtomicUsize>,
}

impl SessionTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a session for `match_id`; it closes when the guard is dropped.
    #[must_use]
    pub fn acquire(&self, match_id: MatchId) -> FetchSession {
        let open = self.open.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(%match_id, open, "fetch session opened");
        FetchSession {
            match_id,
            open: Arc::clone(&self.open),
        }
    }

    #[must_use]
    pub fn open_sessions(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }
}

/// Guard for one open fetch session.
#[derive(Debug)]
pub struct FetchSession {
    match_id: MatchId,
    open: Arc<AtomicUsize>,
}

impl Drop for FetchSession {
    fn drop(&mut self) {
        let open = self.open.fetch_sub(1, Ordering::SeqCst) - 1;
        tracing::debug!(match_id = %self.match_id, open, "fetch session released");
    }
}
