//! Page variant detection.
//!
//! Landmarks are checked strongest-first: forfeit banner, recap panel,
//! scoreboard. Forfeited matches often keep residual scoreboard or recap
//! markup, so the first hit wins. A page with none of them is INVALID; this
//! covers missing matches, rate-limit and error pages, and snapshots taken
//! before the scoreboard rendered.

use esea_core::PageVariant;

use crate::landmarks::CompiledLandmarks;
use crate::snapshot::PageSnapshot;

/// Classifies a snapshot. Never fails.
#[must_use]
pub fn classify(snapshot: &PageSnapshot, landmarks: &CompiledLandmarks) -> PageVariant {
    let variant = if snapshot.contains(&landmarks.forfeit_banner) {
        PageVariant::Forfeit
    } else if snapshot.contains(&landmarks.recap_panel) {
        PageVariant::Extended
    } else if has_scoreboard(snapshot, landmarks) {
        PageVariant::Base
    } else {
        PageVariant::Invalid
    };

    tracing::debug!(match_id = %snapshot.match_id(), %variant, "classified match page");
    variant
}

/// A scoreboard counts only if it holds at least one team block; an empty
/// container is what a half-rendered page looks like.
fn has_scoreboard(snapshot: &PageSnapshot, landmarks: &CompiledLandmarks) -> bool {
    snapshot
        .first(&landmarks.scoreboard)
        .is_some_and(|board| board.select(&landmarks.team_block).next().is_some())
}
