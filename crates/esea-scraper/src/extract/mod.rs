//! Game record extraction for classified match pages.
//!
//! Each variant has its own routine:
//!
//! - BASE reads the two team blocks of the scoreboard.
//! - EXTENDED reads the scoreboard, then joins recap panel rows onto it by
//!   ladder user id.
//! - FORFEIT forces the score and keeps scoreboard players only when they
//!   parse cleanly.
//!
//! Structural gaps fail with a [`ExtractErrorKind::Structure`] error and bad
//! cells with a [`ExtractErrorKind::PartialData`] error; nothing is zero-filled.
//!
//! [`ExtractErrorKind::Structure`]: crate::error::ExtractErrorKind::Structure
//! [`ExtractErrorKind::PartialData`]: crate::error::ExtractErrorKind::PartialData

mod forfeit;
mod recap;
mod scoreboard;

use esea_core::{
    GameRecord, MatchId, PageVariant, PlayerStatRecord, RecapStats, Side, TeamResult, ROSTER_SIZE,
    WIN_THRESHOLD,
};

use crate::error::ExtractError;
use crate::landmarks::CompiledLandmarks;
use crate::snapshot::PageSnapshot;

/// Extracts a game record from a snapshot already classified as `variant`.
///
/// # Errors
///
/// - [`ExtractError::InvalidVariant`] if `variant` is INVALID; callers must
///   skip those pages.
/// - Structure errors ([`ExtractError::MissingLandmark`],
///   [`ExtractError::TeamBlockCount`], [`ExtractError::RosterSize`],
///   [`ExtractError::ScoreBelowThreshold`], [`ExtractError::TiedScore`],
///   [`ExtractError::ForfeitSide`])
///   when the page does not have the shape its variant requires.
/// - Partial-data errors ([`ExtractError::PartialData`],
///   [`ExtractError::MalformedScore`], [`ExtractError::PartialRecapData`],
///   [`ExtractError::MissingRecapRow`], [`ExtractError::DuplicatePlayer`])
///   when a row is present but cannot be read.
pub fn extract(
    snapshot: &PageSnapshot,
    variant: PageVariant,
    landmarks: &CompiledLandmarks,
) -> Result<GameRecord, ExtractError> {
    let ctx = PageContext {
        match_id: snapshot.match_id(),
        variant,
        landmarks,
    };

    let record = match variant {
        PageVariant::Invalid => {
            return Err(ExtractError::InvalidVariant {
                match_id: ctx.match_id,
            })
        }
        PageVariant::Base => scoreboard::extract_base(snapshot, &ctx)?,
        PageVariant::Extended => recap::extract_extended(snapshot, &ctx)?,
        PageVariant::Forfeit => forfeit::extract_forfeit(snapshot, &ctx)?,
    };

    tracing::debug!(
        match_id = %record.match_id,
        variant = %record.variant,
        score_a = record.team_a.score,
        score_b = record.team_b.score,
        players_a = record.team_a.players.len(),
        players_b = record.team_b.players.len(),
        "extracted game record"
    );
    Ok(record)
}

/// Per-call state threaded through the variant routines.
pub(super) struct PageContext<'a> {
    pub match_id: MatchId,
    pub variant: PageVariant,
    pub landmarks: &'a CompiledLandmarks,
}

impl PageContext<'_> {
    fn missing(&self, landmark: &'static str) -> ExtractError {
        ExtractError::MissingLandmark {
            match_id: self.match_id,
            variant: self.variant,
            landmark,
        }
    }
}

/// Scoreboard fields of one player before any recap data is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct ScoreboardRow {
    pub name: String,
    pub external_id: String,
    pub rating: String,
    pub kills: u32,
    pub deaths: u32,
    pub headshot_percentage: String,
}

impl ScoreboardRow {
    fn into_player(self, recap: Option<RecapStats>) -> PlayerStatRecord {
        PlayerStatRecord {
            name: self.name,
            external_id: self.external_id,
            rating: self.rating,
            kills: self.kills,
            deaths: self.deaths,
            headshot_percentage: self.headshot_percentage,
            recap,
        }
    }
}

/// Checks the regulation-match invariants shared by BASE and EXTENDED:
/// full rosters on both sides and a single winner at or above the win
/// threshold. Overtime finishes above the threshold pass; ties do not.
fn ensure_regulation(
    ctx: &PageContext<'_>,
    score_a: u32,
    score_b: u32,
    roster_a: usize,
    roster_b: usize,
) -> Result<(), ExtractError> {
    debug_assert!(ctx.variant.requires_full_roster());
    for (side, found) in Side::BOTH.into_iter().zip([roster_a, roster_b]) {
        if found != ROSTER_SIZE {
            return Err(ExtractError::RosterSize {
                match_id: ctx.match_id,
                side,
                expected: ROSTER_SIZE,
                found,
            });
        }
    }
    if score_a.max(score_b) < WIN_THRESHOLD {
        return Err(ExtractError::ScoreBelowThreshold {
            match_id: ctx.match_id,
            score_a,
            score_b,
            threshold: WIN_THRESHOLD,
        });
    }
    if score_a == score_b {
        return Err(ExtractError::TiedScore {
            match_id: ctx.match_id,
            score: score_a,
        });
    }
    Ok(())
}

fn team(score: u32, players: Vec<PlayerStatRecord>) -> TeamResult {
    TeamResult { score, players }
}

#[cfg(test)]
pub(crate) mod testing;
