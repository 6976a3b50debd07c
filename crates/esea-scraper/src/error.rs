use std::path::PathBuf;

use esea_core::{MatchId, PageVariant, Side};
use thiserror::Error;

/// Failure to turn a classified snapshot into a game record.
///
/// Nothing here is retried by this crate. Use [`ExtractError::kind`] to tell
/// a drifted template from a malformed row or a caller bug.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("extract called on an INVALID page for match {match_id}")]
    InvalidVariant { match_id: MatchId },

    #[error("{variant} page for match {match_id} is missing landmark `{landmark}`")]
    MissingLandmark {
        match_id: MatchId,
        variant: PageVariant,
        landmark: &'static str,
    },

    #[error("match {match_id}: expected 2 team blocks, found {found}")]
    TeamBlockCount { match_id: MatchId, found: usize },

    #[error("match {match_id} side {side}: expected {expected} players, found {found}")]
    RosterSize {
        match_id: MatchId,
        side: Side,
        expected: usize,
        found: usize,
    },

    #[error("match {match_id}: no side reached {threshold} rounds ({score_a}-{score_b})")]
    ScoreBelowThreshold {
        match_id: MatchId,
        score_a: u32,
        score_b: u32,
        threshold: u32,
    },

    #[error("match {match_id}: regulation match ended tied {score}-{score}")]
    TiedScore { match_id: MatchId, score: u32 },

    #[error("match {match_id}: unrecognized forfeiting team marker {raw:?}")]
    ForfeitSide { match_id: MatchId, raw: String },

    #[error("match {match_id} side {side}: score {raw:?} is not a non-negative integer")]
    MalformedScore {
        match_id: MatchId,
        side: Side,
        raw: String,
    },

    #[error("match {match_id} side {side} row {row}: {field} {raw:?} is missing or malformed")]
    PartialData {
        match_id: MatchId,
        side: Side,
        row: usize,
        field: &'static str,
        raw: String,
    },

    #[error("match {match_id} recap row {row}: {field} {raw:?} is missing or malformed")]
    PartialRecapData {
        match_id: MatchId,
        row: usize,
        field: &'static str,
        raw: String,
    },

    #[error("match {match_id} side {side}: no recap row for player {external_id}")]
    MissingRecapRow {
        match_id: MatchId,
        side: Side,
        external_id: String,
    },

    #[error("match {match_id}: player {external_id} appears more than once")]
    DuplicatePlayer {
        match_id: MatchId,
        external_id: String,
    },
}

/// Coarse grouping of [`ExtractError`] for callers deciding retry vs discard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractErrorKind {
    /// An expected landmark or structure is absent: template drift, or the
    /// page was classified from a partial render.
    Structure,
    /// A row or field exists but could not be parsed.
    PartialData,
    /// `extract` was asked to handle an INVALID page.
    CallerMisuse,
}

impl ExtractError {
    #[must_use]
    pub fn kind(&self) -> ExtractErrorKind {
        match self {
            ExtractError::InvalidVariant { .. } => ExtractErrorKind::CallerMisuse,
            ExtractError::MissingLandmark { .. }
            | ExtractError::TeamBlockCount { .. }
            | ExtractError::RosterSize { .. }
            | ExtractError::ScoreBelowThreshold { .. }
            | ExtractError::TiedScore { .. }
            | ExtractError::ForfeitSide { .. } => ExtractErrorKind::Structure,
            ExtractError::MalformedScore { .. }
            | ExtractError::PartialData { .. }
            | ExtractError::PartialRecapData { .. }
            | ExtractError::MissingRecapRow { .. }
            | ExtractError::DuplicatePlayer { .. } => ExtractErrorKind::PartialData,
        }
    }
}

/// Failure to obtain a rendered page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited fetching {url} (retry after {retry_after_secs}s)")]
    RateLimited { url: String, retry_after_secs: u64 },

    #[error("match page not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("empty response body from {url}")]
    EmptyBody { url: String },

    #[error("failed to read snapshot {}: {source}", path.display())]
    Snapshot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

/// Failure to load or compile page landmarks.
#[derive(Debug, Error)]
pub enum LandmarkError {
    #[error("invalid CSS selector for {field} ({selector:?}): {reason}")]
    InvalidSelector {
        field: &'static str,
        selector: String,
        reason: String,
    },

    #[error("invalid pattern for {field} ({pattern:?}): {source}")]
    InvalidPattern {
        field: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid column layout: {0}")]
    InvalidColumns(String),

    #[error("failed to read landmarks file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("landmarks YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
