//! Game records extracted from ESEA match-report pages.
//!
//! Rating, headshot percentage and the recap decimals are kept as the exact
//! strings shown on the page. Downstream aggregation decides how to parse
//! them; nothing here rounds through `f64`.

use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Players per side in the ladder's 5v5 format.
pub const ROSTER_SIZE: usize = 5;

/// Rounds needed to win a regulation match. Overtime finishes above this.
pub const WIN_THRESHOLD: u32 = 16;

/// Positive integer identifying one played match on the ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(NonZeroU64);

impl MatchId {
    /// Returns `None` for zero.
    #[must_use]
    pub fn new(id: u64) -> Option<Self> {
        NonZeroU64::new(id).map(Self)
    }

    #[must_use]
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MatchId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| CoreError::InvalidMatchId(s.to_string()))
    }
}

/// Structural category of a match page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageVariant {
    /// Scoreboard only.
    Base,
    /// Scoreboard plus the match recap panel.
    Extended,
    /// No recognizable match page (missing match, error or rate-limit page,
    /// partial render).
    Invalid,
    /// One side forfeited; the score is forced.
    Forfeit,
}

impl PageVariant {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PageVariant::Base => "BASE",
            PageVariant::Extended => "EXTENDED",
            PageVariant::Invalid => "INVALID",
            PageVariant::Forfeit => "FORFEIT",
        }
    }

    /// Whether records of this variant must carry a full roster on both sides.
    #[must_use]
    pub fn requires_full_roster(self) -> bool {
        matches!(self, PageVariant::Base | PageVariant::Extended)
    }
}

impl fmt::Display for PageVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which team block a result came from. Side A is the first block on the
/// page, side B the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::A, Side::B];

    #[must_use]
    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => f.write_str("A"),
            Side::B => f.write_str("B"),
        }
    }
}

/// Per-player metrics from the recap panel of an EXTENDED page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecapStats {
    pub assists: u32,
    /// Average damage per round, as printed.
    pub adr: String,
    /// Percentage of rounds with a kill, assist, survival or trade.
    pub kast_percentage: String,
    pub first_kills: u32,
}

/// One scoreboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStatRecord {
    pub name: String,
    /// Ladder user id. Display names are not unique; this is.
    pub external_id: String,
    /// RWS rating, as printed.
    pub rating: String,
    pub kills: u32,
    pub deaths: u32,
    pub headshot_percentage: String,
    /// Present on EXTENDED pages only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recap: Option<RecapStats>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamResult {
    pub score: u32,
    /// On-page row order.
    pub players: Vec<PlayerStatRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub match_id: MatchId,
    pub variant: PageVariant,
    #[serde(rename = "A")]
    pub team_a: TeamResult,
    #[serde(rename = "B")]
    pub team_b: TeamResult,
}

impl GameRecord {
    #[must_use]
    pub fn team(&self, side: Side) -> &TeamResult {
        match side {
            Side::A => &self.team_a,
            Side::B => &self.team_b,
        }
    }

    /// The side holding the higher score, or `None` on a tie.
    #[must_use]
    pub fn winner(&self) -> Option<Side> {
        match self.team_a.score.cmp(&self.team_b.score) {
            std::cmp::Ordering::Greater => Some(Side::A),
            std::cmp::Ordering::Less => Some(Side::B),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// All players from both sides, side A first.
    pub fn players(&self) -> impl Iterator<Item = (Side, &PlayerStatRecord)> {
        self.team_a
            .players
            .iter()
            .map(|p| (Side::A, p))
            .chain(self.team_b.players.iter().map(|p| (Side::B, p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(name: &str, id: &str) -> PlayerStatRecord {
        PlayerStatRecord {
            name: name.to_string(),
            external_id: id.to_string(),
            rating: "13.86".to_string(),
            kills: 18,
            deaths: 17,
            headshot_percentage: "19.57".to_string(),
            recap: None,
        }
    }

    fn record() -> GameRecord {
        GameRecord {
            match_id: MatchId::new(14_633_571).unwrap(),
            variant: PageVariant::Base,
            team_a: TeamResult {
                score: 16,
                players: vec![player("RenZ", "1194196")],
            },
            team_b: TeamResult {
                score: 8,
                players: vec![player("djay", "441321")],
            },
        }
    }

    #[test]
    fn match_id_rejects_zero() {
        assert!(MatchId::new(0).is_none());
        assert_eq!(MatchId::new(7).map(MatchId::get), Some(7));
    }

    #[test]
    fn match_id_from_str() {
        assert_eq!("14633571".parse::<MatchId>().unwrap().get(), 14_633_571);
        assert_eq!(" 42 ".parse::<MatchId>().unwrap().get(), 42);
        assert!(matches!(
            "0".parse::<MatchId>(),
            Err(CoreError::InvalidMatchId(ref s)) if s == "0"
        ));
        assert!("-3".parse::<MatchId>().is_err());
        assert!("abc".parse::<MatchId>().is_err());
    }

    #[test]
    fn only_base_and_extended_require_full_roster() {
        assert!(PageVariant::Base.requires_full_roster());
        assert!(PageVariant::Extended.requires_full_roster());
        assert!(!PageVariant::Forfeit.requires_full_roster());
        assert!(!PageVariant::Invalid.requires_full_roster());
    }

    #[test]
    fn side_other_flips() {
        assert_eq!(Side::A.other(), Side::B);
        assert_eq!(Side::B.other(), Side::A);
    }

    #[test]
    fn winner_follows_score() {
        let mut rec = record();
        assert_eq!(rec.winner(), Some(Side::A));
        rec.team_b.score = 16;
        assert_eq!(rec.winner(), None);
    }

    #[test]
    fn players_iterates_side_a_first() {
        let rec = record();
        let names: Vec<(Side, &str)> = rec.players().map(|(s, p)| (s, p.name.as_str())).collect();
        assert_eq!(names, vec![(Side::A, "RenZ"), (Side::B, "djay")]);
    }

    #[test]
    fn serializes_with_side_keys_and_variant_tag() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["match_id"], 14_633_571);
        assert_eq!(json["variant"], "BASE");
        assert_eq!(json["A"]["score"], 16);
        assert_eq!(json["B"]["players"][0]["name"], "djay");
        assert_eq!(json["A"]["players"][0]["rating"], "13.86");
        assert!(json["A"]["players"][0].get("recap").is_none());
    }

    #[test]
    fn deserializes_what_it_serializes() {
        let rec = record();
        let text = serde_json::to_string(&rec).unwrap();
        let back: GameRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(back, rec);
    }
}
