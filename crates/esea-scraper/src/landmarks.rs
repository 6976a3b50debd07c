//! DOM landmarks used to classify and extract match pages.
//!
//! Every selector and column position the parser relies on lives in
//! [`Landmarks`], so a template change on the site can be absorbed by a YAML
//! override instead of a rebuild. Fields missing from the YAML keep their
//! defaults.
//!
//! ```yaml
//! forfeit_banner: "div.match-forfeit"
//! scoreboard_columns:
//!   rating: 1
//!   headshot_percentage: 5
//! ```

use std::path::Path;

use regex::Regex;
use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::error::LandmarkError;

/// Positional layout of a scoreboard row. Values are zero-based cell indexes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoreboardColumns {
    pub player: usize,
    pub rating: usize,
    pub kills: usize,
    pub deaths: usize,
    pub headshot_percentage: usize,
}

impl Default for ScoreboardColumns {
    fn default() -> Self {
        Self {
            player: 0,
            rating: 1,
            kills: 2,
            deaths: 3,
            headshot_percentage: 4,
        }
    }
}

/// Positional layout of a recap panel row. Values are zero-based cell indexes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecapColumns {
    pub player: usize,
    pub assists: usize,
    pub adr: usize,
    pub kast_percentage: usize,
    pub first_kills: usize,
}

impl Default for RecapColumns {
    fn default() -> Self {
        Self {
            player: 0,
            assists: 1,
            adr: 2,
            kast_percentage: 3,
            first_kills: 4,
        }
    }
}

/// Uncompiled landmark configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Landmarks {
    /// Banner shown on forfeited matches.
    pub forfeit_banner: String,
    /// Banner attribute naming the forfeiting team (`1`/`2` or `A`/`B`).
    pub forfeit_team_attr: String,
    /// Recap panel present only on EXTENDED pages.
    pub recap_panel: String,
    /// Player rows inside the recap panel.
    pub recap_row: String,
    /// Container for the two team blocks.
    pub scoreboard: String,
    /// One block per team, inside the scoreboard.
    pub team_block: String,
    /// Score element inside a team block.
    pub team_score: String,
    /// Player rows inside a team block.
    pub player_row: String,
    /// Cells inside a row.
    pub cell: String,
    /// Profile link inside the player cell.
    pub player_link: String,
    /// Regex with one capture group pulling the user id out of the link href.
    pub player_href_pattern: String,
    pub scoreboard_columns: ScoreboardColumns,
    pub recap_columns: RecapColumns,
}

impl Default for Landmarks {
    fn default() -> Self {
        Self {
            forfeit_banner: "div.match-forfeit".to_string(),
            forfeit_team_attr: "data-forfeit-team".to_string(),
            recap_panel: "#match-recap".to_string(),
            recap_row: "tr.recap-row".to_string(),
            scoreboard: "#match-stats".to_string(),
            team_block: "div.team-block".to_string(),
            team_score: ".team-score".to_string(),
            player_row: "tr.player-row".to_string(),
            cell: "td".to_string(),
            player_link: "a[href]".to_string(),
            player_href_pattern: r"/users/(\d+)".to_string(),
            scoreboard_columns: ScoreboardColumns::default(),
            recap_columns: RecapColumns::default(),
        }
    }
}

impl Landmarks {
    /// Parses a YAML override. Missing keys keep their defaults; unknown keys
    /// are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`LandmarkError::Yaml`] on malformed YAML or unknown keys.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, LandmarkError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads and parses a YAML override file.
    ///
    /// # Errors
    ///
    /// Returns [`LandmarkError::Read`] if the file cannot be read and
    /// [`LandmarkError::Yaml`] if it does not parse.
    pub fn load(path: &Path) -> Result<Self, LandmarkError> {
        let raw = std::fs::read_to_string(path).map_err(|source| LandmarkError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&raw)
    }

    /// Compiles every selector and pattern up front so classification never sees
    /// a bad selector.
    ///
    /// # Errors
    ///
    /// Returns [`LandmarkError::InvalidSelector`] or
    /// [`LandmarkError::InvalidPattern`] naming the offending field, and
    /// [`LandmarkError::InvalidColumns`] when two fields of one row layout
    /// share a cell.
    pub fn compile(&self) -> Result<CompiledLandmarks, LandmarkError> {
        let scoreboard_columns = self.scoreboard_columns.clone();
        ensure_distinct(
            "scoreboard_columns",
            &[
                scoreboard_columns.player,
                scoreboard_columns.rating,
                scoreboard_columns.kills,
                scoreboard_columns.deaths,
                scoreboard_columns.headshot_percentage,
            ],
        )?;
        let recap_columns = self.recap_columns.clone();
        ensure_distinct(
            "recap_columns",
            &[
                recap_columns.player,
                recap_columns.assists,
                recap_columns.adr,
                recap_columns.kast_percentage,
                recap_columns.first_kills,
            ],
        )?;

        if self.forfeit_team_attr.trim().is_empty() {
            return Err(LandmarkError::InvalidSelector {
                field: "forfeit_team_attr",
                selector: self.forfeit_team_attr.clone(),
                reason: "attribute name is empty".to_string(),
            });
        }

        let player_href = Regex::new(&self.player_href_pattern).map_err(|source| {
            LandmarkError::InvalidPattern {
                field: "player_href_pattern",
                pattern: self.player_href_pattern.clone(),
                source,
            }
        })?;
        if player_href.captures_len() < 2 {
            return Err(LandmarkError::InvalidColumns(format!(
                "player_href_pattern {:?} has no capture group for the user id",
                self.player_href_pattern
            )));
        }

        Ok(CompiledLandmarks {
            forfeit_banner: selector("forfeit_banner", &self.forfeit_banner)?,
            forfeit_team_attr: self.forfeit_team_attr.trim().to_string(),
            recap_panel: selector("recap_panel", &self.recap_panel)?,
            recap_row: selector("recap_row", &self.recap_row)?,
            scoreboard: selector("scoreboard", &self.scoreboard)?,
            team_block: selector("team_block", &self.team_block)?,
            team_score: selector("team_score", &self.team_score)?,
            player_row: selector("player_row", &self.player_row)?,
            cell: selector("cell", &self.cell)?,
            player_link: selector("player_link", &self.player_link)?,
            player_href,
            scoreboard_columns,
            recap_columns,
        })
    }
}

fn selector(field: &'static str, css: &str) -> Result<Selector, LandmarkError> {
    Selector::parse(css).map_err(|e| LandmarkError::InvalidSelector {
        field,
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

fn ensure_distinct(layout: &str, columns: &[usize]) -> Result<(), LandmarkError> {
    for (i, col) in columns.iter().enumerate() {
        if columns[i + 1..].contains(col) {
            return Err(LandmarkError::InvalidColumns(format!(
                "{layout} maps two fields to cell {col}"
            )));
        }
    }
    Ok(())
}

/// Ready-to-match landmarks. Build once, reuse for every page.
#[derive(Debug, Clone)]
pub struct CompiledLandmarks {
    pub(crate) forfeit_banner: Selector,
    pub(crate) forfeit_team_attr: String,
    pub(crate) recap_panel: Selector,
    pub(crate) recap_row: Selector,
    pub(crate) scoreboard: Selector,
    pub(crate) team_block: Selector,
    pub(crate) team_score: Selector,
    pub(crate) player_row: Selector,
    pub(crate) cell: Selector,
    pub(crate) player_link: Selector,
    pub(crate) player_href: Regex,
    pub(crate) scoreboard_columns: ScoreboardColumns,
    pub(crate) recap_columns: RecapColumns,
}

impl CompiledLandmarks {
    /// Compiles [`Landmarks::default`].
    ///
    /// # Errors
    ///
    /// Only fails if the built-in defaults are themselves broken.
    pub fn defaults() -> Result<Self, LandmarkError> {
        Landmarks::default().compile()
    }
}
