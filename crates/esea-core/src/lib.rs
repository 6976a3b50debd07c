pub mod app_config;
pub mod config;
pub mod game;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use game::{
    GameRecord, MatchId, PageVariant, PlayerStatRecord, RecapStats, Side, TeamResult,
    ROSTER_SIZE, WIN_THRESHOLD,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid match id {0:?}: expected a positive integer")]
    InvalidMatchId(String),
}
