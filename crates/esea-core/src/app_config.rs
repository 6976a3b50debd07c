use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Origin of the ladder site; match pages live at `{base_url}/match/{id}`.
    pub base_url: String,
    pub fetch_timeout_secs: u64,
    pub fetch_user_agent: String,
    pub fetch_max_retries: u32,
    pub fetch_retry_backoff_base_secs: u64,
    /// When set, pages are read from `{snapshot_dir}/{id}.html` instead of
    /// the network.
    pub snapshot_dir: Option<PathBuf>,
    pub output_path: PathBuf,
    /// Optional YAML file overriding the default page landmarks.
    pub landmarks_path: Option<PathBuf>,
}
