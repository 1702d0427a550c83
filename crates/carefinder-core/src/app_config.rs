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
    /// Origin of the backend serving `/api/nearby-therapists`.
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// JSON file backing the persisted location record.
    pub location_store_path: PathBuf,
    pub location_max_age_ms: u64,
    pub location_timeout_ms: u64,
    /// Sent to the backend as `use_gemini`.
    pub enhanced_search: bool,
    /// When `false`, records without an upstream rating carry no rating at all.
    pub placeholder_ratings: bool,
    /// Allow client-generated sample providers when a search comes back empty.
    pub sample_fallback: bool,
    /// JSON list of known places used to resolve typed addresses.
    pub gazetteer_path: Option<PathBuf>,
}
