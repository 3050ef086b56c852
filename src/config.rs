use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Default region for watch-provider lookups (ISO 3166-1 alpha-2)
    #[serde(default = "default_region")]
    pub region: String,

    /// Delay between sequential TMDB requests, in milliseconds
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_region() -> String {
    "ZA".to_string()
}

fn default_request_delay_ms() -> u64 {
    250
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// A missing TMDB_API_KEY is surfaced as `MissingCredential` so startup
    /// failure names the exact precondition rather than a generic env error.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        if std::env::var("TMDB_API_KEY").map_or(true, |v| v.trim().is_empty()) {
            return Err(AppError::MissingCredential);
        }

        envy::from_env::<Config>()
            .map_err(|e| AppError::Internal(format!("Failed to load config: {}", e)))
    }
}
