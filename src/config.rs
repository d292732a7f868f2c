use std::time::Duration;

use serde::Deserialize;

use crate::services::recent_items::{MAX_RECENT, RECENT_BOOKS_KEY};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the library application serving `/api/recommendations/personalized`
    #[serde(default = "default_library_api_url")]
    pub library_api_url: String,

    /// Redis connection URL; sessions are kept in memory when unset
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Lifetime of a session's stored state, refreshed on every write; must be non-zero
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    /// Name of the library application's session cookie forwarded on backend calls
    #[serde(default = "default_library_session_cookie")]
    pub library_session_cookie: String,

    /// Transport timeout for calls to the library application
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,

    /// Store key holding the recently viewed list
    #[serde(default = "default_recent_key")]
    pub recent_key: String,

    /// Maximum number of recently viewed identifiers kept per session
    #[serde(default = "default_max_recent")]
    pub max_recent: usize,

    /// Per-card animation delay step in milliseconds
    #[serde(default = "default_card_stagger_ms")]
    pub card_stagger_ms: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_library_api_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_session_ttl_secs() -> u64 {
    86_400 // 24 hours
}

fn default_library_session_cookie() -> String {
    "session".to_string()
}

fn default_recent_key() -> String {
    RECENT_BOOKS_KEY.to_string()
}

fn default_max_recent() -> usize {
    MAX_RECENT
}

fn default_card_stagger_ms() -> u64 {
    50
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the stores or the library client cannot work with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.session_ttl_secs == 0 {
            anyhow::bail!("SESSION_TTL_SECS must be greater than zero");
        }
        if self.library_session_cookie.trim().is_empty() {
            anyhow::bail!("LIBRARY_SESSION_COOKIE cannot be empty");
        }
        Ok(())
    }

    /// Transport timeout for the library client, if one is configured
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}
