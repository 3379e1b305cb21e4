//! Gateway configuration.
//!
//! Read from the environment once at startup and passed into the gateway at
//! construction; immutable for the process lifetime.

mod errors;

pub use errors::ConfigError;

use std::env;

use serde::{Deserialize, Serialize};

use crate::validate::Whitelist;

/// Rate limiter parameters: a fixed window with a per-client request cap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Window length in seconds (default: 15 minutes).
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    /// Requests allowed per client per window (default: 100).
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
            max_requests: default_max_requests(),
        }
    }
}

/// Full gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Host to bind to (default: "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 3000).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Downstream query endpoint URL.
    #[serde(default = "default_downstream_url")]
    pub downstream_url: String,

    /// Shared secret expected in `x-api-key`, also forwarded downstream.
    pub api_key: String,

    /// CORS allowed origins; empty means permissive (development).
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Whether the `raw` escape hatch is enabled (default: off).
    #[serde(default)]
    pub allow_raw: bool,

    /// Whitelisted table names.
    #[serde(default = "default_tables")]
    pub tables: Vec<String>,

    /// Rate limiter parameters.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_downstream_url() -> String {
    "http://localhost:8080/api/query".to_string()
}

fn default_tables() -> Vec<String> {
    ["stats", "users", "matches", "bans"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_window_secs() -> u64 {
    15 * 60
}

fn default_max_requests() -> u32 {
    100
}

impl GatewayConfig {
    /// Build a configuration from the process environment.
    ///
    /// `API_KEY` is required; `PLUGIN_API_URL`, `PORT`, `ALLOWED_ORIGINS`
    /// and `ALLOW_RAW` are optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var("API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let downstream_url =
            env::var("PLUGIN_API_URL").unwrap_or_else(|_| default_downstream_url());

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => default_port(),
        };

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_default();

        let allow_raw = env::var("ALLOW_RAW")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            host: default_host(),
            port,
            downstream_url,
            api_key,
            allowed_origins,
            allow_raw,
            tables: default_tables(),
            rate_limit: RateLimitConfig::default(),
        })
    }

    /// Configuration with the given shared secret and defaults everywhere
    /// else. Used by tests to build fixtures without touching the
    /// environment.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            downstream_url: default_downstream_url(),
            api_key: api_key.into(),
            allowed_origins: Vec::new(),
            allow_raw: false,
            tables: default_tables(),
            rate_limit: RateLimitConfig::default(),
        }
    }

    /// The socket address string to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Build the table whitelist from the configured table list.
    pub fn whitelist(&self) -> Whitelist {
        Whitelist::new(self.tables.iter().cloned())
    }
}

/// Split a comma-separated origin list, dropping empty entries.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
