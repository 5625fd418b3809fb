//! Configuration management for the OrderDesk client
//!
//! This module handles loading and validating configuration from environment
//! variables, with sensible defaults for local development.

use std::env;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid environment value: {0}")]
    InvalidValue(String),
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the OrderDesk REST API
    pub api_base_url: String,

    /// WebSocket URL for the live notification channel (derived from
    /// `api_base_url` unless overridden)
    pub ws_url: String,

    /// Session token used for API and channel authentication
    pub session_token: Option<String>,

    /// How many notifications to fetch when reconciling the backlog
    pub backlog_limit: u32,

    /// Maximum reconnect attempts before the channel gives up
    pub reconnect_attempts: u32,

    /// Initial reconnect delay
    pub reconnect_delay: Duration,

    /// Cap on the reconnect delay as backoff grows
    pub reconnect_delay_max: Duration,

    /// Timeout for establishing the WebSocket connection
    pub connect_timeout: Duration,

    /// Log level (RUST_LOG)
    pub log_level: String,
}

impl ClientConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        dotenvy::dotenv().ok();

        let api_base_url = env::var("ORDERDESK_API_URL")
            .unwrap_or_else(|_| "http://localhost:5000".to_string());

        let ws_url = match env::var("ORDERDESK_WS_URL") {
            Ok(url) => url,
            Err(_) => derive_ws_url(&api_base_url)?,
        };

        let session_token = env::var("ORDERDESK_SESSION_TOKEN").ok();

        let backlog_limit = env::var("ORDERDESK_BACKLOG_LIMIT")
            .unwrap_or_else(|_| "20".to_string())
            .parse::<u32>()
            .unwrap_or(20);

        let reconnect_attempts = env::var("ORDERDESK_RECONNECT_ATTEMPTS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .unwrap_or(5);

        let reconnect_delay_ms = env::var("ORDERDESK_RECONNECT_DELAY_MS")
            .unwrap_or_else(|_| "1000".to_string())
            .parse::<u64>()
            .unwrap_or(1000);

        let reconnect_delay_max_ms = env::var("ORDERDESK_RECONNECT_DELAY_MAX_MS")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u64>()
            .unwrap_or(5000);

        let connect_timeout_secs = env::var("ORDERDESK_CONNECT_TIMEOUT_SECS")
            .unwrap_or_else(|_| "20".to_string())
            .parse::<u64>()
            .unwrap_or(20);

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(ClientConfig {
            api_base_url,
            ws_url,
            session_token,
            backlog_limit,
            reconnect_attempts,
            reconnect_delay: Duration::from_millis(reconnect_delay_ms),
            reconnect_delay_max: Duration::from_millis(reconnect_delay_max_ms),
            connect_timeout: Duration::from_secs(connect_timeout_secs),
            log_level,
        })
    }

    /// Get the session token masked for logging
    pub fn session_token_masked(&self) -> String {
        match &self.session_token {
            Some(token) if token.len() > 8 => {
                format!("{}****{}", &token[..4], &token[token.len() - 4..])
            }
            Some(_) => "****".to_string(),
            None => "<none>".to_string(),
        }
    }
}

/// Derive the WebSocket URL from the REST base URL
fn derive_ws_url(api_base_url: &str) -> Result<String, ConfigError> {
    let base = api_base_url.trim_end_matches('/');
    let ws_base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        return Err(ConfigError::InvalidValue(format!(
            "API base URL must start with http:// or https://, got '{}'",
            api_base_url
        )));
    };
    Ok(format!("{}/ws", ws_base))
}
