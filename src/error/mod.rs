//! Centralized error handling for the OrderDesk client
//!
//! This module provides a unified error type covering configuration,
//! transport, and REST request failures, plus decoding of the server's
//! JSON error envelope.

use serde::Deserialize;
use thiserror::Error;

/// Client error type
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error ({status}): {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Notification channel closed")]
    ChannelClosed,
}

/// JSON error envelope returned by the OrderDesk API
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

/// Error details in the envelope
#[derive(Debug, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub details: Option<String>,
}

impl ClientError {
    /// Build an API error from a response status and decoded envelope
    pub fn from_envelope(status: u16, envelope: ErrorResponse) -> Self {
        ClientError::Api {
            status,
            code: envelope.error.code,
            message: envelope.error.message,
        }
    }

    /// Build an API error when the body could not be decoded
    pub fn from_status(status: u16) -> Self {
        ClientError::Api {
            status,
            code: "UNKNOWN".to_string(),
            message: format!("Request failed with status {}", status),
        }
    }

    /// Whether this error came from the transport layer rather than the API
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_) | ClientError::ChannelClosed)
    }
}

/// Result type alias using ClientError
pub type ClientResult<T> = Result<T, ClientError>;
