// src/error.rs

//! Unified error handling for the race results service.

use std::fmt;

use thiserror::Error;

/// Result type alias for race results operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be built
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Upstream document could not be retrieved
    #[error("Fetch error for {url}: {reason}")]
    Fetch { url: String, reason: String },
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a fetch error carrying the source URL.
    pub fn fetch(url: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::Fetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Source URL attached to the error, if any.
    pub fn source_url(&self) -> Option<&str> {
        match self {
            Self::Fetch { url, .. } => Some(url),
            _ => None,
        }
    }

    /// Human-readable detail without the variant prefix.
    pub fn details(&self) -> String {
        match self {
            Self::Fetch { reason, .. } => reason.clone(),
            other => other.to_string(),
        }
    }
}
