// src/error.rs

//! Unified error handling for the simulados client.

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed before a response arrived
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input rejected before any request was issued
    #[error("Validation error: {0}")]
    Validation(String),

    /// Server answered with a non-success status
    #[error("Rejected by server ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Illegal session timer transition
    #[error("Session error: {0}")]
    Session(String),

    /// A chart is still attached to the canvas
    #[error("Canvas '{0}' is already in use")]
    CanvasInUse(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a server rejection error.
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Create a session error.
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session(message.into())
    }

    /// True when the request never produced a server answer.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Json(_) | Self::Io(_))
    }

    /// Message the server attached to a rejection, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_exposes_server_message() {
        let err = AppError::rejected(409, "Essa empresa já existe.");
        assert_eq!(err.server_message(), Some("Essa empresa já existe."));
        assert!(!err.is_transport());
    }

    #[test]
    fn json_errors_count_as_transport() {
        let err: AppError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(err.is_transport());
        assert_eq!(err.server_message(), None);
    }
}
