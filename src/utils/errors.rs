//! Error handling for ConciergeBot
//!
//! This module defines the main error types used throughout the engine
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the ConciergeBot engine
#[derive(Error, Debug)]
pub enum ConciergeError {
    #[error("Recognizer error: {0}")]
    Recognizer(#[from] RecognizerError),

    #[error("State store error: {0}")]
    StateStore(String),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown dialog: {0}")]
    UnknownDialog(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Recognizer-specific errors
#[derive(Error, Debug)]
pub enum RecognizerError {
    #[error("Recognizer request failed: {0}")]
    RequestFailed(String),

    #[error("Recognizer timeout")]
    Timeout,

    #[error("Invalid recognizer response: {0}")]
    InvalidResponse(String),

    #[error("Recognizer service unavailable")]
    ServiceUnavailable,
}

/// Result type alias for ConciergeBot operations
pub type Result<T> = std::result::Result<T, ConciergeError>;

/// Result type alias for recognizer operations
pub type RecognizerResult<T> = std::result::Result<T, RecognizerError>;

impl ConciergeError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            ConciergeError::Recognizer(_) => true,
            ConciergeError::StateStore(_) => true,
            ConciergeError::Redis(_) => true,
            ConciergeError::Http(_) => true,
            ConciergeError::Serialization(_) => false,
            ConciergeError::Config(_) => false,
            ConciergeError::UnknownDialog(_) => false,
            ConciergeError::InvalidStateTransition { .. } => false,
            ConciergeError::InvalidInput(_) => false,
            ConciergeError::Io(_) => true,
            ConciergeError::UrlParse(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ConciergeError::Config(_) => ErrorSeverity::Critical,
            ConciergeError::UnknownDialog(_) => ErrorSeverity::Error,
            ConciergeError::InvalidStateTransition { .. } => ErrorSeverity::Warning,
            ConciergeError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
