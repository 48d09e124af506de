//! Error handling for the SEES client
//!
//! This module defines the main error types used throughout the library
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for SEES client operations
#[derive(Error, Debug)]
pub enum SeesError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: i64 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Errors reported by the SEES REST backend or the transport beneath it
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request to {endpoint} returned HTTP {status}: {message}")]
    Status {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("request to {endpoint} timed out")]
    Timeout { endpoint: String },

    #[error("backend unavailable at {endpoint}")]
    Unavailable { endpoint: String },

    #[error("request to {endpoint} failed: {reason}")]
    RequestFailed { endpoint: String, reason: String },

    #[error("invalid response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },
}

/// Result type alias for SEES client operations
pub type Result<T> = std::result::Result<T, SeesError>;

impl ApiError {
    /// Map a transport error onto the endpoint that produced it
    pub fn from_transport(endpoint: &str, error: &reqwest::Error) -> Self {
        let endpoint = endpoint.to_string();
        if error.is_timeout() {
            ApiError::Timeout { endpoint }
        } else if error.is_connect() {
            ApiError::Unavailable { endpoint }
        } else {
            ApiError::RequestFailed {
                endpoint,
                reason: error.to_string(),
            }
        }
    }

    /// HTTP status code, if the backend answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl SeesError {
    /// Check if the error is recoverable by retrying or re-fetching
    pub fn is_recoverable(&self) -> bool {
        match self {
            SeesError::Api(ApiError::Status { status, .. }) => *status >= 500,
            SeesError::Api(ApiError::InvalidResponse { .. }) => false,
            SeesError::Api(_) => true,
            SeesError::Http(_) => true,
            SeesError::Config(_) => false,
            SeesError::PermissionDenied(_) => false,
            SeesError::EventNotFound { .. } => false,
            SeesError::Serialization(_) => false,
            SeesError::Io(_) => true,
            SeesError::UrlParse(_) => false,
            SeesError::Authentication(_) => false,
            SeesError::InvalidInput(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SeesError::Config(_) => ErrorSeverity::Critical,
            SeesError::PermissionDenied(_) => ErrorSeverity::Warning,
            SeesError::Authentication(_) => ErrorSeverity::Warning,
            SeesError::InvalidInput(_) => ErrorSeverity::Info,
            SeesError::EventNotFound { .. } => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }

    /// Short message suitable for showing to the person using the client
    pub fn user_message(&self) -> String {
        match self {
            SeesError::Api(ApiError::Timeout { .. })
            | SeesError::Api(ApiError::Unavailable { .. })
            | SeesError::Http(_) => {
                "Could not reach the SEES server. Please try again.".to_string()
            }
            SeesError::Api(ApiError::Status { message, .. }) if !message.is_empty() => {
                message.clone()
            }
            SeesError::Authentication(_) => "Please log in again.".to_string(),
            SeesError::PermissionDenied(reason) => reason.clone(),
            SeesError::EventNotFound { .. } => "Event not found.".to_string(),
            other => other.to_string(),
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
