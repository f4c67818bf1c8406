//! Error types for xhs-mcp.
//!
//! Uses thiserror for ergonomic error handling with proper
//! error chain propagation.

use thiserror::Error;

/// Top-level server error.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Locator error: {0}")]
    Locator(#[from] LocatorError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Tool error: {0}")]
    Tool(String),
}

/// Errors raised while turning user input into a note locator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocatorError {
    #[error("note reference is empty")]
    Empty,

    #[error("invalid note URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("note URL has no note id in its path: {url}")]
    MissingNoteId { url: String },

    #[error("raw note id must be at least {expected} characters, got {actual}")]
    IdTooShort { expected: usize, actual: usize },
}

/// Errors from the platform API client.
///
/// Logical failures (expired cookie, rejected comment) are reported in-band
/// by the platform as `{"success": false}` and are not errors here.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{endpoint} returned HTTP {status} with a non-JSON body")]
    InvalidBody { endpoint: &'static str, status: u16 },

    #[error("invalid cookie header: {0}")]
    InvalidCookie(String),

    #[error("API call failed: {0}")]
    Other(String),
}

/// Result type alias for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Result type alias for API client operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

// Error code implementations for machine-readable error responses
impl ServerError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Locator(e) => e.code(),
            Self::Api(e) => e.code(),
            Self::Config(_) => "CONFIG_ERROR",
            Self::Tool(_) => "TOOL_ERROR",
        }
    }
}

impl LocatorError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Empty => "EMPTY_LOCATOR",
            Self::InvalidUrl { .. } => "MALFORMED_LOCATOR",
            Self::MissingNoteId { .. } => "MISSING_NOTE_ID",
            Self::IdTooShort { .. } => "NOTE_ID_TOO_SHORT",
        }
    }
}

impl ApiError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport(e) if e.is_timeout() => "API_TIMEOUT",
            Self::Transport(_) => "API_TRANSPORT_ERROR",
            Self::InvalidBody { .. } => "API_INVALID_BODY",
            Self::InvalidCookie(_) => "INVALID_COOKIE",
            Self::Other(_) => "API_ERROR",
        }
    }
}
