//! Session liveness probing.
//!
//! The platform answers an expired cookie with the same empty envelope it
//! uses for "no results", so an empty payload alone cannot tell the two
//! apart. Data-returning tools call [`explain_empty`] in that case: it probes
//! the session and picks the message the caller should actually see.

use crate::api::XhsApi;
use crate::model::reports_success;
use serde_json::Value;
use std::fmt;

/// Message for a live session.
pub const SESSION_VALID_MSG: &str = "cookie有效";
/// Message for an expired or rejected session.
pub const SESSION_INVALID_MSG: &str = "cookie已失效";

/// Whether the configured session credential still grants access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Valid,
    Invalid,
}

impl SessionStatus {
    /// Classifies a `get_me` response.
    #[must_use]
    pub fn from_response(payload: &Value) -> Self {
        if reports_success(payload) {
            Self::Valid
        } else {
            Self::Invalid
        }
    }

    #[must_use]
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }

    /// User-facing message for this status.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Valid => SESSION_VALID_MSG,
            Self::Invalid => SESSION_INVALID_MSG,
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Probes the session with a `get_me` call.
///
/// Never fails: transport errors are logged and reported as
/// [`SessionStatus::Invalid`].
pub async fn probe(api: &dyn XhsApi) -> SessionStatus {
    match api.get_me().await {
        Ok(payload) => {
            let status = SessionStatus::from_response(&payload);
            tracing::debug!(?status, "session probe");
            status
        }
        Err(e) => {
            tracing::warn!(error = %e, code = e.code(), "session probe failed");
            SessionStatus::Invalid
        }
    }
}

/// Chooses between `empty_message` and the invalid-session message.
#[must_use]
pub fn classify(status: SessionStatus, empty_message: impl Into<String>) -> String {
    match status {
        SessionStatus::Valid => empty_message.into(),
        SessionStatus::Invalid => status.message().to_string(),
    }
}

/// Probes the session and explains an empty result.
pub async fn explain_empty(api: &dyn XhsApi, empty_message: impl Into<String>) -> String {
    classify(probe(api).await, empty_message)
}
