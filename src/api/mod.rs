//! Platform API seam.
//!
//! Tools talk to the platform only through [`XhsApi`], so the HTTP client can
//! be swapped for a scripted double in tests. Every capability returns the
//! decoded JSON body untouched; interpretation happens in [`crate::model`].

mod http;

pub use http::{ClientConfig, HttpXhsClient, DEFAULT_API_BASE};

use crate::error::ApiResult;
use crate::locator::NoteLocator;
use async_trait::async_trait;
use serde_json::Value;

/// Authenticated access to the platform's web API.
///
/// Implementations report logical failures in-band (`{"success": false}`)
/// and return `Err` only for transport-level problems.
#[async_trait]
pub trait XhsApi: Send + Sync {
    /// Lightweight "who am I" call, used as the session liveness probe.
    async fn get_me(&self) -> ApiResult<Value>;

    /// Recommendation feed for the current session.
    async fn home_feed(&self) -> ApiResult<Value>;

    /// Note search by keywords.
    async fn search_notes(&self, keywords: &str) -> ApiResult<Value>;

    /// Full content of one note.
    async fn get_note_content(&self, locator: &NoteLocator) -> ApiResult<Value>;

    /// First page of a note's top-level comments.
    async fn get_note_comments(&self, locator: &NoteLocator) -> ApiResult<Value>;

    /// Posts a top-level comment on a note.
    async fn post_comment(&self, note_id: &str, comment: &str) -> ApiResult<Value>;
}
