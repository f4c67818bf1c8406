//! MCP tool implementations.
//!
//! Every data-returning tool runs the same two-step pipeline:
//!
//! ```text
//! primary call ──Err──────────────────────────────▶ "cookie已失效"
//!      │
//!      Ok(payload) ─▶ decode ─▶ Some(data) ─▶ render
//!                                 │
//!                                 None ─▶ probe() ─▶ Valid   ─▶ empty message
//!                                                 └▶ Invalid ─▶ "cookie已失效"
//! ```

mod comment;
mod cookie;
mod listing;
mod note;

use crate::api::XhsApi;
use crate::error::ApiResult;
use crate::session::{self, SessionStatus};
use serde_json::Value;
use std::future::Future;

// comment
pub use comment::{execute_post_comment, PostCommentInput, COMMENT_FAILED_MSG, COMMENT_POSTED_MSG};

// cookie
pub use cookie::execute_check_cookie;

// listing
pub use listing::{execute_home_feed, execute_search_notes, SearchNotesInput, NO_FEED_NOTES_MSG};

// note
pub use note::{
    execute_get_note_comments, execute_get_note_content, NoteInput, NO_COMMENTS_MSG,
    NOTE_FETCH_FAILED_MSG,
};

/// Runs `call`, decodes its payload and renders it, falling back to the
/// session probe when there is nothing to render.
///
/// `input` is only used for logging.
async fn run_pipeline<T, Fut>(
    api: &dyn XhsApi,
    tool: &'static str,
    input: &str,
    call: Fut,
    decode: impl FnOnce(&Value) -> Option<T>,
    render: impl FnOnce(T) -> String,
    empty_message: impl Into<String>,
) -> String
where
    Fut: Future<Output = ApiResult<Value>>,
{
    let payload = match call.await {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(tool, input, error = %e, code = e.code(), "API call failed");
            return SessionStatus::Invalid.message().to_string();
        }
    };

    match decode(&payload) {
        Some(data) => render(data),
        None => {
            tracing::debug!(tool, input, "nothing to render, probing session");
            session::explain_empty(api, empty_message).await
        }
    }
}

/// Maps an empty collection to `None` so the pipeline treats it as empty.
fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    (!items.is_empty()).then_some(items)
}

/// Rejects blank required string arguments before any network call.
fn require(field: &str, value: &str) -> crate::Result<()> {
    if value.trim().is_empty() {
        return Err(crate::ServerError::Tool(format!("'{field}' must not be empty")));
    }
    Ok(())
}
