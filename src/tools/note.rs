//! Note-scoped read tools: content and comments.

use super::{non_empty, run_pipeline};
use crate::api::XhsApi;
use crate::fmt;
use crate::locator::NoteLocator;
use crate::model::{self, NoteDetail};
use schemars::JsonSchema;
use serde::Deserialize;

/// Shown when the note could not be read but the session is live.
pub const NOTE_FETCH_FAILED_MSG: &str = "获取失败";
/// Shown when a note has no comments and the session is live.
pub const NO_COMMENTS_MSG: &str = "暂无评论";

/// Input for the note tools.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct NoteInput {
    /// Note URL including its xsec_token query parameter, or the note id
    /// immediately followed by the token
    pub url: String,
}

fn resolve(tool: &'static str, url: &str) -> crate::Result<NoteLocator> {
    NoteLocator::parse(url).map_err(|e| {
        tracing::warn!(tool, url, error = %e, "malformed note locator");
        e.into()
    })
}

/// Executes the get_note_content tool.
///
/// # Errors
///
/// Returns a locator error if `url` is not a usable note reference.
pub async fn execute_get_note_content(
    api: &dyn XhsApi,
    input: NoteInput,
) -> crate::Result<String> {
    let locator = resolve("get_note_content", &input.url)?;
    tracing::info!(url = %input.url, note_id = %locator, "get_note_content");

    Ok(run_pipeline(
        api,
        "get_note_content",
        &input.url,
        api.get_note_content(&locator),
        |payload| NoteDetail::from_payload(payload, &locator),
        |note| fmt::render_note_detail(&note),
        NOTE_FETCH_FAILED_MSG,
    )
    .await)
}

/// Executes the get_note_comments tool.
///
/// # Errors
///
/// Returns a locator error if `url` is not a usable note reference.
pub async fn execute_get_note_comments(
    api: &dyn XhsApi,
    input: NoteInput,
) -> crate::Result<String> {
    let locator = resolve("get_note_comments", &input.url)?;
    tracing::info!(url = %input.url, note_id = %locator, "get_note_comments");

    Ok(run_pipeline(
        api,
        "get_note_comments",
        &input.url,
        api.get_note_comments(&locator),
        |payload| non_empty(model::comments(payload)),
        |comments| fmt::render_comments(&comments),
        NO_COMMENTS_MSG,
    )
    .await)
}
