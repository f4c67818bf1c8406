//! Comment posting tool.

use super::{require, run_pipeline};
use crate::api::XhsApi;
use crate::model::reports_success;
use schemars::JsonSchema;
use serde::Deserialize;

pub const COMMENT_POSTED_MSG: &str = "回复成功";
/// Shown when the platform rejects the comment but the session is live.
pub const COMMENT_FAILED_MSG: &str = "回复失败";

/// Input for the post_comment tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PostCommentInput {
    /// Id of the note to comment on
    pub note_id: String,
    /// Comment text to publish
    pub comment: String,
}

/// Executes the post_comment tool.
///
/// A falsy `success` flag is ambiguous (rejected comment vs. dead session),
/// so it goes through the same probe fallback as an empty listing.
///
/// # Errors
///
/// Returns a tool error if `note_id` or `comment` is blank.
pub async fn execute_post_comment(
    api: &dyn XhsApi,
    input: PostCommentInput,
) -> crate::Result<String> {
    require("note_id", &input.note_id)?;
    require("comment", &input.comment)?;
    let note_id = input.note_id.trim();
    tracing::info!(note_id, chars = input.comment.chars().count(), "post_comment");

    Ok(run_pipeline(
        api,
        "post_comment",
        note_id,
        api.post_comment(note_id, &input.comment),
        |payload| reports_success(payload).then_some(()),
        |()| COMMENT_POSTED_MSG.to_string(),
        COMMENT_FAILED_MSG,
    )
    .await)
}
