//! Note listing tools: home feed and search.
//!
//! Both endpoints return the same `data.items` shape and render through
//! [`fmt::render_notes`]; only the call and the header differ.

use super::{non_empty, require, run_pipeline};
use crate::api::XhsApi;
use crate::fmt;
use crate::model;
use schemars::JsonSchema;
use serde::Deserialize;

/// Shown when the feed is empty but the session is live.
pub const NO_FEED_NOTES_MSG: &str = "未找到相关的笔记";

fn no_search_results(keywords: &str) -> String {
    format!("未找到与\"{keywords}\"相关的笔记")
}

/// Executes the home_feed tool.
pub async fn execute_home_feed(api: &dyn XhsApi) -> crate::Result<String> {
    tracing::info!("home_feed");
    Ok(run_pipeline(
        api,
        "home_feed",
        "",
        api.home_feed(),
        |payload| non_empty(model::note_summaries(payload)),
        |notes| fmt::render_notes(fmt::HOME_FEED_HEADER, &notes),
        NO_FEED_NOTES_MSG,
    )
    .await)
}

/// Input for the search_notes tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchNotesInput {
    /// Search keywords
    pub keywords: String,
}

/// Executes the search_notes tool.
///
/// # Errors
///
/// Returns a tool error if `keywords` is blank.
pub async fn execute_search_notes(
    api: &dyn XhsApi,
    input: SearchNotesInput,
) -> crate::Result<String> {
    require("keywords", &input.keywords)?;
    let keywords = input.keywords.trim();
    tracing::info!(keywords, "search_notes");

    Ok(run_pipeline(
        api,
        "search_notes",
        keywords,
        api.search_notes(keywords),
        |payload| non_empty(model::note_summaries(payload)),
        |notes| fmt::render_notes(fmt::SEARCH_HEADER, &notes),
        no_search_results(keywords),
    )
    .await)
}
