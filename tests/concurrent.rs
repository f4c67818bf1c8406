//! Concurrent invocation tests.
//!
//! Tool calls share only the read-only API client, so interleaved
//! invocations must not bleed into each other's output.

mod common;

use common::*;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use xhs_mcp::api::XhsApi;
use xhs_mcp::tools::*;

fn keyword_payload(keywords: &str) -> serde_json::Value {
    items_payload(vec![listing_item(
        &format!("id-{keywords}"),
        &format!("关于{keywords}的笔记"),
        json!(1),
        false,
    )])
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_searches_do_not_interfere() {
    let keywords: Vec<String> = (0..16).map(|i| format!("kw{i}")).collect();

    let mut mock = MockApi::new().with_delay(Duration::from_millis(5));
    for kw in &keywords {
        mock = mock.with_search_for(kw, keyword_payload(kw));
    }
    let api: Arc<dyn XhsApi> = Arc::new(mock);

    let mut set = JoinSet::new();
    for kw in keywords.clone() {
        let api = Arc::clone(&api);
        set.spawn(async move {
            let text = execute_search_notes(
                api.as_ref(),
                SearchNotesInput {
                    keywords: kw.clone(),
                },
            )
            .await
            .unwrap();
            (kw, text)
        });
    }

    let mut seen = 0;
    while let Some(joined) = set.join_next().await {
        let (kw, text) = joined.unwrap();
        assert!(text.contains(&format!("0. [📷图片] 关于{kw}的笔记\n")));
        assert!(text.contains(&format!("explore/id-{kw}?xsec_token=tok-id-{kw}")));
        // No other keyword's note leaked in.
        assert_eq!(text.matches("关于").count(), 1);
        seen += 1;
    }
    assert_eq!(seen, keywords.len());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_mixed_tools_interleave() {
    let mock = MockApi::new()
        .with_delay(Duration::from_millis(5))
        .with_home_feed(Reply::Json(items_payload(vec![listing_item(
            "f1",
            "推荐",
            json!(9),
            true,
        )])))
        .with_comments(Reply::Json(comments_payload(vec![comment(
            "小明",
            "好看",
            1_704_067_200_000,
        )])))
        .with_post(Reply::Json(json!({ "success": true })));
    let api = Arc::new(mock);

    let (cookie, feed, comments, posted, empty_search) = tokio::join!(
        execute_check_cookie(&*api),
        execute_home_feed(&*api),
        execute_get_note_comments(&*api, NoteInput { url: note_url("t") }),
        execute_post_comment(
            &*api,
            PostCommentInput {
                note_id: NOTE_ID.to_string(),
                comment: "赞".to_string(),
            },
        ),
        execute_search_notes(
            &*api,
            SearchNotesInput {
                keywords: "无".to_string(),
            },
        ),
    );

    assert_eq!(cookie.unwrap(), "cookie有效");
    assert!(feed.unwrap().contains("[🎬视频] 推荐"));
    assert!(comments.unwrap().starts_with("0. 小明"));
    assert_eq!(posted.unwrap(), COMMENT_POSTED_MSG);
    assert_eq!(empty_search.unwrap(), "未找到与\"无\"相关的笔记");

    // check_cookie plus the empty search's fallback.
    assert_eq!(api.probe_count(), 2);
}
