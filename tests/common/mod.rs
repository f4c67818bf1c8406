//! Common test utilities for xhs-mcp integration tests.
//!
//! Provides `MockApi`, a scripted `XhsApi` double that records every call,
//! plus payload builders shaped like the platform's responses.

#![allow(dead_code)] // Test utilities may not all be used in every test file

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use xhs_mcp::api::XhsApi;
use xhs_mcp::error::{ApiError, ApiResult};
use xhs_mcp::NoteLocator;

/// Canned outcome for one capability.
#[derive(Clone)]
pub enum Reply {
    Json(Value),
    Fail(String),
}

impl Reply {
    fn produce(&self) -> ApiResult<Value> {
        match self {
            Self::Json(v) => Ok(v.clone()),
            Self::Fail(msg) => Err(ApiError::Other(msg.clone())),
        }
    }
}

/// The platform's "nothing here" envelope.
pub fn empty_envelope() -> Value {
    json!({ "code": 0, "success": true, "msg": "成功", "data": {} })
}

/// Scripted API double.
pub struct MockApi {
    me: Reply,
    home_feed: Reply,
    search: Reply,
    search_by_keyword: HashMap<String, Value>,
    content: Reply,
    comments: Reply,
    post: Reply,
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
}

impl MockApi {
    /// A live session where every data call returns an empty envelope.
    pub fn new() -> Self {
        Self {
            me: Reply::Json(json!({ "success": true, "data": { "nickname": "tester" } })),
            home_feed: Reply::Json(empty_envelope()),
            search: Reply::Json(empty_envelope()),
            search_by_keyword: HashMap::new(),
            content: Reply::Json(empty_envelope()),
            comments: Reply::Json(empty_envelope()),
            post: Reply::Json(json!({ "success": false })),
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Makes the liveness probe report an expired session.
    pub fn with_expired_session(mut self) -> Self {
        self.me = Reply::Json(json!({ "success": false, "code": -100, "msg": "登录已过期" }));
        self
    }

    /// Makes the liveness probe itself fail at the transport level.
    pub fn with_probe_error(mut self) -> Self {
        self.me = Reply::Fail("connection reset".to_string());
        self
    }

    pub fn with_home_feed(mut self, reply: Reply) -> Self {
        self.home_feed = reply;
        self
    }

    pub fn with_search(mut self, reply: Reply) -> Self {
        self.search = reply;
        self
    }

    /// Routes a specific keyword to its own payload.
    pub fn with_search_for(mut self, keywords: &str, payload: Value) -> Self {
        self.search_by_keyword.insert(keywords.to_string(), payload);
        self
    }

    pub fn with_content(mut self, reply: Reply) -> Self {
        self.content = reply;
        self
    }

    pub fn with_comments(mut self, reply: Reply) -> Self {
        self.comments = reply;
        self
    }

    pub fn with_post(mut self, reply: Reply) -> Self {
        self.post = reply;
        self
    }

    /// Delays every call, to force interleaving in concurrency tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Every call made so far, as `capability[:args]`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of liveness probes made so far.
    pub fn probe_count(&self) -> usize {
        self.calls().iter().filter(|c| c.as_str() == "get_me").count()
    }

    async fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl XhsApi for MockApi {
    async fn get_me(&self) -> ApiResult<Value> {
        self.record("get_me".to_string()).await;
        self.me.produce()
    }

    async fn home_feed(&self) -> ApiResult<Value> {
        self.record("home_feed".to_string()).await;
        self.home_feed.produce()
    }

    async fn search_notes(&self, keywords: &str) -> ApiResult<Value> {
        self.record(format!("search_notes:{keywords}")).await;
        match self.search_by_keyword.get(keywords) {
            Some(payload) => Ok(payload.clone()),
            None => self.search.produce(),
        }
    }

    async fn get_note_content(&self, locator: &NoteLocator) -> ApiResult<Value> {
        let token = locator.xsec_token.as_deref().unwrap_or("-");
        self.record(format!("get_note_content:{}:{token}", locator.note_id))
            .await;
        self.content.produce()
    }

    async fn get_note_comments(&self, locator: &NoteLocator) -> ApiResult<Value> {
        let token = locator.xsec_token.as_deref().unwrap_or("-");
        self.record(format!("get_note_comments:{}:{token}", locator.note_id))
            .await;
        self.comments.produce()
    }

    async fn post_comment(&self, note_id: &str, comment: &str) -> ApiResult<Value> {
        self.record(format!("post_comment:{note_id}:{comment}")).await;
        self.post.produce()
    }
}

// ── payload builders ────────────────────────────────────────────────────────

/// A feed/search item as returned by the platform.
pub fn listing_item(id: &str, title: &str, liked: Value, video: bool) -> Value {
    let mut card = json!({
        "type": if video { "video" } else { "normal" },
        "display_title": title,
        "user": { "nickname": "作者", "user_id": "u1" },
        "interact_info": { "liked": false, "liked_count": liked },
        "cover": { "url_default": "http://img/cover.jpg" }
    });
    if video {
        card["video"] = json!({ "capa": { "duration": 30 } });
    }
    json!({ "id": id, "model_type": "note", "xsec_token": format!("tok-{id}"), "note_card": card })
}

/// A listing item whose card has no `display_title`.
pub fn untitled_item(id: &str) -> Value {
    json!({
        "id": id,
        "model_type": "note",
        "xsec_token": "tok",
        "note_card": { "interact_info": { "liked_count": "1" } }
    })
}

/// Wraps items in a `data.items` envelope.
pub fn items_payload(items: Vec<Value>) -> Value {
    json!({ "code": 0, "success": true, "data": { "items": items, "has_more": false } })
}

/// A note-detail item with an image note card.
pub fn image_note(title: &str, desc: &str) -> Value {
    json!({
        "id": "64f1a2b3c4d5e6f708192a3b",
        "model_type": "note",
        "note_card": {
            "type": "normal",
            "title": title,
            "desc": desc,
            "time": 1_704_067_200_000_i64,
            "user": { "nickname": "咖啡师", "user_id": "u1" },
            "interact_info": { "liked_count": "120", "comment_count": "8", "collected_count": "30" },
            "image_list": [
                { "url_pre": "http://img/pre-1.jpg", "url_default": "http://img/1.jpg" },
                { "url_pre": "http://img/pre-2.jpg", "url_default": "http://img/2.jpg" }
            ]
        }
    })
}

/// Turns an image note item into a video note item with the given stream map.
pub fn with_video(mut item: Value, stream: Value) -> Value {
    item["note_card"]["type"] = json!("video");
    item["note_card"]["video"] = json!({ "media": { "stream": stream } });
    item
}

/// One comment as returned by the platform.
pub fn comment(nickname: &str, content: &str, create_time: i64) -> Value {
    json!({
        "id": format!("c-{nickname}"),
        "content": content,
        "create_time": create_time,
        "like_count": "0",
        "user_info": { "nickname": nickname, "user_id": "u2" },
        "sub_comments": []
    })
}

/// Wraps comments in a `data.comments` envelope.
pub fn comments_payload(comments: Vec<Value>) -> Value {
    json!({ "code": 0, "success": true, "data": { "comments": comments, "has_more": false, "cursor": "" } })
}

pub const NOTE_ID: &str = "64f1a2b3c4d5e6f708192a3b";

/// Share URL for [`NOTE_ID`] with the given token.
pub fn note_url(token: &str) -> String {
    format!("https://www.xiaohongshu.com/explore/{NOTE_ID}?xsec_token={token}&xsec_source=pc_feed")
}
