//! reqwest-backed implementation of [`XhsApi`].

use super::XhsApi;
use crate::error::{ApiError, ApiResult};
use crate::locator::NoteLocator;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE, ORIGIN, REFERER};
use serde_json::{json, Value};
use std::fmt;
use std::time::Duration;

/// Default web API host.
pub const DEFAULT_API_BASE: &str = "https://edith.xiaohongshu.com";

const WEB_ORIGIN: &str = "https://www.xiaohongshu.com";
const WEB_REFERER: &str = "https://www.xiaohongshu.com/";
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Page size requested from search.
const SEARCH_PAGE_SIZE: u32 = 20;
/// Number of notes requested from the home feed.
const FEED_PAGE_SIZE: u32 = 18;

const IMAGE_FORMATS: [&str; 3] = ["jpg", "webp", "avif"];

/// Connection settings for [`HttpXhsClient`].
#[derive(Clone)]
pub struct ClientConfig {
    /// API host, without trailing path (e.g. `https://edith.xiaohongshu.com`).
    pub base_url: String,
    /// Raw `Cookie` header value of a logged-in web session.
    pub cookie: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    #[must_use]
    pub fn new(cookie: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            cookie: cookie.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// The cookie is a live credential; keep it out of logs.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("cookie", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// HTTP client for the platform's web API.
///
/// The session cookie is bound once at construction and sent with every
/// request.
pub struct HttpXhsClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpXhsClient {
    /// Builds a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidCookie`] if the cookie is empty or not a
    /// valid header value, or a transport error if the TLS backend fails to
    /// initialize.
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let cookie = config.cookie.trim();
        if cookie.is_empty() {
            return Err(ApiError::InvalidCookie("cookie is empty".to_string()));
        }
        let mut cookie =
            HeaderValue::from_str(cookie).map_err(|e| ApiError::InvalidCookie(e.to_string()))?;
        cookie.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, cookie);
        headers.insert(ORIGIN, HeaderValue::from_static(WEB_ORIGIN));
        headers.insert(REFERER, HeaderValue::from_static(WEB_REFERER));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get(
        &self,
        endpoint: &'static str,
        path: &str,
        query: &[(&str, &str)],
    ) -> ApiResult<Value> {
        tracing::debug!(endpoint, "GET {path}");
        let response = self.client.get(self.url(path)).query(query).send().await?;
        decode(endpoint, response).await
    }

    async fn post(&self, endpoint: &'static str, path: &str, body: &Value) -> ApiResult<Value> {
        tracing::debug!(endpoint, "POST {path}");
        let response = self.client.post(self.url(path)).json(body).send().await?;
        decode(endpoint, response).await
    }
}

/// Decodes a response body as JSON regardless of status.
///
/// The platform answers auth and validation failures with a JSON envelope
/// (`{"success": false, "msg": ...}`) and a 4xx/5xx status; that envelope is
/// what callers inspect, so it is passed through as data.
async fn decode(endpoint: &'static str, response: reqwest::Response) -> ApiResult<Value> {
    let status = response.status();
    let body = response.bytes().await?;
    match serde_json::from_slice::<Value>(&body) {
        Ok(value) => {
            if !status.is_success() {
                tracing::debug!(endpoint, status = status.as_u16(), "non-success status with JSON body");
            }
            Ok(value)
        }
        Err(_) => Err(ApiError::InvalidBody {
            endpoint,
            status: status.as_u16(),
        }),
    }
}

/// Opaque id the search endpoint uses to correlate result pages.
fn search_id() -> String {
    format!("{:x}", chrono::Utc::now().timestamp_millis())
}

#[async_trait]
impl XhsApi for HttpXhsClient {
    async fn get_me(&self) -> ApiResult<Value> {
        self.get("user/me", "/api/sns/web/v2/user/me", &[]).await
    }

    async fn home_feed(&self) -> ApiResult<Value> {
        let body = json!({
            "cursor_score": "",
            "num": FEED_PAGE_SIZE,
            "refresh_type": 1,
            "note_index": 0,
            "unread_begin_note_id": "",
            "unread_end_note_id": "",
            "unread_note_count": 0,
            "category": "homefeed_recommend",
            "search_key": "",
            "need_num": FEED_PAGE_SIZE / 2,
            "image_formats": IMAGE_FORMATS,
        });
        self.post("homefeed", "/api/sns/web/v1/homefeed", &body).await
    }

    async fn search_notes(&self, keywords: &str) -> ApiResult<Value> {
        let body = json!({
            "keyword": keywords,
            "page": 1,
            "page_size": SEARCH_PAGE_SIZE,
            "search_id": search_id(),
            "sort": "general",
            "note_type": 0,
            "image_formats": IMAGE_FORMATS,
        });
        self.post("search/notes", "/api/sns/web/v1/search/notes", &body)
            .await
    }

    async fn get_note_content(&self, locator: &NoteLocator) -> ApiResult<Value> {
        let body = json!({
            "source_note_id": locator.note_id,
            "image_formats": IMAGE_FORMATS,
            "extra": { "need_body_topic": "1" },
            "xsec_source": "pc_feed",
            "xsec_token": locator.xsec_token.as_deref().unwrap_or_default(),
        });
        self.post("feed", "/api/sns/web/v1/feed", &body).await
    }

    async fn get_note_comments(&self, locator: &NoteLocator) -> ApiResult<Value> {
        let image_formats = IMAGE_FORMATS.join(",");
        let query = [
            ("note_id", locator.note_id.as_str()),
            ("cursor", ""),
            ("top_comment_id", ""),
            ("image_formats", image_formats.as_str()),
            ("xsec_token", locator.xsec_token.as_deref().unwrap_or_default()),
        ];
        self.get("comment/page", "/api/sns/web/v2/comment/page", &query)
            .await
    }

    async fn post_comment(&self, note_id: &str, comment: &str) -> ApiResult<Value> {
        let body = json!({
            "note_id": note_id,
            "content": comment,
            "at_users": [],
        });
        self.post("comment/post", "/api/sns/web/v1/comment/post", &body)
            .await
    }
}
