//! Typed views over raw platform payloads.
//!
//! Payloads are decoded here, once, into small value types that the
//! renderers in [`crate::fmt`] consume. Decoding is per item: an item that
//! lacks a required field is skipped (and logged at debug level) without
//! affecting its siblings, because the upstream schema is partial and drifts.

use crate::locator::{self, NoteLocator};
use crate::types::{Count, NoteKind, Timestamp};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Returns `true` when a response envelope reports `success: true`.
///
/// A numeric `1` is accepted as well; anything else (missing, `false`,
/// strings) is a failure.
#[must_use]
pub fn reports_success(payload: &Value) -> bool {
    match payload.get("success") {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(n)) => n.as_f64() == Some(1.0),
        _ => false,
    }
}

/// Returns `data.<key>` when it is a non-empty array.
fn collection<'a>(payload: &'a Value, key: &str) -> Option<&'a [Value]> {
    payload
        .get("data")?
        .get(key)?
        .as_array()
        .map(Vec::as_slice)
        .filter(|items| !items.is_empty())
}

/// Keeps an explicit `null` as `Some(Value::Null)`; with `#[serde(default)]`
/// only an absent key yields `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ── raw shapes ──────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct RawInteractInfo {
    #[serde(default)]
    liked_count: Count,
    #[serde(default)]
    comment_count: Count,
    #[serde(default)]
    collected_count: Count,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    #[serde(default)]
    nickname: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawFeedItem {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    xsec_token: Option<String>,
    #[serde(default)]
    note_card: Option<RawFeedCard>,
}

#[derive(Debug, Deserialize)]
struct RawFeedCard {
    #[serde(default)]
    display_title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    interact_info: RawInteractInfo,
    #[serde(default, deserialize_with = "present")]
    video: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawDetailItem {
    #[serde(default)]
    note_card: Option<RawDetailCard>,
}

#[derive(Debug, Deserialize)]
struct RawDetailCard {
    #[serde(default, deserialize_with = "nullable")]
    title: String,
    #[serde(default, deserialize_with = "nullable")]
    desc: String,
    #[serde(default)]
    time: Timestamp,
    #[serde(default)]
    user: Option<RawUser>,
    #[serde(default, deserialize_with = "nullable")]
    interact_info: RawInteractInfo,
    #[serde(default, deserialize_with = "nullable")]
    image_list: Vec<RawImage>,
    #[serde(default, deserialize_with = "present")]
    video: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawImage {
    #[serde(default)]
    url_pre: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawVideo {
    #[serde(default)]
    media: Option<RawMedia>,
}

#[derive(Debug, Deserialize)]
struct RawMedia {
    #[serde(default)]
    stream: Option<RawStreams>,
}

#[derive(Debug, Deserialize)]
struct RawStreams {
    #[serde(default, deserialize_with = "nullable")]
    h264: Vec<RawStream>,
    #[serde(default, deserialize_with = "nullable")]
    h265: Vec<RawStream>,
}

#[derive(Debug, Deserialize)]
struct RawStream {
    #[serde(default)]
    master_url: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    backup_urls: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawComment {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    create_time: Timestamp,
    #[serde(default)]
    user_info: Option<RawUser>,
}

// ── feed / search ───────────────────────────────────────────────────────────

/// One entry of a feed or search listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSummary {
    /// 0-based position in the payload (cosmetic; skipped items keep theirs).
    pub index: usize,
    pub kind: NoteKind,
    pub title: String,
    pub liked_count: Count,
    pub permalink: String,
}

impl NoteSummary {
    /// Decodes one listing item. Returns `None` if the item has no
    /// `note_card.display_title` or no `id`.
    #[must_use]
    pub fn from_item(index: usize, item: &Value) -> Option<Self> {
        let raw = match RawFeedItem::deserialize(item) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!(index, error = %e, "skipping undecodable listing item");
                return None;
            }
        };
        let card = raw.note_card?;
        let Some(title) = card.display_title else {
            tracing::debug!(index, "skipping listing item without display_title");
            return None;
        };
        let id = raw.id.filter(|id| !id.is_empty())?;
        let token = raw.xsec_token.filter(|t| !t.is_empty());

        Some(Self {
            index,
            kind: NoteKind::from_has_video(card.video.is_some()),
            title,
            liked_count: card.interact_info.liked_count,
            permalink: locator::permalink(&id, token.as_deref()),
        })
    }
}

/// Decodes every renderable item of a feed/search payload (`data.items`).
///
/// An empty result means "nothing to show": either the collection was
/// absent/empty or every item was skipped.
#[must_use]
pub fn note_summaries(payload: &Value) -> Vec<NoteSummary> {
    collection(payload, "items")
        .unwrap_or_default()
        .iter()
        .enumerate()
        .filter_map(|(index, item)| NoteSummary::from_item(index, item))
        .collect()
}

// ── note detail ─────────────────────────────────────────────────────────────

/// Video codec family of a stream URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    H264,
    H265,
}

/// One playable URL of a video note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoStream {
    pub codec: Codec,
    pub url: String,
    /// `false` for the stream's master URL, `true` for its backups.
    pub backup: bool,
}

/// Media payload of a note, decided once from the presence of `video`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteContent {
    Image,
    /// Stream URLs flattened in codec order (all H264, then all H265),
    /// each master followed by its backups.
    Video { streams: Vec<VideoStream> },
}

impl NoteContent {
    #[must_use]
    pub fn kind(&self) -> NoteKind {
        match self {
            Self::Image => NoteKind::Image,
            Self::Video { .. } => NoteKind::Video,
        }
    }

    fn from_video(video: Option<&Value>) -> Self {
        let Some(video) = video else {
            return Self::Image;
        };
        // A present `video` key marks a video note, even when null or oddly shaped.
        let streams = RawVideo::deserialize(video)
            .ok()
            .and_then(|v| v.media)
            .and_then(|m| m.stream)
            .map(flatten_streams)
            .unwrap_or_default();
        Self::Video { streams }
    }
}

fn flatten_streams(streams: RawStreams) -> Vec<VideoStream> {
    let mut out = Vec::new();
    for (codec, entries) in [(Codec::H264, streams.h264), (Codec::H265, streams.h265)] {
        for entry in entries {
            if let Some(url) = entry.master_url {
                out.push(VideoStream {
                    codec,
                    url,
                    backup: false,
                });
            }
            out.extend(entry.backup_urls.into_iter().map(|url| VideoStream {
                codec,
                url,
                backup: true,
            }));
        }
    }
    out
}

/// Full view of a single note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDetail {
    pub title: String,
    pub author: String,
    pub content: NoteContent,
    pub published_at: Timestamp,
    pub liked_count: Count,
    pub comment_count: Count,
    pub collected_count: Count,
    pub permalink: String,
    pub body: String,
    pub cover: Option<String>,
}

impl NoteDetail {
    /// Builds the detail view from a content payload.
    ///
    /// Only the first element of `data.items` is considered. Returns `None`
    /// when there is no first item or it lacks `note_card.user`. The
    /// permalink is built from `locator`, the address the caller asked for.
    #[must_use]
    pub fn from_payload(payload: &Value, locator: &NoteLocator) -> Option<Self> {
        let first = collection(payload, "items")?.first()?;
        let raw = match RawDetailItem::deserialize(first) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!(note_id = %locator, error = %e, "undecodable note item");
                return None;
            }
        };
        let card = raw.note_card?;
        let Some(user) = card.user else {
            tracing::debug!(note_id = %locator, "note item without user");
            return None;
        };

        let cover = card
            .image_list
            .into_iter()
            .next()
            .and_then(|image| image.url_pre)
            .filter(|url| !url.is_empty());

        Some(Self {
            title: card.title,
            author: user.nickname.unwrap_or_default(),
            content: NoteContent::from_video(card.video.as_ref()),
            published_at: card.time,
            liked_count: card.interact_info.liked_count,
            comment_count: card.interact_info.comment_count,
            collected_count: card.interact_info.collected_count,
            permalink: locator.permalink(),
            body: card.desc,
            cover,
        })
    }
}

// ── comments ────────────────────────────────────────────────────────────────

/// One top-level comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentEntry {
    pub index: usize,
    pub nickname: String,
    pub posted_at: Timestamp,
    pub body: String,
}

impl CommentEntry {
    /// Decodes one comment. Returns `None` without `content` or
    /// `user_info.nickname`.
    #[must_use]
    pub fn from_item(index: usize, item: &Value) -> Option<Self> {
        let raw = match RawComment::deserialize(item) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!(index, error = %e, "skipping undecodable comment");
                return None;
            }
        };
        let (Some(body), Some(nickname)) = (raw.content, raw.user_info.and_then(|u| u.nickname))
        else {
            tracing::debug!(index, "skipping comment without content or author");
            return None;
        };
        Some(Self {
            index,
            nickname,
            posted_at: raw.create_time,
            body,
        })
    }
}

/// Decodes every renderable comment of a comments payload (`data.comments`).
#[must_use]
pub fn comments(payload: &Value) -> Vec<CommentEntry> {
    collection(payload, "comments")
        .unwrap_or_default()
        .iter()
        .enumerate()
        .filter_map(|(index, item)| CommentEntry::from_item(index, item))
        .collect()
}
