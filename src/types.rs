//! Type-safe newtypes for xhs-mcp.
//!
//! The platform is loose about scalar encodings (counters arrive as
//! `"1.2万"` or as plain numbers, timestamps as integers or floats), so these
//! newtypes absorb that variance once, at the deserialization boundary.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Offset used when rendering timestamps (China Standard Time, UTC+8).
const CST_OFFSET_SECS: i32 = 8 * 3600;

/// Whether a note is a picture set or a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteKind {
    Image,
    Video,
}

impl NoteKind {
    /// Classifies a note card by the presence of a `video` field.
    #[must_use]
    pub const fn from_has_video(has_video: bool) -> Self {
        if has_video {
            Self::Video
        } else {
            Self::Image
        }
    }
}

/// Display form of an interaction counter (likes, comments, collects).
///
/// Kept as text because the platform abbreviates large values (`"1.2万"`).
/// A missing or null counter renders as `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Count(String);

impl Count {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Count {
    fn default() -> Self {
        Self("0".to_string())
    }
}

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Count {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Float(f64),
            Text(String),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Int(n)) => Self(n.to_string()),
            Some(Raw::Float(n)) => Self(n.to_string()),
            Some(Raw::Text(s)) => Self(s),
            None => Self::default(),
        })
    }
}

/// Millisecond Unix timestamp as sent by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Timestamp(i64);

impl Timestamp {
    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    #[must_use]
    pub const fn as_millis(self) -> i64 {
        self.0
    }

    /// Converts to a wall-clock time in China Standard Time.
    #[must_use]
    pub fn to_local(self) -> Option<DateTime<FixedOffset>> {
        let offset = FixedOffset::east_opt(CST_OFFSET_SECS)?;
        DateTime::from_timestamp_millis(self.0).map(|utc| utc.with_timezone(&offset))
    }
}

/// Renders as `YYYY-MM-DD HH:MM:SS`; out-of-range values fall back to the
/// raw millisecond count.
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_local() {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            None => write!(f, "{}", self.0),
        }
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Float(f64),
            Text(String),
        }

        let millis = match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Int(n)) => n,
            // Sub-millisecond precision is not rendered.
            Some(Raw::Float(n)) => n as i64,
            Some(Raw::Text(s)) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| serde::de::Error::custom(format!("invalid timestamp: {s}")))?,
            None => 0,
        };
        Ok(Self(millis))
    }
}
