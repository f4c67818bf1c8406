//! Note locator parsing.
//!
//! Every note-scoped API call needs two identifiers: the note id and the
//! `xsec_token` that scopes access to it. Callers hand us either a share URL
//! (`https://www.xiaohongshu.com/explore/<id>?xsec_token=<tok>`) or the two
//! values concatenated (`<24-char id><token>`).

use crate::error::LocatorError;
use std::fmt;
use url::Url;

/// Base used to resolve relative note URLs and to build permalinks.
pub const WEB_BASE: &str = "https://www.xiaohongshu.com/";

/// Width of a note id, in characters.
pub const NOTE_ID_LEN: usize = 24;

const TOKEN_PARAM: &str = "xsec_token";

/// The `(note_id, xsec_token)` pair addressing one note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteLocator {
    pub note_id: String,
    pub xsec_token: Option<String>,
}

impl NoteLocator {
    #[must_use]
    pub fn new(note_id: impl Into<String>, xsec_token: Option<String>) -> Self {
        Self {
            note_id: note_id.into(),
            xsec_token,
        }
    }

    /// Parses either a URL or a raw id+token string.
    ///
    /// Input with a scheme, a leading `/`, a query, or a `/` inside the id
    /// span goes through [`NoteLocator::from_url`]. Everything else is a
    /// concatenated id pair, whose token may itself contain `/`.
    pub fn parse(input: &str) -> Result<Self, LocatorError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(LocatorError::Empty);
        }
        if looks_like_url(input) {
            Self::from_url(input)
        } else {
            Self::from_id_pair(input)
        }
    }

    /// Extracts the locator from a note URL.
    ///
    /// The note id is the final path segment; the token is the first
    /// `xsec_token` query value. A missing or blank token is `None`.
    /// Relative URLs are resolved against [`WEB_BASE`].
    pub fn from_url(input: &str) -> Result<Self, LocatorError> {
        let url = parse_url(input)?;

        let note_id = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default()
            .to_string();
        if note_id.is_empty() {
            return Err(LocatorError::MissingNoteId {
                url: input.to_string(),
            });
        }

        let xsec_token = url
            .query_pairs()
            .find(|(key, _)| key == TOKEN_PARAM)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty());

        Ok(Self {
            note_id,
            xsec_token,
        })
    }

    /// Splits a raw `<id><token>` string: the first [`NOTE_ID_LEN`]
    /// characters are the id, the remainder (if any) is the token.
    pub fn from_id_pair(raw: &str) -> Result<Self, LocatorError> {
        let split = raw
            .char_indices()
            .nth(NOTE_ID_LEN)
            .map_or(raw.len(), |(byte_idx, _)| byte_idx);

        let actual = raw.chars().count();
        if actual < NOTE_ID_LEN {
            return Err(LocatorError::IdTooShort {
                expected: NOTE_ID_LEN,
                actual,
            });
        }

        let (note_id, token) = raw.split_at(split);
        Ok(Self {
            note_id: note_id.to_string(),
            xsec_token: (!token.is_empty()).then(|| token.to_string()),
        })
    }

    /// Returns the note's web URL, carrying the token when there is one.
    #[must_use]
    pub fn permalink(&self) -> String {
        permalink(&self.note_id, self.xsec_token.as_deref())
    }
}

impl fmt::Display for NoteLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.note_id)
    }
}

/// Builds `https://www.xiaohongshu.com/explore/<id>[?xsec_token=<tok>]`.
#[must_use]
pub fn permalink(note_id: &str, xsec_token: Option<&str>) -> String {
    match xsec_token {
        Some(token) => format!("{WEB_BASE}explore/{note_id}?{TOKEN_PARAM}={token}"),
        None => format!("{WEB_BASE}explore/{note_id}"),
    }
}

fn looks_like_url(input: &str) -> bool {
    input.contains("://")
        || input.starts_with('/')
        || input.contains('?')
        || input.chars().take(NOTE_ID_LEN).any(|c| c == '/')
}

fn parse_url(input: &str) -> Result<Url, LocatorError> {
    let invalid = |e: url::ParseError| LocatorError::InvalidUrl {
        url: input.to_string(),
        reason: e.to_string(),
    };

    match Url::parse(input) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(WEB_BASE)
            .and_then(|base| base.join(input))
            .map_err(invalid),
        Err(e) => Err(invalid(e)),
    }
}
