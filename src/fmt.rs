//! Text report renderers.
//!
//! Each `fmt_*` function writes one tool's report into any [`fmt::Write`]
//! sink; the `render_*` wrappers collect into a `String`. Output is a pure
//! function of the input, so rendering the same payload twice is
//! byte-identical.

use crate::model::{Codec, CommentEntry, NoteContent, NoteDetail, NoteSummary, VideoStream};
use crate::types::NoteKind;
use std::fmt::{self, Write};

/// Header of the home feed report.
pub const HOME_FEED_HEADER: &str = "首页推荐：";
/// Header of the search report.
pub const SEARCH_HEADER: &str = "搜索结果：";

/// Runs a formatter against a fresh `String` (infallible sink).
fn collect(f: impl FnOnce(&mut String) -> fmt::Result) -> String {
    let mut out = String::new();
    f(&mut out).map(|()| out).unwrap_or_default()
}

// ── labels ──────────────────────────────────────────────────────────────────

/// Short label used in listings.
#[must_use]
pub const fn listing_label(kind: NoteKind) -> &'static str {
    match kind {
        NoteKind::Image => "📷图片",
        NoteKind::Video => "🎬视频",
    }
}

/// Label used in the note detail report.
#[must_use]
pub const fn detail_label(kind: NoteKind) -> &'static str {
    match kind {
        NoteKind::Image => "图片笔记",
        NoteKind::Video => "视频笔记",
    }
}

#[must_use]
pub fn stream_label(stream: &VideoStream) -> &'static str {
    match (stream.codec, stream.backup) {
        (Codec::H264, false) => "H264",
        (Codec::H264, true) => "H264备用",
        (Codec::H265, false) => "H265",
        (Codec::H265, true) => "H265备用",
    }
}

// ── feed / search ───────────────────────────────────────────────────────────

pub fn fmt_notes(w: &mut impl Write, header: &str, notes: &[NoteSummary]) -> fmt::Result {
    write!(w, "{header}\n\n")?;
    for note in notes {
        write!(
            w,
            "{}. [{}] {}\n   点赞数: {}\n   链接: {}\n\n",
            note.index,
            listing_label(note.kind),
            note.title,
            note.liked_count,
            note.permalink
        )?;
    }
    Ok(())
}

#[must_use]
pub fn render_notes(header: &str, notes: &[NoteSummary]) -> String {
    collect(|w| fmt_notes(w, header, notes))
}

// ── note detail ─────────────────────────────────────────────────────────────

pub fn fmt_note_detail(w: &mut impl Write, note: &NoteDetail) -> fmt::Result {
    writeln!(w, "标题: {}", note.title)?;
    writeln!(w, "作者: {}", note.author)?;
    writeln!(w, "类型: {}", detail_label(note.content.kind()))?;
    writeln!(w, "发布时间: {}", note.published_at)?;
    writeln!(w, "点赞数: {}", note.liked_count)?;
    writeln!(w, "评论数: {}", note.comment_count)?;
    writeln!(w, "收藏数: {}", note.collected_count)?;
    write!(w, "链接: {}\n\n", note.permalink)?;
    write!(w, "内容:\n{}\n\n", note.body)?;

    if let NoteContent::Video { streams } = &note.content {
        if !streams.is_empty() {
            writeln!(w, "视频地址:")?;
            for stream in streams {
                writeln!(w, "  - {}: {}", stream_label(stream), stream.url)?;
            }
            writeln!(w)?;
        }
    }

    if let Some(cover) = &note.cover {
        write!(w, "封面图片:\n{cover}")?;
    }
    Ok(())
}

#[must_use]
pub fn render_note_detail(note: &NoteDetail) -> String {
    collect(|w| fmt_note_detail(w, note))
}

// ── comments ────────────────────────────────────────────────────────────────

pub fn fmt_comments(w: &mut impl Write, comments: &[CommentEntry]) -> fmt::Result {
    for c in comments {
        write!(
            w,
            "{}. {}（{}）: {}\n\n",
            c.index, c.nickname, c.posted_at, c.body
        )?;
    }
    Ok(())
}

#[must_use]
pub fn render_comments(comments: &[CommentEntry]) -> String {
    collect(|w| fmt_comments(w, comments))
}
