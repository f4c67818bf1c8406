//! Performance benchmarks for the decode + render hot path.
//!
//! Measures payload decoding and text rendering for listing payloads of
//! increasing size, and for a video note with many stream URLs.
//!
//! Run with: `cargo bench`
//! View reports: `open target/criterion/report/index.html`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::{json, Value};
use xhs_mcp::fmt;
use xhs_mcp::model::{self, NoteDetail};
use xhs_mcp::NoteLocator;

fn listing_payload(size: usize) -> Value {
    let items: Vec<Value> = (0..size)
        .map(|i| {
            let mut card = json!({
                "display_title": format!("第{i}篇笔记：周末去哪儿"),
                "interact_info": { "liked_count": format!("{i}") },
            });
            if i % 3 == 0 {
                card["video"] = json!({ "capa": { "duration": 30 } });
            }
            // Every tenth item is malformed and gets skipped.
            if i % 10 == 9 {
                if let Some(card) = card.as_object_mut() {
                    card.remove("display_title");
                }
            }
            json!({ "id": format!("{i:024x}"), "xsec_token": "tok", "note_card": card })
        })
        .collect();
    json!({ "success": true, "data": { "items": items } })
}

fn video_payload(streams: usize) -> Value {
    let entries: Vec<Value> = (0..streams)
        .map(|i| {
            json!({
                "master_url": format!("http://v/{i}.mp4"),
                "backup_urls": [format!("http://v/{i}-b1.mp4"), format!("http://v/{i}-b2.mp4")]
            })
        })
        .collect();
    json!({ "data": { "items": [ { "note_card": {
        "title": "vlog",
        "desc": "正文".repeat(200),
        "time": 1_704_067_200_000_i64,
        "user": { "nickname": "作者" },
        "interact_info": { "liked_count": "1.2万", "comment_count": "88", "collected_count": "300" },
        "image_list": [ { "url_pre": "http://img/cover.jpg" } ],
        "video": { "media": { "stream": { "h264": entries, "h265": entries } } }
    }}]}})
}

/// Benchmarks listing decode + render at different payload sizes.
fn bench_listing(c: &mut Criterion) {
    let mut group = c.benchmark_group("listing");

    for size in [10, 100, 1_000] {
        let payload = listing_payload(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &payload, |b, payload| {
            b.iter(|| {
                let notes = model::note_summaries(black_box(payload));
                black_box(fmt::render_notes(fmt::SEARCH_HEADER, &notes))
            })
        });
    }

    group.finish();
}

/// Benchmarks note detail decode + render with many video streams.
fn bench_note_detail(c: &mut Criterion) {
    let locator = NoteLocator::new("64f1a2b3c4d5e6f708192a3b", Some("tok".to_string()));
    let payload = video_payload(20);

    c.bench_function("note_detail", |b| {
        b.iter(|| {
            let detail = NoteDetail::from_payload(black_box(&payload), &locator);
            black_box(detail.map(|d| fmt::render_note_detail(&d)))
        })
    });
}

criterion_group!(benches, bench_listing, bench_note_detail);
criterion_main!(benches);
