//! Benchmarks for chatdemux feed loading, classification and output.
//!
//! Run with: `cargo bench`
//! Run specific group: `cargo bench --bench classify -- build_chat`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chatdemux::config::FeedConfig;
use chatdemux::feed::{ChatFileFeed, fix_mojibake_encoding};
use chatdemux::output::{to_csv, to_json, to_jsonl};
use chatdemux::{RawEvent, build_chat};

// =============================================================================
// Test Data Generators
// =============================================================================

/// A mix of plain text and generated notices, so most rules get exercised
/// and most events fall through to the text rule.
fn sentence(i: usize, sender: &str) -> String {
    match i % 12 {
        0 => format!("{sender} started a call."),
        1 => format!("{sender} joined the call."),
        2 => "The call ended.".to_string(),
        3 => format!("{sender} set the nickname for Bob to B{i}."),
        4 => format!("{sender} voted for \"Option {i}\" in the poll: Dinner."),
        5 => format!("{sender} scored {i} points playing Snake."),
        _ => format!("Message number {i}"),
    }
}

fn generate_events(count: usize) -> Vec<RawEvent> {
    (0..count)
        .map(|i| {
            let sender = if i % 2 == 0 { "Alice" } else { "Bob" };
            RawEvent::text(sender, 1705314600000 + i as i64 * 60000, sentence(i, sender))
        })
        .collect()
}

fn generate_export_json(count: usize) -> String {
    let mut messages = Vec::with_capacity(count);
    for i in (0..count).rev() {
        let sender = if i % 2 == 0 { "Alice" } else { "Bob" };
        let timestamp = 1705314600000i64 + (i as i64 * 60000);
        messages.push(format!(
            r#"{{"sender_name": "{}", "timestamp_ms": {}, "content": "{}", "type": "Generic"}}"#,
            sender,
            timestamp,
            sentence(i, sender).replace('"', "\\\"")
        ));
    }
    format!(
        r#"{{"participants": [{{"name": "Alice"}}, {{"name": "Bob"}}], "messages": [{}]}}"#,
        messages.join(",\n")
    )
}

// =============================================================================
// Build Benchmarks
// =============================================================================

fn bench_build_chat(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_chat");

    for size in [100_usize, 1_000, 10_000] {
        let events = generate_events(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &events, |b, events| {
            b.iter(|| {
                let chat = build_chat(black_box(events.clone()), "Alice").unwrap();
                black_box(chat)
            });
        });
    }
    group.finish();
}

fn bench_load_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_export");

    for fix_encoding in [true, false] {
        let json = generate_export_json(10_000);
        let config = FeedConfig::new().with_fix_encoding(fix_encoding);
        group.throughput(Throughput::Bytes(json.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("fix_encoding", fix_encoding),
            &json,
            |b, json| {
                b.iter(|| {
                    let feed = ChatFileFeed::from_json_str(black_box(json), &config).unwrap();
                    black_box(feed)
                });
            },
        );
    }
    group.finish();
}

fn bench_fix_encoding(c: &mut Criterion) {
    // "Привет" as exported.
    let garbled = "\u{d0}\u{9f}\u{d1}\u{80}\u{d0}\u{b8}\u{d0}\u{b2}\u{d0}\u{b5}\u{d1}\u{82} ".repeat(20);
    let clean = "Hello world, nothing to repair here".repeat(10);

    c.bench_function("fix_mojibake_garbled", |b| {
        b.iter(|| black_box(fix_mojibake_encoding(black_box(&garbled))));
    });
    c.bench_function("fix_mojibake_clean", |b| {
        b.iter(|| black_box(fix_mojibake_encoding(black_box(&clean))));
    });
}

// =============================================================================
// Output Benchmarks
// =============================================================================

fn bench_output(c: &mut Criterion) {
    let mut group = c.benchmark_group("output");
    let chat = build_chat(generate_events(10_000), "Alice").unwrap();
    let messages = chat.messages();
    group.throughput(Throughput::Elements(messages.len() as u64));

    group.bench_function("csv", |b| b.iter(|| black_box(to_csv(black_box(messages)).unwrap())));
    group.bench_function("json", |b| b.iter(|| black_box(to_json(black_box(messages)).unwrap())));
    group.bench_function("jsonl", |b| {
        b.iter(|| black_box(to_jsonl(black_box(messages)).unwrap()))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_build_chat,
    bench_load_export,
    bench_fix_encoding,
    bench_output,
);

criterion_main!(benches);
