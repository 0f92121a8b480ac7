//! Benchmarks for searching an index.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tagnote::search::{SearchPreset, search};
use tagnote::structure::build_index;

fn sample_note(lines: usize) -> String {
    (0..lines)
        .map(|i| {
            if i % 11 == 0 {
                format!("#todo call back \u{2014} ticket {i}")
            } else {
                format!("meeting notes line {i}, nothing urgent here")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn bench_literal(c: &mut Criterion) {
    let (index, _) = build_index(&sample_note(5_000), "link");
    c.bench_function("search_literal_5k", |b| {
        b.iter(|| search(&index, black_box("ticket")));
    });
}

fn bench_pattern(c: &mut Criterion) {
    let (index, _) = build_index(&sample_note(5_000), "link");
    c.bench_function("search_dash_preset_5k", |b| {
        b.iter(|| search(&index, black_box(SearchPreset::SimilarDash.query())));
    });
}

criterion_group!(benches, bench_literal, bench_pattern);
criterion_main!(benches);
