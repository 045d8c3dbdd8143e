use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use keyflow_core::geometry::{KeyBounds, OptionRow, PopupGeometry};
use keyflow_core::{CandidateResolver, MemorySurface};

const INPUTS: &[(&str, &str)] = &[
    ("short", "cat|fish"),
    ("sentence", "the quick brown fox jum|ps over the lazy dog"),
    ("cyrillic", "съешь же ещё этих мягких французских бу|лок да выпей чаю"),
    ("blank", "|"),
];

fn bench_generate(c: &mut Criterion) {
    let resolver = CandidateResolver::default();
    let mut group = c.benchmark_group("resolver/generate");
    for &(label, marked) in INPUTS {
        let doc = MemorySurface::parse(marked);
        group.bench_with_input(BenchmarkId::new(label, marked.len()), &doc, |b, doc| {
            b.iter(|| resolver.generate(Some(doc)));
        });
    }
    group.finish();
}

fn bench_select(c: &mut Criterion) {
    let key = KeyBounds::new(100.0, 0.0, 40.0, 50.0);
    let mut group = c.benchmark_group("geometry/select");
    for count in [1usize, 4, 12] {
        let values: Vec<String> = (0..count).map(|i| i.to_string()).collect();
        let row = OptionRow::layout(key, values, &PopupGeometry::default());
        group.bench_with_input(BenchmarkId::from_parameter(count), &row, |b, row| {
            b.iter(|| row.select(131.0));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generate, bench_select);
criterion_main!(benches);
