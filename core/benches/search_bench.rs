use criterion::{criterion_group, criterion_main, Criterion};
use lexis_core::tokenizer::tokenize;
use lexis_core::SearchIndex;

fn corpus() -> Vec<Vec<String>> {
    let words = ["кот", "собака", "мышь", "дом", "лес", "река", "поле", "город", "книга", "окно"];
    (0..2_000)
        .map(|i| (0..40).map(|j| words[(i * 7 + j * 3 + j * j) % words.len()].to_string()).collect())
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let docs = corpus();
    c.bench_function("build_2k_docs", |b| b.iter(|| SearchIndex::build(&docs).unwrap()));
}

fn bench_queries(c: &mut Criterion) {
    let idx = SearchIndex::build(&corpus()).unwrap();
    let query = tokenize("Кот и собака у реки");
    c.bench_function("boolean_negated", |b| b.iter(|| idx.boolean("кот^~мышь|лес^~дом").unwrap()));
    c.bench_function("ranked_top10", |b| b.iter(|| idx.top_k(&query, 10)));
}

criterion_group!(benches, bench_build, bench_queries);
criterion_main!(benches);
