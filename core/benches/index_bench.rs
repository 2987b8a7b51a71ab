use criterion::{criterion_group, criterion_main, Criterion};
use invindex::tokenizer::tokenize;
use invindex::InvertedIndex;

fn bench_tokenize(c: &mut Criterion) {
    let text = include_str!("../README.md");
    c.bench_function("tokenize_readme", |b| b.iter(|| tokenize(text)));
}

fn bench_build(c: &mut Criterion) {
    let text = include_str!("../README.md");
    let paragraphs: Vec<(u32, &str)> = text.split("\n\n").enumerate().map(|(i, p)| (i as u32, p)).collect();
    c.bench_function("parse_readme_paragraphs", |b| {
        b.iter(|| {
            let mut idx = InvertedIndex::new();
            idx.parse(paragraphs.iter().copied());
            idx
        })
    });
}

criterion_group!(benches, bench_tokenize, bench_build);
criterion_main!(benches);
