use criterion::{criterion_group, criterion_main, Criterion};
use webindex_core::tokenizer::{CrawlTokenizer, SimpleTokenizer, Tokenize};
use webindex_core::{Document, IndexBuilder, IndexConfig, NonPositionalBuilder, PositionalBuilder, TokenizerConfig};

fn bench_tokenize(c: &mut Criterion) {
    let text = include_str!("../README.md");
    let crawl = CrawlTokenizer::new(&TokenizerConfig { remove_stopwords: true, stopwords_path: None, stem: true })
        .expect("built-in stopwords");
    c.bench_function("tokenize_readme_simple", |b| b.iter(|| SimpleTokenizer.tokenize(text)));
    c.bench_function("tokenize_readme_crawl", |b| b.iter(|| crawl.tokenize(text)));
}

fn bench_build(c: &mut Criterion) {
    let docs: Vec<Document> = include_str!("../README.md")
        .lines()
        .enumerate()
        .map(|(i, line)| Document::new().with_field("title", line).with_field("url", format!("https://example.fr/{i}")))
        .collect();
    let non_pos = NonPositionalBuilder::new(IndexConfig::default()).expect("default config");
    let pos = PositionalBuilder::new(IndexConfig::default()).expect("default config");
    c.bench_function("build_non_positional", |b| b.iter(|| non_pos.build_index(&docs)));
    c.bench_function("build_positional", |b| b.iter(|| pos.build_index(&docs)));
}

criterion_group!(benches, bench_tokenize, bench_build);
criterion_main!(benches);
