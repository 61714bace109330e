use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};
use webindex_core::persist::{save_non_positional, save_positional, save_statistics, save_stemmed_index, IndexPaths};
use webindex_core::{
    load_documents, FieldKind, IndexBuilder, IndexConfig, NonPositionalBuilder, PositionalBuilder, PostingsPolicy,
    StemMerge, TokenizerKind,
};

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "indexer")]
#[command(about = "Create positional or non-positional (default) index from crawled pages", long_about = None)]
struct Cli {
    /// Use positional index
    #[arg(long = "pos_idx", default_value_t = false)]
    pos_idx: bool,
    /// Crawled documents: JSON array, JSONL, or a directory of them
    #[arg(long, default_value = "data/crawled_urls.json")]
    input: PathBuf,
    /// Directory receiving the index and metadata files
    #[arg(long, default_value = ".")]
    output: PathBuf,
    /// JSON file with index settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// Indexed field: title, header or paragraph
    #[arg(long)]
    field: Option<FieldKind>,
    /// Tokenizer used by the builders: simple or crawl
    #[arg(long)]
    tokenizer: Option<TokenizerKind>,
    /// List a document once per token instead of once per occurrence
    #[arg(long, default_value_t = false)]
    dedup_postings: bool,
    /// Stem collisions: union (merge postings) or overwrite (keep the last token's)
    #[arg(long)]
    stem_merge: Option<StemMerge>,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    run(&cli)
}

fn resolve_config(cli: &Cli) -> Result<IndexConfig> {
    let mut config = match &cli.config {
        Some(path) => IndexConfig::from_file(path).with_context(|| format!("reading config {}", path.display()))?,
        None => IndexConfig::default(),
    };
    if let Some(field) = cli.field { config.field = field; }
    if let Some(tokenizer) = cli.tokenizer { config.tokenizer = tokenizer; }
    if let Some(merge) = cli.stem_merge { config.stem_merge = merge; }
    if cli.dedup_postings { config.postings = PostingsPolicy::PerDocument; }
    Ok(config)
}

fn run(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli)?;
    let documents = load_documents(&cli.input).with_context(|| format!("loading {}", cli.input.display()))?;
    tracing::info!(num_docs = documents.len(), input = %cli.input.display(), field = %config.field, "loaded documents");

    let paths = IndexPaths::new(&cli.output, config.field);
    let stats = if cli.pos_idx {
        let builder = PositionalBuilder::new(config)?;
        let index = builder.build_index(&documents);
        let stats = builder.calculate_statistics(&documents);
        save_positional(&paths, &index)?;
        tracing::info!(num_terms = index.len(), path = %paths.positional().display(), "wrote positional index");
        stats
    } else {
        let builder = NonPositionalBuilder::new(config)?;
        let index = builder.build_index(&documents);
        let stats = builder.calculate_statistics(&documents);
        save_non_positional(&paths, &index)?;
        tracing::info!(num_terms = index.len(), path = %paths.non_positional().display(), "wrote non-positional index");

        let stemmed = builder.stem_index(&index);
        save_stemmed_index(&paths, &stemmed)?;
        tracing::info!(num_stems = stemmed.len(), path = %paths.stemmed().display(), "wrote stemmed index");
        stats
    };

    let stats = stats.context("computing corpus statistics")?;
    save_statistics(&paths, &stats)?;
    tracing::info!(
        num_documents = stats.num_documents,
        total_tokens = stats.total_tokens,
        avg_tokens_per_doc = stats.avg_tokens_per_doc,
        "index build complete"
    );
    Ok(())
}
