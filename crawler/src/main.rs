use anyhow::{anyhow, Context, Result};
use clap::Parser;
use crawler::fetch::HttpFetcher;
use crawler::{load_seeds, Crawler};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};
use webindex_core::persist::write_json;
use webindex_core::{FieldKind, TokenizerConfig};

#[derive(Parser, Debug)]
#[command(name = "crawler")]
#[command(about = "Fetch a fixed list of pages one by one and extract one field per page")]
struct Cli {
    /// Path to a file with seed URLs (one per line)
    #[arg(long)]
    seeds: PathBuf,
    /// Output JSON array of crawled documents
    #[arg(long, default_value = "data/crawled_urls.json")]
    output: PathBuf,
    /// Output JSON crawl metadata
    #[arg(long, default_value = "data/crawl_metadata.json")]
    metadata: PathBuf,
    /// Extracted field: title, header or paragraph
    #[arg(long, default_value = "title")]
    field: FieldKind,
    /// Drop French stopwords before stemming
    #[arg(long, default_value_t = false)]
    remove_stopwords: bool,
    /// Stopword list replacing the built-in French one (one word per line)
    #[arg(long)]
    stopwords_file: Option<PathBuf>,
    /// Stem tokens with the French Snowball stemmer
    #[arg(long, default_value_t = false)]
    stem: bool,
    /// User-Agent string sent with every request
    #[arg(long, default_value = "webindex-crawler/0.1")]
    user_agent: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Cli::parse();

    let seeds = load_seeds(&args.seeds).with_context(|| format!("reading seeds {}", args.seeds.display()))?;
    if seeds.is_empty() { return Err(anyhow!("no valid seeds")); }
    tracing::info!(seeds = seeds.len(), field = %args.field, output = %args.output.display(), "crawl starting");

    let tokenizer = TokenizerConfig {
        remove_stopwords: args.remove_stopwords || args.stopwords_file.is_some(),
        stopwords_path: args.stopwords_file.clone(),
        stem: args.stem,
    };
    let crawler = Crawler::new(HttpFetcher::new(&args.user_agent)?, args.field, &tokenizer)?;
    let outcome = crawler.run(&seeds).await;

    write_json(&args.output, &outcome.documents)?;
    let metadata = outcome.metadata(args.field);
    write_json(&args.metadata, &metadata)?;

    tracing::info!(
        visited = metadata.nb_visited_urls,
        failed = metadata.nb_failed_urls,
        tokens = metadata.nb_tokens,
        "crawl done -> {}",
        args.output.display()
    );
    tracing::debug!("\n{metadata}");
    Ok(())
}
