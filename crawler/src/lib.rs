//! Sequential crawler: fetches each seed URL once, extracts one field and
//! records crawl metadata.

pub mod extract;
pub mod fetch;

use anyhow::Result;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use time::format_description::well_known::Rfc3339;
use webindex_core::document::URL_FIELD;
use webindex_core::tokenizer::{CrawlTokenizer, Vocabulary};
use webindex_core::{Document, FieldKind, TokenizerConfig};

use crate::extract::FieldExtractor;
use crate::fetch::PageFetcher;

/// Read seed URLs, one per line. Blank lines and `#` comments are skipped and
/// bare hosts are tried as `https://`.
pub fn load_seeds<P: AsRef<Path>>(path: P) -> Result<Vec<Url>> {
    let mut seeds = Vec::new();
    for line in BufReader::new(File::open(path.as_ref())?).lines() {
        let s = line?.trim().to_string();
        if s.is_empty() || s.starts_with('#') { continue; }
        match Url::parse(&s).or_else(|_| Url::parse(&format!("https://{}", s))) {
            Ok(u) => seeds.push(u),
            Err(err) => tracing::warn!(seed = %s, error = %err, "skipping invalid seed"),
        }
    }
    Ok(seeds)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlMetadata {
    pub nb_documents: usize,
    /// Distinct tokens seen before stopword removal and stemming.
    pub nb_tokens: usize,
    pub mean_nb_tokens_per_document: u64,
    /// Tokens kept after stopword removal and stemming, all pages together.
    #[serde(default)]
    pub nb_indexed_tokens: usize,
    /// Distinct tokens kept after stopword removal and stemming.
    #[serde(default)]
    pub nb_distinct_indexed_tokens: usize,
    pub nb_visited_urls: usize,
    pub nb_failed_urls: usize,
    pub nb_total_urls: usize,
    pub field: FieldKind,
    pub crawled_at: String,
}

impl fmt::Display for CrawlMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "------ Statistics ------")?;
        writeln!(f, "Number of documents: {}", self.nb_documents)?;
        writeln!(f, "Number of tokens: {}", self.nb_tokens)?;
        writeln!(f, "Mean number of tokens per document: {}", self.mean_nb_tokens_per_document)?;
        writeln!(f, "Number of indexed tokens: {}", self.nb_indexed_tokens)?;
        writeln!(f, "Number of distinct indexed tokens: {}", self.nb_distinct_indexed_tokens)?;
        writeln!(f, "------- Metadata -------")?;
        writeln!(f, "Number of URLs visited: {}", self.nb_visited_urls)?;
        writeln!(f, "Number of failed URLs: {}", self.nb_failed_urls)?;
        write!(f, "Total number of URLs: {}", self.nb_total_urls)
    }
}

/// Everything one crawl produced.
#[derive(Debug, Default)]
pub struct CrawlOutcome {
    /// One `{url, <field>}` document per visited URL, in seed order.
    pub documents: Vec<Document>,
    pub visited_urls: Vec<String>,
    pub failed_urls: Vec<String>,
    pub vocabulary: Vocabulary,
    /// Tokens left once stopwords are dropped and stems applied.
    pub indexed_vocabulary: Vocabulary,
    pub nb_indexed_tokens: usize,
}

impl CrawlOutcome {
    pub fn metadata(&self, field: FieldKind) -> CrawlMetadata {
        let nb_documents = self.documents.len();
        let nb_tokens = self.vocabulary.len();
        // half-to-even, zero for an empty crawl
        let mean = if nb_documents == 0 {
            0
        } else {
            (nb_tokens as f64 / nb_documents as f64).round_ties_even() as u64
        };
        CrawlMetadata {
            nb_documents,
            nb_tokens,
            mean_nb_tokens_per_document: mean,
            nb_indexed_tokens: self.nb_indexed_tokens,
            nb_distinct_indexed_tokens: self.indexed_vocabulary.len(),
            nb_visited_urls: self.visited_urls.len(),
            nb_failed_urls: self.failed_urls.len(),
            nb_total_urls: self.visited_urls.len() + self.failed_urls.len(),
            field,
            crawled_at: time::OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default(),
        }
    }
}

pub struct Crawler<F> {
    fetcher: F,
    extractor: FieldExtractor,
    tokenizer: CrawlTokenizer,
}

impl<F: PageFetcher> Crawler<F> {
    pub fn new(fetcher: F, field: FieldKind, tokenizer: &TokenizerConfig) -> Result<Self> {
        Ok(Self { fetcher, extractor: FieldExtractor::new(field)?, tokenizer: CrawlTokenizer::new(tokenizer)? })
    }

    pub fn field(&self) -> FieldKind { self.extractor.field() }

    /// Visits `urls` one after the other. A failed fetch is recorded and the
    /// crawl moves on; nothing is retried.
    pub async fn run(&self, urls: &[Url]) -> CrawlOutcome {
        let mut outcome = CrawlOutcome::default();
        let field = self.field().name();

        for url in urls {
            let Some(html) = self.fetcher.fetch(url).await else {
                outcome.failed_urls.push(url.to_string());
                continue;
            };
            outcome.visited_urls.push(url.to_string());

            let text = self.extractor.extract(&html);
            let tokens = self.tokenizer.tokenize_tracked(&text, &mut outcome.vocabulary);
            tracing::debug!(%url, tokens = tokens.len(), "tokenized page");
            outcome.nb_indexed_tokens += tokens.len();
            for token in &tokens {
                outcome.indexed_vocabulary.observe(token);
            }

            outcome.documents.push(Document::new().with_field(field, text.trim()).with_field(URL_FIELD, url.as_str()));

            let done = outcome.visited_urls.len() + outcome.failed_urls.len();
            if done % 100 == 0 {
                tracing::info!(done, visited = outcome.visited_urls.len(), failed = outcome.failed_urls.len(), "progress");
            }
        }
        outcome
    }
}
