use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{IndexError, Result};

/// Which part of a page is extracted by the crawler and indexed by the builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Title,
    Header,
    Paragraph,
}

impl FieldKind {
    /// Field name used in crawled documents and output file names.
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Title => "title",
            FieldKind::Header => "header",
            FieldKind::Paragraph => "paragraph",
        }
    }

    /// CSS selector matching the HTML elements for this field.
    pub fn selector(self) -> &'static str {
        match self {
            FieldKind::Title => "title",
            FieldKind::Header => "h1, h2, h3, h4, h5, h6",
            FieldKind::Paragraph => "p",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldKind {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "title" => Ok(FieldKind::Title),
            "header" => Ok(FieldKind::Header),
            "paragraph" => Ok(FieldKind::Paragraph),
            other => Err(IndexError::InvalidInput(format!("unknown field kind `{other}`"))),
        }
    }
}

/// Tokenization strategy used by the index builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerKind {
    /// Lowercased `\w+` runs.
    #[default]
    Simple,
    /// Full crawl-time normalization, see [`crate::tokenizer::CrawlTokenizer`].
    Crawl,
}

impl FromStr for TokenizerKind {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "simple" => Ok(TokenizerKind::Simple),
            "crawl" => Ok(TokenizerKind::Crawl),
            other => Err(IndexError::InvalidInput(format!("unknown tokenizer `{other}`"))),
        }
    }
}

/// How many postings a document contributes for one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostingsPolicy {
    /// One entry per token occurrence: a token seen 3 times in a document
    /// lists that document 3 times.
    #[default]
    PerOccurrence,
    /// One entry per document.
    PerDocument,
}

/// What happens when two tokens share a stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StemMerge {
    /// Concatenate the postings and keep them ordered by document id.
    #[default]
    Union,
    /// The token processed last replaces the postings of earlier ones.
    Overwrite,
}

impl FromStr for StemMerge {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "union" => Ok(StemMerge::Union),
            "overwrite" => Ok(StemMerge::Overwrite),
            other => Err(IndexError::InvalidInput(format!("unknown stem merge policy `{other}`"))),
        }
    }
}

/// Options of the crawl-time tokenizer.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    pub remove_stopwords: bool,
    /// Replaces the built-in French list when set. One word per line.
    pub stopwords_path: Option<PathBuf>,
    pub stem: bool,
}

/// Settings shared by both index builders.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub field: FieldKind,
    pub tokenizer: TokenizerKind,
    pub postings: PostingsPolicy,
    pub stem_merge: StemMerge,
    /// Only read when `tokenizer` is [`TokenizerKind::Crawl`].
    pub crawl_tokenizer: TokenizerConfig,
}

impl IndexConfig {
    /// Read a JSON config file; missing keys take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| IndexError::io(path, e))?;
        serde_json::from_str(&raw).map_err(|e| IndexError::parse(path, e))
    }
}
