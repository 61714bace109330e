//! Tokenization, inverted-index construction and corpus statistics for
//! crawled web pages.

pub mod config;
pub mod document;
pub mod error;
pub mod index;
pub mod persist;
pub mod statistics;
pub mod stem;
pub mod tokenizer;

pub use config::{FieldKind, IndexConfig, PostingsPolicy, StemMerge, TokenizerConfig, TokenizerKind};
pub use document::{load_documents, Document, DocumentSource, JsonDocumentSource};
pub use error::{IndexError, Result};
pub use index::{
    DocId, IndexBuilder, NonPositionalBuilder, NonPositionalIndex, PositionalBuilder, PositionalIndex, Position,
};
pub use statistics::{calculate_statistics, Statistics};
pub use stem::stem_index;
