use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::document::{Document, URL_FIELD};
use crate::error::{IndexError, Result};
use crate::index::DocId;
use crate::tokenizer::{SimpleTokenizer, Tokenize};

/// Corpus counts written to `metadata.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Documents that carried the indexed field.
    pub num_documents: usize,
    pub total_tokens: usize,
    /// Token counts for every field except `url`, in first-seen field order.
    pub tokens_per_field: IndexMap<String, usize>,
    pub avg_tokens_per_doc: f64,
    #[serde(default)]
    pub skipped_documents: usize,
}

/// Counts tokens of `field` across `documents` with `tokenizer`, and the
/// tokens of every non-url field with [`SimpleTokenizer`].
///
/// Documents without `field` are left out of every count. Fails with
/// [`IndexError::EmptyCorpus`] when nothing is left to average over.
pub fn calculate_statistics<T>(documents: &[Document], field: &str, tokenizer: &T) -> Result<Statistics>
where
    T: Tokenize + ?Sized,
{
    let mut num_documents = 0usize;
    let mut total_tokens = 0usize;
    let mut tokens_per_field: IndexMap<String, usize> = IndexMap::new();

    for (idx, doc) in documents.iter().enumerate() {
        // the builders already warned about this document
        let Some(text) = doc.get(field) else {
            tracing::debug!(doc_id = idx as DocId, field, "not counted: missing field");
            continue;
        };
        num_documents += 1;
        total_tokens += tokenizer.tokenize(text).len();

        for (name, value) in doc.fields() {
            if name == URL_FIELD {
                continue;
            }
            *tokens_per_field.entry(name.to_string()).or_insert(0) += SimpleTokenizer.tokenize(value).len();
        }
    }

    if num_documents == 0 {
        return Err(IndexError::EmptyCorpus);
    }

    let stats = Statistics {
        num_documents,
        total_tokens,
        tokens_per_field,
        avg_tokens_per_doc: total_tokens as f64 / num_documents as f64,
        skipped_documents: documents.len() - num_documents,
    };
    tracing::info!(
        num_documents = stats.num_documents,
        total_tokens = stats.total_tokens,
        skipped = stats.skipped_documents,
        "computed statistics"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_field_counts_skip_url() {
        let docs = vec![Document::new()
            .with_field("title", "Deux mots")
            .with_field("url", "https://example.com/a/b/c")
            .with_field("summary", "trois petits mots")];
        let stats = calculate_statistics(&docs, "title", &SimpleTokenizer).unwrap();
        assert_eq!(stats.tokens_per_field.get("title"), Some(&2));
        assert_eq!(stats.tokens_per_field.get("summary"), Some(&3));
        assert!(!stats.tokens_per_field.contains_key("url"));
    }

    #[test]
    fn documents_without_field_are_skipped() {
        let docs = vec![
            Document::new().with_field("title", "un deux").with_field("url", "u1"),
            Document::new().with_field("url", "u2").with_field("body", "ignoré"),
        ];
        let stats = calculate_statistics(&docs, "title", &SimpleTokenizer).unwrap();
        assert_eq!(stats.num_documents, 1);
        assert_eq!(stats.skipped_documents, 1);
        assert!(!stats.tokens_per_field.contains_key("body"));
        assert_eq!(stats.avg_tokens_per_doc, 2.0);
    }

    #[test]
    fn all_skipped_is_empty_corpus() {
        let docs = vec![Document::new().with_field("url", "u")];
        assert!(matches!(
            calculate_statistics(&docs, "title", &SimpleTokenizer),
            Err(IndexError::EmptyCorpus)
        ));
    }
}
