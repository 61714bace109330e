use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::{FieldKind, IndexConfig, PostingsPolicy};
use crate::document::Document;
use crate::error::Result;
use crate::statistics::{calculate_statistics, Statistics};
use crate::stem::stem_index;
use crate::tokenizer::{Tokenize, Tokenizer};

pub type DocId = u32;
/// Zero-based token offset inside one document's indexed field.
pub type Position = u32;

/// Token -> document ids, keys in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NonPositionalIndex {
    postings: IndexMap<String, Vec<DocId>>,
}

impl NonPositionalIndex {
    pub fn new() -> Self { Self::default() }

    /// Records one occurrence of `token` in `doc_id`.
    ///
    /// Documents must be added in ascending id order for
    /// [`PostingsPolicy::PerDocument`] to collapse repeats.
    pub fn add(&mut self, token: &str, doc_id: DocId, policy: PostingsPolicy) {
        let list = self.postings.entry(token.to_string()).or_default();
        if policy == PostingsPolicy::PerDocument && list.last() == Some(&doc_id) {
            return;
        }
        list.push(doc_id);
    }

    pub fn get(&self, token: &str) -> Option<&[DocId]> {
        self.postings.get(token).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize { self.postings.len() }

    pub fn is_empty(&self) -> bool { self.postings.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[DocId])> {
        self.postings.iter().map(|(t, p)| (t.as_str(), p.as_slice()))
    }
}

impl From<IndexMap<String, Vec<DocId>>> for NonPositionalIndex {
    fn from(postings: IndexMap<String, Vec<DocId>>) -> Self {
        Self { postings }
    }
}

/// Token -> document id -> ascending positions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionalIndex {
    postings: IndexMap<String, IndexMap<DocId, Vec<Position>>>,
}

impl PositionalIndex {
    pub fn new() -> Self { Self::default() }

    pub fn add(&mut self, token: &str, doc_id: DocId, position: Position) {
        let docs = self.postings.entry(token.to_string()).or_default();
        docs.entry(doc_id).or_default().push(position);
    }

    pub fn get(&self, token: &str) -> Option<&IndexMap<DocId, Vec<Position>>> {
        self.postings.get(token)
    }

    pub fn positions(&self, token: &str, doc_id: DocId) -> Option<&[Position]> {
        self.postings.get(token)?.get(&doc_id).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize { self.postings.len() }

    pub fn is_empty(&self) -> bool { self.postings.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexMap<DocId, Vec<Position>>)> {
        self.postings.iter().map(|(t, d)| (t.as_str(), d))
    }
}

/// Indexing strategy over one designated document field.
pub trait IndexBuilder {
    type Index;

    fn config(&self) -> &IndexConfig;

    fn tokenizer(&self) -> &Tokenizer;

    fn build_index(&self, documents: &[Document]) -> Self::Index;

    fn field(&self) -> FieldKind {
        self.config().field
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        self.tokenizer().tokenize(text)
    }

    fn calculate_statistics(&self, documents: &[Document]) -> Result<Statistics> {
        calculate_statistics(documents, self.field().name(), self.tokenizer())
    }
}

/// Yields `(doc_id, text)` for every document carrying `field`, warning
/// about and skipping the others.
pub(crate) fn indexed_texts<'a>(
    documents: &'a [Document],
    field: &'a str,
) -> impl Iterator<Item = (DocId, &'a str)> + 'a {
    documents.iter().enumerate().filter_map(move |(idx, doc)| {
        let doc_id = idx as DocId;
        match doc.field(doc_id, field) {
            Ok(text) => Some((doc_id, text)),
            Err(err) => {
                tracing::warn!(url = doc.url().unwrap_or(""), "document skipped: {err}");
                None
            }
        }
    })
}

pub struct NonPositionalBuilder {
    config: IndexConfig,
    tokenizer: Tokenizer,
}

impl NonPositionalBuilder {
    pub fn new(config: IndexConfig) -> Result<Self> {
        let tokenizer = Tokenizer::from_config(&config)?;
        Ok(Self { config, tokenizer })
    }

    /// Re-keys `index` by French stem using the configured merge policy.
    pub fn stem_index(&self, index: &NonPositionalIndex) -> NonPositionalIndex {
        stem_index(index, self.config.stem_merge, self.config.postings)
    }
}

impl IndexBuilder for NonPositionalBuilder {
    type Index = NonPositionalIndex;

    fn config(&self) -> &IndexConfig { &self.config }

    fn tokenizer(&self) -> &Tokenizer { &self.tokenizer }

    fn build_index(&self, documents: &[Document]) -> NonPositionalIndex {
        let mut index = NonPositionalIndex::new();
        for (doc_id, text) in indexed_texts(documents, self.field().name()) {
            for token in self.tokenize(text) {
                index.add(&token, doc_id, self.config.postings);
            }
        }
        tracing::debug!(terms = index.len(), "built non-positional index");
        index
    }
}

pub struct PositionalBuilder {
    config: IndexConfig,
    tokenizer: Tokenizer,
}

impl PositionalBuilder {
    pub fn new(config: IndexConfig) -> Result<Self> {
        let tokenizer = Tokenizer::from_config(&config)?;
        Ok(Self { config, tokenizer })
    }
}

impl IndexBuilder for PositionalBuilder {
    type Index = PositionalIndex;

    fn config(&self) -> &IndexConfig { &self.config }

    fn tokenizer(&self) -> &Tokenizer { &self.tokenizer }

    fn build_index(&self, documents: &[Document]) -> PositionalIndex {
        let mut index = PositionalIndex::new();
        for (doc_id, text) in indexed_texts(documents, self.field().name()) {
            for (pos, token) in self.tokenize(text).iter().enumerate() {
                index.add(token, doc_id, pos as Position);
            }
        }
        tracing::debug!(terms = index.len(), "built positional index");
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(title: &str) -> Document {
        Document::new().with_field("title", title).with_field("url", "u")
    }

    #[test]
    fn per_document_policy_collapses_repeats() {
        let mut index = NonPositionalIndex::new();
        for token in ["rouge", "rouge", "vert"] {
            index.add(token, 0, PostingsPolicy::PerDocument);
        }
        index.add("rouge", 1, PostingsPolicy::PerDocument);
        assert_eq!(index.get("rouge"), Some(&[0, 1][..]));
    }

    #[test]
    fn keys_keep_first_seen_order() {
        let builder = NonPositionalBuilder::new(IndexConfig::default()).unwrap();
        let index = builder.build_index(&[doc("zèbre abeille"), doc("marmotte zèbre")]);
        let terms: Vec<&str> = index.iter().map(|(t, _)| t).collect();
        assert_eq!(terms, vec!["zèbre", "abeille", "marmotte"]);
    }

    #[test]
    fn positions_restart_per_document() {
        let builder = PositionalBuilder::new(IndexConfig::default()).unwrap();
        let index = builder.build_index(&[doc("a b a"), doc("a")]);
        assert_eq!(index.positions("a", 0), Some(&[0, 2][..]));
        assert_eq!(index.positions("a", 1), Some(&[0][..]));
        assert_eq!(index.positions("b", 1), None);
    }

    #[test]
    fn missing_field_documents_keep_their_ids_out() {
        let builder = NonPositionalBuilder::new(IndexConfig::default()).unwrap();
        let docs = vec![doc("un"), Document::new().with_field("url", "u"), doc("un")];
        let index = builder.build_index(&docs);
        assert_eq!(index.get("un"), Some(&[0, 2][..]));
    }
}
