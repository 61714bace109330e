use std::path::PathBuf;

use crate::DocId;

/// Errors raised while loading documents, building indexes or persisting them.
#[derive(thiserror::Error, Debug)]
pub enum IndexError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("document {doc_id} has no `{field}` field")]
    MissingField { doc_id: DocId, field: String },

    /// Averages are undefined when no document was processed.
    #[error("corpus is empty: no document carries the indexed field")]
    EmptyCorpus,

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, IndexError>;

impl IndexError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IndexError::Io { path: path.into(), source }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        IndexError::Parse { path: path.into(), source }
    }
}
