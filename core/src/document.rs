//! Crawled documents and the sources they are loaded from.
//!
//! A document is an ordered map of field name to text. Its identifier is not
//! stored: it is the document's position in the loaded collection.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{IndexError, Result};
use crate::DocId;

/// Field that names the page a document was crawled from.
pub const URL_FIELD: &str = "url";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    fields: IndexMap<String, String>,
}

impl Document {
    pub fn new() -> Self { Self::default() }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Strict accessor for callers that treat a missing field as an error.
    pub fn field(&self, doc_id: DocId, name: &str) -> Result<&str> {
        self.get(name).ok_or_else(|| IndexError::MissingField { doc_id, field: name.to_string() })
    }

    pub fn url(&self) -> Option<&str> { self.get(URL_FIELD) }

    /// Fields in source order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

/// Supplies an ordered, finite collection of documents.
pub trait DocumentSource {
    fn load(&self, path: &Path) -> Result<Vec<Document>>;
}

/// Loads `.json` (array or single object) and `.jsonl` files, or every such
/// file under a directory in sorted path order.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonDocumentSource;

impl DocumentSource for JsonDocumentSource {
    fn load(&self, path: &Path) -> Result<Vec<Document>> {
        let mut docs = Vec::new();
        for file in input_files(path)? {
            let before = docs.len();
            if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
                load_jsonl(&file, &mut docs)?;
            } else {
                load_json(&file, &mut docs)?;
            }
            tracing::debug!(file = %file.display(), docs = docs.len() - before, "loaded documents");
        }
        Ok(docs)
    }
}

/// Convenience wrapper around [`JsonDocumentSource`].
pub fn load_documents<P: AsRef<Path>>(path: P) -> Result<Vec<Document>> {
    JsonDocumentSource.load(path.as_ref())
}

fn input_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_dir() {
        let mut files = Vec::new();
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let io = e.into_io_error().unwrap_or_else(|| std::io::Error::other("directory walk failed"));
                IndexError::io(path, io)
            })?;
            let p = entry.path();
            if p.is_file() && matches!(p.extension().and_then(|s| s.to_str()), Some("json" | "jsonl")) {
                files.push(p.to_path_buf());
            }
        }
        Ok(files)
    } else if path.is_file() {
        Ok(vec![path.to_path_buf()])
    } else {
        Err(IndexError::io(path, std::io::Error::from(std::io::ErrorKind::NotFound)))
    }
}

fn load_json(file: &Path, docs: &mut Vec<Document>) -> Result<()> {
    let f = File::open(file).map_err(|e| IndexError::io(file, e))?;
    let json: serde_json::Value =
        serde_json::from_reader(BufReader::new(f)).map_err(|e| IndexError::parse(file, e))?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                docs.push(serde_json::from_value(v).map_err(|e| IndexError::parse(file, e))?);
            }
        }
        serde_json::Value::Object(_) => {
            docs.push(serde_json::from_value(json).map_err(|e| IndexError::parse(file, e))?);
        }
        other => {
            return Err(IndexError::InvalidInput(format!(
                "{}: expected an array of documents, found {}",
                file.display(),
                json_kind(&other)
            )))
        }
    }
    Ok(())
}

fn load_jsonl(file: &Path, docs: &mut Vec<Document>) -> Result<()> {
    let f = File::open(file).map_err(|e| IndexError::io(file, e))?;
    for line in BufReader::new(f).lines() {
        let line = line.map_err(|e| IndexError::io(file, e))?;
        if line.trim().is_empty() { continue; }
        docs.push(serde_json::from_str(&line).map_err(|e| IndexError::parse(file, e))?);
    }
    Ok(())
}

fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn field_order_follows_source() {
        let doc: Document = serde_json::from_str(r#"{"url": "u1", "title": "T", "body": "B"}"#).unwrap();
        let names: Vec<&str> = doc.fields().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["url", "title", "body"]);
        assert_eq!(doc.url(), Some("u1"));
    }

    #[test]
    fn strict_accessor_reports_missing_field() {
        let doc = Document::new().with_field("url", "u");
        assert!(matches!(doc.field(7, "title"), Err(IndexError::MissingField { doc_id: 7, .. })));
    }

    #[test]
    fn non_string_values_are_parse_failures() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"[{"title": 3, "url": "u"}]"#).unwrap();
        assert!(matches!(load_documents(&path), Err(IndexError::Parse { .. })));
    }

    #[test]
    fn directory_sources_are_read_in_name_order() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.jsonl"), "{\"title\": \"second\", \"url\": \"u2\"}\n\n").unwrap();
        fs::write(dir.path().join("a.json"), r#"[{"title": "first", "url": "u1"}]"#).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        let docs = load_documents(dir.path()).unwrap();
        let titles: Vec<&str> = docs.iter().filter_map(|d| d.get("title")).collect();
        assert_eq!(titles, vec!["first", "second"]);
    }

    #[test]
    fn missing_path_is_io_error() {
        assert!(matches!(load_documents("does/not/exist.json"), Err(IndexError::Io { .. })));
    }
}
