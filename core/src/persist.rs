use crate::config::FieldKind;
use crate::error::{IndexError, Result};
use crate::{NonPositionalIndex, PositionalIndex, Statistics};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::{create_dir_all, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

/// Output file layout for one indexed field under a root directory.
pub struct IndexPaths {
    pub root: PathBuf,
    field: FieldKind,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P, field: FieldKind) -> Self {
        Self { root: root.as_ref().to_path_buf(), field }
    }
    pub fn non_positional(&self) -> PathBuf { self.root.join(format!("{}.non_pos_index.json", self.field)) }
    pub fn stemmed(&self) -> PathBuf { self.root.join(format!("mon_stemmer.{}.non_pos_index.json", self.field)) }
    pub fn positional(&self) -> PathBuf { self.root.join(format!("{}.pos_index.json", self.field)) }
    pub fn metadata(&self) -> PathBuf { self.root.join("metadata.json") }
}

/// Pretty JSON with four-space indentation; non-ASCII text is written as is.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    Ok(buf)
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        create_dir_all(dir).map_err(|e| IndexError::io(dir, e))?;
    }
    let bytes = to_pretty_json(value)?;
    let mut f = File::create(path).map_err(|e| IndexError::io(path, e))?;
    f.write_all(&bytes).map_err(|e| IndexError::io(path, e))?;
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let f = File::open(path).map_err(|e| IndexError::io(path, e))?;
    serde_json::from_reader(BufReader::new(f)).map_err(|e| IndexError::parse(path, e))
}

pub fn save_non_positional(paths: &IndexPaths, index: &NonPositionalIndex) -> Result<()> {
    write_json(&paths.non_positional(), index)
}

pub fn load_non_positional(paths: &IndexPaths) -> Result<NonPositionalIndex> {
    read_json(&paths.non_positional())
}

pub fn save_stemmed_index(paths: &IndexPaths, index: &NonPositionalIndex) -> Result<()> {
    write_json(&paths.stemmed(), index)
}

pub fn load_stemmed_index(paths: &IndexPaths) -> Result<NonPositionalIndex> {
    read_json(&paths.stemmed())
}

pub fn save_positional(paths: &IndexPaths, index: &PositionalIndex) -> Result<()> {
    write_json(&paths.positional(), index)
}

pub fn load_positional(paths: &IndexPaths) -> Result<PositionalIndex> {
    read_json(&paths.positional())
}

pub fn save_statistics(paths: &IndexPaths, stats: &Statistics) -> Result<()> {
    write_json(&paths.metadata(), stats)
}

pub fn load_statistics(paths: &IndexPaths) -> Result<Statistics> {
    read_json(&paths.metadata())
}
