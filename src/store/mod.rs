//! Local document store.
//!
//! The [`FileStore`] trait is the table of markdown documents the editor
//! works on. Two backends implement it:
//!
//! - [`MemoryStore`]: in-memory table, used by tests
//! - [`JsonStore`]: the table persisted as `files.json` in the data directory
//!
//! Every successful write is announced to subscribers registered through
//! [`FileStore::subscribe`], so views stay in sync without polling the table.

mod json;
mod memory;
mod subscribe;
mod table;

pub use json::JsonStore;
pub use memory::MemoryStore;
pub use subscribe::{Query, StoreEvent, Subscribers, Subscription};

use std::fmt;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Name given to newly created documents.
pub const DEFAULT_FILE_NAME: &str = "Untitled";

/// Content given to newly created documents.
pub const DEFAULT_FILE_CONTENT: &str = "# New File";

/// Identifier of a stored document. Assigned by the store, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub u64);

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A markdown document record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: FileId,
    pub name: String,
    pub content: String,
}

impl Document {
    /// A document with the default name and placeholder content.
    pub fn with_defaults(id: FileId) -> Self {
        Self {
            id,
            name: DEFAULT_FILE_NAME.to_string(),
            content: DEFAULT_FILE_CONTENT.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed file table {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no file with id {0}")]
    NotFound(FileId),
    #[error("unsupported file table version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("{} is already open in another mdpad session", path.display())]
    Locked { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Table of documents.
///
/// Reads never fail on a missing id; they return `None` and leave the
/// fallback to the caller. Each write is applied completely or not at all.
pub trait FileStore {
    /// Insert a document with default name and content, returning its id.
    fn create_file(&mut self) -> Result<FileId>;

    fn get_file(&self, id: FileId) -> Result<Option<Document>>;

    /// The document with the lowest id, if any.
    fn get_first_file(&self) -> Result<Option<Document>>;

    /// Replace the content of `id`. Fails with [`StoreError::NotFound`] if absent.
    fn update_file_content(&mut self, id: FileId, content: &str) -> Result<()>;

    /// Replace the name of `id`. Fails with [`StoreError::NotFound`] if absent.
    fn update_file_name(&mut self, id: FileId, name: &str) -> Result<()>;

    /// Remove `id`. Removing an absent id is a no-op.
    fn delete_file(&mut self, id: FileId) -> Result<()>;

    /// All documents in ascending id order.
    fn list_files(&self) -> Result<Vec<Document>>;

    /// Register for change events matching `query`.
    fn subscribe(&mut self, query: Query) -> Subscription;
}

/// Write `content` to a sibling temp file and rename it over `target`.
pub(crate) fn atomic_write(target: &Path, content: &[u8]) -> io::Result<()> {
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let temp_path = target.with_extension("tmp");

    let mut file = File::create(&temp_path)?;
    file.write_all(content)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&temp_path, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_document_with_defaults() {
        let doc = Document::with_defaults(FileId(7));
        assert_eq!(doc.id, FileId(7));
        assert_eq!(doc.name, "Untitled");
        assert_eq!(doc.content, "# New File");
    }

    #[test]
    fn test_atomic_write_creates_parent_and_replaces() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("nested").join("files.json");

        atomic_write(&target, b"first").unwrap();
        atomic_write(&target, b"second").unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "second");
        assert!(!target.with_extension("tmp").exists());
    }

    #[test]
    fn test_not_found_error_names_id() {
        let err = StoreError::NotFound(FileId(42));
        assert_eq!(err.to_string(), "no file with id 42");
    }
}
