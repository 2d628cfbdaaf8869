//! Persisted "last open file" value.
//!
//! Kept apart from the document table so it can be read before the table is
//! consulted. Whatever it holds is provisional until the reconciler has
//! checked it against the store.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::store::{FileId, atomic_write};

#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode selection: {0}")]
    Json(#[from] serde_json::Error),
}

/// Holds the id of the document shown in the editor, or `None`.
pub trait SelectionStore {
    /// Current value. Never fails: anything unreadable reads as `None`.
    fn get(&self) -> Option<FileId>;

    /// # Errors
    /// Returns an error if the value cannot be persisted.
    fn set(&mut self, id: Option<FileId>) -> Result<(), SelectionError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemorySelection {
    active: Option<FileId>,
}

impl MemorySelection {
    pub const fn new(active: Option<FileId>) -> Self {
        Self { active }
    }
}

impl SelectionStore for MemorySelection {
    fn get(&self) -> Option<FileId> {
        self.active
    }

    fn set(&mut self, id: Option<FileId>) -> Result<(), SelectionError> {
        self.active = id;
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SelectionRecord {
    active_file: Option<FileId>,
}

/// Selection persisted as `active.json` in the data directory.
#[derive(Debug)]
pub struct SelectionFile {
    path: PathBuf,
    active: Option<FileId>,
}

impl SelectionFile {
    pub const FILE_NAME: &'static str = "active.json";

    /// Load the stored value from `data_dir`.
    pub fn open(data_dir: &Path) -> Self {
        let path = data_dir.join(Self::FILE_NAME);
        let active = read_record(&path).active_file;
        Self { path, active }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_record(path: &Path) -> SelectionRecord {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return SelectionRecord::default(),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "unreadable selection, starting without one");
            return SelectionRecord::default();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|err| {
        tracing::warn!(path = %path.display(), %err, "malformed selection, starting without one");
        SelectionRecord::default()
    })
}

impl SelectionStore for SelectionFile {
    fn get(&self) -> Option<FileId> {
        self.active
    }

    fn set(&mut self, id: Option<FileId>) -> Result<(), SelectionError> {
        if self.active == id && self.path.exists() {
            return Ok(());
        }
        let json = serde_json::to_string(&SelectionRecord { active_file: id })?;
        atomic_write(&self.path, json.as_bytes()).map_err(|source| SelectionError::Io {
            path: self.path.clone(),
            source,
        })?;
        self.active = id;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_reads_as_none() {
        let dir = tempdir().unwrap();
        assert_eq!(SelectionFile::open(dir.path()).get(), None);
    }

    #[test]
    fn test_value_survives_reopen() {
        let dir = tempdir().unwrap();
        let mut selection = SelectionFile::open(dir.path());
        selection.set(Some(FileId(3))).unwrap();

        assert_eq!(SelectionFile::open(dir.path()).get(), Some(FileId(3)));
    }

    #[test]
    fn test_cleared_value_survives_reopen() {
        let dir = tempdir().unwrap();
        let mut selection = SelectionFile::open(dir.path());
        selection.set(Some(FileId(3))).unwrap();
        selection.set(None).unwrap();

        assert_eq!(SelectionFile::open(dir.path()).get(), None);
    }

    #[test]
    fn test_garbage_reads_as_none() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(SelectionFile::FILE_NAME), "42x").unwrap();
        assert_eq!(SelectionFile::open(dir.path()).get(), None);
    }

    #[test]
    fn test_stored_format() {
        let dir = tempdir().unwrap();
        let mut selection = SelectionFile::open(dir.path());
        selection.set(Some(FileId(12))).unwrap();
        let raw = std::fs::read_to_string(selection.path()).unwrap();
        assert_eq!(raw, r#"{"active_file":12}"#);
    }

    #[test]
    fn test_memory_selection_round_trip() {
        let mut selection = MemorySelection::default();
        assert_eq!(selection.get(), None);
        selection.set(Some(FileId(1))).unwrap();
        assert_eq!(selection.get(), Some(FileId(1)));
    }
}
