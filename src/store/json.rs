use std::fs::{self, File, TryLockError};
use std::io;
use std::path::{Path, PathBuf};

use super::table::{Change, Table, TableFile};
use super::{
    Document, FileId, FileStore, Query, Result, StoreError, Subscribers,
    Subscription, atomic_write,
};

/// Document table persisted as a single JSON file.
///
/// The whole table is rewritten on every change. A write that fails on disk
/// is rolled back in memory so the two never disagree.
///
/// The store holds an exclusive lock on its data directory for as long as it
/// is open, so the in-memory table is the only writer of `files.json`.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    table: Table,
    subscribers: Subscribers,
    _lock: File,
}

impl JsonStore {
    /// File name of the table inside the data directory.
    pub const FILE_NAME: &'static str = "files.json";

    /// Lock file guarding the data directory.
    pub const LOCK_FILE_NAME: &'static str = "mdpad.lock";

    /// Open the table in `data_dir`, treating a missing file as empty.
    ///
    /// # Errors
    /// Returns [`StoreError::Locked`] if another store has the directory
    /// open, or an error if the file exists but cannot be read or parsed, or
    /// was written by an incompatible version.
    pub fn open(data_dir: &Path) -> Result<Self> {
        let lock = lock_data_dir(data_dir)?;
        let path = data_dir.join(Self::FILE_NAME);
        let table = match fs::read_to_string(&path) {
            Ok(raw) => {
                let file: TableFile = serde_json::from_str(&raw).map_err(|source| {
                    StoreError::Json {
                        path: path.clone(),
                        source,
                    }
                })?;
                Table::from_file(file)?
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Table::default(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        tracing::debug!(path = %path.display(), "opened file table");
        Ok(Self {
            path,
            table,
            subscribers: Subscribers::default(),
            _lock: lock,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to the table and persist it; undo the change on failure.
    fn commit<T>(
        &mut self,
        apply: impl FnOnce(&mut Table) -> Result<(T, Option<Change>)>,
    ) -> Result<T> {
        let (value, change) = apply(&mut self.table)?;
        let Some(Change { event, undo }) = change else {
            return Ok(value);
        };
        if let Err(err) = self.persist() {
            self.table.undo(undo);
            tracing::error!(path = %self.path.display(), %err, "file table write failed");
            return Err(err);
        }
        tracing::debug!(?event, "file table updated");
        self.subscribers.emit(event);
        Ok(value)
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.table.to_file()).map_err(|source| {
            StoreError::Json {
                path: self.path.clone(),
                source,
            }
        })?;
        atomic_write(&self.path, json.as_bytes()).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

fn lock_data_dir(data_dir: &Path) -> Result<File> {
    fs::create_dir_all(data_dir).map_err(|source| StoreError::Io {
        path: data_dir.to_path_buf(),
        source,
    })?;
    let lock_path = data_dir.join(JsonStore::LOCK_FILE_NAME);
    let file = File::options()
        .create(true)
        .write(true)
        .truncate(false)
        .open(&lock_path)
        .map_err(|source| StoreError::Io {
            path: lock_path.clone(),
            source,
        })?;
    match file.try_lock() {
        Ok(()) => Ok(file),
        Err(TryLockError::WouldBlock) => {
            tracing::warn!(dir = %data_dir.display(), "data directory already in use");
            Err(StoreError::Locked {
                path: data_dir.to_path_buf(),
            })
        }
        Err(TryLockError::Error(source)) => Err(StoreError::Io {
            path: lock_path,
            source,
        }),
    }
}

impl FileStore for JsonStore {
    fn create_file(&mut self) -> Result<FileId> {
        self.commit(|table| {
            let (id, change) = table.insert_default();
            Ok((id, Some(change)))
        })
    }

    fn get_file(&self, id: FileId) -> Result<Option<Document>> {
        Ok(self.table.get(id).cloned())
    }

    fn get_first_file(&self) -> Result<Option<Document>> {
        Ok(self.table.first().cloned())
    }

    fn update_file_content(&mut self, id: FileId, content: &str) -> Result<()> {
        self.commit(|table| Ok(((), Some(table.set_content(id, content)?))))
    }

    fn update_file_name(&mut self, id: FileId, name: &str) -> Result<()> {
        self.commit(|table| Ok(((), Some(table.set_name(id, name)?))))
    }

    fn delete_file(&mut self, id: FileId) -> Result<()> {
        self.commit(|table| Ok(((), table.remove(id))))
    }

    fn list_files(&self) -> Result<Vec<Document>> {
        Ok(self.table.all())
    }

    fn subscribe(&mut self, query: Query) -> Subscription {
        self.subscribers.subscribe(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_missing_table_is_empty() {
        let dir = tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        assert!(store.list_files().unwrap().is_empty());
        assert!(!store.path().exists(), "opening must not write");
    }

    #[test]
    fn test_changes_survive_reopen() {
        let dir = tempdir().unwrap();
        let mut store = JsonStore::open(dir.path()).unwrap();
        let id = store.create_file().unwrap();
        store.update_file_name(id, "Draft").unwrap();
        store.update_file_content(id, "# Draft\n\ntext").unwrap();
        drop(store);

        let store = JsonStore::open(dir.path()).unwrap();
        let doc = store.get_file(id).unwrap().unwrap();
        assert_eq!(doc.name, "Draft");
        assert_eq!(doc.content, "# Draft\n\ntext");
    }

    #[test]
    fn test_ids_not_reused_across_reopen() {
        let dir = tempdir().unwrap();
        let mut store = JsonStore::open(dir.path()).unwrap();
        let first = store.create_file().unwrap();
        store.delete_file(first).unwrap();
        drop(store);

        let mut store = JsonStore::open(dir.path()).unwrap();
        let second = store.create_file().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_table_file_is_versioned_array() {
        let dir = tempdir().unwrap();
        let mut store = JsonStore::open(dir.path()).unwrap();
        store.create_file().unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["files"][0]["name"], "Untitled");
        assert_eq!(value["files"][0]["id"], 1);
    }

    #[test]
    fn test_malformed_table_is_an_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(JsonStore::FILE_NAME), "{ not json").unwrap();
        assert!(matches!(
            JsonStore::open(dir.path()),
            Err(StoreError::Json { .. })
        ));
    }

    #[test]
    fn test_unknown_version_is_rejected() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(JsonStore::FILE_NAME),
            r#"{"version": 9, "last_id": 0, "files": []}"#,
        )
        .unwrap();
        assert!(matches!(
            JsonStore::open(dir.path()),
            Err(StoreError::UnsupportedVersion { found: 9, .. })
        ));
    }

    #[test]
    fn test_failed_write_rolls_back_memory() {
        let dir = tempdir().unwrap();
        let mut store = JsonStore::open(dir.path()).unwrap();
        let id = store.create_file().unwrap();
        let events = store.subscribe(Query::All);

        // A directory where the temp file should go makes the write fail.
        std::fs::create_dir(store.path().with_extension("tmp")).unwrap();

        assert!(store.update_file_content(id, "lost").is_err());
        assert_eq!(
            store.get_file(id).unwrap().unwrap().content,
            "# New File"
        );
        assert!(events.drain().is_empty());
    }

    #[test]
    fn test_second_store_on_same_directory_is_refused() {
        let dir = tempdir().unwrap();
        let mut first = JsonStore::open(dir.path()).unwrap();
        first.create_file().unwrap();

        assert!(matches!(
            JsonStore::open(dir.path()),
            Err(StoreError::Locked { .. })
        ));

        let created = first.create_file().unwrap();
        drop(first);

        let mut reopened = JsonStore::open(dir.path()).unwrap();
        let ids: Vec<FileId> = reopened.list_files().unwrap().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![FileId(1), created]);
        assert_ne!(reopened.create_file().unwrap(), created);
    }

    #[test]
    fn test_open_creates_missing_data_dir() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let mut store = JsonStore::open(&nested).unwrap();
        store.create_file().unwrap();
        assert!(nested.join(JsonStore::FILE_NAME).exists());
    }

    #[test]
    fn test_failed_create_releases_id() {
        let dir = tempdir().unwrap();
        let mut store = JsonStore::open(dir.path()).unwrap();
        std::fs::create_dir(store.path().with_extension("tmp")).unwrap();
        assert!(store.create_file().is_err());
        assert!(store.list_files().unwrap().is_empty());

        std::fs::remove_dir(store.path().with_extension("tmp")).unwrap();
        assert_eq!(store.create_file().unwrap(), FileId(1));
    }

    #[test]
    fn test_delete_absent_does_not_touch_disk() {
        let dir = tempdir().unwrap();
        let mut store = JsonStore::open(dir.path()).unwrap();
        store.delete_file(FileId(1)).unwrap();
        assert!(!store.path().exists());
    }
}
