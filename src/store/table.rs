use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Document, FileId, Result, StoreError, StoreEvent};

/// On-disk schema version of `files.json`.
pub(super) const TABLE_VERSION: u32 = 1;

/// The document table shared by both backends.
///
/// Mutations return the event to announce together with the record needed
/// to reverse them; callers decide when the change is durable enough to
/// emit it.
#[derive(Debug, Default, PartialEq, Eq)]
pub(super) struct Table {
    last_id: u64,
    files: BTreeMap<FileId, Document>,
}

/// Serialized form: a versioned, id-ordered array of records.
#[derive(Debug, Deserialize)]
pub(super) struct TableFile {
    pub version: u32,
    pub last_id: u64,
    pub files: Vec<Document>,
}

/// Borrowed counterpart of [`TableFile`] used when writing.
#[derive(Debug, Serialize)]
pub(super) struct TableFileRef<'a> {
    version: u32,
    last_id: u64,
    files: Vec<&'a Document>,
}

/// What a single mutation overwrote.
#[derive(Debug)]
pub(super) enum Undo {
    Insert { id: FileId, last_id: u64 },
    Content { id: FileId, content: String },
    Name { id: FileId, name: String },
    Remove(Document),
}

/// An applied mutation.
#[derive(Debug)]
pub(super) struct Change {
    pub event: StoreEvent,
    pub undo: Undo,
}

impl Table {
    pub fn insert_default(&mut self) -> (FileId, Change) {
        let previous = self.last_id;
        self.last_id += 1;
        let id = FileId(self.last_id);
        self.files.insert(id, Document::with_defaults(id));
        let change = Change {
            event: StoreEvent::Created(id),
            undo: Undo::Insert {
                id,
                last_id: previous,
            },
        };
        (id, change)
    }

    pub fn get(&self, id: FileId) -> Option<&Document> {
        self.files.get(&id)
    }

    pub fn first(&self) -> Option<&Document> {
        self.files.values().next()
    }

    pub fn all(&self) -> Vec<Document> {
        self.files.values().cloned().collect()
    }

    pub fn set_content(&mut self, id: FileId, content: &str) -> Result<Change> {
        let doc = self.files.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        let previous = std::mem::replace(&mut doc.content, content.to_owned());
        Ok(Change {
            event: StoreEvent::Updated(id),
            undo: Undo::Content {
                id,
                content: previous,
            },
        })
    }

    pub fn set_name(&mut self, id: FileId, name: &str) -> Result<Change> {
        let doc = self.files.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        let previous = std::mem::replace(&mut doc.name, name.to_owned());
        Ok(Change {
            event: StoreEvent::Updated(id),
            undo: Undo::Name { id, name: previous },
        })
    }

    pub fn remove(&mut self, id: FileId) -> Option<Change> {
        self.files.remove(&id).map(|doc| Change {
            event: StoreEvent::Deleted(id),
            undo: Undo::Remove(doc),
        })
    }

    /// Reverse a mutation returned by one of the methods above.
    pub fn undo(&mut self, undo: Undo) {
        match undo {
            Undo::Insert { id, last_id } => {
                self.files.remove(&id);
                self.last_id = last_id;
            }
            Undo::Content { id, content } => {
                if let Some(doc) = self.files.get_mut(&id) {
                    doc.content = content;
                }
            }
            Undo::Name { id, name } => {
                if let Some(doc) = self.files.get_mut(&id) {
                    doc.name = name;
                }
            }
            Undo::Remove(doc) => {
                self.files.insert(doc.id, doc);
            }
        }
    }

    pub fn to_file(&self) -> TableFileRef<'_> {
        TableFileRef {
            version: TABLE_VERSION,
            last_id: self.last_id,
            files: self.files.values().collect(),
        }
    }

    pub fn from_file(file: TableFile) -> Result<Self> {
        if file.version != TABLE_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: file.version,
                expected: TABLE_VERSION,
            });
        }
        let highest = file.files.iter().map(|doc| doc.id.0).max().unwrap_or(0);
        Ok(Self {
            // Guard against a hand-edited table whose counter lags its records.
            last_id: file.last_id.max(highest),
            files: file.files.into_iter().map(|doc| (doc.id, doc)).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_not_reused_after_remove() {
        let mut table = Table::default();
        let (first, _) = table.insert_default();
        table.remove(first);
        let (second, _) = table.insert_default();
        assert_eq!(first, FileId(1));
        assert_eq!(second, FileId(2));
    }

    #[test]
    fn test_remove_absent_yields_no_event() {
        let mut table = Table::default();
        assert!(table.remove(FileId(5)).is_none());
    }

    #[test]
    fn test_from_file_rejects_future_version() {
        let file = TableFile {
            version: 2,
            last_id: 0,
            files: Vec::new(),
        };
        assert!(matches!(
            Table::from_file(file),
            Err(StoreError::UnsupportedVersion {
                found: 2,
                expected: 1
            })
        ));
    }

    #[test]
    fn test_from_file_raises_lagging_counter() {
        let file = TableFile {
            version: TABLE_VERSION,
            last_id: 1,
            files: vec![Document::with_defaults(FileId(4))],
        };
        let mut table = Table::from_file(file).unwrap();
        let (id, _) = table.insert_default();
        assert_eq!(id, FileId(5));
    }

    #[test]
    fn test_undo_restores_each_mutation() {
        let mut table = Table::default();
        let (id, _) = table.insert_default();
        let before_edits = table.all();

        let change = table.set_content(id, "changed").unwrap();
        table.undo(change.undo);
        let change = table.set_name(id, "Renamed").unwrap();
        table.undo(change.undo);
        let change = table.remove(id).unwrap();
        table.undo(change.undo);
        assert_eq!(table.all(), before_edits);

        let (second, change) = table.insert_default();
        assert_eq!(second, FileId(2));
        table.undo(change.undo);
        assert_eq!(table.get(second), None);
        let (again, _) = table.insert_default();
        assert_eq!(again, FileId(2), "a rolled back insert releases its id");
    }
}
