//! File operations offered by the editor's file menu.
//!
//! A [`Workspace`] owns the document table and the selection and keeps them
//! consistent: whenever the active file goes away, another one is selected in
//! the same operation.

use crate::error::{Result, WorkspaceError};
use crate::reconcile::{Reconciled, reconcile};
use crate::selection::SelectionStore;
use crate::store::{Document, FileId, FileStore, Query, Subscription};

#[derive(Debug)]
pub struct Workspace<S, P> {
    store: S,
    selection: P,
}

impl<S: FileStore, P: SelectionStore> Workspace<S, P> {
    pub const fn new(store: S, selection: P) -> Self {
        Self { store, selection }
    }

    /// Reconcile the selection and fetch the document it names.
    ///
    /// # Errors
    /// Propagates storage failures.
    pub fn bootstrap(&mut self) -> Result<(Reconciled, Document)> {
        let outcome = reconcile(&mut self.store, &mut self.selection)?;
        let id = outcome.active();
        let doc = self.store.get_file(id)?.ok_or(WorkspaceError::Missing(id))?;
        Ok((outcome, doc))
    }

    pub fn active(&self) -> Option<FileId> {
        self.selection.get()
    }

    pub fn list_files(&self) -> Result<Vec<Document>> {
        Ok(self.store.list_files()?)
    }

    pub fn get_file(&self, id: FileId) -> Result<Option<Document>> {
        Ok(self.store.get_file(id)?)
    }

    /// Select `id` and return its document.
    ///
    /// # Errors
    /// Returns [`WorkspaceError::Missing`] if the file no longer exists; the selection
    /// is left untouched in that case.
    pub fn open_file(&mut self, id: FileId) -> Result<Document> {
        let doc = self.store.get_file(id)?.ok_or(WorkspaceError::Missing(id))?;
        self.selection.set(Some(id))?;
        tracing::debug!(%id, "opened file");
        Ok(doc)
    }

    /// Create a default file and select it.
    pub fn create_file(&mut self) -> Result<Document> {
        let id = self.store.create_file()?;
        self.selection.set(Some(id))?;
        tracing::debug!(%id, "created file");
        self.store.get_file(id)?.ok_or(WorkspaceError::Missing(id))
    }

    /// Rename `id`. The name is trimmed and must not be empty.
    pub fn rename_file(&mut self, id: FileId, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WorkspaceError::EmptyName);
        }
        self.store.update_file_name(id, name)?;
        tracing::debug!(%id, name, "renamed file");
        Ok(())
    }

    /// Delete `id`.
    ///
    /// When `id` was the active file, the first remaining file becomes active
    /// (or a new default file when none remain) and that document is
    /// returned. Deleting any other file returns `None`.
    pub fn delete_file(&mut self, id: FileId) -> Result<Option<Document>> {
        self.store.delete_file(id)?;
        tracing::debug!(%id, "deleted file");
        if self.selection.get() != Some(id) {
            return Ok(None);
        }

        let replacement = match self.store.get_first_file()? {
            Some(doc) => doc,
            None => {
                let created = self.store.create_file()?;
                self.store
                    .get_file(created)?
                    .ok_or(WorkspaceError::Missing(created))?
            }
        };
        self.selection.set(Some(replacement.id))?;
        tracing::info!(deleted = %id, active = %replacement.id, "active file replaced");
        Ok(Some(replacement))
    }

    /// Persist draft content for `id`.
    pub fn save_content(&mut self, id: FileId, content: &str) -> Result<()> {
        self.store.update_file_content(id, content)?;
        Ok(())
    }

    pub fn subscribe(&mut self, query: Query) -> Subscription {
        self.store.subscribe(query)
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn selection(&self) -> &P {
        &self.selection
    }

    pub fn into_parts(self) -> (S, P) {
        (self.store, self.selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::MemorySelection;
    use crate::store::{MemoryStore, StoreError};

    fn workspace() -> Workspace<MemoryStore, MemorySelection> {
        Workspace::new(MemoryStore::new(), MemorySelection::default())
    }

    #[test]
    fn test_bootstrap_on_empty_store_returns_default_file() {
        let mut ws = workspace();
        let (outcome, doc) = ws.bootstrap().unwrap();
        assert!(matches!(outcome, Reconciled::CreatedDefault(_)));
        assert_eq!(doc.content, "# New File");
        assert_eq!(ws.active(), Some(doc.id));
    }

    #[test]
    fn test_create_selects_new_file() {
        let mut ws = workspace();
        ws.bootstrap().unwrap();
        let doc = ws.create_file().unwrap();
        assert_eq!(ws.active(), Some(doc.id));
        assert_eq!(ws.list_files().unwrap().len(), 2);
    }

    #[test]
    fn test_open_missing_file_keeps_selection() {
        let mut ws = workspace();
        let (_, doc) = ws.bootstrap().unwrap();
        assert!(matches!(
            ws.open_file(FileId(50)),
            Err(WorkspaceError::Missing(FileId(50)))
        ));
        assert_eq!(ws.active(), Some(doc.id));
    }

    #[test]
    fn test_rename_trims_and_rejects_empty() {
        let mut ws = workspace();
        let (_, doc) = ws.bootstrap().unwrap();
        ws.rename_file(doc.id, "  Notes  ").unwrap();
        assert_eq!(ws.get_file(doc.id).unwrap().unwrap().name, "Notes");
        assert!(matches!(
            ws.rename_file(doc.id, "   "),
            Err(WorkspaceError::EmptyName)
        ));
    }

    #[test]
    fn test_rename_missing_file_surfaces_store_error() {
        let mut ws = workspace();
        assert!(matches!(
            ws.rename_file(FileId(8), "x"),
            Err(WorkspaceError::Store(StoreError::NotFound(FileId(8))))
        ));
    }

    #[test]
    fn test_deleting_inactive_file_keeps_selection() {
        let mut ws = workspace();
        let (_, first) = ws.bootstrap().unwrap();
        let second = ws.create_file().unwrap();
        ws.open_file(first.id).unwrap();

        assert_eq!(ws.delete_file(second.id).unwrap(), None);
        assert_eq!(ws.active(), Some(first.id));
    }

    #[test]
    fn test_deleting_active_file_selects_remaining_one() {
        let mut ws = workspace();
        let (_, first) = ws.bootstrap().unwrap();
        let second = ws.create_file().unwrap();

        let replacement = ws.delete_file(second.id).unwrap().unwrap();

        assert_eq!(replacement.id, first.id);
        assert_eq!(ws.active(), Some(first.id));
    }

    #[test]
    fn test_deleting_last_file_creates_exactly_one_default() {
        let mut ws = workspace();
        let (_, only) = ws.bootstrap().unwrap();
        ws.rename_file(only.id, "Gone").unwrap();

        let replacement = ws.delete_file(only.id).unwrap().unwrap();

        let files = ws.list_files().unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0], replacement);
        assert_eq!(replacement.name, "Untitled");
        assert_ne!(replacement.id, only.id);
        assert_eq!(ws.active(), Some(replacement.id));
    }
}
