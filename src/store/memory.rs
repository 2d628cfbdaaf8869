use super::table::Table;
use super::{Document, FileId, FileStore, Query, Result, Subscribers, Subscription};

/// In-memory document table. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    table: Table,
    subscribers: Subscribers,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FileStore for MemoryStore {
    fn create_file(&mut self) -> Result<FileId> {
        let (id, change) = self.table.insert_default();
        self.subscribers.emit(change.event);
        Ok(id)
    }

    fn get_file(&self, id: FileId) -> Result<Option<Document>> {
        Ok(self.table.get(id).cloned())
    }

    fn get_first_file(&self) -> Result<Option<Document>> {
        Ok(self.table.first().cloned())
    }

    fn update_file_content(&mut self, id: FileId, content: &str) -> Result<()> {
        let change = self.table.set_content(id, content)?;
        self.subscribers.emit(change.event);
        Ok(())
    }

    fn update_file_name(&mut self, id: FileId, name: &str) -> Result<()> {
        let change = self.table.set_name(id, name)?;
        self.subscribers.emit(change.event);
        Ok(())
    }

    fn delete_file(&mut self, id: FileId) -> Result<()> {
        if let Some(change) = self.table.remove(id) {
            self.subscribers.emit(change.event);
        }
        Ok(())
    }

    fn list_files(&self) -> Result<Vec<Document>> {
        Ok(self.table.all())
    }

    fn subscribe(&mut self, query: Query) -> Subscription {
        self.subscribers.subscribe(query)
    }
}
