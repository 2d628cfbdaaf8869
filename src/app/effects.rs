use crate::app::{Message, Model, ToastLevel};
use crate::error::WorkspaceError;
use crate::selection::SelectionStore;
use crate::store::{Document, FileId, FileStore};

use super::session::Session;

impl<S: FileStore, P: SelectionStore> Session<S, P> {
    pub(super) fn handle_message_side_effects(&mut self, model: &mut Model, msg: &Message) {
        match msg {
            Message::OpenFile(id) => {
                if model.active_id() == Some(*id) {
                    return;
                }
                self.autosave.cancel();
                match self.workspace.open_file(*id) {
                    Ok(doc) => self.show_document(model, &doc),
                    Err(err) => {
                        tracing::error!(%id, error = %err, "open failed");
                        model.show_toast(ToastLevel::Error, "Could not open file");
                    }
                }
            }
            Message::NewFile => {
                self.autosave.cancel();
                match self.workspace.create_file() {
                    Ok(doc) => self.show_document(model, &doc),
                    Err(err) => {
                        tracing::error!(error = %err, "create failed");
                        model.show_toast(ToastLevel::Error, "Could not create file");
                    }
                }
            }
            Message::RenameFile(id, name) => self.rename(model, *id, name),
            Message::DeleteFile(id) => self.delete(model, *id),
            Message::SaveNow => {
                let Some(draft) = model.draft.as_mut() else {
                    return;
                };
                match self.autosave.flush(draft, &mut self.workspace) {
                    Ok(_) => model.show_toast(ToastLevel::Info, "Saved"),
                    Err(err) => {
                        tracing::error!(error = %err, "save failed");
                        model.show_toast(ToastLevel::Error, "Save failed");
                    }
                }
            }
            Message::Quit if model.should_quit => self.teardown(),
            _ => {}
        }
    }

    fn rename(&mut self, model: &mut Model, id: FileId, name: &str) {
        match self.workspace.rename_file(id, name) {
            Ok(()) => {}
            Err(WorkspaceError::EmptyName) => {
                model.show_toast(ToastLevel::Warning, "Name cannot be empty");
            }
            Err(err) => {
                tracing::error!(%id, error = %err, "rename failed");
                model.show_toast(ToastLevel::Error, "Rename failed");
            }
        }
    }

    fn delete(&mut self, model: &mut Model, id: FileId) {
        if model.active_id() == Some(id) {
            self.autosave.cancel();
        }
        match self.workspace.delete_file(id) {
            Ok(Some(replacement)) => self.show_document(model, &replacement),
            Ok(None) => {}
            Err(err) => {
                tracing::error!(%id, error = %err, "delete failed");
                model.show_toast(ToastLevel::Error, "Delete failed");
            }
        }
    }

    fn show_document(&mut self, model: &mut Model, doc: &Document) {
        model.load(doc);
        self.watch_active(doc.id);
    }
}
