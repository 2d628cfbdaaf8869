use std::hash::{DefaultHasher, Hash, Hasher};

use crate::store::{Document, FileId};

use super::EditorBuffer;

fn hash_text(text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}

/// In-memory copy of the open document.
///
/// A freshly loaded draft has not diverged: it only mirrors what the store
/// returned, so it must never be written back on its own account.
#[derive(Debug)]
pub struct Draft {
    file_id: FileId,
    buffer: EditorBuffer,
    saved_revision: u64,
    saved_hash: u64,
}

impl Draft {
    pub fn load(doc: &Document) -> Self {
        Self {
            file_id: doc.id,
            buffer: EditorBuffer::from_text(&doc.content),
            saved_revision: 0,
            saved_hash: hash_text(&doc.content),
        }
    }

    pub const fn file_id(&self) -> FileId {
        self.file_id
    }

    pub const fn buffer(&self) -> &EditorBuffer {
        &self.buffer
    }

    pub const fn buffer_mut(&mut self) -> &mut EditorBuffer {
        &mut self.buffer
    }

    pub const fn revision(&self) -> u64 {
        self.buffer.revision()
    }

    /// Whether the user has edited since the document was loaded.
    pub const fn is_diverged(&self) -> bool {
        self.buffer.revision() > 0
    }

    /// Whether edits were made after the last successful write.
    pub const fn has_unsaved_edits(&self) -> bool {
        self.buffer.revision() != self.saved_revision
    }

    /// Whether `text` differs from what was last written or loaded.
    pub fn differs_from_saved(&self, text: &str) -> bool {
        hash_text(text) != self.saved_hash
    }

    /// Record that `text` (taken at the current revision) is now stored.
    pub fn mark_saved(&mut self, text: &str) {
        self.saved_revision = self.buffer.revision();
        self.saved_hash = hash_text(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(content: &str) -> Document {
        Document {
            id: FileId(1),
            name: "n".to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_loaded_draft_has_not_diverged() {
        let draft = Draft::load(&doc("# Loaded"));
        assert!(!draft.is_diverged());
        assert!(!draft.has_unsaved_edits());
        assert!(!draft.differs_from_saved("# Loaded"));
        assert_eq!(draft.buffer().text(), "# Loaded");
    }

    #[test]
    fn test_edit_then_save_clears_unsaved_but_stays_diverged() {
        let mut draft = Draft::load(&doc("a"));
        draft.buffer_mut().move_to_end();
        draft.buffer_mut().insert_char('b');
        assert!(draft.is_diverged());
        assert!(draft.has_unsaved_edits());

        let text = draft.buffer().text();
        assert!(draft.differs_from_saved(&text));
        draft.mark_saved(&text);

        assert!(draft.is_diverged());
        assert!(!draft.has_unsaved_edits());
    }

    #[test]
    fn test_edit_and_undo_by_hand_matches_saved_content() {
        let mut draft = Draft::load(&doc("a"));
        draft.buffer_mut().move_to_end();
        draft.buffer_mut().insert_char('b');
        draft.buffer_mut().delete_back();
        assert!(draft.has_unsaved_edits());
        assert!(!draft.differs_from_saved(&draft.buffer().text()));
    }
}
