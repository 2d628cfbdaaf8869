use std::time::{Duration, Instant};

use unicode_width::UnicodeWidthStr;

use crate::editor::Draft;
use crate::preview::Preview;
use crate::store::{Document, FileId};

/// How long a status notice stays visible.
const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Persistence state shown in the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveState {
    /// Draft matches what was last written.
    Saved,
    /// Edits are waiting for the autosave quiet period.
    Editing,
    /// Edits exist and no write is scheduled (a save failed or was discarded).
    Unsaved,
}

/// A row in the file menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub id: FileId,
    pub name: String,
}

impl From<&Document> for FileEntry {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id,
            name: doc.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuMode {
    Browse,
    /// Inline rename prompt holding the typed name.
    Rename(String),
    /// First `d` pressed; a second one deletes.
    ConfirmDelete,
}

/// The Ctrl+O file menu overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMenu {
    pub selected: usize,
    pub mode: MenuMode,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
#[derive(Default)]
pub struct Model {
    /// Files in the store, ascending by id
    pub files: Vec<FileEntry>,
    /// The open document; `None` while the selection is being resolved
    pub draft: Option<Draft>,
    /// Name of the open document
    pub active_name: String,
    /// Preview of the draft, laid out for the preview pane
    pub preview: Preview,
    /// Line index of the first visible editor line
    pub editor_scroll_offset: usize,
    /// Display column of the first visible editor column
    pub editor_col_offset: usize,
    /// Terminal width
    pub width: u16,
    /// Terminal height
    pub height: u16,
    /// File menu overlay, when open
    pub menu: Option<FileMenu>,
    toast: Option<Toast>,
    /// Whether an autosave is scheduled
    pub autosave_pending: bool,
    /// Set after the first quit attempt with unsaved edits
    pub quit_confirmed: bool,
    /// Whether the app should quit
    pub should_quit: bool,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("files", &self.files.len())
            .field("active", &self.active_id())
            .field("size", &(self.width, self.height))
            .field("menu", &self.menu)
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Create an empty model in the loading state.
    pub fn new(terminal_size: (u16, u16)) -> Self {
        Self {
            width: terminal_size.0,
            height: terminal_size.1,
            ..Self::default()
        }
    }

    pub const fn is_loading(&self) -> bool {
        self.draft.is_none()
    }

    pub fn active_id(&self) -> Option<FileId> {
        self.draft.as_ref().map(Draft::file_id)
    }

    /// Replace the draft with a freshly fetched document.
    pub fn load(&mut self, doc: &Document) {
        self.draft = Some(Draft::load(doc));
        self.active_name.clone_from(&doc.name);
        self.editor_scroll_offset = 0;
        self.editor_col_offset = 0;
        self.quit_confirmed = false;
        self.refresh_preview();
    }

    /// `(file, revision)` of the draft, used to detect edits across an update.
    pub fn draft_revision(&self) -> Option<(FileId, u64)> {
        self.draft.as_ref().map(|d| (d.file_id(), d.revision()))
    }

    pub fn has_unsaved_edits(&self) -> bool {
        self.draft.as_ref().is_some_and(Draft::has_unsaved_edits)
    }

    pub fn save_state(&self) -> SaveState {
        if !self.has_unsaved_edits() {
            SaveState::Saved
        } else if self.autosave_pending {
            SaveState::Editing
        } else {
            SaveState::Unsaved
        }
    }

    /// Rows available to the editor and preview panes.
    pub const fn body_height(&self) -> u16 {
        self.height.saturating_sub(2)
    }

    pub fn refresh_preview(&mut self) {
        let width = crate::ui::preview_content_width(self.width);
        self.preview = match &self.draft {
            Some(draft) => Preview::render(&draft.buffer().text(), width),
            None => Preview::default(),
        };
    }

    /// First preview line to show, following the editor cursor proportionally.
    pub fn preview_scroll_offset(&self) -> usize {
        let Some(draft) = &self.draft else {
            return 0;
        };
        let visible = usize::from(self.body_height());
        let max_offset = self.preview.line_count().saturating_sub(visible);
        let last_line = draft.buffer().line_count().saturating_sub(1);
        if last_line == 0 {
            return 0;
        }
        max_offset * draft.buffer().cursor().line.min(last_line) / last_line
    }

    /// Keep the editor cursor inside the visible window.
    pub fn ensure_cursor_visible(&mut self) {
        let Some(draft) = &self.draft else {
            return;
        };
        let buf = draft.buffer();
        let cursor = buf.cursor();

        let visible_height = usize::from(self.body_height());
        if visible_height == 0 || cursor.line < self.editor_scroll_offset {
            self.editor_scroll_offset = cursor.line;
        } else if cursor.line >= self.editor_scroll_offset + visible_height {
            self.editor_scroll_offset = cursor.line + 1 - visible_height;
        }

        let line = buf.line_at(cursor.line).unwrap_or_default();
        let cursor_x = line
            .chars()
            .take(cursor.col)
            .collect::<String>()
            .width();
        let text_width = usize::from(crate::ui::editor_text_width(self.width, buf.line_count()));
        if cursor_x < self.editor_col_offset {
            self.editor_col_offset = cursor_x;
        } else if text_width > 0 && cursor_x >= self.editor_col_offset + text_width {
            self.editor_col_offset = cursor_x + 1 - text_width;
        }
    }

    /// Keep the menu selection within the file list.
    pub fn clamp_menu_selection(&mut self) {
        let len = self.files.len();
        if let Some(menu) = &mut self.menu {
            menu.selected = menu.selected.min(len.saturating_sub(1));
        }
    }

    pub fn selected_file(&self) -> Option<&FileEntry> {
        let menu = self.menu.as_ref()?;
        self.files.get(menu.selected)
    }

    pub fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    pub fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}
