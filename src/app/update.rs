use crate::app::Model;
use crate::app::model::{FileMenu, MenuMode, ToastLevel};
use crate::editor::{Direction, EditorBuffer};
use crate::store::FileId;

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editor
    /// Insert a character at the cursor
    InsertChar(char),
    /// Insert pasted text at the cursor
    InsertText(String),
    /// Delete character before cursor (Backspace)
    DeleteBack,
    /// Delete character at cursor (Delete)
    DeleteForward,
    /// Split line at cursor (Enter)
    SplitLine,
    /// Insert indentation (Tab)
    Indent,
    /// Move cursor in a direction
    MoveCursor(Direction),
    /// Move cursor to beginning of line (Home)
    MoveHome,
    /// Move cursor to end of line (End)
    MoveEnd,
    /// Move cursor to start of buffer (Ctrl+Home)
    MoveToStart,
    /// Move cursor to end of buffer (Ctrl+End)
    MoveToEnd,
    /// Move cursor up one screen
    PageUp,
    /// Move cursor down one screen
    PageDown,

    // File menu
    OpenMenu,
    CloseMenu,
    MenuUp,
    MenuDown,
    /// Return from a prompt to the file list
    MenuBack,
    /// Start renaming the selected file
    StartRename,
    /// Replace the rename prompt text
    RenameInput(String),
    /// First step of deleting the selected file
    RequestDelete,

    // Storage
    /// Switch the editor to another file
    OpenFile(FileId),
    /// Create a file and open it
    NewFile,
    RenameFile(FileId, String),
    DeleteFile(FileId),
    /// Write the draft now
    SaveNow,

    // Window
    /// Terminal resized
    Resize(u16, u16),

    // Application
    /// Quit the application
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here.
/// Storage messages only adjust view state; the writes themselves happen in
/// the session's side effects.
pub fn update(mut model: Model, msg: Message) -> Model {
    // SaveNow keeps the flag so Ctrl+S can complete a pending quit.
    if !matches!(msg, Message::Quit | Message::SaveNow) {
        model.quit_confirmed = false;
    }

    match msg {
        Message::InsertChar(ch) => edit(&mut model, |buf| buf.insert_char(ch)),
        Message::InsertText(text) => edit(&mut model, |buf| buf.insert_str(&text)),
        Message::DeleteBack => edit(&mut model, |buf| {
            buf.delete_back();
        }),
        Message::DeleteForward => edit(&mut model, |buf| {
            buf.delete_forward();
        }),
        Message::SplitLine => edit(&mut model, EditorBuffer::split_line),
        Message::Indent => edit(&mut model, EditorBuffer::insert_indent),
        Message::MoveCursor(dir) => navigate(&mut model, |buf| buf.move_cursor(dir)),
        Message::MoveHome => navigate(&mut model, EditorBuffer::move_home),
        Message::MoveEnd => navigate(&mut model, EditorBuffer::move_end),
        Message::MoveToStart => navigate(&mut model, EditorBuffer::move_to_start),
        Message::MoveToEnd => navigate(&mut model, EditorBuffer::move_to_end),
        Message::PageUp => {
            let page = usize::from(model.body_height().max(1));
            navigate(&mut model, |buf| {
                let line = buf.cursor().line.saturating_sub(page);
                buf.move_to_line(line);
            });
        }
        Message::PageDown => {
            let page = usize::from(model.body_height().max(1));
            navigate(&mut model, |buf| {
                let line = buf.cursor().line + page;
                buf.move_to_line(line);
            });
        }

        Message::OpenMenu => {
            let selected = model
                .active_id()
                .and_then(|id| model.files.iter().position(|f| f.id == id))
                .unwrap_or(0);
            model.menu = Some(FileMenu {
                selected,
                mode: MenuMode::Browse,
            });
        }
        Message::CloseMenu => model.menu = None,
        Message::MenuUp => {
            if let Some(menu) = &mut model.menu {
                menu.selected = menu.selected.saturating_sub(1);
                menu.mode = MenuMode::Browse;
            }
        }
        Message::MenuDown => {
            let last = model.files.len().saturating_sub(1);
            if let Some(menu) = &mut model.menu {
                menu.selected = (menu.selected + 1).min(last);
                menu.mode = MenuMode::Browse;
            }
        }
        Message::MenuBack => {
            if let Some(menu) = &mut model.menu {
                menu.mode = MenuMode::Browse;
            }
        }
        Message::StartRename => {
            let current = model.selected_file().map(|f| f.name.clone());
            if let (Some(menu), Some(name)) = (&mut model.menu, current) {
                menu.mode = MenuMode::Rename(name);
            }
        }
        Message::RenameInput(text) => {
            if let Some(menu) = &mut model.menu {
                menu.mode = MenuMode::Rename(text);
            }
        }
        Message::RequestDelete => {
            let has_selection = model.selected_file().is_some();
            if let Some(menu) = &mut model.menu
                && has_selection
            {
                menu.mode = MenuMode::ConfirmDelete;
            }
        }

        Message::OpenFile(_) | Message::NewFile => model.menu = None,
        Message::RenameFile(..) | Message::DeleteFile(_) => {
            if let Some(menu) = &mut model.menu {
                menu.mode = MenuMode::Browse;
            }
        }
        Message::SaveNow => {}

        Message::Resize(width, height) => {
            model.width = width;
            model.height = height;
            model.refresh_preview();
            model.ensure_cursor_visible();
        }

        Message::Quit => {
            if model.has_unsaved_edits() && !model.quit_confirmed {
                model.show_toast(
                    ToastLevel::Warning,
                    "Unsaved changes! Press Ctrl+Q again to quit, or Ctrl+S to save",
                );
                model.quit_confirmed = true;
            } else {
                model.should_quit = true;
            }
        }
    }
    model
}

/// Apply a text mutation and re-render the preview.
fn edit(model: &mut Model, f: impl FnOnce(&mut EditorBuffer)) {
    let Some(draft) = &mut model.draft else {
        return;
    };
    let before = draft.revision();
    f(draft.buffer_mut());
    if draft.revision() != before {
        model.refresh_preview();
    }
    model.ensure_cursor_visible();
}

fn navigate(model: &mut Model, f: impl FnOnce(&mut EditorBuffer)) {
    let Some(draft) = &mut model.draft else {
        return;
    };
    f(draft.buffer_mut());
    model.ensure_cursor_visible();
}
