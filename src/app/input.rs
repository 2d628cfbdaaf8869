use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::model::MenuMode;
use crate::app::{Message, Model};
use crate::autosave::Debouncer;
use crate::editor::Direction;

/// Translate a terminal event into a message.
///
/// Resize events are queued on `resize_debouncer` and applied by the event
/// loop once the terminal stops changing size.
pub(super) fn handle_event(
    event: &Event,
    model: &Model,
    now_ms: u64,
    resize_debouncer: &mut Debouncer<(u16, u16)>,
) -> Option<Message> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(*key, model),
        Event::Paste(text) if model.menu.is_none() && !model.is_loading() => {
            Some(Message::InsertText(text.clone()))
        }
        Event::Resize(w, h) => {
            resize_debouncer.queue((*w, *h), now_ms);
            None
        }
        _ => None,
    }
}

pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && key.code == KeyCode::Char('q') {
        return Some(Message::Quit);
    }
    if model.is_loading() {
        return None;
    }

    if let Some(menu) = &model.menu {
        return handle_menu_key(key, model, &menu.mode);
    }

    match key.code {
        KeyCode::Char('o') if ctrl => Some(Message::OpenMenu),
        KeyCode::Char('n') if ctrl => Some(Message::NewFile),
        KeyCode::Char('s') if ctrl => Some(Message::SaveNow),
        KeyCode::Home if ctrl => Some(Message::MoveToStart),
        KeyCode::End if ctrl => Some(Message::MoveToEnd),
        KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
            Some(Message::InsertChar(c))
        }
        KeyCode::Enter => Some(Message::SplitLine),
        KeyCode::Backspace => Some(Message::DeleteBack),
        KeyCode::Delete => Some(Message::DeleteForward),
        KeyCode::Tab => Some(Message::Indent),
        KeyCode::Up => Some(Message::MoveCursor(Direction::Up)),
        KeyCode::Down => Some(Message::MoveCursor(Direction::Down)),
        KeyCode::Left => Some(Message::MoveCursor(Direction::Left)),
        KeyCode::Right => Some(Message::MoveCursor(Direction::Right)),
        KeyCode::Home => Some(Message::MoveHome),
        KeyCode::End => Some(Message::MoveEnd),
        KeyCode::PageUp => Some(Message::PageUp),
        KeyCode::PageDown => Some(Message::PageDown),
        _ => None,
    }
}

fn handle_menu_key(key: KeyEvent, model: &Model, mode: &MenuMode) -> Option<Message> {
    let selected = model.selected_file().map(|f| f.id);

    match mode {
        MenuMode::Rename(text) => match key.code {
            KeyCode::Esc => Some(Message::MenuBack),
            KeyCode::Enter => selected.map(|id| Message::RenameFile(id, text.clone())),
            KeyCode::Backspace => {
                let mut next = text.clone();
                next.pop();
                Some(Message::RenameInput(next))
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let mut next = text.clone();
                next.push(c);
                Some(Message::RenameInput(next))
            }
            _ => None,
        },
        MenuMode::ConfirmDelete => match key.code {
            KeyCode::Char('d') => selected.map(Message::DeleteFile),
            KeyCode::Esc => Some(Message::CloseMenu),
            _ => Some(Message::MenuBack),
        },
        MenuMode::Browse => match key.code {
            KeyCode::Esc => Some(Message::CloseMenu),
            KeyCode::Char('o') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Message::CloseMenu)
            }
            KeyCode::Up | KeyCode::Char('k') => Some(Message::MenuUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Message::MenuDown),
            KeyCode::Enter => selected.map(Message::OpenFile),
            KeyCode::Char('n') => Some(Message::NewFile),
            KeyCode::Char('r') => Some(Message::StartRename),
            KeyCode::Char('d') => Some(Message::RequestDelete),
            _ => None,
        },
    }
}
