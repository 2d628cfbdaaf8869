use super::*;
use crate::app::{FileEntry, Message, Model, ToastLevel, update};
use crate::store::{Document, FileId};
use ratatui::Terminal;
use ratatui::backend::TestBackend;

fn doc(id: u64, name: &str, content: &str) -> Document {
    Document {
        id: FileId(id),
        name: name.to_string(),
        content: content.to_string(),
    }
}

fn loaded_model(content: &str) -> Model {
    let mut model = Model::new((80, 24));
    let first = doc(1, "Untitled", content);
    model.files = vec![FileEntry::from(&first), FileEntry::from(&doc(2, "Notes", ""))];
    model.load(&first);
    model
}

fn draw(model: &Model) -> Vec<String> {
    let backend = TestBackend::new(model.width, model.height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|frame| render(model, frame)).unwrap();
    let buffer = terminal.backend().buffer();
    (0..buffer.area.height)
        .map(|y| {
            (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
        })
        .collect()
}

fn screen_contains(rows: &[String], needle: &str) -> bool {
    rows.iter().any(|row| row.contains(needle))
}

#[test]
fn test_loading_state_before_document_arrives() {
    let model = Model::new((80, 24));
    let rows = draw(&model);
    assert!(screen_contains(&rows, "Loading"));
    assert!(!screen_contains(&rows, "saved"));
}

#[test]
fn test_editor_and_preview_show_default_document() {
    let model = loaded_model("# New File");
    let rows = draw(&model);

    assert!(rows[0].contains("mdpad"));
    assert!(rows[0].contains("Untitled"));
    assert!(rows[1].starts_with("1 # New File"), "editor row: {:?}", rows[1]);
    let preview_half: String = rows[1].chars().skip(40).collect();
    assert!(preview_half.contains("New File"));
    assert!(!preview_half.contains('#'));
    assert!(rows[23].contains("saved"));
    assert!(rows[23].contains("Ln 1, Col 1"));
}

#[test]
fn test_status_reflects_pending_and_unsaved_edits() {
    let mut model = update(loaded_model("# New File"), Message::InsertChar('x'));
    model.autosave_pending = true;
    assert!(draw(&model)[23].contains("editing"));

    model.autosave_pending = false;
    assert!(draw(&model)[23].contains("unsaved"));
}

#[test]
fn test_toast_replaces_key_hints() {
    let mut model = loaded_model("text");
    assert!(draw(&model)[23].contains("^S save"));

    model.show_toast(ToastLevel::Error, "Save failed");
    let status = &draw(&model)[23];
    assert!(status.contains("Save failed"));
    assert!(!status.contains("^S save"));
}

#[test]
fn test_file_menu_marks_active_file() {
    let model = update(loaded_model("text"), Message::OpenMenu);
    let rows = draw(&model);
    assert!(screen_contains(&rows, "Files"));
    assert!(screen_contains(&rows, "● Untitled"));
    assert!(screen_contains(&rows, "  Notes"));
    assert!(screen_contains(&rows, "Enter open"));
}

#[test]
fn test_file_menu_prompts() {
    let model = update(loaded_model("text"), Message::OpenMenu);
    let model = update(model, Message::MenuDown);
    let model = update(model, Message::RequestDelete);
    assert!(screen_contains(
        &draw(&model),
        "Delete \"Notes\"? Press d again to confirm"
    ));

    let model = update(model, Message::StartRename);
    let model = update(model, Message::RenameInput("Journal".to_string()));
    assert!(screen_contains(&draw(&model), "Name: Journal"));
}

#[test]
fn test_editor_scrolls_horizontally_to_cursor() {
    let long = "x".repeat(100);
    let mut model = loaded_model(&long);
    model = update(model, Message::MoveEnd);
    assert!(model.editor_col_offset > 0);

    let rows = draw(&model);
    let editor_half: String = rows[1].chars().take(40).collect();
    assert!(editor_half.starts_with("1 x"));
}

#[test]
fn test_preview_width_leaves_room_for_border() {
    assert_eq!(preview_content_width(80), 38);
    assert_eq!(editor_text_width(80, 5), 38);
    assert_eq!(editor_text_width(80, 150), 36);
}

#[test]
fn test_line_number_width_grows_with_line_count() {
    assert_eq!(line_number_width(9), 1);
    assert_eq!(line_number_width(10), 2);
    assert_eq!(line_number_width(12_345), 5);
}

#[test]
fn test_menu_rect_stays_inside_area() {
    let area = ratatui::layout::Rect::new(0, 0, 30, 10);
    let rect = file_menu_rect(area, 50);
    assert!(rect.right() <= area.right());
    assert!(rect.bottom() <= area.bottom());
}
