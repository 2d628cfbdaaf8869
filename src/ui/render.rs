use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::app::Model;
use crate::editor::EditorBuffer;

use super::{EDITOR_WIDTH_PERCENT, PREVIEW_LEFT_PADDING, PREVIEW_WIDTH_PERCENT, overlays, status};

pub fn split_panes(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(EDITOR_WIDTH_PERCENT),
            Constraint::Percentage(PREVIEW_WIDTH_PERCENT),
        ])
        .split(area)
}

/// Columns available to preview text for a terminal of `total_width`.
pub fn preview_content_width(total_width: u16) -> u16 {
    let pane = split_panes(Rect::new(0, 0, total_width, 1))[1];
    // Left border plus padding.
    pane.width.saturating_sub(1 + PREVIEW_LEFT_PADDING).max(1)
}

/// Columns available to editor text once the line number gutter is drawn.
pub fn editor_text_width(total_width: u16, line_count: usize) -> u16 {
    let pane = split_panes(Rect::new(0, 0, total_width, 1))[0];
    pane.width.saturating_sub(line_number_width(line_count) + 1)
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    status::render_header(model, frame, rows[0]);
    if let Some(draft) = &model.draft {
        let panes = split_panes(rows[1]);
        render_editor(model, draft.buffer(), frame, panes[0]);
        render_preview(model, frame, panes[1]);
    } else {
        let loading = Paragraph::new("Loading…")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        let middle = Rect {
            y: rows[1].y + rows[1].height / 2,
            height: rows[1].height.min(1),
            ..rows[1]
        };
        frame.render_widget(loading, middle);
    }
    status::render_status_bar(model, frame, rows[2]);

    if model.menu.is_some() {
        overlays::render_file_menu(model, frame, area);
    }
}

fn render_editor(model: &Model, buf: &EditorBuffer, frame: &mut Frame, area: Rect) {
    let total_lines = buf.line_count();
    let gutter_width = line_number_width(total_lines);
    let text_width = usize::from(area.width.saturating_sub(gutter_width + 1));

    let start = model.editor_scroll_offset;
    let end = (start + usize::from(area.height)).min(total_lines);
    let cursor = buf.cursor();

    let mut content: Vec<Line> = Vec::new();
    for line_idx in start..end {
        let line_text = buf.line_at(line_idx).unwrap_or_default();
        let line_num = format!("{:>width$} ", line_idx + 1, width = gutter_width as usize);

        let mut spans = vec![Span::styled(line_num, Style::default().fg(Color::DarkGray))];
        let cursor_col = (line_idx == cursor.line).then_some(cursor.col);
        spans.extend(visible_line_spans(
            &line_text,
            model.editor_col_offset,
            text_width,
            cursor_col,
        ));
        content.push(Line::from(spans));
    }

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(content), area);
}

/// Slice a line to the horizontally visible window, splitting out the
/// character under the cursor so it can be drawn reversed.
fn visible_line_spans(
    text: &str,
    col_offset: usize,
    width: usize,
    cursor_col: Option<usize>,
) -> Vec<Span<'static>> {
    let cursor_style = Style::default().bg(Color::White).fg(Color::Black);
    let mut before = String::new();
    let mut at_cursor: Option<String> = None;
    let mut after = String::new();
    let mut x = 0usize;

    for (idx, ch) in text.chars().enumerate() {
        let ch_width = ch.width().unwrap_or(0);
        if x < col_offset {
            x += ch_width;
            continue;
        }
        if x + ch_width > col_offset + width {
            break;
        }
        x += ch_width;
        match cursor_col {
            Some(col) if idx == col => at_cursor = Some(ch.to_string()),
            Some(col) if idx > col => after.push(ch),
            _ => before.push(ch),
        }
    }

    let line_len = text.chars().count();
    let mut spans = vec![Span::raw(before)];
    if let Some(ch) = at_cursor {
        spans.push(Span::styled(ch, cursor_style));
    } else if cursor_col.is_some_and(|col| col >= line_len) {
        spans.push(Span::styled(" ", cursor_style));
    }
    if !after.is_empty() {
        spans.push(Span::raw(after));
    }
    spans
}

fn render_preview(model: &Model, frame: &mut Frame, area: Rect) {
    let offset = model.preview_scroll_offset();
    let visible = model
        .preview
        .visible_lines(offset, usize::from(area.height));

    let content: Vec<Line> = visible
        .iter()
        .map(|line| {
            let line_style = super::style::style_for_line_type(line.line_type());
            let spans: Vec<Span> = line
                .spans()
                .iter()
                .map(|span| {
                    Span::styled(
                        span.text().to_string(),
                        super::style::style_for_inline(line_style, span.style()),
                    )
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let block = Block::default()
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(Color::DarkGray))
        .padding(Padding::left(PREVIEW_LEFT_PADDING));
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(content).block(block), area);
}

/// Calculate the width needed for line numbers.
pub const fn line_number_width(total_lines: usize) -> u16 {
    if total_lines < 10 {
        1
    } else if total_lines < 100 {
        2
    } else if total_lines < 1_000 {
        3
    } else if total_lines < 10_000 {
        4
    } else if total_lines < 100_000 {
        5
    } else {
        6
    }
}
