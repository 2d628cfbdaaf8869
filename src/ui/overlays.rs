use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::{MenuMode, Model};

pub fn file_menu_rect(area: Rect, items_len: usize) -> Rect {
    let popup_width = area.width.saturating_sub(16).clamp(24, 60);
    let rows = u16::try_from(items_len).unwrap_or(u16::MAX);
    // Border, padding, blank separator and footer.
    let needed_rows = rows.saturating_add(6);
    let popup_height = needed_rows.min(area.height.saturating_sub(2).max(8));
    centered_popup_rect(popup_width, popup_height, area)
}

pub fn render_file_menu(model: &Model, frame: &mut Frame, area: Rect) {
    let Some(menu) = &model.menu else {
        return;
    };
    let popup = file_menu_rect(area, model.files.len());
    let dim_style = Style::default().fg(Color::Indexed(245));

    let block = Block::default()
        .title(" Files ")
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));
    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    // Reserve 2 rows at the bottom for the prompt / hint.
    let list_height = usize::from(inner.height.saturating_sub(2));
    let scroll = (menu.selected + 1).saturating_sub(list_height);
    let active = model.active_id();

    let lines: Vec<Line> = model
        .files
        .iter()
        .enumerate()
        .skip(scroll)
        .take(list_height)
        .map(|(idx, entry)| {
            let marker = if Some(entry.id) == active { "● " } else { "  " };
            let style = if idx == menu.selected {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            Line::styled(format!("{marker}{}", entry.name), style)
        })
        .collect();
    let list_area = Rect {
        height: inner.height.saturating_sub(2),
        ..inner
    };
    frame.render_widget(Paragraph::new(lines), list_area);

    let footer = match &menu.mode {
        MenuMode::Browse => Line::styled(
            "Enter open · n new · r rename · d delete · Esc close",
            dim_style,
        ),
        MenuMode::Rename(text) => Line::from(vec![
            Span::styled("Name: ", Style::default().fg(Color::Yellow)),
            Span::raw(text.clone()),
            Span::styled(" ", Style::default().bg(Color::White)),
        ]),
        MenuMode::ConfirmDelete => {
            let name = model.selected_file().map_or("", |f| f.name.as_str());
            Line::styled(
                format!("Delete \"{name}\"? Press d again to confirm"),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )
        }
    };
    let footer_area = Rect {
        y: inner.y + inner.height.saturating_sub(1),
        height: inner.height.min(1),
        ..inner
    };
    frame.render_widget(Paragraph::new(footer), footer_area);
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
