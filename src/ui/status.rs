use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, SaveState, ToastLevel};

const KEY_HINTS: &str = "^O files  ^N new  ^S save  ^Q quit ";

pub fn render_header(model: &Model, frame: &mut Frame, area: Rect) {
    let name = if model.is_loading() {
        "…"
    } else {
        model.active_name.as_str()
    };
    let header = Line::from(vec![
        Span::styled(" mdpad ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::raw(name.to_string()),
    ]);
    let bar = Paragraph::new(header).style(Style::default().bg(Color::Blue).fg(Color::White));
    frame.render_widget(bar, area);
}

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let bar_style = Style::default().bg(Color::DarkGray).fg(Color::White);

    let mut left = Vec::new();
    if let Some(draft) = &model.draft {
        let state = model.save_state();
        let label = match state {
            SaveState::Saved => "saved",
            SaveState::Editing => "editing",
            SaveState::Unsaved => "unsaved",
        };
        left.push(Span::styled(
            format!(" {label} "),
            bar_style.patch(super::style::save_state_style(state)),
        ));
        let cursor = draft.buffer().cursor();
        left.push(Span::raw(format!(
            " Ln {}, Col {} ",
            cursor.line + 1,
            cursor.col + 1
        )));
    }

    let right = match model.active_toast() {
        Some((message, level)) => {
            let style = match level {
                ToastLevel::Info => bar_style,
                ToastLevel::Warning => Style::default().bg(Color::Yellow).fg(Color::Black),
                ToastLevel::Error => Style::default().bg(Color::Red).fg(Color::White),
            };
            Span::styled(format!(" {message} "), style)
        }
        None => Span::raw(KEY_HINTS),
    };

    frame.render_widget(Paragraph::new(Line::from(left)).style(bar_style), area);
    frame.render_widget(
        Paragraph::new(Line::from(right).alignment(Alignment::Right)),
        area,
    );
}
