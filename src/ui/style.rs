//! Theming and color definitions.
//!
//! Uses ANSI colors that adapt to the terminal's color palette.

use ratatui::style::{Color, Modifier, Style};

use crate::app::SaveState;
use crate::preview::{InlineStyle, LineType};

/// Get the style for a given preview line type.
pub fn style_for_line_type(line_type: LineType) -> Style {
    match line_type {
        LineType::Heading(1) | LineType::HeadingRule(1) => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        LineType::Heading(2) | LineType::HeadingRule(2) => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
        LineType::Heading(3) => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        LineType::Heading(4) => Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::BOLD),
        LineType::Heading(5) => Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
        LineType::Heading(_) | LineType::HeadingRule(_) => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),

        LineType::CodeBlock => Style::default().fg(Color::Indexed(245)),

        // Block quotes - italic blue
        LineType::BlockQuote => Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::ITALIC),

        LineType::Rule | LineType::Html => Style::default()
            .fg(Color::Indexed(240))
            .add_modifier(Modifier::DIM),

        LineType::ListItem | LineType::Table | LineType::Paragraph | LineType::Empty => {
            Style::default()
        }
    }
}

/// Get the style for an inline span, merged with a base line style.
pub fn style_for_inline(base: Style, inline: InlineStyle) -> Style {
    let mut style = base;

    if inline.emphasis {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if inline.strong {
        style = style.add_modifier(Modifier::BOLD);
    }
    if inline.strikethrough {
        style = style.add_modifier(Modifier::CROSSED_OUT);
    }
    if inline.link {
        style = style
            .add_modifier(Modifier::UNDERLINED)
            .fg(Color::LightBlue);
    }
    if inline.code {
        style = style.fg(Color::Red).add_modifier(Modifier::BOLD);
    }

    style
}

pub const fn save_state_style(state: SaveState) -> Style {
    match state {
        SaveState::Saved => Style::new().fg(Color::Green),
        SaveState::Editing => Style::new().fg(Color::Yellow),
        SaveState::Unsaved => Style::new().fg(Color::Red).add_modifier(Modifier::BOLD),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_styles_stack_on_base() {
        let base = style_for_line_type(LineType::Heading(2));
        let style = style_for_inline(
            base,
            InlineStyle {
                emphasis: true,
                strikethrough: true,
                ..InlineStyle::default()
            },
        );
        assert_eq!(style.fg, Some(Color::Green));
        assert!(style.add_modifier.contains(Modifier::BOLD));
        assert!(style.add_modifier.contains(Modifier::ITALIC));
        assert!(style.add_modifier.contains(Modifier::CROSSED_OUT));
    }

    #[test]
    fn test_heading_rule_matches_heading_color() {
        assert_eq!(
            style_for_line_type(LineType::HeadingRule(1)),
            style_for_line_type(LineType::Heading(1))
        );
    }
}
