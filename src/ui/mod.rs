//! Terminal UI components.
//!
//! - [`render`]: header, editor pane, preview pane and status bar
//! - [`style`]: Theming and colors
//! - overlays: the file menu

pub mod style;

mod overlays;
mod render;
mod status;

pub use overlays::file_menu_rect;
pub use render::{editor_text_width, line_number_width, preview_content_width, render, split_panes};

/// Blank columns between the preview border and its text.
pub const PREVIEW_LEFT_PADDING: u16 = 1;
pub const EDITOR_WIDTH_PERCENT: u16 = 50;
pub const PREVIEW_WIDTH_PERCENT: u16 = 50;

#[cfg(test)]
mod tests;
