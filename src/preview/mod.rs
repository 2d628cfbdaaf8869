//! Live markdown preview.
//!
//! The draft is parsed with comrak and laid out into styled terminal rows on
//! every edit; there is no caching or debouncing on this path.

mod parser;
mod types;

pub use parser::render;
pub use types::{InlineSpan, InlineStyle, LineType, Preview, RenderedLine};

impl Preview {
    /// Render `source` wrapped to `width` columns.
    pub fn render(source: &str, width: u16) -> Self {
        render(source, width)
    }
}
