//! Rendered preview types.

/// Inline formatting flags carried by a span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub emphasis: bool,
    pub strong: bool,
    pub code: bool,
    pub strikethrough: bool,
    pub link: bool,
}

/// A run of text with one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan {
    text: String,
    style: InlineStyle,
}

impl InlineSpan {
    pub fn new(text: impl Into<String>, style: InlineStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, InlineStyle::default())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn style(&self) -> InlineStyle {
        self.style
    }
}

/// Block kind a rendered line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    Heading(u8),
    /// Underline drawn below a level 1 or 2 heading.
    HeadingRule(u8),
    Paragraph,
    ListItem,
    BlockQuote,
    CodeBlock,
    Table,
    Html,
    Rule,
    Empty,
}

/// One terminal row of the preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    spans: Vec<InlineSpan>,
    line_type: LineType,
}

impl RenderedLine {
    pub const fn new(spans: Vec<InlineSpan>, line_type: LineType) -> Self {
        Self { spans, line_type }
    }

    pub fn text(content: impl Into<String>, line_type: LineType) -> Self {
        Self::new(vec![InlineSpan::plain(content)], line_type)
    }

    pub const fn empty() -> Self {
        Self::new(Vec::new(), LineType::Empty)
    }

    pub fn spans(&self) -> &[InlineSpan] {
        &self.spans
    }

    pub const fn line_type(&self) -> LineType {
        self.line_type
    }

    /// Plain text of the line.
    pub fn content(&self) -> String {
        self.spans.iter().map(InlineSpan::text).collect()
    }
}

/// Markdown rendered to terminal rows at a fixed width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preview {
    lines: Vec<RenderedLine>,
    width: u16,
}

impl Preview {
    pub(super) const fn from_lines(lines: Vec<RenderedLine>, width: u16) -> Self {
        Self { lines, width }
    }

    pub fn lines(&self) -> &[RenderedLine] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Width the preview was laid out for.
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Up to `count` lines starting at `offset`.
    pub fn visible_lines(&self, offset: usize, count: usize) -> &[RenderedLine] {
        let start = offset.min(self.lines.len());
        let end = (start + count).min(self.lines.len());
        &self.lines[start..end]
    }
}
