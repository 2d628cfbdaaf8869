//! Markdown layout with comrak.

use comrak::nodes::{AstNode, ListDelimType, ListType, NodeValue, TableAlignment};
use comrak::{Arena, Options, parse_document};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::types::{InlineSpan, InlineStyle, LineType, Preview, RenderedLine};

/// Render markdown source into preview rows at `width` columns.
///
/// # Example
///
/// ```
/// use mdpad::preview::render;
///
/// let preview = render("# Hello\n\nWorld", 40);
/// assert_eq!(preview.lines()[0].content(), "Hello");
/// ```
pub fn render(source: &str, width: u16) -> Preview {
    let arena = Arena::new();
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    let root = parse_document(&arena, source, &options);

    let mut layout = Layout {
        lines: Vec::new(),
        width: usize::from(width.max(1)),
    };
    layout.block(root, 0, None);
    while layout
        .lines
        .last()
        .is_some_and(|line| line.line_type() == LineType::Empty)
    {
        layout.lines.pop();
    }
    Preview::from_lines(layout.lines, width)
}

struct Layout {
    lines: Vec<RenderedLine>,
    width: usize,
}

impl Layout {
    fn block<'a>(&mut self, node: &'a AstNode<'a>, depth: usize, marker: Option<String>) {
        match &node.data.borrow().value {
            NodeValue::Heading(heading) => {
                let level = heading.level;
                let spans = collect_inline_spans(node);
                self.push_wrapped(&spans, "", "", LineType::Heading(level));
                if level <= 2 {
                    let rule_char = if level == 1 { "═" } else { "─" };
                    let text_width = spans_width(&spans).clamp(1, self.width);
                    self.lines.push(RenderedLine::text(
                        rule_char.repeat(text_width),
                        LineType::HeadingRule(level),
                    ));
                }
                self.blank();
            }

            NodeValue::Paragraph => {
                let spans = collect_inline_spans(node);
                self.push_wrapped(&spans, "", "", LineType::Paragraph);
                self.blank();
            }

            NodeValue::CodeBlock(code_block) => {
                let language = code_block.info.split_whitespace().next().unwrap_or("");
                if !language.is_empty() {
                    self.lines
                        .push(RenderedLine::text(format!("  {language}"), LineType::CodeBlock));
                }
                let code_style = InlineStyle {
                    code: true,
                    ..InlineStyle::default()
                };
                let avail = self.width.saturating_sub(2).max(1);
                for raw_line in code_block.literal.lines() {
                    let spans = vec![
                        InlineSpan::plain("│ "),
                        InlineSpan::new(truncate_text(raw_line, avail), code_style),
                    ];
                    self.lines
                        .push(RenderedLine::new(spans, LineType::CodeBlock));
                }
                self.blank();
            }

            NodeValue::HtmlBlock(html) => {
                for raw_line in html.literal.lines() {
                    self.lines.push(RenderedLine::text(
                        truncate_text(raw_line, self.width),
                        LineType::Html,
                    ));
                }
                self.blank();
            }

            NodeValue::List(list) => {
                let start = list.start;
                let delimiter = match list.delimiter {
                    ListDelimType::Paren => ')',
                    ListDelimType::Period => '.',
                };
                let count = node.children().count();
                let number_width = (start + count.saturating_sub(1)).to_string().len();
                for (index, child) in node.children().enumerate() {
                    let marker = match list.list_type {
                        ListType::Bullet => "• ".to_string(),
                        ListType::Ordered => {
                            format!("{:>number_width$}{delimiter} ", start + index)
                        }
                    };
                    self.block(child, depth + 1, Some(marker));
                }
                if depth == 0 {
                    self.blank();
                }
            }

            NodeValue::Item(_) => self.list_item(node, depth, marker, None),
            NodeValue::TaskItem(symbol) => {
                self.list_item(node, depth, marker, Some(symbol.is_some()));
            }

            NodeValue::BlockQuote => {
                self.blockquote(node, 1);
                self.blank();
            }

            NodeValue::ThematicBreak => {
                self.lines
                    .push(RenderedLine::text("─".repeat(self.width), LineType::Rule));
                self.blank();
            }

            NodeValue::Table(_) => {
                for line in render_table(node, self.width) {
                    self.lines.push(RenderedLine::text(line, LineType::Table));
                }
                self.blank();
            }

            _ => {
                for child in node.children() {
                    self.block(child, depth, marker.clone());
                }
            }
        }
    }

    fn list_item<'a>(
        &mut self,
        node: &'a AstNode<'a>,
        depth: usize,
        marker: Option<String>,
        task: Option<bool>,
    ) {
        let indent = "  ".repeat(depth.saturating_sub(1));
        let mut marker = marker.unwrap_or_else(|| "• ".to_string());
        if let Some(checked) = task {
            marker = if checked { "☑ " } else { "☐ " }.to_string();
        }
        let prefix_first = format!("{indent}{marker}");
        let prefix_next = format!("{indent}{}", " ".repeat(marker.width()));

        let mut rendered_any = false;
        for child in node.children() {
            match &child.data.borrow().value {
                NodeValue::Paragraph => {
                    let spans = collect_inline_spans(child);
                    let first = if rendered_any {
                        &prefix_next
                    } else {
                        &prefix_first
                    };
                    self.push_wrapped(&spans, first, &prefix_next, LineType::ListItem);
                    rendered_any = true;
                }
                NodeValue::List(_) => self.block(child, depth, None),
                _ => {
                    let text = extract_text(child);
                    for raw_line in text.lines() {
                        let spans = vec![InlineSpan::plain(raw_line)];
                        self.push_wrapped(&spans, &prefix_next, &prefix_next, LineType::ListItem);
                    }
                }
            }
        }
        if !rendered_any {
            self.lines
                .push(RenderedLine::text(prefix_first, LineType::ListItem));
        }
    }

    fn blockquote<'a>(&mut self, node: &'a AstNode<'a>, quote_depth: usize) {
        let prefix = "│ ".repeat(quote_depth);
        for child in node.children() {
            match &child.data.borrow().value {
                NodeValue::BlockQuote => self.blockquote(child, quote_depth + 1),
                NodeValue::Paragraph => {
                    let spans = collect_inline_spans(child);
                    self.push_wrapped(&spans, &prefix, &prefix, LineType::BlockQuote);
                }
                _ => {
                    let text = extract_text(child);
                    for raw_line in text.lines() {
                        let spans = vec![InlineSpan::plain(raw_line)];
                        self.push_wrapped(&spans, &prefix, &prefix, LineType::BlockQuote);
                    }
                }
            }
        }
    }

    fn push_wrapped(
        &mut self,
        spans: &[InlineSpan],
        prefix_first: &str,
        prefix_next: &str,
        line_type: LineType,
    ) {
        for line_spans in wrap_spans(spans, self.width, prefix_first, prefix_next) {
            self.lines.push(RenderedLine::new(line_spans, line_type));
        }
    }

    fn blank(&mut self) {
        if self
            .lines
            .last()
            .is_some_and(|line| line.line_type() != LineType::Empty)
        {
            self.lines.push(RenderedLine::empty());
        }
    }
}

fn collect_inline_spans<'a>(node: &'a AstNode<'a>) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    for child in node.children() {
        collect_inline_spans_recursive(child, InlineStyle::default(), &mut spans);
    }
    spans
}

fn collect_inline_spans_recursive<'a>(
    node: &'a AstNode<'a>,
    style: InlineStyle,
    spans: &mut Vec<InlineSpan>,
) {
    match &node.data.borrow().value {
        NodeValue::List(_) | NodeValue::Item(_) => {}
        NodeValue::Text(text) => spans.push(InlineSpan::new(text.clone(), style)),
        NodeValue::Code(code) => {
            let code_style = InlineStyle {
                code: true,
                link: style.link,
                ..InlineStyle::default()
            };
            spans.push(InlineSpan::new(code.literal.clone(), code_style));
        }
        NodeValue::HtmlInline(html) => spans.push(InlineSpan::new(html.clone(), style)),
        NodeValue::SoftBreak | NodeValue::LineBreak => {
            spans.push(InlineSpan::new(" ", style));
        }
        NodeValue::Image(image) => {
            let alt = extract_text(node);
            let label = if alt.is_empty() { &image.url } else { &alt };
            spans.push(InlineSpan::new(format!("[image: {label}]"), style));
        }
        value => {
            let mut next = style;
            match value {
                NodeValue::Emph => next.emphasis = true,
                NodeValue::Strong => next.strong = true,
                NodeValue::Strikethrough => next.strikethrough = true,
                NodeValue::Link(_) => next.link = true,
                _ => {}
            }
            for child in node.children() {
                collect_inline_spans_recursive(child, next, spans);
            }
        }
    }
}

fn extract_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    extract_text_recursive(node, &mut text);
    text
}

fn extract_text_recursive<'a>(node: &'a AstNode<'a>, text: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(t) => text.push_str(t),
        NodeValue::Code(c) => text.push_str(&c.literal),
        NodeValue::CodeBlock(c) => text.push_str(&c.literal),
        NodeValue::SoftBreak | NodeValue::LineBreak => text.push('\n'),
        _ => {
            for child in node.children() {
                extract_text_recursive(child, text);
            }
        }
    }
}

/// Greedy word wrap over styled spans.
///
/// Words wider than the line are split at character boundaries. Every output
/// row begins with its prefix as an unstyled span.
fn wrap_spans(
    spans: &[InlineSpan],
    width: usize,
    prefix_first: &str,
    prefix_next: &str,
) -> Vec<Vec<InlineSpan>> {
    let tokens: Vec<InlineSpan> = spans.iter().flat_map(split_inline_tokens).collect();

    let mut lines = Vec::new();
    let mut current = start_line(prefix_first);
    let mut current_width = prefix_first.width();
    let mut has_word = false;

    for token in tokens {
        let is_ws = token.text().chars().all(char::is_whitespace);
        if is_ws {
            if has_word {
                current_width += token.text().width();
                current.push(token);
            }
            continue;
        }

        let token_width = token.text().width();
        if has_word && current_width + token_width > width {
            trim_trailing_ws(&mut current);
            lines.push(std::mem::replace(&mut current, start_line(prefix_next)));
            current_width = prefix_next.width();
        }

        if current_width + token_width <= width {
            current_width += token_width;
            current.push(token);
        } else {
            // A single word wider than the row: hard-break it.
            let mut piece = String::new();
            for ch in token.text().chars() {
                let ch_width = ch.width().unwrap_or(0);
                if current_width + ch_width > width && (!piece.is_empty() || has_word) {
                    current.push(InlineSpan::new(std::mem::take(&mut piece), token.style()));
                    lines.push(std::mem::replace(&mut current, start_line(prefix_next)));
                    current_width = prefix_next.width();
                }
                piece.push(ch);
                current_width += ch_width;
            }
            if !piece.is_empty() {
                current.push(InlineSpan::new(piece, token.style()));
            }
        }
        has_word = true;
    }

    trim_trailing_ws(&mut current);
    lines.push(current);
    lines
}

fn start_line(prefix: &str) -> Vec<InlineSpan> {
    if prefix.is_empty() {
        Vec::new()
    } else {
        vec![InlineSpan::plain(prefix)]
    }
}

fn trim_trailing_ws(line: &mut Vec<InlineSpan>) {
    while line.len() > 1
        && line
            .last()
            .is_some_and(|span| span.text().chars().all(char::is_whitespace))
    {
        line.pop();
    }
}

fn split_inline_tokens(span: &InlineSpan) -> Vec<InlineSpan> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut ws_state: Option<bool> = None;

    for ch in span.text().chars() {
        let is_ws = ch.is_whitespace();
        if ws_state.is_some_and(|state| state != is_ws) {
            out.push(InlineSpan::new(std::mem::take(&mut buf), span.style()));
        }
        buf.push(if is_ws { ' ' } else { ch });
        ws_state = Some(is_ws);
    }
    if !buf.is_empty() {
        out.push(InlineSpan::new(buf, span.style()));
    }
    out
}

fn spans_width(spans: &[InlineSpan]) -> usize {
    spans.iter().map(|span| span.text().width()).sum()
}

fn truncate_text(text: &str, max_width: usize) -> String {
    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width {
            break;
        }
        out.push(ch);
        width += ch_width;
    }
    out
}

fn render_table<'a>(table_node: &'a AstNode<'a>, width: usize) -> Vec<String> {
    let alignments = match &table_node.data.borrow().value {
        NodeValue::Table(table) => table.alignments.clone(),
        _ => Vec::new(),
    };

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut has_header = false;
    for row_node in table_node.children() {
        let header = match &row_node.data.borrow().value {
            NodeValue::TableRow(header) => *header,
            _ => continue,
        };
        has_header |= header;
        let cells = row_node
            .children()
            .filter(|cell| matches!(cell.data.borrow().value, NodeValue::TableCell))
            .map(|cell| {
                extract_text(cell)
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        rows.push(cells);
    }

    let num_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    if num_cols == 0 {
        return Vec::new();
    }

    let mut col_widths = vec![1_usize; num_cols];
    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            col_widths[idx] = col_widths[idx].max(cell.width());
        }
    }

    // Row width is 1 + sum(col_width + 3).
    while 1 + col_widths.iter().sum::<usize>() + 3 * num_cols > width.max(4) {
        let Some((widest, &w)) = col_widths.iter().enumerate().max_by_key(|(_, w)| **w) else {
            break;
        };
        if w <= 1 {
            break;
        }
        col_widths[widest] -= 1;
    }

    let mut lines = vec![table_border(&col_widths, '┌', '┬', '┐')];
    for (idx, row) in rows.iter().enumerate() {
        lines.push(table_row(row, &col_widths, &alignments));
        if has_header && idx == 0 {
            lines.push(table_border(&col_widths, '├', '┼', '┤'));
        }
    }
    lines.push(table_border(&col_widths, '└', '┴', '┘'));
    lines
}

fn table_border(widths: &[usize], left: char, middle: char, right: char) -> String {
    let inner: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{left}{}{right}", inner.join(&middle.to_string()))
}

fn table_row(cells: &[String], widths: &[usize], alignments: &[TableAlignment]) -> String {
    let mut out = String::from("│");
    for (idx, &col_width) in widths.iter().enumerate() {
        let content = truncate_text(cells.get(idx).map_or("", String::as_str), col_width);
        let padding = col_width.saturating_sub(content.width());
        let (left, right) = match alignments.get(idx).copied().unwrap_or(TableAlignment::None) {
            TableAlignment::Right => (padding, 0),
            TableAlignment::Center => (padding / 2, padding - padding / 2),
            TableAlignment::Left | TableAlignment::None => (0, padding),
        };
        out.push(' ');
        out.push_str(&" ".repeat(left));
        out.push_str(&content);
        out.push_str(&" ".repeat(right));
        out.push_str(" │");
    }
    out
}
