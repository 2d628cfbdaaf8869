use ropey::Rope;

/// Spaces inserted by the Tab key.
const INDENT: &str = "    ";

/// Cursor position in the editor buffer.
///
/// Columns count characters, not bytes, so the cursor can never land inside a
/// multi-byte character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub line: usize,
    pub col: usize,
}

impl Cursor {
    pub const fn at(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Rope-backed text of the open document plus its cursor.
///
/// Every mutation bumps [`revision`](Self::revision); callers compare
/// revisions to tell edits apart from cursor movement.
pub struct EditorBuffer {
    rope: Rope,
    cursor: Cursor,
    /// Column to return to when moving vertically through shorter lines.
    sticky_col: usize,
    revision: u64,
}

impl EditorBuffer {
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Cursor::default(),
            sticky_col: 0,
            revision: 0,
        }
    }

    pub fn empty() -> Self {
        Self::from_text("")
    }

    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Number of mutations applied since the buffer was created.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Line content without its line terminator.
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let line: String = self.rope.line(line_idx).chars().collect();
        Some(line.trim_end_matches(['\n', '\r']).to_string())
    }

    /// Line length in characters, excluding the line terminator.
    pub fn line_len(&self, line_idx: usize) -> usize {
        if line_idx >= self.rope.len_lines() {
            return 0;
        }
        let line = self.rope.line(line_idx);
        let mut len = line.len_chars();
        while len > 0 && matches!(line.char(len - 1), '\n' | '\r') {
            len -= 1;
        }
        len
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn insert_char(&mut self, ch: char) {
        let idx = self.cursor_char_idx();
        self.rope.insert_char(idx, ch);
        self.place_cursor(idx + 1);
        self.revision += 1;
    }

    /// Insert `text` at the cursor and move past it. Line endings are
    /// normalized to `\n`.
    pub fn insert_str(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        let idx = self.cursor_char_idx();
        self.rope.insert(idx, &text);
        self.place_cursor(idx + text.chars().count());
        self.revision += 1;
    }

    pub fn insert_indent(&mut self) {
        self.insert_str(INDENT);
    }

    /// Break the line at the cursor (Enter).
    pub fn split_line(&mut self) {
        self.insert_char('\n');
    }

    /// Delete the character before the cursor (Backspace).
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_back(&mut self) -> bool {
        let idx = self.cursor_char_idx();
        if idx == 0 {
            return false;
        }
        let start = if idx >= 2 && self.is_crlf_at(idx - 2) {
            idx - 2
        } else {
            idx - 1
        };
        self.rope.remove(start..idx);
        self.place_cursor(start);
        self.revision += 1;
        true
    }

    /// Delete the character under the cursor (Delete).
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_forward(&mut self) -> bool {
        let idx = self.cursor_char_idx();
        if idx >= self.rope.len_chars() {
            return false;
        }
        let end = if self.is_crlf_at(idx) { idx + 2 } else { idx + 1 };
        self.rope.remove(idx..end);
        self.revision += 1;
        true
    }

    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Left => {
                if self.cursor.col > 0 {
                    self.set_col(self.cursor.col - 1);
                } else if self.cursor.line > 0 {
                    self.cursor.line -= 1;
                    self.set_col(self.line_len(self.cursor.line));
                }
            }
            Direction::Right => {
                if self.cursor.col < self.line_len(self.cursor.line) {
                    self.set_col(self.cursor.col + 1);
                } else if self.cursor.line + 1 < self.line_count() {
                    self.cursor.line += 1;
                    self.set_col(0);
                }
            }
            Direction::Up => {
                if self.cursor.line > 0 {
                    self.cursor.line -= 1;
                    self.cursor.col = self.sticky_col.min(self.line_len(self.cursor.line));
                }
            }
            Direction::Down => {
                if self.cursor.line + 1 < self.line_count() {
                    self.cursor.line += 1;
                    self.cursor.col = self.sticky_col.min(self.line_len(self.cursor.line));
                }
            }
        }
    }

    pub fn move_home(&mut self) {
        self.set_col(0);
    }

    pub fn move_end(&mut self) {
        self.set_col(self.line_len(self.cursor.line));
    }

    /// Move to `line`, keeping the sticky column where possible.
    pub fn move_to_line(&mut self, line: usize) {
        self.cursor.line = line.min(self.line_count().saturating_sub(1));
        self.cursor.col = self.sticky_col.min(self.line_len(self.cursor.line));
    }

    /// Move to an absolute position, clamped to the buffer.
    pub fn move_to(&mut self, line: usize, col: usize) {
        self.cursor.line = line.min(self.line_count().saturating_sub(1));
        self.set_col(col.min(self.line_len(self.cursor.line)));
    }

    pub fn move_to_start(&mut self) {
        self.cursor.line = 0;
        self.set_col(0);
    }

    pub fn move_to_end(&mut self) {
        self.cursor.line = self.line_count().saturating_sub(1);
        self.set_col(self.line_len(self.cursor.line));
    }

    const fn set_col(&mut self, col: usize) {
        self.cursor.col = col;
        self.sticky_col = col;
    }

    fn cursor_char_idx(&self) -> usize {
        let line = self.cursor.line.min(self.line_count().saturating_sub(1));
        self.rope.line_to_char(line) + self.cursor.col.min(self.line_len(line))
    }

    /// Whether a `\r\n` pair starts at `char_idx`.
    fn is_crlf_at(&self, char_idx: usize) -> bool {
        char_idx + 1 < self.rope.len_chars()
            && self.rope.char(char_idx) == '\r'
            && self.rope.char(char_idx + 1) == '\n'
    }

    fn place_cursor(&mut self, char_idx: usize) {
        let line = self.rope.char_to_line(char_idx);
        self.cursor.line = line;
        self.set_col(char_idx - self.rope.line_to_char(line));
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field("lines", &self.rope.len_lines())
            .field("cursor", &self.cursor)
            .field("revision", &self.revision)
            .finish()
    }
}
