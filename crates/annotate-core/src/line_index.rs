//! Rope-backed document mirror.
//!
//! The annotation session keeps its own copy of the host buffer so it can resolve character
//! offsets to line ranges and walk line text without calling back into the host. Rope gives
//! O(log n) line access and editing.

use ropey::Rope;

/// Line-indexed mirror of the document text.
///
/// All offsets are in Unicode scalar values (`char`). Out-of-range offsets are clamped, never an
/// error: the mirror absorbs whatever the host sends.
#[derive(Debug, Clone, Default)]
pub struct LineIndex {
    rope: Rope,
}

impl LineIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Build an index from text.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Total line count. An empty document has one (empty) line.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total character count.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// The complete document text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Text of the given line, without the trailing newline.
    pub fn line_text(&self, line: usize) -> Option<String> {
        if line >= self.rope.len_lines() {
            return None;
        }

        let mut text = self.rope.line(line).to_string();
        if text.ends_with('\n') {
            text.pop();
        }
        if text.ends_with('\r') {
            text.pop();
        }
        Some(text)
    }

    /// Line containing the given character offset (clamped to the last line).
    pub fn char_to_line(&self, char_offset: usize) -> usize {
        self.rope.char_to_line(char_offset.min(self.rope.len_chars()))
    }

    /// Character offset of the start of the given line (clamped to document end).
    pub fn line_to_char(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        self.rope.line_to_char(line)
    }

    /// Insert text at a character offset (clamped).
    pub fn insert(&mut self, char_offset: usize, text: &str) {
        let char_offset = char_offset.min(self.rope.len_chars());
        self.rope.insert(char_offset, text);
    }

    /// Remove the character range `[start, end)` (clamped).
    pub fn remove(&mut self, start: usize, end: usize) {
        let start = start.min(self.rope.len_chars());
        let end = end.min(self.rope.len_chars());
        if start < end {
            self.rope.remove(start..end);
        }
    }

    /// Unmatched `{` count in the text before the cursor, floored at zero.
    ///
    /// This is a whole-document count and deliberately naive: braces inside strings and comments
    /// are counted too, matching the indentation behavior this engine reproduces.
    pub fn brace_balance_before(&self, char_offset: usize) -> usize {
        let char_offset = char_offset.min(self.rope.len_chars());
        let mut balance: i64 = 0;
        for c in self.rope.chars().take(char_offset) {
            match c {
                '{' => balance += 1,
                '}' => balance -= 1,
                _ => {}
            }
        }
        balance.max(0) as usize
    }
}
