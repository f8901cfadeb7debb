//! Session orchestration: one document, its highlight state, pairing state, and diagnostics.
//!
//! [`AnnotationSession`] owns everything derived from the document: the rope mirror, one
//! [`LineState`] per line, the cached styled spans, the pending auto-pair stack, and the current
//! [`DiagnosticIndex`]. All of it is replaced outright on rebuilds; nothing aliases a previous
//! version. The session is single-threaded and every operation runs to completion synchronously.

use std::ops::Range;

use annotate_lang::LanguageConfig;

use crate::diagnostics::{DiagnosticIndex, DiagnosticRecord, parse_compiler_output};
use crate::highlight::{LineHighlighter, LineState, StyledSpan};
use crate::line_index::LineIndex;
use crate::pairing::{PairAction, PairingEngine};
use crate::rules::{RuleError, TokenRuleSet, TokenStyles};

/// A discrete edit from the text-buffer collaborator.
///
/// The character range `[range_start, range_end)` is replaced by `inserted_text`. A pure
/// insertion has `range_start == range_end`; a pure deletion has empty `inserted_text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditEvent {
    /// Start of the replaced range (inclusive, char offset).
    pub range_start: usize,
    /// End of the replaced range (exclusive, char offset).
    pub range_end: usize,
    /// Replacement text (may be empty).
    pub inserted_text: String,
}

impl EditEvent {
    /// A pure insertion at `offset`.
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self {
            range_start: offset,
            range_end: offset,
            inserted_text: text.into(),
        }
    }

    /// A pure deletion of `[start, end)`.
    pub fn delete(start: usize, end: usize) -> Self {
        Self {
            range_start: start,
            range_end: end,
            inserted_text: String::new(),
        }
    }
}

/// Owns a document mirror and every annotation derived from it.
#[derive(Debug)]
pub struct AnnotationSession {
    index: LineIndex,
    highlighter: LineHighlighter,
    pairing: PairingEngine,
    /// Outgoing state per line; line `i + 1` is highlighted with `line_states[i]` as incoming.
    line_states: Vec<LineState>,
    line_spans: Vec<Vec<StyledSpan>>,
    diagnostics: DiagnosticIndex,
    cursor: usize,
}

impl AnnotationSession {
    /// Create a session over the initial document text, running a full highlight pass.
    pub fn new(text: &str, lang: &LanguageConfig) -> Result<Self, RuleError> {
        let rule_set = TokenRuleSet::from_language(lang, TokenStyles::default())?;
        let mut session = Self {
            index: LineIndex::from_text(text),
            highlighter: LineHighlighter::new(rule_set),
            pairing: PairingEngine::new(lang.auto_pairs.clone()),
            line_states: Vec::new(),
            line_spans: Vec::new(),
            diagnostics: DiagnosticIndex::default(),
            cursor: 0,
        };
        session.highlight_all();
        Ok(session)
    }

    /// The mirrored document text.
    pub fn text(&self) -> String {
        self.index.text()
    }

    /// Total line count.
    pub fn line_count(&self) -> usize {
        self.index.line_count()
    }

    /// Current cursor offset (chars).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Sync the cursor from the host (clamped to the document).
    pub fn set_cursor(&mut self, char_offset: usize) {
        self.cursor = char_offset.min(self.index.char_count());
    }

    /// Styled spans for a line (empty for out-of-range lines).
    pub fn line_spans(&self, line: usize) -> &[StyledSpan] {
        self.line_spans.get(line).map_or(&[], |v| v.as_slice())
    }

    /// Outgoing highlight state of a line.
    pub fn line_state(&self, line: usize) -> Option<LineState> {
        self.line_states.get(line).copied()
    }

    /// The pairing engine (e.g. to inspect or clear pending closers).
    pub fn pairing(&mut self) -> &mut PairingEngine {
        &mut self.pairing
    }

    /// Apply a buffer edit and re-highlight the lines it invalidates.
    ///
    /// Re-highlighting starts at the first line touched by the edit and threads [`LineState`]
    /// forward; past the last edited line it stops as soon as a line's recomputed outgoing state
    /// matches the stored one, since every following line then has identical input. Returns the
    /// invalidated line range.
    pub fn apply_edit(&mut self, edit: &EditEvent) -> Range<usize> {
        let char_count = self.index.char_count();
        let start = edit.range_start.min(char_count);
        let end = edit.range_end.clamp(start, char_count);

        let start_line = self.index.char_to_line(start);
        let old_end_line = self.index.char_to_line(end);

        self.index.remove(start, end);
        self.index.insert(start, &edit.inserted_text);

        let inserted_chars = edit.inserted_text.chars().count();
        let new_end_line = self.index.char_to_line(start + inserted_chars);

        // Keep the per-line caches aligned with the new line structure. Replaced slots get
        // placeholders; they are recomputed below before anything reads them.
        let new_slots = new_end_line - start_line + 1;
        self.line_states.splice(
            start_line..=old_end_line.min(self.line_states.len().saturating_sub(1)),
            std::iter::repeat(LineState::Normal).take(new_slots),
        );
        self.line_spans.splice(
            start_line..=old_end_line.min(self.line_spans.len().saturating_sub(1)),
            std::iter::repeat_with(Vec::new).take(new_slots),
        );

        if self.cursor > self.index.char_count() {
            self.cursor = self.index.char_count();
        }

        self.rehighlight_from(start_line, new_end_line)
    }

    /// Handle a typed character: decide the pairing action, apply it to the mirror and cursor,
    /// and return it so the host buffer can apply the same mutation.
    pub fn key_typed(&mut self, ch: char) -> PairAction {
        let action = self.pairing.on_key_typed(ch, self.cursor, &self.index);
        match action {
            PairAction::InsertAutoPair { opener, closer } => {
                let mut pair = String::with_capacity(2);
                pair.push(opener);
                pair.push(closer);
                self.apply_edit(&EditEvent::insert(self.cursor, pair));
                // Cursor lands between the pair.
                self.cursor += 1;
            }
            PairAction::SkipOverCloser { .. } => {
                self.cursor = (self.cursor + 1).min(self.index.char_count());
            }
            PairAction::InsertNewlineWithIndent { tab_count } => {
                let mut text = String::with_capacity(1 + tab_count);
                text.push('\n');
                for _ in 0..tab_count {
                    text.push('\t');
                }
                self.apply_edit(&EditEvent::insert(self.cursor, text));
                self.cursor += 1 + tab_count;
            }
            PairAction::PassThrough => {
                self.apply_edit(&EditEvent::insert(self.cursor, ch.to_string()));
                self.cursor += 1;
            }
        }
        action
    }

    /// Parse a completed compiler run's output and rebuild the diagnostic index wholesale.
    pub fn set_compiler_output(&mut self, raw: &str) {
        self.diagnostics = DiagnosticIndex::build(parse_compiler_output(raw));
    }

    /// Diagnostics for a 1-based source line (the hover query).
    pub fn diagnostics_for_line(&self, line_no: u32) -> &[DiagnosticRecord] {
        self.diagnostics.lookup(line_no)
    }

    /// The current diagnostic index.
    pub fn diagnostics(&self) -> &DiagnosticIndex {
        &self.diagnostics
    }

    /// Full from-scratch highlight pass over every line.
    fn highlight_all(&mut self) {
        let line_count = self.index.line_count();
        self.line_states = Vec::with_capacity(line_count);
        self.line_spans = Vec::with_capacity(line_count);

        let mut incoming = LineState::Normal;
        for line in 0..line_count {
            let text = self.index.line_text(line).unwrap_or_default();
            let (spans, outgoing) = self.highlighter.highlight(&text, incoming);
            self.line_states.push(outgoing);
            self.line_spans.push(spans);
            incoming = outgoing;
        }
    }

    /// Re-highlight from `start_line`, stopping early once states converge past `last_edited`.
    fn rehighlight_from(&mut self, start_line: usize, last_edited: usize) -> Range<usize> {
        let line_count = self.index.line_count();
        debug_assert_eq!(self.line_states.len(), line_count);

        let mut incoming = if start_line == 0 {
            LineState::Normal
        } else {
            self.line_states[start_line - 1]
        };

        let mut line = start_line;
        while line < line_count {
            let text = self.index.line_text(line).unwrap_or_default();
            let (spans, outgoing) = self.highlighter.highlight(&text, incoming);
            let previous = std::mem::replace(&mut self.line_states[line], outgoing);
            self.line_spans[line] = spans;
            line += 1;
            // Past the edited range the line text is unchanged, so a matching outgoing state
            // means every following line still has valid stored state and spans.
            if line > last_edited + 1 && previous == outgoing {
                break;
            }
            incoming = outgoing;
        }

        start_line..line
    }
}
