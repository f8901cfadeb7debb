//! Auto-pairing and auto-indent keystroke handling.
//!
//! The engine decides what a keystroke should do to the buffer; actually applying the mutation is
//! the caller's job (see [`crate::session::AnnotationSession::key_typed`]). It owns a stack of
//! closers it has auto-inserted so a matching closer typed later is skipped over instead of
//! inserted twice.
//!
//! Known limitation, kept on purpose: the stack is not reconciled against out-of-band edits. If
//! the host deletes an auto-inserted opener (backspace, undo), the stack no longer matches the
//! buffer and the next matching keystroke is still skipped.

use crate::line_index::LineIndex;

/// What a keystroke should do to the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairAction {
    /// Insert `opener` followed by `closer` and place the cursor between them.
    InsertAutoPair {
        /// The typed opener character.
        opener: char,
        /// The closer to insert after the cursor.
        closer: char,
    },
    /// Move the cursor one position right without inserting; the typed closer is already in the
    /// buffer from an earlier auto-pair.
    SkipOverCloser {
        /// The closer being skipped.
        closer: char,
    },
    /// Insert a newline followed by `tab_count` tab characters.
    InsertNewlineWithIndent {
        /// Unmatched-opener count in the document before the cursor.
        tab_count: usize,
    },
    /// Ordinary text insertion; the engine has nothing to add.
    PassThrough,
}

/// Per-document auto-pairing state machine.
#[derive(Debug, Clone, Default)]
pub struct PairingEngine {
    pairs: Vec<(char, char)>,
    pending: Vec<char>,
}

impl PairingEngine {
    /// Create an engine over an opener → closer table.
    pub fn new(pairs: Vec<(char, char)>) -> Self {
        Self {
            pairs,
            pending: Vec::new(),
        }
    }

    /// The configured opener → closer table.
    pub fn pairs(&self) -> &[(char, char)] {
        &self.pairs
    }

    /// Number of auto-inserted closers not yet consumed.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Drop all pending closers (e.g. when the host replaces the whole document).
    pub fn clear_pending(&mut self) {
        self.pending.clear();
    }

    /// Decide what the typed character should do, given the cursor position and the document.
    ///
    /// Decision order:
    /// 1. newline/carriage-return: auto-indent by the document's unmatched-brace count before
    ///    the cursor;
    /// 2. a configured opener: auto-insert the pair and remember the closer. This is checked
    ///    before the skip rule, so typing `"` with `"` on top of the stack starts a new pair
    ///    rather than skipping;
    /// 3. the top pending closer: skip over it. The buffer character under the cursor is not
    ///    verified (see the module-level limitation note);
    /// 4. anything else passes through.
    pub fn on_key_typed(&mut self, ch: char, cursor: usize, document: &LineIndex) -> PairAction {
        if ch == '\n' || ch == '\r' {
            return PairAction::InsertNewlineWithIndent {
                tab_count: document.brace_balance_before(cursor),
            };
        }

        if let Some(closer) = self.closer_for(ch) {
            self.pending.push(closer);
            return PairAction::InsertAutoPair { opener: ch, closer };
        }

        if self.pending.last() == Some(&ch) {
            self.pending.pop();
            return PairAction::SkipOverCloser { closer: ch };
        }

        PairAction::PassThrough
    }

    fn closer_for(&self, opener: char) -> Option<char> {
        self.pairs
            .iter()
            .find(|(o, _)| *o == opener)
            .map(|(_, c)| *c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annotate_lang::LanguageConfig;

    fn engine() -> PairingEngine {
        PairingEngine::new(LanguageConfig::default_pairs())
    }

    #[test]
    fn test_opener_pushes_closer() {
        let mut engine = engine();
        let doc = LineIndex::new();
        assert_eq!(
            engine.on_key_typed('{', 0, &doc),
            PairAction::InsertAutoPair {
                opener: '{',
                closer: '}'
            }
        );
        assert_eq!(engine.pending_len(), 1);
    }

    #[test]
    fn test_closer_skips_and_pops() {
        let mut engine = engine();
        let doc = LineIndex::from_text("{}");
        engine.on_key_typed('{', 0, &doc);
        assert_eq!(
            engine.on_key_typed('}', 1, &doc),
            PairAction::SkipOverCloser { closer: '}' }
        );
        assert_eq!(engine.pending_len(), 0);
        // A second `}` has nothing pending and passes through.
        assert_eq!(engine.on_key_typed('}', 2, &doc), PairAction::PassThrough);
    }

    #[test]
    fn test_nested_pairs_pop_in_reverse_order() {
        let mut engine = engine();
        let doc = LineIndex::new();
        engine.on_key_typed('{', 0, &doc);
        engine.on_key_typed('(', 1, &doc);
        assert_eq!(
            engine.on_key_typed(')', 2, &doc),
            PairAction::SkipOverCloser { closer: ')' }
        );
        assert_eq!(
            engine.on_key_typed('}', 3, &doc),
            PairAction::SkipOverCloser { closer: '}' }
        );
    }

    #[test]
    fn test_closer_only_matches_stack_top() {
        let mut engine = engine();
        let doc = LineIndex::new();
        engine.on_key_typed('{', 0, &doc);
        engine.on_key_typed('(', 1, &doc);
        // `}` is pending but not on top, so it is inserted normally.
        assert_eq!(engine.on_key_typed('}', 2, &doc), PairAction::PassThrough);
        assert_eq!(engine.pending_len(), 2);
    }

    #[test]
    fn test_quote_repairs_instead_of_skipping() {
        let mut engine = engine();
        let doc = LineIndex::new();
        engine.on_key_typed('"', 0, &doc);
        // The opener check runs before the skip check, so a second `"` starts a new pair.
        assert_eq!(
            engine.on_key_typed('"', 1, &doc),
            PairAction::InsertAutoPair {
                opener: '"',
                closer: '"'
            }
        );
        assert_eq!(engine.pending_len(), 2);
    }

    #[test]
    fn test_newline_counts_unmatched_braces() {
        let mut engine = engine();
        let doc = LineIndex::from_text("if(x){\n");
        assert_eq!(
            engine.on_key_typed('\n', 6, &doc),
            PairAction::InsertNewlineWithIndent { tab_count: 1 }
        );

        let balanced = LineIndex::from_text("{}{}");
        assert_eq!(
            engine.on_key_typed('\r', 4, &balanced),
            PairAction::InsertNewlineWithIndent { tab_count: 0 }
        );
    }

    #[test]
    fn test_plain_character_passes_through() {
        let mut engine = engine();
        let doc = LineIndex::new();
        assert_eq!(engine.on_key_typed('x', 0, &doc), PairAction::PassThrough);
        assert_eq!(engine.pending_len(), 0);
    }
}
