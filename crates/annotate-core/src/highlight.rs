//! Per-line, state-threading syntax highlighting.
//!
//! Highlighting a line is a pure function of the line text and the incoming [`LineState`]; the
//! outgoing state is what the next line must be highlighted with. An edit to line `i` therefore
//! invalidates line `i` and every following line until a recomputed outgoing state converges with
//! the stored one (see [`crate::session::AnnotationSession`]).
//!
//! Two passes per line:
//! 1. every rule of the [`TokenRuleSet`] is painted into a per-char style buffer in rule order
//!    (last applied wins on overlap);
//! 2. block comment spans are resolved over the raw line text and painted over the buffer,
//!    so comment styling always wins inside the covered range.

use crate::rules::{StyleId, TokenRuleSet};

/// Highlighter state carried across line boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineState {
    /// Outside any block comment.
    #[default]
    Normal,
    /// Inside an unterminated block comment.
    InBlockComment,
}

/// A contiguous styled character range within one line.
///
/// Offsets are in Unicode scalar values (`char`) from the start of the line. Spans are ephemeral:
/// they are recomputed on every highlight pass and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledSpan {
    /// Start offset within the line (inclusive).
    pub start: usize,
    /// Span length in characters.
    pub len: usize,
    /// Style painted over the span.
    pub style: StyleId,
}

impl StyledSpan {
    /// Create a new span.
    pub fn new(start: usize, len: usize, style: StyleId) -> Self {
        Self { start, len, style }
    }
}

/// Applies a [`TokenRuleSet`] to one line at a time, threading [`LineState`] across lines.
#[derive(Debug, Clone)]
pub struct LineHighlighter {
    rule_set: TokenRuleSet,
}

impl LineHighlighter {
    /// Create a highlighter over a compiled rule set.
    pub fn new(rule_set: TokenRuleSet) -> Self {
        Self { rule_set }
    }

    /// The rule set this highlighter applies.
    pub fn rule_set(&self) -> &TokenRuleSet {
        &self.rule_set
    }

    /// Highlight one line given the incoming state; returns the styled spans and the state the
    /// next line starts in.
    ///
    /// An empty line produces no spans and passes the incoming state through unchanged. A line
    /// that is entirely inside a block comment is still scanned for the close marker.
    pub fn highlight(&self, line: &str, incoming: LineState) -> (Vec<StyledSpan>, LineState) {
        if line.is_empty() {
            return (Vec::new(), incoming);
        }

        let mut cells: Vec<Option<StyleId>> = vec![None; line.chars().count()];

        for rule in self.rule_set.rules() {
            if let Some(group) = rule.capture_group() {
                for caps in rule.regex().captures_iter(line) {
                    let Some(m) = caps.get(group) else {
                        continue;
                    };
                    paint(&mut cells, line, m.start(), m.end(), rule.style());
                }
            } else {
                for m in rule.regex().find_iter(line) {
                    paint(&mut cells, line, m.start(), m.end(), rule.style());
                }
            }
        }

        let outgoing = self.paint_block_comments(line, incoming, &mut cells);
        (spans_from_cells(&cells), outgoing)
    }

    /// Resolve block comment spans over the raw line text, overwriting the style buffer.
    ///
    /// If the incoming state is `Normal`, the first open marker starts a span; otherwise the
    /// whole line is eligible from offset 0. A span with no close marker runs to end of line and
    /// the outgoing state is `InBlockComment`; a closed span resumes scanning after the close
    /// marker for further opens on the same line.
    fn paint_block_comments(
        &self,
        line: &str,
        incoming: LineState,
        cells: &mut [Option<StyleId>],
    ) -> LineState {
        let (Some(open_re), Some(close_re)) = (self.rule_set.block_open(), self.rule_set.block_close())
        else {
            return incoming;
        };

        let style = self.rule_set.block_style();
        let mut outgoing = LineState::Normal;
        let mut start = match incoming {
            LineState::InBlockComment => Some(0),
            LineState::Normal => open_re.find(line).map(|m| m.start()),
        };

        while let Some(s) = start {
            let span_end = match close_re.find_at(line, s) {
                Some(close) => close.end(),
                None => {
                    outgoing = LineState::InBlockComment;
                    line.len()
                }
            };
            paint(cells, line, s, span_end, style);
            if outgoing == LineState::InBlockComment {
                break;
            }
            start = open_re.find_at(line, span_end).map(|m| m.start());
        }

        outgoing
    }
}

/// Paint a byte range of the line into the per-char style buffer.
fn paint(
    cells: &mut [Option<StyleId>],
    line: &str,
    start_byte: usize,
    end_byte: usize,
    style: StyleId,
) {
    if start_byte >= end_byte || end_byte > line.len() {
        return;
    }

    let start = line[..start_byte].chars().count();
    let end = line[..end_byte].chars().count();
    for cell in &mut cells[start..end] {
        *cell = Some(style);
    }
}

/// Run-length compress the style buffer into spans.
fn spans_from_cells(cells: &[Option<StyleId>]) -> Vec<StyledSpan> {
    let mut spans = Vec::new();
    let mut i = 0;
    while i < cells.len() {
        let Some(style) = cells[i] else {
            i += 1;
            continue;
        };
        let start = i;
        while i < cells.len() && cells[i] == Some(style) {
            i += 1;
        }
        spans.push(StyledSpan::new(start, i - start, style));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{
        STYLE_BLOCK_COMMENT, STYLE_CALL, STYLE_DIRECTIVE, STYLE_KEYWORD, STYLE_LINE_COMMENT,
        STYLE_STRING, STYLE_TYPE, TokenStyles,
    };
    use annotate_lang::LanguageConfig;

    fn highlighter() -> LineHighlighter {
        LineHighlighter::new(
            TokenRuleSet::from_language(&LanguageConfig::c(), TokenStyles::default()).unwrap(),
        )
    }

    fn span_at(spans: &[StyledSpan], start: usize) -> Option<&StyledSpan> {
        spans.iter().find(|s| s.start == start)
    }

    #[test]
    fn test_empty_line_passes_state_through() {
        let h = highlighter();
        assert_eq!(h.highlight("", LineState::Normal), (Vec::new(), LineState::Normal));
        assert_eq!(
            h.highlight("", LineState::InBlockComment),
            (Vec::new(), LineState::InBlockComment)
        );
    }

    #[test]
    fn test_keyword_and_call() {
        let h = highlighter();
        let (spans, out) = h.highlight("int main()", LineState::Normal);
        assert_eq!(out, LineState::Normal);
        assert_eq!(span_at(&spans, 0).unwrap().style, STYLE_KEYWORD);
        assert_eq!(span_at(&spans, 0).unwrap().len, 3);
        let call = span_at(&spans, 4).unwrap();
        assert_eq!(call.style, STYLE_CALL);
        assert_eq!(call.len, 4); // "main", the `(` is not styled
    }

    #[test]
    fn test_type_prefix_identifier() {
        let h = highlighter();
        let (spans, _) = h.highlight("QWidget w;", LineState::Normal);
        let ty = span_at(&spans, 0).unwrap();
        assert_eq!(ty.style, STYLE_TYPE);
        assert_eq!(ty.len, 7);
    }

    #[test]
    fn test_string_is_greedy_first_to_last_quote() {
        let h = highlighter();
        let (spans, _) = h.highlight(r#"f("a", x, "b")"#, LineState::Normal);
        let string = spans.iter().find(|s| s.style == STYLE_STRING).unwrap();
        // One literal from the first quote to the last, not two.
        assert_eq!(string.start, 2);
        assert_eq!(string.len, 11);
        assert_eq!(spans.iter().filter(|s| s.style == STYLE_STRING).count(), 1);
    }

    #[test]
    fn test_line_comment_to_end_of_line() {
        let h = highlighter();
        let (spans, out) = h.highlight("int x; // trailing", LineState::Normal);
        assert_eq!(out, LineState::Normal);
        let comment = spans.iter().find(|s| s.style == STYLE_LINE_COMMENT).unwrap();
        assert_eq!(comment.start, 7);
        assert_eq!(comment.len, 11);
    }

    #[test]
    fn test_directive_overrides_line_comment() {
        let h = highlighter();
        // The directive rule is applied after the comment rule, so the whole line stays
        // directive-styled.
        let (spans, _) = h.highlight("#include <a> // note", LineState::Normal);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].style, STYLE_DIRECTIVE);
        assert_eq!(spans[0].start, 0);
        assert_eq!(spans[0].len, 20);
    }

    #[test]
    fn test_unterminated_block_comment() {
        let h = highlighter();
        let (spans, out) = h.highlight("int x; /* start", LineState::Normal);
        assert_eq!(out, LineState::InBlockComment);
        let comment = spans.iter().find(|s| s.style == STYLE_BLOCK_COMMENT).unwrap();
        assert_eq!(comment.start, 7);
        assert_eq!(comment.len, 8);
    }

    #[test]
    fn test_continuation_line_rescanned_for_close() {
        let h = highlighter();
        let (spans, out) = h.highlight("end */ int y;", LineState::InBlockComment);
        assert_eq!(out, LineState::Normal);
        let comment = span_at(&spans, 0).unwrap();
        assert_eq!(comment.style, STYLE_BLOCK_COMMENT);
        assert_eq!(comment.len, 6); // up to and including "*/"
        let kw = span_at(&spans, 7).unwrap();
        assert_eq!(kw.style, STYLE_KEYWORD);
    }

    #[test]
    fn test_comment_overrides_keyword_inside_span() {
        let h = highlighter();
        let (spans, out) = h.highlight("/* int */ int x;", LineState::Normal);
        assert_eq!(out, LineState::Normal);
        let comment = span_at(&spans, 0).unwrap();
        assert_eq!(comment.style, STYLE_BLOCK_COMMENT);
        assert_eq!(comment.len, 9);
        // The second `int` is outside the comment and keeps keyword style.
        assert_eq!(span_at(&spans, 10).unwrap().style, STYLE_KEYWORD);
    }

    #[test]
    fn test_two_block_comments_on_one_line() {
        let h = highlighter();
        let (spans, out) = h.highlight("/* a */ x /* b", LineState::Normal);
        assert_eq!(out, LineState::InBlockComment);
        let comments: Vec<_> = spans
            .iter()
            .filter(|s| s.style == STYLE_BLOCK_COMMENT)
            .collect();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].start, 0);
        assert_eq!(comments[1].start, 10);
        assert_eq!(comments[1].len, 4);
    }

    #[test]
    fn test_idempotent() {
        let h = highlighter();
        let line = "QTimer t; /* tick */ start(); // done";
        let first = h.highlight(line, LineState::Normal);
        let second = h.highlight(line, LineState::Normal);
        assert_eq!(first, second);
    }

    #[test]
    fn test_non_ascii_offsets_are_char_based() {
        let h = highlighter();
        let (spans, _) = h.highlight("int x; // 注释", LineState::Normal);
        let comment = spans.iter().find(|s| s.style == STYLE_LINE_COMMENT).unwrap();
        assert_eq!(comment.start, 7);
        assert_eq!(comment.len, 5); // "// 注释" is 5 chars
    }
}
