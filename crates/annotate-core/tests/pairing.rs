use annotate_core::{AnnotationSession, LineIndex, PairAction, PairingEngine};
use annotate_lang::LanguageConfig;

#[test]
fn test_brace_pair_then_skip_leaves_one_pair() {
    let mut session = AnnotationSession::new("", &LanguageConfig::c()).unwrap();

    assert_eq!(
        session.key_typed('{'),
        PairAction::InsertAutoPair {
            opener: '{',
            closer: '}'
        }
    );
    assert_eq!(session.text(), "{}");
    assert_eq!(session.cursor(), 1);

    // Typing the closer at the auto-pair cursor skips, it does not insert.
    assert_eq!(
        session.key_typed('}'),
        PairAction::SkipOverCloser { closer: '}' }
    );
    assert_eq!(session.text(), "{}");
    assert_eq!(session.cursor(), 2);
}

#[test]
fn test_newline_after_open_brace_indents_one_tab() {
    let mut session = AnnotationSession::new("if(x){", &LanguageConfig::c()).unwrap();
    session.set_cursor(6);

    assert_eq!(
        session.key_typed('\n'),
        PairAction::InsertNewlineWithIndent { tab_count: 1 }
    );
    assert_eq!(session.text(), "if(x){\n\t");
}

#[test]
fn test_indent_counts_whole_document() {
    // The brace balance is document-wide, not scoped: two unmatched openers above the cursor
    // mean two tabs, even across lines.
    let mut session = AnnotationSession::new("void f(){\nif(x){", &LanguageConfig::c()).unwrap();
    session.set_cursor(16);

    assert_eq!(
        session.key_typed('\n'),
        PairAction::InsertNewlineWithIndent { tab_count: 2 }
    );
    assert_eq!(session.text(), "void f(){\nif(x){\n\t\t");
}

#[test]
fn test_indent_counts_braces_in_strings_and_comments() {
    // Deliberately naive: the count does not exclude braces in strings or comments.
    let index = LineIndex::from_text("s = \"{\"; // {\n");
    assert_eq!(index.brace_balance_before(14), 2);
}

#[test]
fn test_typed_pair_sequence_builds_expected_buffer() {
    let mut session = AnnotationSession::new("", &LanguageConfig::c()).unwrap();

    // f("x")
    session.key_typed('f');
    session.key_typed('(');
    session.key_typed('"');
    session.key_typed('x');
    session.key_typed('"'); // re-pairs (opener beats skip for symmetric quotes)
    assert_eq!(session.text(), r#"f("x""")"#);
}

#[test]
fn test_desync_after_manual_deletion_is_not_reconciled() {
    let mut engine = PairingEngine::new(LanguageConfig::default_pairs());
    let doc = LineIndex::from_text("");

    engine.on_key_typed('{', 0, &doc);
    assert_eq!(engine.pending_len(), 1);

    // The host deletes the auto-inserted pair out of band; the engine is not told and the
    // pending closer survives. The next `}` is still answered with a skip.
    assert_eq!(
        engine.on_key_typed('}', 0, &doc),
        PairAction::SkipOverCloser { closer: '}' }
    );
}

#[test]
fn test_custom_pair_table() {
    let mut lang = LanguageConfig::c();
    lang.auto_pairs.push(('[', ']'));
    let mut session = AnnotationSession::new("", &lang).unwrap();

    assert_eq!(
        session.key_typed('['),
        PairAction::InsertAutoPair {
            opener: '[',
            closer: ']'
        }
    );
    assert_eq!(session.text(), "[]");
}
