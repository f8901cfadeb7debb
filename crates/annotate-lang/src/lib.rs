#![warn(missing_docs)]
//! `annotate-lang` - data-driven language configuration helpers for `annotate-core`.
//!
//! This crate intentionally stays lightweight and does **not** depend on any parsing or
//! highlighting systems. It provides small structs that hosts use to describe a language to the
//! annotation engine: the keyword vocabulary, comment markers, naming conventions, and the
//! auto-pair table.

/// Comment tokens/config for a given language.
///
/// The annotation engine uses this to build the line-comment token rule and the block-comment
/// spanning pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommentConfig {
    /// Line comment token (e.g. `//`, `#`).
    pub line: Option<String>,
    /// Block comment start token (e.g. `/*`).
    pub block_start: Option<String>,
    /// Block comment end token (e.g. `*/`).
    pub block_end: Option<String>,
}

impl CommentConfig {
    /// Create a config that supports only line comments.
    pub fn line(token: impl Into<String>) -> Self {
        Self {
            line: Some(token.into()),
            block_start: None,
            block_end: None,
        }
    }

    /// Create a config that supports only block comments.
    pub fn block(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            line: None,
            block_start: Some(start.into()),
            block_end: Some(end.into()),
        }
    }

    /// Create a config that supports both line and block comments.
    pub fn line_and_block(
        line: impl Into<String>,
        block_start: impl Into<String>,
        block_end: impl Into<String>,
    ) -> Self {
        Self {
            line: Some(line.into()),
            block_start: Some(block_start.into()),
            block_end: Some(block_end.into()),
        }
    }

    /// Returns `true` if a line comment token is configured.
    pub fn has_line(&self) -> bool {
        self.line.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Returns `true` if both block comment tokens are configured.
    pub fn has_block(&self) -> bool {
        self.block_start.as_deref().is_some_and(|s| !s.is_empty())
            && self.block_end.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// Full language description consumed by the annotation engine.
///
/// All fields are plain data; the engine compiles them into token rules. An empty config is
/// valid and produces no highlighting and no auto-pairing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LanguageConfig {
    /// Keyword vocabulary, matched on word boundaries.
    pub keywords: Vec<String>,
    /// Marker letter for known-type identifiers (e.g. `Q` for `QWidget`-style names).
    pub type_prefix: Option<char>,
    /// Line-start directive marker (e.g. `#` for preprocessor lines).
    pub directive_prefix: Option<char>,
    /// Comment tokens.
    pub comments: CommentConfig,
    /// Auto-pair table: opener character to required closer character.
    pub auto_pairs: Vec<(char, char)>,
}

impl LanguageConfig {
    /// The default auto-pair table: `{` `}`, `(` `)`, `"` `"`.
    pub fn default_pairs() -> Vec<(char, char)> {
        vec![('{', '}'), ('(', ')'), ('"', '"')]
    }

    /// C/C++ configuration: the classic keyword vocabulary, `Q`-prefixed type names,
    /// `//` and `/* */` comments, `#` directives, and the default pair table.
    pub fn c() -> Self {
        const KEYWORDS: &[&str] = &[
            "char", "class", "const", "double", "enum", "explicit", "friend", "inline", "int",
            "long", "namespace", "operator", "private", "protected", "public", "short", "signals",
            "signed", "slots", "static", "struct", "template", "typedef", "typename", "union",
            "unsigned", "virtual", "void", "volatile", "bool",
        ];
        Self {
            keywords: KEYWORDS.iter().map(|s| s.to_string()).collect(),
            type_prefix: Some('Q'),
            directive_prefix: Some('#'),
            comments: CommentConfig::line_and_block("//", "/*", "*/"),
            auto_pairs: Self::default_pairs(),
        }
    }

    /// Returns the configured closer for an opener, if any.
    pub fn closer_for(&self, opener: char) -> Option<char> {
        self.auto_pairs
            .iter()
            .find(|(o, _)| *o == opener)
            .map(|(_, c)| *c)
    }
}
