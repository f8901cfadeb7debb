//! Token rules: an ordered list of pattern → style rules compiled from a
//! [`LanguageConfig`].
//!
//! Rules are applied sequentially per line; later rules overwrite earlier ones on overlapping
//! offsets. The block comment open/close patterns are kept separate from the ordered list because
//! block comments are resolved by a stateful spanning pass, not by per-line matching (see
//! [`crate::highlight`]).

use annotate_lang::LanguageConfig;
use regex::Regex;
use thiserror::Error;

/// Style ID type
pub type StyleId = u32;

/// Style id for language keywords.
pub const STYLE_KEYWORD: StyleId = 0x0100_0001;
/// Style id for known-type identifiers (type-prefix naming convention).
pub const STYLE_TYPE: StyleId = 0x0100_0002;
/// Style id for quoted string literals.
pub const STYLE_STRING: StyleId = 0x0100_0003;
/// Style id for call-like identifiers (identifier followed by `(`).
pub const STYLE_CALL: StyleId = 0x0100_0004;
/// Style id for line comments.
pub const STYLE_LINE_COMMENT: StyleId = 0x0100_0005;
/// Style id for block comments.
pub const STYLE_BLOCK_COMMENT: StyleId = 0x0100_0006;
/// Style id for directive lines (e.g. preprocessor).
pub const STYLE_DIRECTIVE: StyleId = 0x0100_0007;

/// Errors produced while compiling token rules.
#[derive(Debug, Error)]
pub enum RuleError {
    /// A rule pattern failed to compile.
    #[error("regex compile error for pattern '{pattern}': {message}")]
    RegexCompile {
        /// The regex pattern string.
        pattern: String,
        /// The compiler error message.
        message: String,
    },
}

fn compile(pattern: &str) -> Result<Regex, RuleError> {
    Regex::new(pattern).map_err(|e| RuleError::RegexCompile {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// The style ids assigned to each rule category.
///
/// These are only identifiers. The presentation layer is expected to map them to actual colors.
#[derive(Debug, Clone, Copy)]
pub struct TokenStyles {
    /// Keyword style.
    pub keyword: StyleId,
    /// Known-type identifier style.
    pub known_type: StyleId,
    /// String literal style.
    pub string: StyleId,
    /// Call-like identifier style.
    pub call: StyleId,
    /// Line comment style.
    pub line_comment: StyleId,
    /// Block comment style.
    pub block_comment: StyleId,
    /// Directive style.
    pub directive: StyleId,
}

impl Default for TokenStyles {
    fn default() -> Self {
        Self {
            keyword: STYLE_KEYWORD,
            known_type: STYLE_TYPE,
            string: STYLE_STRING,
            call: STYLE_CALL,
            line_comment: STYLE_LINE_COMMENT,
            block_comment: STYLE_BLOCK_COMMENT,
            directive: STYLE_DIRECTIVE,
        }
    }
}

/// A single token rule.
#[derive(Debug, Clone)]
pub struct TokenRule {
    regex: Regex,
    style: StyleId,
    capture_group: Option<usize>,
}

impl TokenRule {
    /// Compile a rule from a pattern and a style id.
    pub fn new(pattern: &str, style: StyleId) -> Result<Self, RuleError> {
        Ok(Self {
            regex: compile(pattern)?,
            style,
            capture_group: None,
        })
    }

    /// Style only a capture group of each match.
    ///
    /// Used where the pattern needs trailing context that must not be styled or consumed
    /// visually, e.g. call detection: pattern `\b([A-Za-z0-9_]+)\(`, group `1`.
    pub fn with_capture_group(mut self, group: usize) -> Self {
        self.capture_group = Some(group);
        self
    }

    /// The compiled pattern.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// The style painted by this rule.
    pub fn style(&self) -> StyleId {
        self.style
    }

    /// The styled capture group, if restricted.
    pub fn capture_group(&self) -> Option<usize> {
        self.capture_group
    }
}

/// An ordered rule list plus the block comment open/close patterns.
#[derive(Debug, Clone)]
pub struct TokenRuleSet {
    rules: Vec<TokenRule>,
    block_open: Option<Regex>,
    block_close: Option<Regex>,
    block_style: StyleId,
}

impl TokenRuleSet {
    /// Build a rule set from explicit parts.
    pub fn new(rules: Vec<TokenRule>, block_open: Option<Regex>, block_close: Option<Regex>) -> Self {
        Self {
            rules,
            block_open,
            block_close,
            block_style: STYLE_BLOCK_COMMENT,
        }
    }

    /// Compile a rule set from a [`LanguageConfig`].
    ///
    /// Rule order is fixed (later rules overwrite earlier ones on overlap):
    /// keywords, type-prefix identifiers, string literals, call-like identifiers, line comments,
    /// directives. The directive rule is last on purpose: a `//` occurring inside a directive
    /// line stays directive-styled.
    pub fn from_language(lang: &LanguageConfig, styles: TokenStyles) -> Result<Self, RuleError> {
        let mut rules = Vec::new();

        for kw in &lang.keywords {
            rules.push(TokenRule::new(
                &format!(r"\b{}\b", regex::escape(kw)),
                styles.keyword,
            )?);
        }

        if let Some(prefix) = lang.type_prefix {
            rules.push(TokenRule::new(
                &format!(r"\b{}[A-Za-z]+\b", regex::escape(&prefix.to_string())),
                styles.known_type,
            )?);
        }

        // Greedy on purpose: a line with several quoted substrings is spanned as one literal
        // from the first quote to the last.
        rules.push(TokenRule::new(r#"".*""#, styles.string)?);

        rules.push(TokenRule::new(r"\b([A-Za-z0-9_]+)\(", styles.call)?.with_capture_group(1));

        if let Some(token) = lang.comments.line.as_deref().filter(|s| !s.is_empty()) {
            rules.push(TokenRule::new(
                &format!(r"{}[^\n]*", regex::escape(token)),
                styles.line_comment,
            )?);
        }

        if let Some(prefix) = lang.directive_prefix {
            rules.push(TokenRule::new(
                &format!(r"^{}.*", regex::escape(&prefix.to_string())),
                styles.directive,
            )?);
        }

        let (block_open, block_close) = if lang.comments.has_block() {
            let open = lang.comments.block_start.as_deref().unwrap_or_default();
            let close = lang.comments.block_end.as_deref().unwrap_or_default();
            (
                Some(compile(&regex::escape(open))?),
                Some(compile(&regex::escape(close))?),
            )
        } else {
            (None, None)
        };

        Ok(Self {
            rules,
            block_open,
            block_close,
            block_style: styles.block_comment,
        })
    }

    /// The ordered rule list.
    pub fn rules(&self) -> &[TokenRule] {
        &self.rules
    }

    /// The block comment open pattern, if the language has block comments.
    pub fn block_open(&self) -> Option<&Regex> {
        self.block_open.as_ref()
    }

    /// The block comment close pattern, if the language has block comments.
    pub fn block_close(&self) -> Option<&Regex> {
        self.block_close.as_ref()
    }

    /// The style painted over block comment spans.
    pub fn block_style(&self) -> StyleId {
        self.block_style
    }
}
