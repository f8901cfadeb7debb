#![warn(missing_docs)]
//! Annotate Core - Headless Source Annotation & Diagnostic Engine
//!
//! # Overview
//!
//! `annotate-core` is the reusable core of a source editing surface: incremental syntax
//! highlighting with cross-line comment state, an auto-pairing/auto-indent keystroke state
//! machine, and a compiler-diagnostic parser with line-indexed lookup. It does not render, open
//! files, or spawn compilers; hosts feed it text, edits, keystrokes, and captured compiler
//! output, and read back styled spans, buffer mutations, and diagnostics.
//!
//! # Core Features
//!
//! - **Stateful Line Highlighting**: data-driven token rules, block comments threaded across
//!   lines as an explicit per-line state
//! - **Incremental Invalidation**: edits re-highlight only until the line state converges
//! - **Auto-Pairing**: opener/closer insertion with skip-over tracking per document
//! - **Diagnostic Indexing**: `file:line:col: severity: message` parsing with O(1) average
//!   per-line lookup
//!
//! # Data Flow
//!
//! ```text
//! keystrokes ──▶ PairingEngine ──▶ buffer mutations
//!                     │
//! edit events ────────┴──▶ line invalidation ──▶ LineHighlighter ──▶ styled spans
//!
//! compiler output ──▶ parse_compiler_output ──▶ DiagnosticIndex ──▶ hover queries
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use annotate_core::{AnnotationSession, EditEvent, LineState};
//! use annotate_lang::LanguageConfig;
//!
//! let mut session = AnnotationSession::new("int x;\n", &LanguageConfig::c()).unwrap();
//!
//! // Edits re-highlight the invalidated lines.
//! session.apply_edit(&EditEvent::insert(6, " /* note"));
//! assert_eq!(session.line_state(0), Some(LineState::InBlockComment));
//!
//! // Keystrokes drive auto-pairing.
//! session.set_cursor(0);
//! session.key_typed('{');
//!
//! // Completed compiler runs feed the diagnostic index.
//! session.set_compiler_output("src.c:1:1: error: boom\nexit banner");
//! assert_eq!(session.diagnostics_for_line(1).len(), 1);
//! ```
//!
//! # Module Description
//!
//! - [`rules`] - ordered token rules compiled from a language config
//! - [`highlight`] - per-line highlighting with cross-line comment state
//! - [`pairing`] - auto-pair / auto-indent keystroke decisions
//! - [`diagnostics`] - compiler output parsing and line-indexed lookup
//! - [`line_index`] - rope-backed document mirror
//! - [`session`] - orchestration and ownership of all derived state

pub mod diagnostics;
pub mod highlight;
pub mod line_index;
pub mod pairing;
pub mod rules;
pub mod session;

pub use diagnostics::{DiagnosticIndex, DiagnosticRecord, Severity, parse_compiler_output};
pub use highlight::{LineHighlighter, LineState, StyledSpan};
pub use line_index::LineIndex;
pub use pairing::{PairAction, PairingEngine};
pub use rules::{RuleError, StyleId, TokenRule, TokenRuleSet, TokenStyles};
pub use session::{AnnotationSession, EditEvent};
