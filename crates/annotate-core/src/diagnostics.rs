//! Compiler diagnostic parsing and line-indexed lookup.
//!
//! The parser consumes the complete captured output of a compiler run (stdout and stderr
//! concatenated, newline-separated) in the de facto `file:line:col: severity: message`
//! convention, and produces structured records. Parsing is deliberately tolerant: one malformed
//! line never aborts the batch.
//!
//! Records are grouped by source line into a [`DiagnosticIndex`] so the presentation layer can
//! answer "what diagnostics sit on the line under the pointer" in O(1) average.

use std::collections::HashMap;

/// Diagnostic severity, classified from the message prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Message starts with `warning`.
    Warning,
    /// Message starts with `error`.
    Error,
    /// Anything else. Unknown records are discarded by the parser, never surfaced.
    Unknown,
}

/// One structured compiler message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRecord {
    /// 1-based source line (0 if the line field was malformed).
    pub line_no: u32,
    /// 1-based source column (0 if the column field was malformed).
    pub column_no: u32,
    /// Classified severity; only `Warning` and `Error` records are emitted.
    pub severity: Severity,
    /// The message with the severity word and surrounding whitespace stripped.
    pub message: String,
}

/// Parse a complete diagnostic blob into ordered records.
///
/// Everything after the last newline is dropped before parsing: the process wrapper appends a
/// `Program Finished with exit code: N` banner there. A blob with no newline at all therefore
/// parses to nothing.
///
/// Per record: characters are skipped until a `:` ends the filename segment (end of input while
/// skipping stops the scan with no partial record), then a digit run is read as the line number,
/// one `:` is skipped, a digit run is read as the column, one `:` is skipped, and the rest of the
/// line is the message. A missing digit run reads as 0 and scanning continues. Records whose
/// trimmed message starts with neither `error` nor `warning` are discarded.
pub fn parse_compiler_output(raw: &str) -> Vec<DiagnosticRecord> {
    let body = match raw.rfind('\n') {
        Some(idx) => &raw[..idx],
        None => return Vec::new(),
    };

    let chars: Vec<char> = body.chars().collect();
    let mut records = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i..].iter().position(|&c| c == ':') {
            Some(off) => i += off + 1,
            None => break,
        }

        let (line_no, next) = read_digits(&chars, i);
        i = (next + 1).min(chars.len()); // one `:` after the line number
        let (column_no, next) = read_digits(&chars, i);
        i = (next + 1).min(chars.len()); // one `:` after the column

        let mut message = String::new();
        while i < chars.len() && chars[i] != '\n' {
            message.push(chars[i]);
            i += 1;
        }
        i += 1; // past the newline

        let message = message.trim();
        let severity = if message.starts_with("error") {
            Severity::Error
        } else if message.starts_with("warning") {
            Severity::Warning
        } else {
            Severity::Unknown
        };
        if severity == Severity::Unknown {
            continue;
        }

        records.push(DiagnosticRecord {
            line_no,
            column_no,
            severity,
            message: strip_severity_word(message),
        });
    }

    records
}

/// Read a decimal digit run starting at `i`; a missing run reads as 0.
fn read_digits(chars: &[char], i: usize) -> (u32, usize) {
    let mut value: u32 = 0;
    let mut i = i;
    while i < chars.len() {
        let Some(digit) = chars[i].to_digit(10) else {
            break;
        };
        value = value.saturating_mul(10).saturating_add(digit);
        i += 1;
    }
    (value, i)
}

/// Strip the leading `error`/`warning` word, an optional `:`, and surrounding whitespace.
fn strip_severity_word(message: &str) -> String {
    let rest = message
        .strip_prefix("error")
        .or_else(|| message.strip_prefix("warning"))
        .unwrap_or(message);
    let rest = rest.trim_start();
    rest.strip_prefix(':').unwrap_or(rest).trim().to_string()
}

/// Records grouped by source line, insertion order preserved within each line.
///
/// Rebuilt wholesale from each parse; never merged incrementally.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticIndex {
    by_line: HashMap<u32, Vec<DiagnosticRecord>>,
    len: usize,
}

impl DiagnosticIndex {
    /// Group records by line number in one pass.
    pub fn build(records: Vec<DiagnosticRecord>) -> Self {
        let len = records.len();
        let mut by_line: HashMap<u32, Vec<DiagnosticRecord>> = HashMap::new();
        for record in records {
            by_line.entry(record.line_no).or_default().push(record);
        }
        Self { by_line, len }
    }

    /// All records for the given 1-based line, in parser emission order.
    pub fn lookup(&self, line_no: u32) -> &[DiagnosticRecord] {
        self.by_line.get(&line_no).map_or(&[], |v| v.as_slice())
    }

    /// Total record count across all lines.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the index holds no records.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
