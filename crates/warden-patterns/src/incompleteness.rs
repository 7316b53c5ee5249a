//! Incompleteness markers for the completeness hook (H13, spec §4.4).
//!
//! Classification is line-oriented: callers scan new file content line
//! by line and pass a short window of preceding lines so a bare `pass`
//! can be told apart from a legitimate empty `except` body.

use once_cell::sync::Lazy;
use regex::Regex;

/// How many lines back to look for an enclosing `except` when judging
/// a bare `pass`.
pub const PASS_LOOKBACK_LINES: usize = 5;

static TODO_COMMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(#|//|/\*|--|%)\s*(TODO|FIXME|XXX|HACK|BUG|TEMP|LATER|SOMEDAY|BROKEN)\b")
        .unwrap()
});

static MASKED_NOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(NOTE|REMEMBER|IMPORTANT):\s*implement").unwrap());

static STUB_KEYWORDS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"\bNotImplementedError\b").unwrap(),
        Regex::new(r"\bNotImplementedException\b").unwrap(),
        Regex::new(r"\bUnsupportedOperationException\b").unwrap(),
        Regex::new(r"\bunimplemented!").unwrap(),
        Regex::new(r"\btodo!").unwrap(),
        Regex::new(r#"(?i)panic\(\s*".*not implemented.*"\s*\)"#).unwrap(),
        Regex::new(r#"(?i)panic\(\s*".*TODO.*"\s*\)"#).unwrap(),
        Regex::new(r#"(?i)std::runtime_error\([^)]*implement[^)]*\)"#).unwrap(),
        Regex::new(r"(?i)fatalError\([^)]*implement[^)]*\)").unwrap(),
    ]
});

static PLACEHOLDER_RETURN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*return(\s+(None|nil|null))?\s*;?\s*$|^\s*return\s*(\{\}|\[\]|""|0|false)\s*;?\s*$|^\s*vec!\[\]\s*;?\s*$"#).unwrap()
});

static EXCEPT_CLAUSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*except\b").unwrap());

/// The kind of incompleteness a line exhibits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncompletenessKind {
    TodoComment,
    MaskedNote,
    StubKeyword,
    BarePass,
    PlaceholderReturn,
}

impl IncompletenessKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncompletenessKind::TodoComment => "todo_comment",
            IncompletenessKind::MaskedNote => "masked_note",
            IncompletenessKind::StubKeyword => "stub_keyword",
            IncompletenessKind::BarePass => "bare_pass",
            IncompletenessKind::PlaceholderReturn => "placeholder_return",
        }
    }
}

/// Classify a single line of source, given the lines immediately
/// preceding it (most recent last) for `except`-lookback on `pass`.
pub fn classify_line(line: &str, preceding: &[&str]) -> Option<IncompletenessKind> {
    if TODO_COMMENT.is_match(line) {
        return Some(IncompletenessKind::TodoComment);
    }
    if MASKED_NOTE.is_match(line) {
        return Some(IncompletenessKind::MaskedNote);
    }
    if STUB_KEYWORDS.iter().any(|regex| regex.is_match(line)) {
        return Some(IncompletenessKind::StubKeyword);
    }
    if line.trim() == "pass" {
        let in_except = preceding
            .iter()
            .rev()
            .take(PASS_LOOKBACK_LINES)
            .any(|prior| EXCEPT_CLAUSE.is_match(prior));
        if !in_except {
            return Some(IncompletenessKind::BarePass);
        }
        return None;
    }
    if PLACEHOLDER_RETURN.is_match(line) {
        return Some(IncompletenessKind::PlaceholderReturn);
    }
    None
}

/// Scan every line of `code`, returning `(1-based line number, kind)`
/// for each incomplete construct found.
pub fn scan(code: &str) -> Vec<(usize, IncompletenessKind)> {
    let lines: Vec<&str> = code.lines().collect();
    let mut findings = Vec::new();
    for (index, line) in lines.iter().enumerate() {
        let preceding = &lines[..index];
        if let Some(kind) = classify_line(line, preceding) {
            findings.push((index + 1, kind));
        }
    }
    findings
}
