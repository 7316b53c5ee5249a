//! Generic variable name detection for the comprehensive-comments hook
//! (H14, spec §4.4).

use once_cell::sync::Lazy;
use regex::Regex;

/// Names considered too generic to document intent on their own.
pub const GENERIC_NAMES: &[&str] = &["x", "y", "tmp", "data", "obj", "item", "result"];

static GENERIC_NAME_ASSIGNMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(x|y|tmp|data|obj|item|result)\s*=").unwrap());

/// A single generic-name assignment: the 1-based line number and the
/// matched name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericNameMatch {
    pub line: usize,
    pub name: String,
}

/// Every generic-name assignment in `code`, in source order.
pub fn find_generic_names(code: &str) -> Vec<GenericNameMatch> {
    let mut found = Vec::new();
    for (index, line) in code.lines().enumerate() {
        if let Some(captures) = GENERIC_NAME_ASSIGNMENT.captures(line) {
            found.push(GenericNameMatch {
                line: index + 1,
                name: captures[1].to_string(),
            });
        }
    }
    found
}
