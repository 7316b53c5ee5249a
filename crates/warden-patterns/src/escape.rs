//! Escape primitive scanner patterns (H11, spec §4.4).
//!
//! Hard-coded and non-configurable: these patterns are never read from
//! policy, unlike the prohibited-pattern groups in [`crate::prohibited`].

use once_cell::sync::Lazy;
use regex::Regex;

/// One named escape primitive group and its compiled pattern.
pub struct EscapePattern {
    pub name: &'static str,
    pub regex: Regex,
}

static ESCAPE_PATTERNS: Lazy<Vec<EscapePattern>> = Lazy::new(|| {
    vec![
        EscapePattern {
            name: "subprocess",
            regex: Regex::new(r"(?i)\bsubprocess\b").unwrap(),
        },
        EscapePattern {
            name: "os_system",
            regex: Regex::new(r"(?i)\bos\.system\b").unwrap(),
        },
        EscapePattern {
            name: "dynamic_execution",
            regex: Regex::new(r"(?i)\b(exec|eval|compile|__import__)\s*\(").unwrap(),
        },
        EscapePattern {
            name: "direct_file_io",
            regex: Regex::new(r"(?i)\bopen\s*\([^)]*['\"](?:r|w|a|rb|wb|ab)['\"]").unwrap(),
        },
        EscapePattern {
            name: "network_access",
            regex: Regex::new(r"(?i)\b(socket|urllib|requests|httpx)\b").unwrap(),
        },
        EscapePattern {
            name: "native_ffi",
            regex: Regex::new(r"(?i)\b(ctypes|cffi)\b").unwrap(),
        },
        EscapePattern {
            name: "shell_wrapper",
            regex: Regex::new(r#"(?i)\b(bash|sh)\s+-c\b|cmd\s*/c\b|powershell\s+-Command\b"#)
                .unwrap(),
        },
    ]
});

/// Return the names of every escape primitive group that matches `text`.
pub fn matches(text: &str) -> Vec<&'static str> {
    ESCAPE_PATTERNS
        .iter()
        .filter(|pattern| pattern.regex.is_match(text))
        .map(|pattern| pattern.name)
        .collect()
}
