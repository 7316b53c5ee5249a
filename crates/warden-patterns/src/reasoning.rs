//! Reasoning markers for the executor-only reasoning detector (H6, spec
//! §4.4). Tool arguments are for execution, not narration; a match here
//! means the agent tried to explain itself instead of just acting.

use once_cell::sync::Lazy;
use regex::Regex;

static REASONING_MARKERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\bbecause\b",
        r"\bshould\b",
        r"\bmaybe\b",
        r"\bcould\b",
        r"\bmight\b",
        r"\bprobably\b",
        r"\blikely\b",
        r"\bI think\b",
        r"\bI believe\b",
        r"\bstrategy\b",
        r"\bapproach\b",
        r"\brecommend\b",
        r"\bsuggest\b",
        r"\bbest practice\b",
    ]
    .iter()
    .map(|pattern| Regex::new(&format!("(?i){pattern}")).unwrap())
    .collect()
});

/// Return the literal source of every reasoning marker found in `text`.
pub fn matches(text: &str) -> Vec<&'static str> {
    REASONING_MARKERS
        .iter()
        .filter(|regex| regex.is_match(text))
        .map(|regex| regex.as_str())
        .collect()
}
