//! Mock-usage patterns, shared by the code policy hook's REPAIR-mode
//! check (H12) and the test authenticity hook (H16). Grounded in spec
//! §4.4.

use once_cell::sync::Lazy;
use regex::Regex;

static MOCK_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\bMock\b",
        r"\bStub\b",
        r"\bFake\b",
        r"\bSpy\(",
        r"jest\.mock",
        r"vitest\.mock",
        r"@Mock\b",
        r"@Spy\b",
        r"\bmockito\b",
        r"\bsinon\b",
        r"\btestDouble\b",
        r"unittest\.mock",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// True if `text` contains any recognized mock-usage construct.
pub fn contains_mock(text: &str) -> bool {
    MOCK_PATTERNS.iter().any(|regex| regex.is_match(text))
}

/// Every matched mock pattern's literal source, for detail messages.
pub fn matches(text: &str) -> Vec<&'static str> {
    MOCK_PATTERNS
        .iter()
        .filter(|regex| regex.is_match(text))
        .map(|regex| regex.as_str())
        .collect()
}
