//! Weighted intent classification (H1, spec §4.4).

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

/// The four intent categories the gateway recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentCategory {
    Mutate,
    Repair,
    Audit,
    Explore,
}

impl IntentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentCategory::Mutate => "mutate",
            IntentCategory::Repair => "repair",
            IntentCategory::Audit => "audit",
            IntentCategory::Explore => "explore",
        }
    }
}

struct WeightedPattern {
    regex: Regex,
    confidence: f64,
}

/// Confidence at or above which a classification counts as high-confidence.
pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.80;

static MUTATE_VERBS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(implement|write|generate|edit|refactor|add|create|patch|modify|change|update)\b")
        .unwrap()
});

/// True if `text` contains one of the mutation verbs (spec §4.4),
/// independent of full category scoring. Used by the prompt gate
/// (H2), which reacts to mutation intent regardless of whether
/// `mutate` ends up the *primary* category for the turn.
pub fn expresses_mutation_intent(text: &str) -> bool {
    MUTATE_VERBS.is_match(text)
}

static PATTERNS: Lazy<Vec<(IntentCategory, Vec<WeightedPattern>)>> = Lazy::new(|| {
    vec![
        (
            IntentCategory::Mutate,
            vec![
                WeightedPattern {
                    regex: Regex::new(
                        r"(?i)\b(implement|write|generate|edit|refactor|add|create|patch|modify|change|update)\b",
                    )
                    .unwrap(),
                    confidence: 0.9,
                },
                WeightedPattern {
                    regex: Regex::new(r"(?i)\[MODE:REPAIR\]").unwrap(),
                    confidence: 0.3,
                },
            ],
        ),
        (
            IntentCategory::Repair,
            vec![
                WeightedPattern {
                    regex: Regex::new(r"(?i)\b(fix|debug|repair|resolve)\b").unwrap(),
                    confidence: 0.85,
                },
                WeightedPattern {
                    regex: Regex::new(r"(?i)why.*fail|not.*work|broken").unwrap(),
                    confidence: 0.8,
                },
                WeightedPattern {
                    regex: Regex::new(r"\[MODE:REPAIR\]").unwrap(),
                    confidence: 0.95,
                },
            ],
        ),
        (
            IntentCategory::Audit,
            vec![
                WeightedPattern {
                    regex: Regex::new(r"(?i)\b(review|audit|check|verify)\b").unwrap(),
                    confidence: 0.85,
                },
                WeightedPattern {
                    regex: Regex::new(r"\[MODE:AUDIT\]").unwrap(),
                    confidence: 0.95,
                },
                WeightedPattern {
                    regex: Regex::new(r"(?i)(?:is this|does this)\s+\w+").unwrap(),
                    confidence: 0.7,
                },
            ],
        ),
        (
            IntentCategory::Explore,
            vec![
                WeightedPattern {
                    regex: Regex::new(r"(?i)\b(explain|show|diagram)\b").unwrap(),
                    confidence: 0.85,
                },
                WeightedPattern {
                    regex: Regex::new(r"(?i)what.*architecture|find.*pattern|locate.*code").unwrap(),
                    confidence: 0.8,
                },
                WeightedPattern {
                    regex: Regex::new(r"(?i)show me|describe|tell me about").unwrap(),
                    confidence: 0.75,
                },
            ],
        ),
    ]
});

/// Result of [`classify`]: the highest-scoring category plus the full
/// per-category score map, for callers that want to inspect runners-up.
#[derive(Debug, Clone)]
pub struct IntentScore {
    pub primary_intent: IntentCategory,
    pub confidence: f64,
    pub is_high_confidence: bool,
    pub scores: HashMap<&'static str, f64>,
}

/// Score `prompt` against every category, each category's score being
/// the max confidence of any pattern it matches. Falls back to
/// `explore` at confidence `0.5` for an empty prompt.
pub fn classify(prompt: &str) -> IntentScore {
    if prompt.trim().is_empty() {
        let mut scores = HashMap::new();
        scores.insert(IntentCategory::Explore.as_str(), 0.5);
        return IntentScore {
            primary_intent: IntentCategory::Explore,
            confidence: 0.5,
            is_high_confidence: false,
            scores,
        };
    }

    let mut scores: HashMap<&'static str, f64> = HashMap::new();
    let mut best: Option<(IntentCategory, f64)> = None;

    for (category, patterns) in PATTERNS.iter() {
        let mut max_confidence = 0.0_f64;
        for pattern in patterns {
            if pattern.regex.is_match(prompt) && pattern.confidence > max_confidence {
                max_confidence = pattern.confidence;
            }
        }
        scores.insert(category.as_str(), max_confidence);
        if best.is_none() || max_confidence > best.unwrap().1 {
            best = Some((*category, max_confidence));
        }
    }

    let (primary_intent, confidence) = best.unwrap_or((IntentCategory::Explore, 0.5));
    IntentScore {
        is_high_confidence: confidence >= HIGH_CONFIDENCE_THRESHOLD,
        primary_intent,
        confidence,
        scores,
    }
}
