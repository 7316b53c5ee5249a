//! H20 Session entropy (advisory, `post_session`, never blocks).
//! Flags circular editing — the same path touched repeatedly within a
//! session — by reading the `edits` audit log H16 populates.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use warden_intercept::Decision;
use warden_kernel::{Hook, HookContext, HookPosture};

use crate::constants::MARKER_MODE_PLAN;

const HIGH_ENTROPY_THRESHOLD: usize = 3;
const UNDO_MENTION_THRESHOLD: usize = 2;

static UNDO_MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)undo|revert|rollback").unwrap());
static INTENT_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(implement|fix|audit|review|explore|explain|test|deploy)\b").unwrap());
static MODE_FLAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[MODE:([A-Z_]+)\]").unwrap());

fn count_edits_per_path(audit_lines: &[String]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for line in audit_lines {
        let Some(path) = line.split(']').nth(1) else {
            continue;
        };
        *counts.entry(path.trim().to_string()).or_insert(0) += 1;
    }
    counts
}

fn count_undo_mentions(conversation_context: &str) -> usize {
    UNDO_MENTION.find_iter(conversation_context).count()
}

/// Intent- and mode-thrashing across the last 5 turns, split on the
/// `\n---\n` boundary a host inserts between conversation turns.
fn detect_drift(conversation_context: &str) -> Option<(usize, usize)> {
    let turns: Vec<&str> = conversation_context.split("\n---\n").collect();
    if turns.len() < 3 {
        return None;
    }
    let recent = &turns[turns.len().saturating_sub(5)..];

    let mut intents: Vec<Option<String>> = Vec::new();
    let mut modes = HashSet::new();
    for turn in recent {
        let first_intent = INTENT_WORD.find(turn).map(|m| m.as_str().to_lowercase());
        intents.push(first_intent);
        for capture in MODE_FLAG.captures_iter(turn) {
            modes.insert(capture[1].to_string());
        }
    }

    let mut intent_changes = 0;
    for window in intents.windows(2) {
        if let (Some(prev), Some(curr)) = (&window[0], &window[1]) {
            if prev != curr {
                intent_changes += 1;
            }
        }
    }

    Some((intent_changes, modes.len()))
}

pub struct SessionEntropy;

impl Hook for SessionEntropy {
    fn name(&self) -> &'static str {
        "session_entropy"
    }

    fn posture(&self) -> HookPosture {
        HookPosture::Advisory
    }

    fn evaluate(&self, ctx: &HookContext<'_>) -> Decision {
        let audit_lines = ctx.session.read_audit("edits").unwrap_or_default();
        let counts = count_edits_per_path(&audit_lines);

        let hot_paths: Vec<_> = counts
            .into_iter()
            .filter(|(_, count)| *count >= HIGH_ENTROPY_THRESHOLD)
            .collect();

        let undo_mentions = count_undo_mentions(&ctx.payload.conversation_context);
        let drift = detect_drift(&ctx.payload.conversation_context);
        let is_drifting = drift.is_some_and(|(intent_changes, unique_modes)| intent_changes > 2 || unique_modes > 2);

        if hot_paths.is_empty() && undo_mentions < UNDO_MENTION_THRESHOLD && !is_drifting {
            return Decision::annotate(serde_json::json!({ "entropy_level": "low" }));
        }

        let mut decision = Decision::annotate(serde_json::json!({ "entropy_level": "high" }));
        for (path, count) in &hot_paths {
            decision = decision.with_detail(format!("'{path}' edited {count} times this session"));
        }
        if undo_mentions >= UNDO_MENTION_THRESHOLD {
            decision = decision.with_detail(format!(
                "multiple undo/revert patterns detected ({undo_mentions} times) (possible lost context)"
            ));
        }
        if let Some((intent_changes, unique_modes)) = drift {
            if is_drifting {
                decision = decision.with_detail(format!(
                    "conversation is drifting (intent changes: {intent_changes}, mode changes: {unique_modes})"
                ));
            }
        }
        if !ctx.payload.has_marker(MARKER_MODE_PLAN) {
            decision = decision.with_detail(format!("recommend escalating to {MARKER_MODE_PLAN}"));
        }
        decision
    }
}
