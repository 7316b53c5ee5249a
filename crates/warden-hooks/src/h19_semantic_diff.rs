//! H19 Semantic diff (advisory, mandatory in `[MODE:STRICT]`,
//! `post_write`). Cross-checks the prompt's declared scope against the
//! files actually touched, and flags edits whose identifiers share no
//! vocabulary with the prompt's stated intent.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use warden_intercept::Decision;
use warden_kernel::{Hook, HookContext, HookPosture};

use crate::constants::MARKER_MODE_STRICT;

const STOPWORDS: &[&str] = &[
    "the", "a", "an", "to", "of", "in", "on", "for", "and", "or", "is", "it", "that", "this", "with", "be",
];

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Za-z_][A-Za-z0-9_]{2,}\b").unwrap());
static SCOPE_LIST: Lazy<Regex> = Lazy::new(|| Regex::new(r"PLAN_SCOPE:\[([^\]]*)\]").unwrap());

fn tokenize(text: &str) -> HashSet<String> {
    IDENTIFIER
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|w| !STOPWORDS.contains(&w.as_str()))
        .flat_map(|w| w.split('_').map(str::to_string).collect::<Vec<_>>())
        .filter(|w| w.len() > 2)
        .collect()
}

fn declared_scope(conversation_context: &str) -> Option<Vec<String>> {
    let captures = SCOPE_LIST.captures(conversation_context)?;
    Some(
        captures[1]
            .split(',')
            .map(|entry| entry.trim().to_string())
            .filter(|entry| !entry.is_empty())
            .collect(),
    )
}

pub struct SemanticDiff;

impl Hook for SemanticDiff {
    fn name(&self) -> &'static str {
        "semantic_diff"
    }

    fn posture(&self) -> HookPosture {
        HookPosture::Mandatory
    }

    fn evaluate(&self, ctx: &HookContext<'_>) -> Decision {
        let strict = ctx.payload.has_marker(MARKER_MODE_STRICT);
        let mut scope_violations = Vec::new();
        let mut warnings = Vec::new();

        if let Some(scope) = declared_scope(&ctx.payload.conversation_context) {
            for edit in &ctx.payload.tool_info.edits {
                if !scope.iter().any(|entry| edit.path == *entry || edit.path.starts_with(entry.as_str())) {
                    scope_violations.push(format!("'{}' is outside the declared plan scope", edit.path));
                }
            }
        }

        if let Some(prompt) = &ctx.payload.tool_info.prompt {
            let intent_words = tokenize(prompt);
            if !intent_words.is_empty() {
                for edit in &ctx.payload.tool_info.edits {
                    let identifiers = tokenize(&edit.new_string);
                    if !identifiers.is_empty() && intent_words.is_disjoint(&identifiers) {
                        warnings.push(format!(
                            "'{}' shares no vocabulary with the stated intent",
                            edit.path
                        ));
                    }
                }
            }

            let file_count = ctx.payload.tool_info.edits.len();
            if file_count > 3 && prompt.to_lowercase().contains("single file") {
                warnings.push(format!(
                    "Intent suggests single-file change, but {file_count} files edited"
                ));
            }
        }

        if strict && !scope_violations.is_empty() {
            let mut decision = Decision::block(
                "semantic_diff",
                format!("{MARKER_MODE_STRICT} requires every edit to lie within the declared plan scope"),
            );
            for issue in scope_violations.into_iter().chain(warnings) {
                decision = decision.with_detail(issue);
            }
            return decision;
        }

        Decision::allow().with_details(scope_violations.into_iter().chain(warnings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use warden_intercept::{Edit, InterceptPayload};
    use warden_policy::PolicyDocument;
    use warden_session::SessionStore;

    #[test]
    fn extracts_declared_scope() {
        let scope = declared_scope("PLAN_SCOPE:[src/foo.rs, src/bar.rs]").unwrap();
        assert_eq!(scope, vec!["src/foo.rs", "src/bar.rs"]);
    }

    #[test]
    fn advisory_flags_out_of_scope_edit() {
        let mut payload = InterceptPayload::default();
        payload.conversation_context = "PLAN_SCOPE:[src/foo.rs]".to_string();
        payload.tool_info.edits = vec![Edit { path: "src/other.rs".to_string(), ..Default::default() }];
        let policy = PolicyDocument::default();
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path(), "s1");
        let ctx = HookContext { payload: &payload, policy: &policy, session: &session };
        let decision = SemanticDiff.evaluate(&ctx);
        assert!(!decision.is_block());
        assert!(decision.details.iter().any(|d| d.contains("declared plan scope")));
    }

    #[test]
    fn strict_mode_blocks_out_of_scope_edit() {
        let mut payload = InterceptPayload::default();
        payload.conversation_context = format!("{MARKER_MODE_STRICT} PLAN_SCOPE:[src/foo.rs]");
        payload.tool_info.edits = vec![Edit { path: "src/other.rs".to_string(), ..Default::default() }];
        let policy = PolicyDocument::default();
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path(), "s1");
        let ctx = HookContext { payload: &payload, policy: &policy, session: &session };
        assert!(SemanticDiff.evaluate(&ctx).is_block());
    }

    #[test]
    fn warns_when_single_file_intent_touches_more_than_three() {
        let mut payload = InterceptPayload::default();
        payload.tool_info.prompt = Some("Fix the bug in a single file".to_string());
        payload.tool_info.edits = vec![
            Edit { path: "a.rs".to_string(), ..Default::default() },
            Edit { path: "b.rs".to_string(), ..Default::default() },
            Edit { path: "c.rs".to_string(), ..Default::default() },
            Edit { path: "d.rs".to_string(), ..Default::default() },
        ];
        let policy = PolicyDocument::default();
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path(), "s1");
        let ctx = HookContext { payload: &payload, policy: &policy, session: &session };
        let decision = SemanticDiff.evaluate(&ctx);
        assert!(!decision.is_block());
        assert!(decision.details.iter().any(|d| d.contains("single-file change")));
    }

    #[test]
    fn matching_scope_is_clean() {
        let mut payload = InterceptPayload::default();
        payload.conversation_context = "PLAN_SCOPE:[src/foo.rs]".to_string();
        payload.tool_info.edits = vec![Edit { path: "src/foo.rs".to_string(), ..Default::default() }];
        let policy = PolicyDocument::default();
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path(), "s1");
        let ctx = HookContext { payload: &payload, policy: &policy, session: &session };
        assert!(SemanticDiff.evaluate(&ctx).details.is_empty());
    }
}
