//! H21 Refusal audit (advisory, `post_refusal`, never blocks).
//! Validates a structured refusal record against the recognized-reason
//! closed set and the required-field shape, surfacing violations as
//! `WARNING:` stderr lines rather than ever blocking.

use once_cell::sync::Lazy;
use regex::Regex;

use warden_intercept::Decision;
use warden_kernel::{Hook, HookContext, HookPosture};
use warden_intercept::RefusalInfo;

static CONTEXT_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\[REFUSAL:\w+\]|\[BLOCKED:[^\]]*\]|\[ERROR:[^\]]*\]").unwrap());

/// `[REFUSAL:...]` / `[BLOCKED:...]` / `[ERROR:...]` markers embedded in
/// the conversation, counted as corroborating evidence for this refusal.
fn count_context_markers(conversation_context: &str) -> usize {
    CONTEXT_MARKER.find_iter(conversation_context).count()
}

const RECOGNIZED_REASONS: &[&str] = &[
    "policy_violation",
    "scope_violation",
    "safety_check",
    "missing_requirement",
    "permission_denied",
    "ambiguous_intent",
    "resource_limit",
    "configuration_error",
];

const MIN_MESSAGE_LEN: usize = 10;
const VALID_EXIT_CODES: &[i32] = &[1, 2];

fn audit_issues(refusal: &RefusalInfo) -> Vec<String> {
    let mut issues = Vec::new();

    match &refusal.reason {
        Some(reason) if RECOGNIZED_REASONS.contains(&reason.as_str()) => {}
        Some(reason) => issues.push(format!("reason '{reason}' is not in the recognized set")),
        None => issues.push("reason is missing".to_string()),
    }

    match &refusal.message {
        Some(message) if message.len() >= MIN_MESSAGE_LEN => {}
        _ => issues.push(format!("message is missing or shorter than {MIN_MESSAGE_LEN} characters")),
    }

    if refusal.details.is_empty() {
        issues.push("details is empty".to_string());
    }

    if refusal.recovery_steps.is_empty() {
        issues.push("recovery_steps is empty".to_string());
    }

    match refusal.exit_code {
        Some(code) if VALID_EXIT_CODES.contains(&code) => {}
        _ => issues.push(format!("exit_code must be one of {VALID_EXIT_CODES:?}")),
    }

    issues
}

pub struct RefusalAudit;

impl Hook for RefusalAudit {
    fn name(&self) -> &'static str {
        "refusal_audit"
    }

    fn posture(&self) -> HookPosture {
        HookPosture::Advisory
    }

    fn evaluate(&self, ctx: &HookContext<'_>) -> Decision {
        let Some(refusal) = &ctx.payload.refusal_info else {
            return Decision::allow();
        };

        let issues = audit_issues(refusal);
        let context_refusals_found = count_context_markers(&ctx.payload.conversation_context);
        Decision::annotate(serde_json::json!({ "context_refusals_found": context_refusals_found }))
            .with_details(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use warden_intercept::InterceptPayload;
    use warden_policy::PolicyDocument;
    use warden_session::SessionStore;

    #[test]
    fn well_formed_refusal_has_no_issues() {
        let refusal = RefusalInfo {
            refused: true,
            reason: Some("policy_violation".to_string()),
            message: Some("Direct command execution is disabled".to_string()),
            details: vec!["Reason: execution-only mode".to_string()],
            recovery_steps: vec!["Use atlas_gate.exec".to_string()],
            exit_code: Some(2),
        };
        assert!(audit_issues(&refusal).is_empty());
    }

    #[test]
    fn malformed_refusal_reports_four_issues() {
        let refusal = RefusalInfo {
            refused: true,
            reason: Some("policy_violation".to_string()),
            message: Some("Short".to_string()),
            details: Vec::new(),
            recovery_steps: Vec::new(),
            exit_code: Some(0),
        };
        let issues = audit_issues(&refusal);
        assert_eq!(issues.len(), 4);
    }

    #[test]
    fn counts_context_markers_as_corroborating_evidence() {
        let context = "[BLOCKED: path traversal] retried\n[ERROR: escape_attempt] again\n[REFUSAL:policy_violation] stop";
        assert_eq!(count_context_markers(context), 3);
    }

    #[test]
    fn annotation_reports_context_refusals_found() {
        let mut payload = InterceptPayload::default();
        payload.conversation_context = "[BLOCKED: nope]".to_string();
        payload.refusal_info = Some(RefusalInfo {
            refused: true,
            reason: Some("policy_violation".to_string()),
            message: Some("Direct command execution is disabled".to_string()),
            details: vec!["detail".to_string()],
            recovery_steps: vec!["step".to_string()],
            exit_code: Some(2),
        });
        let policy = PolicyDocument::default();
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path(), "s1");
        let ctx = HookContext { payload: &payload, policy: &policy, session: &session };
        let decision = RefusalAudit.evaluate(&ctx);
        assert_eq!(decision.annotations.unwrap()["context_refusals_found"], 1);
    }

    #[test]
    fn never_blocks_even_with_issues() {
        let mut payload = InterceptPayload::default();
        payload.refusal_info = Some(RefusalInfo::default());
        let policy = PolicyDocument::default();
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path(), "s1");
        let ctx = HookContext { payload: &payload, policy: &policy, session: &session };
        let decision = RefusalAudit.evaluate(&ctx);
        assert!(!decision.is_block());
        assert!(!decision.details.is_empty());
    }
}
