//! H6 Reasoning detector (mandatory, `pre_mcp_tool_use`).
//!
//! Tool arguments are for execution, not narration. A reasoning marker
//! anywhere in the argument tree means the agent tried to explain
//! itself instead of just acting, and is reported via exit code 1
//! rather than the usual mandatory-block exit code 2, since this is
//! treated as the executor rejecting its own call rather than the
//! gateway vetoing it (spec §8 scenario 4: "exit 1, status rejected").

use serde_json::Value;
use warden_intercept::Decision;
use warden_kernel::{Hook, HookContext, HookPosture};
use warden_patterns::reasoning;

use crate::constants::check_locked;

/// Walk every string leaf of a JSON value, in document order.
fn walk_strings<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::String(s) => out.push(s.as_str()),
        Value::Array(items) => items.iter().for_each(|item| walk_strings(item, out)),
        Value::Object(map) => map.values().for_each(|item| walk_strings(item, out)),
        _ => {}
    }
}

pub struct ReasoningDetector;

impl Hook for ReasoningDetector {
    fn name(&self) -> &'static str {
        "reasoning_detector"
    }

    fn posture(&self) -> HookPosture {
        HookPosture::Mandatory
    }

    fn evaluate(&self, ctx: &HookContext<'_>) -> Decision {
        if let Some(decision) = check_locked(ctx.policy) {
            return decision;
        }

        let Some(arguments) = &ctx.payload.tool_info.arguments else {
            return Decision::allow();
        };

        let mut strings = Vec::new();
        walk_strings(arguments, &mut strings);

        let mut found = Vec::new();
        for text in &strings {
            found.extend(reasoning::matches(text));
        }
        found.sort_unstable();
        found.dedup();

        if found.is_empty() {
            Decision::allow()
        } else {
            Decision::block_with_exit_code(
                "reasoning_in_executor",
                format!("tool arguments contain reasoning markers: {}", found.join(", ")),
                1,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;
    use warden_intercept::InterceptPayload;
    use warden_policy::PolicyDocument;
    use warden_session::SessionStore;

    #[test]
    fn blocks_with_exit_one_on_reasoning_marker() {
        let mut payload = InterceptPayload::default();
        payload.tool_info.arguments = Some(json!({"why": "because this is safer"}));
        let policy = PolicyDocument::default();
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path(), "s1");
        let ctx = HookContext { payload: &payload, policy: &policy, session: &session };
        let decision = ReasoningDetector.evaluate(&ctx);
        assert!(decision.is_block());
        assert_eq!(decision.exit_code(), 1);
        assert!(decision.reason.unwrap().contains("because"));
    }

    #[test]
    fn allows_arguments_with_no_reasoning() {
        let mut payload = InterceptPayload::default();
        payload.tool_info.arguments = Some(json!({"path": "src/main.rs"}));
        let policy = PolicyDocument::default();
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path(), "s1");
        let ctx = HookContext { payload: &payload, policy: &policy, session: &session };
        assert!(!ReasoningDetector.evaluate(&ctx).is_block());
    }

    #[test]
    fn scans_nested_argument_structures() {
        let mut payload = InterceptPayload::default();
        payload.tool_info.arguments = Some(json!({"edits": [{"note": "I think this works"}]}));
        let policy = PolicyDocument::default();
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path(), "s1");
        let ctx = HookContext { payload: &payload, policy: &policy, session: &session };
        assert!(ReasoningDetector.evaluate(&ctx).is_block());
    }
}
