//! H13 Completeness (mandatory, `pre_write_code`). Test and mock files
//! are exempt — they are expected to reference the very constructs
//! this hook would otherwise flag.

use warden_intercept::Decision;
use warden_kernel::{Hook, HookContext, HookPosture};
use warden_patterns::incompleteness::{self, IncompletenessKind};

use crate::constants::check_locked;

fn is_exempt_path(path: &str) -> bool {
    let lowered = path.to_lowercase();
    ["test", "mock", "stub", "fake"]
        .iter()
        .any(|fragment| lowered.contains(fragment))
}

/// Scenario wording (spec §8 scenario 5) names a bare `pass` as the
/// sole body of a function a "stub function", distinct from `pass`
/// used incidentally elsewhere.
fn detail_label(kind: IncompletenessKind) -> &'static str {
    match kind {
        IncompletenessKind::BarePass => "stub_function",
        other => other.as_str(),
    }
}

pub struct Completeness;

impl Hook for Completeness {
    fn name(&self) -> &'static str {
        "completeness"
    }

    fn posture(&self) -> HookPosture {
        HookPosture::Mandatory
    }

    fn evaluate(&self, ctx: &HookContext<'_>) -> Decision {
        if let Some(decision) = check_locked(ctx.policy) {
            return decision;
        }

        for edit in &ctx.payload.tool_info.edits {
            if is_exempt_path(&edit.path) {
                continue;
            }
            let findings = incompleteness::scan(&edit.new_string);
            if !findings.is_empty() {
                let mut decision = Decision::block(
                    "completeness",
                    format!("edit to '{}' contains incomplete constructs", edit.path),
                );
                for (line, kind) in findings {
                    decision = decision.with_detail(format!("{} on line {line}", detail_label(kind)));
                }
                return decision;
            }
        }

        Decision::allow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use warden_intercept::{Edit, InterceptPayload};
    use warden_policy::PolicyDocument;
    use warden_session::SessionStore;

    fn payload_with_new(path: &str, new_string: &str) -> InterceptPayload {
        let mut payload = InterceptPayload::default();
        payload.tool_info.edits = vec![Edit {
            path: path.to_string(),
            old_string: String::new(),
            new_string: new_string.to_string(),
        }];
        payload
    }

    #[test]
    fn blocks_stub_function_body() {
        let payload = payload_with_new("foo.py", "def f():\n    pass\n");
        let policy = PolicyDocument::default();
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path(), "s1");
        let ctx = HookContext { payload: &payload, policy: &policy, session: &session };
        let decision = Completeness.evaluate(&ctx);
        assert!(decision.is_block());
        assert!(decision.details.iter().any(|d| d.contains("stub_function on line 2")));
    }

    #[test]
    fn exempts_test_files() {
        let payload = payload_with_new("test_foo.py", "def test_f():\n    pass\n");
        let policy = PolicyDocument::default();
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path(), "s1");
        let ctx = HookContext { payload: &payload, policy: &policy, session: &session };
        assert!(!Completeness.evaluate(&ctx).is_block());
    }

    #[test]
    fn allows_complete_code() {
        let payload = payload_with_new("foo.py", "def f():\n    return 1\n");
        let policy = PolicyDocument::default();
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path(), "s1");
        let ctx = HookContext { payload: &payload, policy: &policy, session: &session };
        assert!(!Completeness.evaluate(&ctx).is_block());
    }
}
