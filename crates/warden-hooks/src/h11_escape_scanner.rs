//! H11 Escape primitive scanner (mandatory, `pre_write_code` in
//! `execution_only`). A no-op outside that profile.

use warden_intercept::Decision;
use warden_kernel::{Hook, HookContext, HookPosture};
use warden_patterns::escape;

use crate::constants::check_locked;

pub struct EscapeScanner;

impl Hook for EscapeScanner {
    fn name(&self) -> &'static str {
        "escape_scanner"
    }

    fn posture(&self) -> HookPosture {
        HookPosture::Mandatory
    }

    fn evaluate(&self, ctx: &HookContext<'_>) -> Decision {
        if let Some(decision) = check_locked(ctx.policy) {
            return decision;
        }

        if !ctx.policy.execution_profile.is_execution_only() {
            return Decision::allow();
        }

        for edit in &ctx.payload.tool_info.edits {
            let found = escape::matches(&edit.new_string);
            if !found.is_empty() {
                return Decision::block(
                    "escape_primitive",
                    format!(
                        "edit to '{}' contains hard-coded escape primitives: {}",
                        edit.path,
                        found.join(", ")
                    ),
                );
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
    use warden_policy::{ExecutionProfile, PolicyDocument};
    use warden_session::SessionStore;

    fn payload_with_edit(new_string: &str) -> InterceptPayload {
        let mut payload = InterceptPayload::default();
        payload.tool_info.edits = vec![Edit {
            path: "src/main.py".to_string(),
            new_string: new_string.to_string(),
            ..Default::default()
        }];
        payload
    }

    #[test]
    fn inert_outside_execution_only() {
        let payload = payload_with_edit("subprocess.run(['ls'])");
        let policy = PolicyDocument::default();
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path(), "s1");
        let ctx = HookContext { payload: &payload, policy: &policy, session: &session };
        assert!(!EscapeScanner.evaluate(&ctx).is_block());
    }

    #[test]
    fn blocks_escape_primitive_in_execution_only() {
        let payload = payload_with_edit("subprocess.run(['ls'])");
        let mut policy = PolicyDocument::default();
        policy.execution_profile = ExecutionProfile::ExecutionOnly;
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path(), "s1");
        let ctx = HookContext { payload: &payload, policy: &policy, session: &session };
        assert!(EscapeScanner.evaluate(&ctx).is_block());
    }

    #[test]
    fn allows_clean_code_in_execution_only() {
        let payload = payload_with_edit("def add(a, b):\n    return a + b\n");
        let mut policy = PolicyDocument::default();
        policy.execution_profile = ExecutionProfile::ExecutionOnly;
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path(), "s1");
        let ctx = HookContext { payload: &payload, policy: &policy, session: &session };
        assert!(!EscapeScanner.evaluate(&ctx).is_block());
    }
}
