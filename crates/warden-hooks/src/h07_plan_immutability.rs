//! H7 Plan immutability (mandatory, `pre_mcp_tool_use` when mutating).
//!
//! The wire payload carries no explicit `init`/`verify` action field, so
//! this hook infers it from [`warden_session::SessionStore::set_plan_hash`]'s
//! write-once semantics: a turn that supplies `tool_info.plan` either
//! binds the session's first hash (`Stored`), reconfirms an unchanged
//! one (`Unchanged`), or collides with a prior one (`Overwritten`) —
//! only the last case is a rejection.

use serde_json::Value;
use warden_intercept::Decision;
use warden_kernel::{Hook, HookContext, HookPosture};
use warden_session::{compute_plan_hash, PlanHashOutcome};

use crate::constants::check_locked;

pub struct PlanImmutability;

impl Hook for PlanImmutability {
    fn name(&self) -> &'static str {
        "plan_immutability"
    }

    fn posture(&self) -> HookPosture {
        HookPosture::Mandatory
    }

    fn evaluate(&self, ctx: &HookContext<'_>) -> Decision {
        if let Some(decision) = check_locked(ctx.policy) {
            return decision;
        }

        let Some(plan) = ctx.payload.tool_info.plan.as_deref() else {
            return Decision::allow();
        };
        if plan.is_empty() {
            return Decision::allow();
        }

        let plan_value: Value =
            serde_json::from_str(plan).unwrap_or_else(|_| Value::String(plan.to_string()));
        let hash = compute_plan_hash(&plan_value);

        match ctx.session.set_plan_hash(&hash) {
            Ok(PlanHashOutcome::Stored) | Ok(PlanHashOutcome::Unchanged) => Decision::allow(),
            Ok(PlanHashOutcome::Overwritten { previous }) => {
                Decision::block("plan_immutability", "Plan has been modified since execution started")
                    .with_detail(format!("expected_hash={previous}"))
                    .with_detail(format!("current_hash={hash}"))
            }
            Err(err) => Decision::block("internal_error", err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use warden_intercept::InterceptPayload;
    use warden_policy::PolicyDocument;
    use warden_session::SessionStore;

    fn payload_with_plan(plan: &str) -> InterceptPayload {
        let mut payload = InterceptPayload::default();
        payload.tool_info.plan = Some(plan.to_string());
        payload
    }

    #[test]
    fn first_plan_is_stored_without_blocking() {
        let payload = payload_with_plan(r#"{"steps": [1]}"#);
        let policy = PolicyDocument::default();
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path(), "s1");
        let ctx = HookContext { payload: &payload, policy: &policy, session: &session };
        assert!(!PlanImmutability.evaluate(&ctx).is_block());
    }

    #[test]
    fn changed_plan_is_rejected_with_both_hashes() {
        let policy = PolicyDocument::default();
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path(), "s1");

        let init_payload = payload_with_plan(r#"{"steps": [1]}"#);
        let init_ctx = HookContext { payload: &init_payload, policy: &policy, session: &session };
        assert!(!PlanImmutability.evaluate(&init_ctx).is_block());

        let verify_payload = payload_with_plan(r#"{"steps": [2]}"#);
        let verify_ctx = HookContext { payload: &verify_payload, policy: &policy, session: &session };
        let decision = PlanImmutability.evaluate(&verify_ctx);
        assert!(decision.is_block());
        assert!(decision
            .reason
            .unwrap()
            .contains("Plan has been modified since execution started"));
        assert!(decision.details.iter().any(|d| d.starts_with("expected_hash=")));
        assert!(decision.details.iter().any(|d| d.starts_with("current_hash=")));
    }

    #[test]
    fn verify_is_idempotent_on_unchanged_plan() {
        let policy = PolicyDocument::default();
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path(), "s1");
        let payload = payload_with_plan(r#"{"steps": [1]}"#);
        let ctx = HookContext { payload: &payload, policy: &policy, session: &session };
        assert!(!PlanImmutability.evaluate(&ctx).is_block());
        assert!(!PlanImmutability.evaluate(&ctx).is_block());
    }

    #[test]
    fn absent_plan_is_a_no_op() {
        let payload = InterceptPayload::default();
        let policy = PolicyDocument::default();
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path(), "s1");
        let ctx = HookContext { payload: &payload, policy: &policy, session: &session };
        assert!(!PlanImmutability.evaluate(&ctx).is_block());
    }
}
