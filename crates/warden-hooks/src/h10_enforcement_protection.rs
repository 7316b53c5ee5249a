//! H10 Enforcement self-protection (mandatory, `pre_filesystem_write`).
//!
//! Having reached this interception point at all means the write is a
//! direct one, not routed through the MCP write tool — so any edit
//! touching a protected path here is rejected outright.

use warden_intercept::Decision;
use warden_kernel::{Hook, HookContext, HookPosture};
use warden_patterns::paths;

use crate::constants::check_locked;

pub struct EnforcementProtection;

impl Hook for EnforcementProtection {
    fn name(&self) -> &'static str {
        "enforcement_protection"
    }

    fn posture(&self) -> HookPosture {
        HookPosture::Mandatory
    }

    fn evaluate(&self, ctx: &HookContext<'_>) -> Decision {
        if let Some(decision) = check_locked(ctx.policy) {
            return decision;
        }

        for edit in &ctx.payload.tool_info.edits {
            if paths::is_enforcement_protected(&edit.path) {
                return Decision::block(
                    "enforcement_protection",
                    format!(
                        "'{}' is a protected enforcement path; only the MCP write tool may modify it",
                        edit.path
                    ),
                );
            }
        }

        Decision::allow()
    }
}
