//! H2 Prompt gate & token enforcement (mandatory, `pre_user_prompt`).

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;
use warden_intercept::Decision;
use warden_kernel::{Hook, HookContext, HookPosture};
use warden_patterns::intent;

use crate::constants::check_locked;

static PLAN_HASH_REF: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[0-9a-f]{64}\b").unwrap());
static PLAN_ALIAS_EQ: Lazy<Regex> = Lazy::new(|| Regex::new(r"plan=(\S+)").unwrap());
static PLAN_ALIAS_COLON: Lazy<Regex> = Lazy::new(|| Regex::new(r"plan:\s*(\S+)").unwrap());
static PLAN_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(/docs/plans/[\w\-]+\.md)").unwrap());

/// First recognized plan reference in `prompt`, in priority order:
/// full hash, `plan=<alias>`, `plan: <alias>`, `/docs/plans/<name>.md`.
fn extract_plan_reference(prompt: &str) -> Option<String> {
    if let Some(m) = PLAN_HASH_REF.find(prompt) {
        return Some(m.as_str().to_string());
    }
    if let Some(c) = PLAN_ALIAS_EQ.captures(prompt) {
        return Some(c[1].to_string());
    }
    if let Some(c) = PLAN_ALIAS_COLON.captures(prompt) {
        return Some(c[1].to_string());
    }
    if let Some(c) = PLAN_PATH.captures(prompt) {
        return Some(c[1].to_string());
    }
    None
}

pub struct PromptGate;

impl Hook for PromptGate {
    fn name(&self) -> &'static str {
        "prompt_gate"
    }

    fn posture(&self) -> HookPosture {
        HookPosture::Mandatory
    }

    fn evaluate(&self, ctx: &HookContext<'_>) -> Decision {
        if let Some(decision) = check_locked(ctx.policy) {
            return decision;
        }

        let prompt = ctx.payload.tool_info.prompt.as_deref().unwrap_or("");
        let mutating = intent::expresses_mutation_intent(prompt);
        let tokens = &ctx.policy.tokens;

        if mutating {
            if let Some(audit_ok) = &tokens.audit_ok {
                if !prompt.contains(audit_ok.as_str()) {
                    return Decision::block(
                        "missing_audit_token",
                        "mutating prompts require the configured audit_ok acknowledgement token",
                    );
                }
            }
            if prompt.to_lowercase().contains("proceed") {
                if let Some(ship_ok) = &tokens.ship_ok {
                    if !prompt.contains(ship_ok.as_str()) {
                        return Decision::block(
                            "missing_ship_token",
                            "prompts requesting to proceed require the configured ship_ok acknowledgement token",
                        );
                    }
                }
            }
        }

        match extract_plan_reference(prompt) {
            Some(reference) => Decision::annotate(json!({
                "marker": format!("ATLAS_PLAN_REQUESTED={reference}"),
            })),
            None if mutating => Decision::annotate(json!({
                "marker": "ATLAS_MUTATION_NO_PLAN",
            })),
            None => Decision::allow(),
        }
    }
}
