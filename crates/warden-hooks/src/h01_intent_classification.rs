//! H1 Intent classification (advisory, `pre_user_prompt`).

use serde_json::json;
use warden_intercept::Decision;
use warden_kernel::{Hook, HookContext, HookPosture};
use warden_patterns::intent;

pub struct IntentClassification;

impl Hook for IntentClassification {
    fn name(&self) -> &'static str {
        "intent_classification"
    }

    fn posture(&self) -> HookPosture {
        HookPosture::Advisory
    }

    fn evaluate(&self, ctx: &HookContext<'_>) -> Decision {
        let prompt = ctx.payload.tool_info.prompt.as_deref().unwrap_or("");
        let score = intent::classify(prompt);
        Decision::annotate(json!({
            "primary_intent": score.primary_intent.as_str(),
            "confidence": score.confidence,
            "is_high_confidence": score.is_high_confidence,
        }))
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
    fn never_blocks_even_for_empty_prompt() {
        let payload = InterceptPayload::default();
        let policy = PolicyDocument::default();
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path(), "s1");
        let ctx = HookContext { payload: &payload, policy: &policy, session: &session };
        let decision = IntentClassification.evaluate(&ctx);
        assert!(!decision.is_block());
    }

    #[test]
    fn annotates_high_confidence_mutation() {
        let mut payload = InterceptPayload::default();
        payload.tool_info.prompt = Some("please implement the retry logic".to_string());
        let policy = PolicyDocument::default();
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path(), "s1");
        let ctx = HookContext { payload: &payload, policy: &policy, session: &session };
        let decision = IntentClassification.evaluate(&ctx);
        let annotations = decision.annotations.unwrap();
        assert_eq!(annotations["primary_intent"], "mutate");
        assert_eq!(annotations["is_high_confidence"], true);
    }
}
