use std::panic::{self, AssertUnwindSafe};

use serde_json::{Map, Value};
use warden_intercept::Decision;

use crate::hook::{Hook, HookContext, HookPosture};

/// Run `hooks` against `ctx` in order, stopping at the first block.
///
/// A hook that panics is contained: the panic never reaches the
/// caller. A mandatory hook's panic becomes a block (category
/// `internal_error`); an advisory hook's panic becomes an allow
/// carrying a warning annotation, and evaluation continues to the next
/// hook (spec §7 kind 3, §9).
///
/// Annotations from every advisory allow/annotate decision are merged
/// into a single object keyed by hook name on the final allow.
pub fn run_hooks(hooks: &[Box<dyn Hook>], ctx: &HookContext<'_>) -> Decision {
    let mut annotations = Map::new();

    for hook in hooks {
        let decision = evaluate_contained(hook.as_ref(), ctx);

        if decision.is_block() {
            return decision;
        }

        if let Some(value) = decision.annotations.clone() {
            annotations.insert(hook.name().to_string(), value);
        }
    }

    if annotations.is_empty() {
        Decision::allow()
    } else {
        Decision::annotate(Value::Object(annotations))
    }
}

fn evaluate_contained(hook: &dyn Hook, ctx: &HookContext<'_>) -> Decision {
    let result = panic::catch_unwind(AssertUnwindSafe(|| hook.evaluate(ctx)));

    match result {
        Ok(decision) => decision,
        Err(_) => {
            tracing::error!(hook = hook.name(), "hook panicked during evaluation");
            match hook.posture() {
                HookPosture::Mandatory => Decision::block(
                    "internal_error",
                    format!("hook '{}' failed internally", hook.name()),
                ),
                HookPosture::Advisory => Decision::allow().with_detail(format!(
                    "advisory hook '{}' failed internally and was skipped",
                    hook.name()
                )),
            }
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

    struct AlwaysAllow;
    impl Hook for AlwaysAllow {
        fn name(&self) -> &'static str {
            "always_allow"
        }
        fn posture(&self) -> HookPosture {
            HookPosture::Advisory
        }
        fn evaluate(&self, _ctx: &HookContext<'_>) -> Decision {
            Decision::allow()
        }
    }

    struct AlwaysBlock;
    impl Hook for AlwaysBlock {
        fn name(&self) -> &'static str {
            "always_block"
        }
        fn posture(&self) -> HookPosture {
            HookPosture::Mandatory
        }
        fn evaluate(&self, _ctx: &HookContext<'_>) -> Decision {
            Decision::block("test_category", "always blocks")
        }
    }

    struct AlwaysPanics {
        posture: HookPosture,
    }
    impl Hook for AlwaysPanics {
        fn name(&self) -> &'static str {
            "always_panics"
        }
        fn posture(&self) -> HookPosture {
            self.posture
        }
        fn evaluate(&self, _ctx: &HookContext<'_>) -> Decision {
            panic!("boom");
        }
    }

    fn context<'a>(payload: &'a InterceptPayload, policy: &'a PolicyDocument, session: &'a SessionStore) -> HookContext<'a> {
        HookContext { payload, policy, session }
    }

    #[test]
    fn empty_hook_list_allows() {
        let payload = InterceptPayload::default();
        let policy = PolicyDocument::default();
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path(), "s1");
        let decision = run_hooks(&[], &context(&payload, &policy, &session));
        assert!(!decision.is_block());
    }

    #[test]
    fn stops_at_first_block() {
        let payload = InterceptPayload::default();
        let policy = PolicyDocument::default();
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path(), "s1");
        let hooks: Vec<Box<dyn Hook>> = vec![Box::new(AlwaysBlock), Box::new(AlwaysAllow)];
        let decision = run_hooks(&hooks, &context(&payload, &policy, &session));
        assert!(decision.is_block());
    }

    #[test]
    fn mandatory_hook_panic_becomes_internal_error_block() {
        let payload = InterceptPayload::default();
        let policy = PolicyDocument::default();
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path(), "s1");
        let hooks: Vec<Box<dyn Hook>> = vec![Box::new(AlwaysPanics { posture: HookPosture::Mandatory })];
        let decision = run_hooks(&hooks, &context(&payload, &policy, &session));
        assert!(decision.is_block());
    }

    #[test]
    fn advisory_hook_panic_is_contained_and_pipeline_continues() {
        let payload = InterceptPayload::default();
        let policy = PolicyDocument::default();
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path(), "s1");
        let hooks: Vec<Box<dyn Hook>> = vec![
            Box::new(AlwaysPanics { posture: HookPosture::Advisory }),
            Box::new(AlwaysAllow),
        ];
        let decision = run_hooks(&hooks, &context(&payload, &policy, &session));
        assert!(!decision.is_block());
    }
}
