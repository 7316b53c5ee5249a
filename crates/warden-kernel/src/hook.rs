use warden_intercept::{Decision, InterceptPayload};
use warden_policy::PolicyDocument;
use warden_session::SessionStore;

/// Whether a hook's internal failure maps to a block or an allow
/// (spec GLOSSARY: "Mandatory hook"/"Advisory hook").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPosture {
    Mandatory,
    Advisory,
}

/// Everything a hook needs to render a decision for one interception.
pub struct HookContext<'a> {
    pub payload: &'a InterceptPayload,
    pub policy: &'a PolicyDocument,
    pub session: &'a SessionStore,
}

/// A single enforcement decision procedure bound to one or more
/// interception points (spec GLOSSARY: "Hook").
pub trait Hook: Send + Sync {
    /// Stable identifier used in logs and panic-containment messages.
    fn name(&self) -> &'static str;

    fn posture(&self) -> HookPosture;

    fn evaluate(&self, ctx: &HookContext<'_>) -> Decision;
}
