use thiserror::Error;

/// Kernel-level failures, distinct from the [`warden_intercept::Decision`]
/// a hook itself produces. These never reach the host directly; the
/// kernel turns them into a decision per the failing hook's posture
/// (spec §7 kind 3, §9 "process-per-hook vs. in-process pipeline").
#[derive(Debug, Error)]
pub enum KernelError {
    #[error("hook '{hook}' panicked during evaluation")]
    HookPanicked { hook: &'static str },

    #[error("session store error: {0}")]
    Session(#[from] warden_session::SessionError),
}
