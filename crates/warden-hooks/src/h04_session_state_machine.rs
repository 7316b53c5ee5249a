//! H4 Session state machine (mandatory, `pre_mcp_tool_use`).

use warden_intercept::Decision;
use warden_kernel::{Hook, HookContext, HookPosture};
use warden_session::Lifecycle;

use crate::constants::{check_locked, strip_mcp_prefix, SESSION_TOOL_WHITELIST};

pub struct SessionStateMachine;

impl Hook for SessionStateMachine {
    fn name(&self) -> &'static str {
        "session_state_machine"
    }

    fn posture(&self) -> HookPosture {
        HookPosture::Mandatory
    }

    fn evaluate(&self, ctx: &HookContext<'_>) -> Decision {
        if let Some(decision) = check_locked(ctx.policy) {
            return decision;
        }

        let tool_name = ctx.payload.tool_info.tool_name.as_deref().unwrap_or("");
        let bare = strip_mcp_prefix(tool_name);

        match ctx.session.get_state() {
            Lifecycle::Init => {
                if bare == "begin_session" {
                    if let Err(err) = ctx.session.set_state(Lifecycle::Active) {
                        return Decision::block("internal_error", err.to_string());
                    }
                    Decision::allow()
                } else {
                    Decision::block(
                        "session_state",
                        format!("session not initialized: '{tool_name}' requires begin_session first"),
                    )
                }
            }
            Lifecycle::Active => {
                if bare == "end_session" {
                    if let Err(err) = ctx.session.set_state(Lifecycle::Closed) {
                        return Decision::block("internal_error", err.to_string());
                    }
                    Decision::allow()
                } else if SESSION_TOOL_WHITELIST.contains(&bare) {
                    Decision::allow()
                } else {
                    Decision::block(
                        "session_state",
                        format!("'{tool_name}' is not permitted in an active session"),
                    )
                }
            }
            Lifecycle::Closed => Decision::block(
                "session_state",
                format!("session is closed; '{tool_name}' rejected"),
            ),
        }
    }
}
