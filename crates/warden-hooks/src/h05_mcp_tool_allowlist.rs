//! H5 MCP tool allowlist (mandatory, `pre_mcp_tool_use`).

use warden_intercept::Decision;
use warden_kernel::{Hook, HookContext, HookPosture};

use crate::constants::{
    check_locked, strip_mcp_prefix, MARKER_PROMPT_UNLOCKED, MARKER_SESSION_OK, MCP_PREFIX,
    SESSION_TOOL_WHITELIST,
};

pub struct McpToolAllowlist;

impl Hook for McpToolAllowlist {
    fn name(&self) -> &'static str {
        "mcp_tool_allowlist"
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
        let has_prefix = tool_name.starts_with(MCP_PREFIX);
        let known_bare = SESSION_TOOL_WHITELIST.contains(&bare);

        if !has_prefix && !known_bare {
            return Decision::block(
                "tool_allowlist",
                format!("'{tool_name}' is not in allowlist: unrecognized tool name"),
            );
        }

        if !ctx.policy.mcp_tool_allowlist.is_empty()
            && !ctx.policy.mcp_tool_allowlist.contains(tool_name)
        {
            return Decision::block(
                "tool_allowlist",
                format!("'{tool_name}' is not in allowlist"),
            );
        }

        if bare != "begin_session" && !ctx.payload.has_marker(MARKER_SESSION_OK) {
            return Decision::block(
                "session_state",
                format!("conversation is missing {MARKER_SESSION_OK}; begin_session must run first"),
            );
        }

        if bare == "write_file" {
            if !ctx.payload.has_marker(MARKER_PROMPT_UNLOCKED) {
                return Decision::block(
                    "prompt_lock",
                    format!("write_file requires {MARKER_PROMPT_UNLOCKED} in the conversation"),
                );
            }
            let has_plan = ctx
                .payload
                .tool_info
                .plan
                .as_deref()
                .is_some_and(|plan| !plan.is_empty());
            if !has_plan {
                return Decision::block(
                    "missing_plan",
                    "write_file requires a non-empty plan field",
                );
            }
        }

        Decision::allow()
    }
}
