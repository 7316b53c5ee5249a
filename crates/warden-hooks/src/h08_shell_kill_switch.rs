//! H8 Shell kill switch (mandatory, `pre_run_command`).

use warden_intercept::Decision;
use warden_kernel::{Hook, HookContext, HookPosture};

use crate::constants::check_locked;

pub struct ShellKillSwitch;

impl Hook for ShellKillSwitch {
    fn name(&self) -> &'static str {
        "shell_kill_switch"
    }

    fn posture(&self) -> HookPosture {
        HookPosture::Mandatory
    }

    fn evaluate(&self, ctx: &HookContext<'_>) -> Decision {
        if let Some(decision) = check_locked(ctx.policy) {
            return decision;
        }

        let command = ctx.payload.tool_info.command.as_deref().unwrap_or("");

        if ctx.policy.execution_profile.is_execution_only() {
            return Decision::block("Direct command execution is disabled.", "")
                .with_detail("Reason: Execution-only mode (ATLAS-GATE enforced)")
                .with_detail(format!("Command requested: {command}"))
                .with_detail("Solution: Use atlas_gate.exec to request execution");
        }

        for pattern in ctx.policy.block_commands_regex.iter() {
            if let Ok(regex) = regex::Regex::new(pattern) {
                if regex.is_match(command) {
                    return Decision::block(
                        "command_blocked",
                        "command matches a prohibited pattern",
                    )
                    .with_detail(format!("Pattern: {pattern}"))
                    .with_detail(format!("Command: {command}"));
                }
            }
        }

        Decision::allow()
    }
}
