//! H9 Filesystem boundary (mandatory, `pre_filesystem_write`).

use warden_intercept::Decision;
use warden_kernel::{Hook, HookContext, HookPosture};
use warden_patterns::paths;

use crate::constants::check_locked;

pub struct FilesystemBoundary;

impl Hook for FilesystemBoundary {
    fn name(&self) -> &'static str {
        "filesystem_boundary"
    }

    fn posture(&self) -> HookPosture {
        HookPosture::Mandatory
    }

    fn evaluate(&self, ctx: &HookContext<'_>) -> Decision {
        if let Some(decision) = check_locked(ctx.policy) {
            return decision;
        }

        if ctx.policy.execution_profile.is_execution_only() {
            return Decision::block(
                "execution_only",
                "direct filesystem writes are disabled; route through the MCP write tool",
            );
        }

        let edits = &ctx.payload.tool_info.edits;

        for edit in edits {
            if paths::escapes_workspace(&edit.path) {
                return Decision::block(
                    "escape_attempt",
                    format!("path '{}' escapes the workspace", edit.path),
                );
            }
            if paths::is_forbidden_root(&edit.path) {
                return Decision::block(
                    "forbidden_path",
                    format!("path '{}' is under a forbidden root", edit.path),
                );
            }
            if paths::has_forbidden_extension(&edit.path) {
                return Decision::block(
                    "forbidden_extension",
                    format!("path '{}' has a forbidden extension", edit.path),
                );
            }
        }

        if edits.len() > paths::MAX_NEW_FILES_PER_TURN {
            return Decision::block(
                "file_explosion",
                format!(
                    "turn would create {} files, exceeding the limit of {}",
                    edits.len(),
                    paths::MAX_NEW_FILES_PER_TURN
                ),
            );
        }

        Decision::allow()
    }
}
