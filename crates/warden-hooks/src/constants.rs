//! Constants shared by more than one hook, so the literal strings live
//! in exactly one place (spec §9 "pattern duplication").

use warden_intercept::Decision;
use warden_policy::PolicyDocument;

/// The gateway's MCP tool-name prefix (spec §6 worked scenarios).
pub const MCP_PREFIX: &str = "mcp_atlas-gate-mcp_";

/// Tool names reachable without the MCP prefix once a session is
/// `ACTIVE` (H4, H5).
pub const SESSION_TOOL_WHITELIST: &[&str] = &[
    "begin_session",
    "end_session",
    "list_plans",
    "read_plan",
    "lint_plan",
    "bootstrap_create_foundation_plan",
    "read_prompt",
    "read_file",
    "write_file",
    "read_audit_log",
    "replay_execution",
    "verify_workspace_integrity",
    "generate_attestation_bundle",
    "verify_attestation_bundle",
    "export_attestation_bundle",
];

/// Conversation-context markers (spec §6).
pub const MARKER_SESSION_OK: &str = "ATLAS_SESSION_OK";
pub const MARKER_PROMPT_UNLOCKED: &str = "ATLAS_PROMPT_UNLOCKED";
pub const MARKER_MODE_REPAIR: &str = "[MODE:REPAIR]";
pub const MARKER_MODE_PLAN: &str = "[MODE:PLAN]";
pub const MARKER_MODE_SHIP: &str = "[MODE:SHIP]";
pub const MARKER_MODE_STRICT: &str = "[MODE:STRICT]";

/// Returns the bare tool name with the MCP prefix stripped, if present.
pub fn strip_mcp_prefix(tool_name: &str) -> &str {
    tool_name.strip_prefix(MCP_PREFIX).unwrap_or(tool_name)
}

/// The uniform decision every mandatory hook returns the moment the
/// policy is in `locked` mode (spec §8 universal invariant: category
/// `locked`, exit 2).
pub fn locked_decision() -> Decision {
    Decision::block("locked", "System is in LOCKED mode (panic button activated).")
        .with_detail("All shell execution and capabilities are revoked.")
        .with_detail("Contact administrator to unlock.")
}

/// Short-circuit helper a mandatory hook calls first: `Some(decision)`
/// when the policy is locked, `None` otherwise.
pub fn check_locked(policy: &PolicyDocument) -> Option<Decision> {
    if policy.execution_profile.is_locked() {
        Some(locked_decision())
    } else {
        None
    }
}

const COMMENT_PREFIXES: &[&str] = &["#", "//", "/*", "*", "--"];

/// True if `line` is neither blank, a comment, nor pure punctuation —
/// the "does something" test shared by the logic-preservation (H12)
/// and observability (H18) hooks.
pub fn is_executable_line(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return false;
    }
    if COMMENT_PREFIXES.iter().any(|prefix| trimmed.starts_with(prefix)) {
        return false;
    }
    !trimmed.chars().all(|c| "{}();,".contains(c))
}

/// Count of executable lines in `text` (spec §4.7 H12, H18).
pub fn count_executable_lines(text: &str) -> usize {
    text.lines().filter(|line| is_executable_line(line)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_known_prefix() {
        assert_eq!(strip_mcp_prefix("mcp_atlas-gate-mcp_begin_session"), "begin_session");
    }

    #[test]
    fn leaves_bare_name_untouched() {
        assert_eq!(strip_mcp_prefix("begin_session"), "begin_session");
    }

    #[test]
    fn locked_policy_blocks_with_locked_category() {
        let mut policy = PolicyDocument::default();
        policy.execution_profile = warden_policy::ExecutionProfile::Locked;
        let decision = check_locked(&policy).unwrap();
        assert_eq!(decision.reason.as_deref(), Some("locked: System is in LOCKED mode (panic button activated)."));
    }

    #[test]
    fn standard_policy_is_not_locked() {
        let policy = PolicyDocument::default();
        assert!(check_locked(&policy).is_none());
    }

    #[test]
    fn counts_executable_lines_excluding_comments_and_punctuation() {
        let code = "def f():\n    # a comment\n    x = 1\n    return x\n";
        assert_eq!(count_executable_lines(code), 2);
    }

    #[test]
    fn pure_punctuation_line_is_not_executable() {
        assert!(!is_executable_line("});"));
    }
}
