//! H12 Code policy (mandatory, `pre_write_code`).

use warden_intercept::Decision;
use warden_kernel::{Hook, HookContext, HookPosture};
use warden_patterns::{incompleteness, mocks};

use crate::constants::{check_locked, count_executable_lines, MARKER_MODE_REPAIR};

/// Paths this hook never scans: test/spec/mock files and plain config
/// or doc formats, which legitimately reference the patterns below.
fn is_exempt_path(path: &str) -> bool {
    let lowered = path.to_lowercase();
    if ["test", "spec", "mock"].iter().any(|fragment| lowered.contains(fragment)) {
        return true;
    }
    [".json", ".md", ".yaml", ".yml", ".toml"]
        .iter()
        .any(|extension| lowered.ends_with(extension))
}

/// Human-facing category label and remedy for the four prohibited-
/// pattern groups named in the original execution blocker. Any other
/// `prohibited_patterns` key falls back to a generic label.
fn category_label_and_remedy(category: &str) -> (&str, &str) {
    match category {
        "command_execution_patterns" => (
            "Command execution pattern",
            "Use atlas_gate.write or atlas_gate.exec tools only",
        ),
        "code_execution_bypass" => ("Code execution bypass", "Dynamic code execution forbidden"),
        "tool_bypass_patterns" => (
            "Tool bypass attempt",
            "All operations must use atlas-gate tools",
        ),
        "network_command_execution" => (
            "Network command execution",
            "Use atlas_gate.exec for authorized operations",
        ),
        other => (other, "forbidden by policy"),
    }
}

fn line_number_at(text: &str, byte_offset: usize) -> usize {
    text[..byte_offset].matches('\n').count() + 1
}

pub struct CodePolicy;

impl Hook for CodePolicy {
    fn name(&self) -> &'static str {
        "code_policy"
    }

    fn posture(&self) -> HookPosture {
        HookPosture::Mandatory
    }

    fn evaluate(&self, ctx: &HookContext<'_>) -> Decision {
        if let Some(decision) = check_locked(ctx.policy) {
            return decision;
        }

        let in_repair_mode = ctx.payload.has_marker(MARKER_MODE_REPAIR);

        for edit in &ctx.payload.tool_info.edits {
            if is_exempt_path(&edit.path) {
                continue;
            }

            for (category, patterns) in ctx.policy.prohibited_patterns.iter() {
                let (label, remedy) = category_label_and_remedy(category);
                for pattern in patterns {
                    if let Ok(regex) = regex::Regex::new(pattern) {
                        if let Some(found) = regex.find(&edit.new_string) {
                            let line = line_number_at(&edit.new_string, found.start());
                            return Decision::block(
                                "policy_violation",
                                format!(
                                    "HARD FAIL: {label} '{pattern}' in {}:{line} ({remedy})",
                                    edit.path
                                ),
                            );
                        }
                    }
                }
            }

            if in_repair_mode && mocks::contains_mock(&edit.new_string) {
                return Decision::block(
                    "mock_usage",
                    format!(
                        "{MARKER_MODE_REPAIR} forbids mock usage in edit to '{}': {}",
                        edit.path,
                        mocks::matches(&edit.new_string).join(", ")
                    ),
                );
            }

            if !edit.old_string.trim().is_empty() && !edit.new_string.trim().is_empty() {
                let old_exec = count_executable_lines(&edit.old_string);
                let new_exec = count_executable_lines(&edit.new_string);
                if new_exec < old_exec {
                    let mut decision = Decision::block(
                        "logic_reduction",
                        format!(
                            "edit to '{}' reduces executable lines from {old_exec} to {new_exec}",
                            edit.path
                        ),
                    );
                    for (line, kind) in incompleteness::scan(&edit.new_string) {
                        decision = decision
                            .with_detail(format!("completeness: {} on line {line}", kind.as_str().replace('_', " ")));
                    }
                    return decision;
                }
            }
        }

        Decision::allow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;
    use warden_intercept::{Edit, InterceptPayload};
    use warden_policy::PolicyDocument;
    use warden_session::SessionStore;

    fn payload_with_edit(old: &str, new: &str) -> InterceptPayload {
        let mut payload = InterceptPayload::default();
        payload.tool_info.edits = vec![Edit {
            path: "foo.py".to_string(),
            old_string: old.to_string(),
            new_string: new.to_string(),
        }];
        payload
    }

    #[test]
    fn blocks_prohibited_pattern() {
        let payload = payload_with_edit("", "api_key = 'sk-123'");
        let mut policy = PolicyDocument::default();
        let mut prohibited = HashMap::new();
        prohibited.insert("secrets".to_string(), vec![r"api_key\s*=".to_string()]);
        policy.prohibited_patterns = prohibited;
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path(), "s1");
        let ctx = HookContext { payload: &payload, policy: &policy, session: &session };
        assert!(CodePolicy.evaluate(&ctx).is_block());
    }

    #[test]
    fn reports_hard_fail_wording_for_known_category() {
        let payload = payload_with_edit("", "subprocess.run(['sh', '-c', cmd])");
        let mut policy = PolicyDocument::default();
        let mut prohibited = HashMap::new();
        prohibited.insert(
            "command_execution_patterns".to_string(),
            vec![r"subprocess\.run".to_string()],
        );
        policy.prohibited_patterns = prohibited;
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path(), "s1");
        let ctx = HookContext { payload: &payload, policy: &policy, session: &session };
        let decision = CodePolicy.evaluate(&ctx);
        assert!(decision.is_block());
        let reason = decision.reason.unwrap();
        assert!(reason.contains("HARD FAIL: Command execution pattern"));
        assert!(reason.contains("foo.py:1"));
    }

    #[test]
    fn exempt_path_skips_prohibited_pattern_scan() {
        let mut payload = payload_with_edit("", "subprocess.run(['sh'])");
        payload.tool_info.edits[0].path = "tests/test_runner.py".to_string();
        let mut policy = PolicyDocument::default();
        let mut prohibited = HashMap::new();
        prohibited.insert(
            "command_execution_patterns".to_string(),
            vec![r"subprocess\.run".to_string()],
        );
        policy.prohibited_patterns = prohibited;
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path(), "s1");
        let ctx = HookContext { payload: &payload, policy: &policy, session: &session };
        assert!(!CodePolicy.evaluate(&ctx).is_block());
    }

    #[test]
    fn logic_reduction_to_zero_blocks_with_completeness_detail() {
        let payload = payload_with_edit(
            "def f():\n    return compute()\n",
            "def f():\n    # TODO\n    pass\n",
        );
        let policy = PolicyDocument::default();
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path(), "s1");
        let ctx = HookContext { payload: &payload, policy: &policy, session: &session };
        let decision = CodePolicy.evaluate(&ctx);
        assert!(decision.is_block());
        assert!(decision.reason.unwrap().starts_with("logic_reduction"));
        assert!(decision.details.iter().any(|d| d.contains("completeness")));
    }

    #[test]
    fn repair_mode_forbids_mocks() {
        let mut payload = payload_with_edit("", "from unittest.mock import MagicMock");
        payload.conversation_context = MARKER_MODE_REPAIR.to_string();
        let policy = PolicyDocument::default();
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path(), "s1");
        let ctx = HookContext { payload: &payload, policy: &policy, session: &session };
        assert!(CodePolicy.evaluate(&ctx).is_block());
    }

    #[test]
    fn clean_edit_with_growing_logic_is_allowed() {
        let payload = payload_with_edit(
            "def f():\n    return 1\n",
            "def f():\n    x = compute()\n    return x\n",
        );
        let policy = PolicyDocument::default();
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path(), "s1");
        let ctx = HookContext { payload: &payload, policy: &policy, session: &session };
        assert!(!CodePolicy.evaluate(&ctx).is_block());
    }
}
