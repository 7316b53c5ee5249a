//! H15 Language compliance (mandatory, `pre_write_code`). For every
//! language touched by the edit set, the repo root must carry a
//! recognized test-config file and, unless the language is exempt, a
//! recognized lint-config file.

use std::path::Path;

use warden_intercept::Decision;
use warden_kernel::{Hook, HookContext, HookPosture};
use warden_patterns::langmap::{self, LanguageProfile};

use crate::constants::check_locked;

fn repo_has_any(repo_root: &Path, candidates: &[&str]) -> bool {
    candidates.iter().any(|name| repo_root.join(name).exists())
}

/// Pure check against an arbitrary root, so tests don't depend on the
/// process's current directory.
fn missing_configs(repo_root: &Path, profile: &LanguageProfile) -> Vec<String> {
    let mut missing = Vec::new();
    if !repo_has_any(repo_root, profile.test_config_files) {
        missing.push(format!("{}: no recognized test-config file present", profile.name));
    }
    if !profile.exempt_from_lint_config && !repo_has_any(repo_root, profile.lint_config_files) {
        missing.push(format!("{}: no recognized lint-config file present", profile.name));
    }
    missing
}

pub struct LanguageCompliance;

impl Hook for LanguageCompliance {
    fn name(&self) -> &'static str {
        "language_compliance"
    }

    fn posture(&self) -> HookPosture {
        HookPosture::Mandatory
    }

    fn evaluate(&self, ctx: &HookContext<'_>) -> Decision {
        if let Some(decision) = check_locked(ctx.policy) {
            return decision;
        }

        let Ok(repo_root) = std::env::current_dir() else {
            return Decision::allow();
        };

        let mut seen = Vec::new();
        let mut violations = Vec::new();
        for edit in &ctx.payload.tool_info.edits {
            let Some(profile) = langmap::detect_language(&edit.path) else {
                continue;
            };
            if seen.iter().any(|name: &&str| *name == profile.name) {
                continue;
            }
            seen.push(profile.name);
            violations.extend(missing_configs(&repo_root, profile));
        }

        if violations.is_empty() {
            return Decision::allow();
        }

        let mut decision = Decision::block(
            "language_compliance",
            "touched languages are missing required tooling configuration",
        );
        for violation in violations {
            decision = decision.with_detail(violation);
        }
        decision
    }
}
