//! H3 Plan resolution (advisory, `pre_user_prompt`).

use std::path::Path;

use serde_json::json;
use warden_intercept::Decision;
use warden_kernel::{Hook, HookContext, HookPosture};

/// Canonical locations searched for a plan file, in order (spec §4.7 H3).
pub const CANONICAL_PLAN_LOCATIONS: &[&str] = &[
    "PLAN.md",
    ".plan/PLAN.md",
    "docs/PLAN.md",
    "docs/architecture/PLAN.md",
    ".github/PLAN.md",
    "README.md",
];

const PLAN_OK_MARKER: &str = "PLAN_OK=true";
const PLAN_SCOPE_PREFIX: &str = "PLAN_SCOPE:";

/// The outcome of resolving a plan file under `repo_root`: whether a
/// recognized plan was found, where, and what scope it declares
/// (filtered to paths that actually exist under `repo_root`).
pub struct PlanResolution {
    pub plan_ok: bool,
    pub plan_path: Option<String>,
    pub declared_scope: Vec<String>,
}

fn parse_scope(contents: &str) -> Vec<String> {
    contents
        .lines()
        .find_map(|line| line.trim().strip_prefix(PLAN_SCOPE_PREFIX))
        .map(|rest| {
            rest.trim()
                .trim_start_matches('[')
                .trim_end_matches(']')
                .split(',')
                .map(|entry| entry.trim().to_string())
                .filter(|entry| !entry.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Search `repo_root` for the first canonical plan location that both
/// exists and contains the recognized `PLAN_OK=true` marker.
pub fn resolve_plan(repo_root: &Path) -> PlanResolution {
    for location in CANONICAL_PLAN_LOCATIONS {
        let path = repo_root.join(location);
        let Ok(contents) = std::fs::read_to_string(&path) else {
            continue;
        };
        if !contents.contains(PLAN_OK_MARKER) {
            continue;
        }
        let declared_scope = parse_scope(&contents)
            .into_iter()
            .filter(|entry| repo_root.join(entry).exists())
            .collect();
        return PlanResolution {
            plan_ok: true,
            plan_path: Some(location.to_string()),
            declared_scope,
        };
    }
    PlanResolution { plan_ok: false, plan_path: None, declared_scope: Vec::new() }
}

pub struct PlanResolutionHook;

impl Hook for PlanResolutionHook {
    fn name(&self) -> &'static str {
        "plan_resolution"
    }

    fn posture(&self) -> HookPosture {
        HookPosture::Advisory
    }

    fn evaluate(&self, _ctx: &HookContext<'_>) -> Decision {
        let repo_root = std::env::current_dir().unwrap_or_else(|_| Path::new(".").to_path_buf());
        let resolution = resolve_plan(&repo_root);
        Decision::annotate(json!({
            "plan_ok": resolution.plan_ok,
            "plan_path": resolution.plan_path,
            "declared_scope": resolution.declared_scope,
        }))
    }
}
