//! H16 Test presence (mandatory, `post_write`). Every modified
//! non-test source file must have a corresponding test file that is
//! substantive, exercises a recognized test construct, and contains
//! no mock usage or placeholder markers.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use warden_intercept::{Decision, InterceptPayload};
use warden_kernel::{Hook, HookContext, HookPosture};
use warden_patterns::{langmap, mocks};

use crate::constants::check_locked;

const MIN_TEST_BODY_CHARS: usize = 50;

static PLACEHOLDER_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(TODO|pass|assert False|skip)\b").unwrap());

fn is_test_path(path: &str) -> bool {
    let lowered = path.to_lowercase();
    lowered.contains("test") || lowered.contains("spec")
}

fn expected_test_path(source_path: &str, profile: &langmap::LanguageProfile) -> Option<String> {
    let path = Path::new(source_path);
    let stem = path.file_stem()?.to_str()?;
    let name = profile.test_name_template.replace("{name}", stem).replace(
        "{Name}",
        &format!("{}{}", stem.get(0..1)?.to_uppercase(), stem.get(1..).unwrap_or("")),
    );
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    Some(match parent {
        Some(parent) => parent.join(&name).to_string_lossy().into_owned(),
        None => name,
    })
}

fn has_placeholder_marker(body: &str) -> bool {
    PLACEHOLDER_MARKER.is_match(body)
}

fn non_whitespace_char_count(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

/// Pure check against an arbitrary root, so tests don't depend on the
/// process's current directory.
fn check_against_root(repo_root: &Path, payload: &InterceptPayload) -> Decision {
    for edit in &payload.tool_info.edits {
        if is_test_path(&edit.path) {
            continue;
        }
        let Some(profile) = langmap::detect_language(&edit.path) else {
            continue;
        };
        let Some(expected) = expected_test_path(&edit.path, profile) else {
            continue;
        };

        let test_file = repo_root.join(&expected);
        let Ok(contents) = std::fs::read_to_string(&test_file) else {
            return Decision::block(
                "missing_test",
                format!("'{}' has no corresponding test file at '{expected}'", edit.path),
            );
        };

        if non_whitespace_char_count(&contents) < MIN_TEST_BODY_CHARS {
            return Decision::block(
                "missing_test",
                format!("test file '{expected}' for '{}' is not substantive", edit.path),
            );
        }
        if !langmap::test_construct_regex(profile).is_match(&contents) {
            return Decision::block(
                "missing_test",
                format!("test file '{expected}' contains no recognized test construct"),
            );
        }
        if mocks::contains_mock(&contents) {
            return Decision::block(
                "missing_test",
                format!("test file '{expected}' relies on mocks: {}", mocks::matches(&contents).join(", ")),
            );
        }
        if has_placeholder_marker(&contents) {
            return Decision::block(
                "missing_test",
                format!("test file '{expected}' contains a placeholder marker"),
            );
        }
    }

    Decision::allow()
}

pub struct TestPresence;

impl Hook for TestPresence {
    fn name(&self) -> &'static str {
        "test_presence"
    }

    fn posture(&self) -> HookPosture {
        HookPosture::Mandatory
    }

    fn evaluate(&self, ctx: &HookContext<'_>) -> Decision {
        if let Some(decision) = check_locked(ctx.policy) {
            return decision;
        }

        for edit in &ctx.payload.tool_info.edits {
            let _ = ctx.session.append_audit("edits", &edit.path);
        }

        let Ok(repo_root) = std::env::current_dir() else {
            return Decision::allow();
        };
        check_against_root(&repo_root, ctx.payload)
    }
}
