use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::profile::ExecutionProfile;
use crate::{DEPLOYED_POLICY_PATH, REPO_LOCAL_POLICY_PATH};

/// Opaque acknowledgement tokens the user must paste into a prompt to
/// unlock the audit/ship gates (H2). Absence of a key means that gate
/// is not configured for this policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokens {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_ok: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_ok: Option<String>,
}

/// The policy document: process-wide, reloaded per invocation,
/// immutable during an invocation. See spec §3 "Policy document".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyDocument {
    #[serde(default)]
    pub execution_profile: ExecutionProfile,

    #[serde(default)]
    pub mcp_tool_allowlist: HashSet<String>,

    #[serde(default)]
    pub block_commands_regex: Vec<String>,

    #[serde(default)]
    pub prohibited_patterns: HashMap<String, Vec<String>>,

    #[serde(default)]
    pub tokens: Tokens,
}

impl PolicyDocument {
    /// Resolve the policy document path: the deployed location if it
    /// exists, otherwise the repo-local fallback (relative to the
    /// current working directory), unless `override_path` names an
    /// explicit path to use instead (used by tests and by
    /// `--policy-path`).
    pub fn resolve_path(override_path: Option<&Path>) -> PathBuf {
        if let Some(path) = override_path {
            return path.to_path_buf();
        }
        let deployed = PathBuf::from(DEPLOYED_POLICY_PATH);
        if deployed.exists() {
            deployed
        } else {
            PathBuf::from(REPO_LOCAL_POLICY_PATH)
        }
    }

    /// Load the policy document, trying the deployed path first with a
    /// repo-local fallback (or an explicit override). Missing or
    /// malformed content yields an empty (all-default) policy and a
    /// logged warning rather than a hard error: enforcement hooks that
    /// require a specific key are responsible for blocking their own
    /// turn when that key is absent (spec §4.1, §9).
    pub fn load(override_path: Option<&Path>) -> Self {
        let path = Self::resolve_path(override_path);
        Self::load_from_path(&path)
    }

    /// Load from an exact path, applying the same permissive-parse
    /// rules as [`PolicyDocument::load`].
    pub fn load_from_path(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "policy document not readable, using empty policy");
                return Self::default();
            }
        };

        if text.trim().is_empty() {
            return Self::default();
        }

        match serde_json::from_str(&text) {
            Ok(policy) => policy,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "policy document malformed, using empty policy");
                Self::default()
            }
        }
    }

    /// Compile `block_commands_regex` into a list of `Regex`. Invalid
    /// patterns are logged and dropped rather than failing the whole
    /// policy, matching the fail-closed-on-use-not-on-load posture of
    /// §4.1 (a hook that cannot compile its own patterns treats that
    /// as an internal error per its declared posture; the policy
    /// document itself never panics on malformed patterns).
    pub fn compiled_block_commands(&self) -> Vec<regex::Regex> {
        self.block_commands_regex
            .iter()
            .filter_map(|pattern| match regex::Regex::new(pattern) {
                Ok(re) => Some(re),
                Err(err) => {
                    tracing::warn!(pattern = %pattern, error = %err, "invalid block_commands_regex pattern, skipping");
                    None
                }
            })
            .collect()
    }

    /// Prohibited patterns for a given category (e.g.
    /// `command_execution_patterns`, `code_execution_bypass`,
    /// `tool_bypass_patterns`, `network_command_execution`, `mocks`,
    /// `placeholders`). Returns an empty slice if the category is
    /// absent.
    pub fn prohibited_category(&self, category: &str) -> &[String] {
        self.prohibited_patterns
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
