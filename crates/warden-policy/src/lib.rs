//! # warden-policy
//!
//! Policy document loading for the warden gateway.
//!
//! The policy document is the process-wide, read-only-during-a-turn
//! configuration every hook consults: the execution profile, the MCP
//! tool allowlist, the shell command blocklist, the prohibited-pattern
//! categories, and the audit/ship acknowledgement tokens. It is
//! reloaded fresh on every hook invocation (each invocation is its own
//! process) and parsed permissively: a missing or malformed file
//! yields an empty policy plus a logged warning rather than a hard
//! failure — enforcement hooks that require a specific key are
//! responsible for blocking their own turn when that key is absent.
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use warden_policy::PolicyDocument;
//!
//! let policy = PolicyDocument::load(None);
//! if policy.execution_profile.is_locked() {
//!     // every mutating interception point blocks unconditionally
//! }
//! ```

pub mod document;
pub mod profile;

pub use document::{PolicyDocument, Tokens};
pub use profile::ExecutionProfile;

/// Primary deployed location for the policy document.
pub const DEPLOYED_POLICY_PATH: &str = "/etc/windsurf/policy/policy.json";

/// Repo-local fallback location, relative to the current working directory.
pub const REPO_LOCAL_POLICY_PATH: &str = "windsurf/policy/policy.json";
