//! Filesystem pattern groups shared by the boundary hook (H9), the
//! enforcement self-protection hook (H10), and the advisory
//! suspicious-path warnings folded into them (spec §4.4).

/// Path fragments that merely warrant a warning (codegen noise, not a
/// security boundary).
pub const SUSPICIOUS_PATH_FRAGMENTS: &[&str] = &[
    "node_modules",
    ".git",
    ".env",
    "__pycache__",
    "dist",
    "build",
    ".cache",
    "venv",
];

/// Root prefixes a write must never land under.
pub const FORBIDDEN_ROOTS: &[&str] = &[
    ".ssh",
    ".aws",
    ".env",
    "/etc",
    "/proc",
    "/sys",
    "/root",
    "/var/log",
    "build/",
    "dist/",
    "node_modules/",
];

/// File extensions that are never a legitimate codegen target.
pub const FORBIDDEN_EXTENSIONS: &[&str] = &[
    ".exe", ".dll", ".so", ".bin", ".pyc", ".o", ".a", ".iso", ".dmg", ".jar", ".whl",
];

/// Gateway-internal paths writable only through the MCP write tool
/// (H10). Grounded on the reference's enforcement-protection list,
/// renamed to this gateway's own installation layout.
pub const ENFORCEMENT_PROTECTED_PREFIXES: &[&str] = &[
    "/usr/local/share/warden/",
    "/etc/warden/policy/",
    "/.local/share/warden/",
];

/// Maximum number of newly-created files a single turn's edit set may
/// introduce before H9 rejects it as a file explosion.
pub const MAX_NEW_FILES_PER_TURN: usize = 50;

fn matches_any_prefix(path: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| path.starts_with(prefix))
}

/// True if `path` contains a `..` traversal segment, is absolute, or
/// expands a home-directory shorthand.
pub fn escapes_workspace(path: &str) -> bool {
    path.split('/').any(|segment| segment == "..") || path.starts_with('/') || path.contains('~')
}

/// True if `path` contains one of [`FORBIDDEN_ROOTS`] anywhere along
/// its length — as an absolute prefix (`/etc`, `/root`, ...) or as a
/// nested segment (`.ssh`, `build/`, ...).
pub fn is_forbidden_root(path: &str) -> bool {
    FORBIDDEN_ROOTS.iter().any(|root| path.contains(root))
}

/// True if `path` ends with one of [`FORBIDDEN_EXTENSIONS`].
pub fn has_forbidden_extension(path: &str) -> bool {
    FORBIDDEN_EXTENSIONS
        .iter()
        .any(|extension| path.to_lowercase().ends_with(extension))
}

/// True if `path` is one of the gateway's own enforcement-system
/// files, writable only through the MCP write tool.
pub fn is_enforcement_protected(path: &str) -> bool {
    matches_any_prefix(path, ENFORCEMENT_PROTECTED_PREFIXES)
}

/// True if `path` contains a fragment that merely warrants a warning.
pub fn is_suspicious(path: &str) -> bool {
    let lowered = path.to_lowercase();
    SUSPICIOUS_PATH_FRAGMENTS
        .iter()
        .any(|fragment| lowered.contains(fragment))
}
