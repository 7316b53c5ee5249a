// build.rs — embed git and build metadata into the warden-hook binary.
//
// Sets these env vars at compile time:
//   WARDEN_GIT_HASH   — short git commit hash (e.g., "abc1234"), or "unknown"
//   WARDEN_BUILD_DATE — build date in YYYY-MM-DD format

use std::process::Command;

fn main() {
    let git_hash = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let dirty = Command::new("git")
        .args(["status", "--porcelain"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| !o.stdout.is_empty())
        .unwrap_or(false);

    let hash_suffix = if dirty { format!("{git_hash}-dirty") } else { git_hash };

    let build_date = Command::new("date")
        .args(["+%Y-%m-%d"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=WARDEN_GIT_HASH={hash_suffix}");
    println!("cargo:rustc-env=WARDEN_BUILD_DATE={build_date}");

    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/refs/");
}
