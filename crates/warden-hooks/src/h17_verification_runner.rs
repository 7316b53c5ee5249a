//! H17 Verification runner (mandatory, `post_write`). Runs a
//! well-known verification script if one is present in the repo root;
//! a non-zero exit or a 60-second timeout blocks, an absent script is
//! a warn-and-allow.

use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use warden_intercept::Decision;
use warden_kernel::{Hook, HookContext, HookPosture};

use crate::constants::check_locked;

const VERIFICATION_SCRIPTS: &[&str] = &["verify.sh", "scripts/verify.sh", "Makefile"];
const TIMEOUT: Duration = Duration::from_secs(60);
const POLL_INTERVAL: Duration = Duration::from_millis(200);

fn find_script(repo_root: &Path) -> Option<std::path::PathBuf> {
    VERIFICATION_SCRIPTS
        .iter()
        .map(|name| repo_root.join(name))
        .find(|path| path.exists())
}

enum RunOutcome {
    Success,
    Failed(i32),
    TimedOut,
}

fn run_script(script: &Path) -> std::io::Result<RunOutcome> {
    let mut child = if script.file_name().and_then(|n| n.to_str()) == Some("Makefile") {
        Command::new("make")
            .arg("-f")
            .arg(script)
            .arg("verify")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?
    } else {
        Command::new("sh").arg(script).stdout(Stdio::null()).stderr(Stdio::null()).spawn()?
    };

    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(match status.code() {
                Some(0) => RunOutcome::Success,
                Some(code) => RunOutcome::Failed(code),
                None => RunOutcome::Failed(1),
            });
        }
        if started.elapsed() > TIMEOUT {
            let _ = child.kill();
            return Ok(RunOutcome::TimedOut);
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

pub struct VerificationRunner;

impl Hook for VerificationRunner {
    fn name(&self) -> &'static str {
        "verification_runner"
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
        let Some(script) = find_script(&repo_root) else {
            return Decision::allow().with_detail("no verification script found; skipping");
        };

        match run_script(&script) {
            Ok(RunOutcome::Success) => Decision::allow(),
            Ok(RunOutcome::Failed(code)) => Decision::block(
                "verification_failed",
                format!("verification script '{}' exited with code {code}", script.display()),
            ),
            Ok(RunOutcome::TimedOut) => Decision::block(
                "verification_timeout",
                format!("verification script '{}' exceeded {}s", script.display(), TIMEOUT.as_secs()),
            ),
            Err(err) => Decision::block(
                "verification_failed",
                format!("failed to run verification script '{}': {err}", script.display()),
            ),
        }
    }
}
