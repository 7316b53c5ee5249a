//! # warden-hook
//!
//! CLI entrypoint the host invokes once per interception point. Reads
//! an [`InterceptPayload`] from stdin, loads the policy document and
//! the session's persistent state, runs the dispatch table's hook
//! list for the named interception point, and renders the resulting
//! [`Decision`] to stdout/stderr/exit-code per the decision contract
//! (spec §6).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use warden_intercept::{Decision, InterceptPayload};
use warden_kernel::{run_hooks, HookContext, InterceptionPoint};
use warden_policy::PolicyDocument;
use warden_session::SessionStore;

/// Policy-enforcement gateway hook runner.
#[derive(Parser)]
#[command(
    name = "warden-hook",
    version,
    long_version = long_version(),
    about = "Run enforcement hooks for one interception point against a JSON payload on stdin"
)]
struct Cli {
    /// Interception point to run (e.g. `pre-run-command`).
    point: String,

    /// Session identifier; state is kept per-session.
    #[arg(long, default_value = "default")]
    session: String,

    /// Directory holding per-session state files.
    #[arg(long, default_value = "/var/lib/warden/sessions")]
    state_dir: PathBuf,

    /// Override the policy document path (bypasses the deployed/repo-local search).
    #[arg(long)]
    policy_path: Option<PathBuf>,
}

/// Build the long version string: "0.1.0 (abc1234 2026-02-11)".
const fn long_version() -> &'static str {
    concat!(env!("CARGO_PKG_VERSION"), " (", env!("WARDEN_GIT_HASH"), " ", env!("WARDEN_BUILD_DATE"), ")")
}

fn init_logging() {
    // Logs go to stderr so they never collide with the decision protocol on stdout.
    let filter = EnvFilter::from_default_env()
        .add_directive("warden_hooks=info".parse().expect("valid directive"))
        .add_directive("warden_kernel=info".parse().expect("valid directive"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let Some(point) = InterceptionPoint::parse(&cli.point) else {
        eprintln!("BLOCKED: unknown_interception_point");
        eprintln!("  - '{}' is not a recognized interception point", cli.point);
        return ExitCode::from(2);
    };

    let payload = match InterceptPayload::read_stdin() {
        Ok(payload) => payload,
        Err(err) => {
            tracing::error!(error = %err, "failed to parse intercept payload");
            let decision = Decision::block("input_malformed", format!("could not parse payload: {err}"));
            return ExitCode::from(decision.emit(&mut std::io::stdout(), &mut std::io::stderr()) as u8);
        }
    };

    let policy = PolicyDocument::load(cli.policy_path.as_deref());
    let session = SessionStore::new(&cli.state_dir, &cli.session);

    let table = warden_hooks::dispatch_table();
    let hooks = table.get(&point).map(Vec::as_slice).unwrap_or(&[]);

    let ctx = HookContext { payload: &payload, policy: &policy, session: &session };
    let decision = run_hooks(hooks, &ctx);

    let code = decision.emit(&mut std::io::stdout(), &mut std::io::stderr());
    ExitCode::from(code as u8)
}
