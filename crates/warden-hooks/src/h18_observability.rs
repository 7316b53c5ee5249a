//! H18 Observability (mandatory in `[MODE:SHIP]` only, advisory
//! otherwise, `post_write`). Large changes need a logging marker,
//! very large changes additionally need a metric marker, and a trace
//! marker is always recommended.

use once_cell::sync::Lazy;
use regex::Regex;

use warden_intercept::Decision;
use warden_kernel::{Hook, HookContext, HookPosture};

use crate::constants::{check_locked, count_executable_lines, MARKER_MODE_SHIP};

const LOGGING_THRESHOLD: usize = 10;
const METRIC_THRESHOLD: usize = 20;

static LOGGING_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(log(?:ger|ging)?\.|tracing::(?:info|warn|error|debug)!|info!|warn!|error!|debug!|console\.(?:log|warn|error))").unwrap());
static METRIC_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(metrics?\.|counter!|gauge!|histogram!|emit_metric)").unwrap());
static TRACE_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(span!|tracing::span|trace!)").unwrap());

struct EditFindings {
    path: String,
    missing_logging: bool,
    missing_metric: bool,
    missing_trace: bool,
}

fn inspect(path: &str, new_string: &str) -> Option<EditFindings> {
    let lines = count_executable_lines(new_string);
    if lines <= LOGGING_THRESHOLD {
        return None;
    }
    Some(EditFindings {
        path: path.to_string(),
        missing_logging: !LOGGING_MARKER.is_match(new_string),
        missing_metric: lines > METRIC_THRESHOLD && !METRIC_MARKER.is_match(new_string),
        missing_trace: !TRACE_MARKER.is_match(new_string),
    })
}

pub struct Observability;

impl Hook for Observability {
    fn name(&self) -> &'static str {
        "observability"
    }

    fn posture(&self) -> HookPosture {
        HookPosture::Mandatory
    }

    fn evaluate(&self, ctx: &HookContext<'_>) -> Decision {
        if let Some(decision) = check_locked(ctx.policy) {
            return decision;
        }

        let in_ship_mode = ctx.payload.has_marker(MARKER_MODE_SHIP);
        let mut warnings = Vec::new();
        let mut blocking = Vec::new();

        for edit in &ctx.payload.tool_info.edits {
            let Some(findings) = inspect(&edit.path, &edit.new_string) else {
                continue;
            };
            if findings.missing_logging {
                let message = format!("'{}' has no logging marker", findings.path);
                if in_ship_mode {
                    blocking.push(message);
                } else {
                    warnings.push(message);
                }
            }
            if findings.missing_metric {
                warnings.push(format!("'{}' has no metric marker", findings.path));
            }
            if findings.missing_trace {
                warnings.push(format!("'{}' has no trace marker (recommended)", findings.path));
            }
        }

        if !blocking.is_empty() {
            let mut decision = Decision::block("observability", format!("{MARKER_MODE_SHIP} requires logging coverage"));
            for message in blocking.into_iter().chain(warnings) {
                decision = decision.with_detail(message);
            }
            return decision;
        }

        Decision::allow().with_details(warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use warden_intercept::{Edit, InterceptPayload};
    use warden_policy::PolicyDocument;
    use warden_session::SessionStore;

    fn big_edit_without_markers(n: usize) -> String {
        (0..n).map(|i| format!("let v{i} = compute({i});\n")).collect()
    }

    #[test]
    fn advisory_outside_ship_mode() {
        let mut payload = InterceptPayload::default();
        payload.tool_info.edits = vec![Edit {
            path: "foo.rs".to_string(),
            new_string: big_edit_without_markers(11),
            ..Default::default()
        }];
        let policy = PolicyDocument::default();
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path(), "s1");
        let ctx = HookContext { payload: &payload, policy: &policy, session: &session };
        let decision = Observability.evaluate(&ctx);
        assert!(!decision.is_block());
        assert!(decision.details.iter().any(|d| d.contains("logging")));
    }

    #[test]
    fn blocks_in_ship_mode_without_logging() {
        let mut payload = InterceptPayload::default();
        payload.conversation_context = MARKER_MODE_SHIP.to_string();
        payload.tool_info.edits = vec![Edit {
            path: "foo.rs".to_string(),
            new_string: big_edit_without_markers(11),
            ..Default::default()
        }];
        let policy = PolicyDocument::default();
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path(), "s1");
        let ctx = HookContext { payload: &payload, policy: &policy, session: &session };
        assert!(Observability.evaluate(&ctx).is_block());
    }

    #[test]
    fn very_large_edit_also_requires_metric_marker() {
        let mut new_string = big_edit_without_markers(21);
        new_string.push_str("tracing::info!(\"done\");\n");
        let findings = inspect("foo.rs", &new_string).unwrap();
        assert!(!findings.missing_logging);
        assert!(findings.missing_metric);
    }

    #[test]
    fn small_edit_is_exempt() {
        let mut payload = InterceptPayload::default();
        payload.conversation_context = MARKER_MODE_SHIP.to_string();
        payload.tool_info.edits = vec![Edit {
            path: "foo.rs".to_string(),
            new_string: "let x = 1;\n".to_string(),
            ..Default::default()
        }];
        let policy = PolicyDocument::default();
        let dir = tempdir().unwrap();
        let session = SessionStore::new(dir.path(), "s1");
        let ctx = HookContext { payload: &payload, policy: &policy, session: &session };
        assert!(!Observability.evaluate(&ctx).is_block());
    }
}
