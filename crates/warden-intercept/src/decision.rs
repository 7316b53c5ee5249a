use std::io::Write;

use serde::{Deserialize, Serialize};

/// The three votes a hook can cast (spec §3 "Decision").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStatus {
    Allow,
    Annotate,
    Block,
}

/// The structured output of every hook (spec §3, §6).
///
/// `exit_code` is derived from `status`, never set independently,
/// except for the one named dispatch-table exception: the reasoning
/// detector reports its block via exit code 1 rather than the
/// mandatory-hook default of 2 (see [`Decision::block_with_exit_code`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub status: DecisionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<serde_json::Value>,
    #[serde(skip)]
    exit_code_override: Option<i32>,
}

impl Decision {
    pub fn allow() -> Self {
        Decision {
            status: DecisionStatus::Allow,
            reason: None,
            details: Vec::new(),
            annotations: None,
            exit_code_override: None,
        }
    }

    pub fn annotate(annotations: serde_json::Value) -> Self {
        Decision {
            status: DecisionStatus::Annotate,
            reason: None,
            details: Vec::new(),
            annotations: Some(annotations),
            exit_code_override: None,
        }
    }

    /// `reason` is the short machine category + human sentence
    /// required when blocking (spec §3). When `message` is empty the
    /// category alone is used verbatim, so a hook that already has a
    /// complete human-readable sentence can pass it as `category`
    /// without an awkward trailing separator.
    pub fn block(category: impl Into<String>, message: impl Into<String>) -> Self {
        let category = category.into();
        let message = message.into();
        let reason = if message.is_empty() {
            category
        } else {
            format!("{category}: {message}")
        };
        Decision {
            status: DecisionStatus::Block,
            reason: Some(reason),
            details: Vec::new(),
            annotations: None,
            exit_code_override: None,
        }
    }

    /// A block that reports via exit code 1 rather than 2 — the one
    /// named dispatch-table exception (the reasoning-in-executor
    /// detector).
    pub fn block_with_exit_code(
        category: impl Into<String>,
        message: impl Into<String>,
        exit_code: i32,
    ) -> Self {
        let mut decision = Self::block(category, message);
        decision.exit_code_override = Some(exit_code);
        decision
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }

    pub fn with_details(mut self, details: impl IntoIterator<Item = String>) -> Self {
        self.details.extend(details);
        self
    }

    pub fn with_annotations(mut self, annotations: serde_json::Value) -> Self {
        self.annotations = Some(annotations);
        self
    }

    pub fn is_block(&self) -> bool {
        self.status == DecisionStatus::Block
    }

    /// Exit `0` on allow/annotate, `2` on block, unless an override
    /// was set via [`Decision::block_with_exit_code`].
    pub fn exit_code(&self) -> i32 {
        if let Some(code) = self.exit_code_override {
            return code;
        }
        match self.status {
            DecisionStatus::Allow | DecisionStatus::Annotate => 0,
            DecisionStatus::Block => 2,
        }
    }

    /// Render this decision to the host per the decision contract
    /// (spec §6): on block, `BLOCKED: <category>` then indented detail
    /// lines to stderr; on allow/annotate, an optional single-line JSON
    /// annotation on stdout, plus a `WARNING:` stderr line for each
    /// detail an advisory hook attached (spec §7 kind 4). Returns the
    /// process exit code.
    pub fn emit(&self, stdout: &mut impl Write, stderr: &mut impl Write) -> i32 {
        match self.status {
            DecisionStatus::Block => {
                let reason = self.reason.as_deref().unwrap_or("unspecified");
                let _ = writeln!(stderr, "BLOCKED: {reason}");
                for detail in &self.details {
                    let _ = writeln!(stderr, "  - {detail}");
                }
            }
            DecisionStatus::Allow | DecisionStatus::Annotate => {
                if let Some(annotations) = &self.annotations {
                    if let Ok(line) = serde_json::to_string(annotations) {
                        let _ = writeln!(stdout, "{line}");
                    }
                }
                for detail in &self.details {
                    let _ = writeln!(stderr, "WARNING: {detail}");
                }
            }
        }
        self.exit_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn allow_exits_zero_with_no_output() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = Decision::allow().emit(&mut out, &mut err);
        assert_eq!(code, 0);
        assert!(out.is_empty());
        assert!(err.is_empty());
    }

    #[test]
    fn block_emits_blocked_line_and_details_to_stderr() {
        let decision = Decision::block("escape_attempt", "Path traversal detected")
            .with_detail("path=../../etc/passwd");
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = decision.emit(&mut out, &mut err);
        assert_eq!(code, 2);
        let err = String::from_utf8(err).unwrap();
        assert!(err.starts_with("BLOCKED: escape_attempt: Path traversal detected\n"));
        assert!(err.contains("  - path=../../etc/passwd\n"));
        assert!(out.is_empty());
    }

    #[test]
    fn block_with_empty_message_uses_category_verbatim() {
        let decision = Decision::block("Direct command execution is disabled.", "");
        assert_eq!(
            decision.reason.as_deref(),
            Some("Direct command execution is disabled.")
        );
    }

    #[test]
    fn allow_with_detail_emits_warning_line_to_stderr() {
        let decision = Decision::allow().with_detail("advisory hook 'x' failed internally");
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = decision.emit(&mut out, &mut err);
        assert_eq!(code, 0);
        assert!(out.is_empty());
        let err = String::from_utf8(err).unwrap();
        assert!(err.starts_with("WARNING: advisory hook 'x' failed internally\n"));
    }

    #[test]
    fn annotate_emits_single_line_json_on_stdout() {
        let decision = Decision::annotate(json!({"status": "allowed"}));
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = decision.emit(&mut out, &mut err);
        assert_eq!(code, 0);
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.lines().count(), 1);
        assert!(err.is_empty());
    }

    #[test]
    fn block_with_exit_code_override_reports_one() {
        let decision = Decision::block_with_exit_code(
            "reasoning_in_executor",
            "Tool call contains reasoning or narrative text.",
            1,
        );
        assert_eq!(decision.exit_code(), 1);
        assert!(decision.is_block());
    }

    #[test]
    fn serializes_without_internal_exit_override_field() {
        let decision = Decision::block_with_exit_code("x", "y", 1);
        let value = serde_json::to_value(&decision).unwrap();
        assert!(value.get("exit_code_override").is_none());
    }
}
