//! H14 Comprehensive comments (mandatory, `pre_write_code`).

use warden_intercept::Decision;
use warden_kernel::{Hook, HookContext, HookPosture};
use warden_patterns::{langmap, names};

use crate::constants::{check_locked, is_executable_line};

const MAX_VIOLATIONS: usize = 10;
const MAX_GENERIC_NAME_VIOLATIONS: usize = 5;
const DOCSTRING_OPENERS: &[&str] = &["\"\"\"", "'''", "///", "//", "/**", "#"];
const LOW_DENSITY_STREAK: usize = 8;

fn looks_like_docstring(line: &str) -> bool {
    let trimmed = line.trim();
    DOCSTRING_OPENERS.iter().any(|opener| trimmed.starts_with(opener)) && trimmed.len() > opener_len(trimmed)
}

fn opener_len(trimmed: &str) -> usize {
    DOCSTRING_OPENERS
        .iter()
        .find(|opener| trimmed.starts_with(**opener))
        .map(|opener| opener.len())
        .unwrap_or(0)
}

fn function_violations(new_string: &str, lines: &[&str], function_regex: &regex::Regex) -> Vec<String> {
    let mut violations = Vec::new();
    for (index, line) in lines.iter().enumerate() {
        if !function_regex.is_match(line) {
            continue;
        }
        let function_line = index + 1;
        let body: Vec<&str> = lines
            .iter()
            .skip(index + 1)
            .take_while(|l| !function_regex.is_match(l))
            .copied()
            .collect();
        let body_lines = body.iter().filter(|l| !l.trim().is_empty()).count();

        match body.first() {
            None => violations.push(format!("missing docstring for function at line {function_line}")),
            Some(first) if !looks_like_docstring(first) => {
                violations.push(format!("missing docstring for function at line {function_line}"))
            }
            Some(first) => {
                let trimmed = first.trim();
                if trimmed.len() <= opener_len(trimmed) + 1 {
                    violations.push(format!("empty or trivial docstring at line {function_line}"));
                } else if body_lines > 5 && trimmed.len() < 30 {
                    violations.push(format!(
                        "docstring too brief for a {body_lines}-line function body at line {function_line}"
                    ));
                }
            }
        }
    }
    let _ = new_string;
    violations
}

fn density_violations(lines: &[&str]) -> Vec<String> {
    let mut violations = Vec::new();
    let mut streak_start = 0usize;
    let mut streak_len = 0usize;
    let mut saw_comment = false;

    for (index, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        let is_comment = trimmed.starts_with('#') || trimmed.starts_with("//") || trimmed.starts_with('*');
        if is_executable_line(line) || (trimmed.is_empty() && streak_len > 0) {
            if streak_len == 0 {
                streak_start = index;
            }
            streak_len += 1;
            if is_comment {
                saw_comment = true;
            }
        } else if is_comment {
            saw_comment = true;
        } else {
            if streak_len > LOW_DENSITY_STREAK && !saw_comment {
                violations.push(format!(
                    "{streak_len} consecutive lines with no comments starting at line {}",
                    streak_start + 1
                ));
            }
            streak_len = 0;
            saw_comment = false;
        }
    }
    if streak_len > LOW_DENSITY_STREAK && !saw_comment {
        violations.push(format!(
            "{streak_len} consecutive lines with no comments starting at line {}",
            streak_start + 1
        ));
    }
    violations
}

pub struct ComprehensiveComments;

impl Hook for ComprehensiveComments {
    fn name(&self) -> &'static str {
        "comprehensive_comments"
    }

    fn posture(&self) -> HookPosture {
        HookPosture::Mandatory
    }

    fn evaluate(&self, ctx: &HookContext<'_>) -> Decision {
        if let Some(decision) = check_locked(ctx.policy) {
            return decision;
        }

        for edit in &ctx.payload.tool_info.edits {
            let Some(profile) = langmap::detect_language(&edit.path) else {
                continue;
            };
            let lines: Vec<&str> = edit.new_string.lines().collect();
            let function_regex = langmap::function_regex(profile);

            let mut violations = function_violations(&edit.new_string, &lines, function_regex);
            violations.extend(density_violations(&lines));

            for found in names::find_generic_names(&edit.new_string)
                .into_iter()
                .take(MAX_GENERIC_NAME_VIOLATIONS)
            {
                violations.push(format!("generic name '{}' on line {}", found.name, found.line));
            }

            if !violations.is_empty() {
                let mut decision = Decision::block(
                    "documentation_violation",
                    format!("edit to '{}' has insufficient documentation", edit.path),
                );
                for violation in violations.into_iter().take(MAX_VIOLATIONS) {
                    decision = decision.with_detail(violation);
                }
                return decision;
            }
        }

        Decision::allow()
    }
}
