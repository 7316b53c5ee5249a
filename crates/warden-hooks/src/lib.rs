//! # warden-hooks
//!
//! The 21 enforcement hooks (H1-H21, spec §4.7) and the static
//! dispatch table (spec §4.6) binding each to its interception point,
//! in the order the kernel runs them.

pub mod constants;

mod h01_intent_classification;
mod h02_prompt_gate;
mod h03_plan_resolution;
mod h04_session_state_machine;
mod h05_mcp_tool_allowlist;
mod h06_reasoning_detector;
mod h07_plan_immutability;
mod h08_shell_kill_switch;
mod h09_filesystem_boundary;
mod h10_enforcement_protection;
mod h11_escape_scanner;
mod h12_code_policy;
mod h13_completeness;
mod h14_comprehensive_comments;
mod h15_language_compliance;
mod h16_test_presence;
mod h17_verification_runner;
mod h18_observability;
mod h19_semantic_diff;
mod h20_session_entropy;
mod h21_refusal_audit;

pub use h01_intent_classification::IntentClassification;
pub use h02_prompt_gate::PromptGate;
pub use h03_plan_resolution::PlanResolutionHook;
pub use h04_session_state_machine::SessionStateMachine;
pub use h05_mcp_tool_allowlist::McpToolAllowlist;
pub use h06_reasoning_detector::ReasoningDetector;
pub use h07_plan_immutability::PlanImmutability;
pub use h08_shell_kill_switch::ShellKillSwitch;
pub use h09_filesystem_boundary::FilesystemBoundary;
pub use h10_enforcement_protection::EnforcementProtection;
pub use h11_escape_scanner::EscapeScanner;
pub use h12_code_policy::CodePolicy;
pub use h13_completeness::Completeness;
pub use h14_comprehensive_comments::ComprehensiveComments;
pub use h15_language_compliance::LanguageCompliance;
pub use h16_test_presence::TestPresence;
pub use h17_verification_runner::VerificationRunner;
pub use h18_observability::Observability;
pub use h19_semantic_diff::SemanticDiff;
pub use h20_session_entropy::SessionEntropy;
pub use h21_refusal_audit::RefusalAudit;

use std::collections::HashMap;

use warden_kernel::{Hook, InterceptionPoint};

/// Build the static dispatch table binding each interception point to
/// its ordered hook list (spec §4.6). Hooks at the same point run in
/// declaration order here; the kernel short-circuits on first block.
pub fn dispatch_table() -> HashMap<InterceptionPoint, Vec<Box<dyn Hook>>> {
    let mut table: HashMap<InterceptionPoint, Vec<Box<dyn Hook>>> = HashMap::new();

    table.insert(
        InterceptionPoint::PreUserPrompt,
        vec![
            Box::new(IntentClassification),
            Box::new(PromptGate),
            Box::new(PlanResolutionHook),
        ],
    );

    table.insert(
        InterceptionPoint::PreMcpToolUse,
        vec![
            Box::new(SessionStateMachine),
            Box::new(McpToolAllowlist),
            Box::new(ReasoningDetector),
            Box::new(PlanImmutability),
        ],
    );

    table.insert(InterceptionPoint::PreRunCommand, vec![Box::new(ShellKillSwitch)]);

    table.insert(
        InterceptionPoint::PreFilesystemWrite,
        vec![Box::new(FilesystemBoundary), Box::new(EnforcementProtection)],
    );

    table.insert(
        InterceptionPoint::PreWriteCode,
        vec![
            Box::new(EscapeScanner),
            Box::new(CodePolicy),
            Box::new(Completeness),
            Box::new(ComprehensiveComments),
            Box::new(LanguageCompliance),
        ],
    );

    table.insert(
        InterceptionPoint::PostWrite,
        vec![
            Box::new(TestPresence),
            Box::new(VerificationRunner),
            Box::new(Observability),
            Box::new(SemanticDiff),
        ],
    );

    table.insert(InterceptionPoint::PostSession, vec![Box::new(SessionEntropy)]);

    table.insert(InterceptionPoint::PostRefusal, vec![Box::new(RefusalAudit)]);

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_interception_point_is_bound() {
        let table = dispatch_table();
        for point in InterceptionPoint::ALL {
            assert!(table.contains_key(&point), "missing dispatch entry for {point}");
        }
    }

    #[test]
    fn pre_write_code_runs_escape_scanner_before_code_policy() {
        let table = dispatch_table();
        let hooks = &table[&InterceptionPoint::PreWriteCode];
        assert_eq!(hooks[0].name(), "escape_scanner");
        assert_eq!(hooks[1].name(), "code_policy");
    }
}
