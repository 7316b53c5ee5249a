use serde::{Deserialize, Serialize};

/// Global capability stance. See spec §6 "Execution profiles".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionProfile {
    /// Pattern-based checks apply; direct shell is regex-blocked.
    #[default]
    Standard,
    /// No direct shell at all; no direct filesystem writes; escape
    /// primitives in code are hard-blocked; all mutation routes
    /// through the MCP write tool.
    ExecutionOnly,
    /// Panic mode; every mutating or executing interception point
    /// blocks unconditionally.
    Locked,
}

impl ExecutionProfile {
    pub fn is_locked(self) -> bool {
        matches!(self, ExecutionProfile::Locked)
    }

    pub fn is_execution_only(self) -> bool {
        matches!(self, ExecutionProfile::ExecutionOnly)
    }

    pub fn is_standard(self) -> bool {
        matches!(self, ExecutionProfile::Standard)
    }
}
