//! Interception points (spec §4.6).

use std::fmt;

/// A named moment in the agent's action loop at which the gateway is
/// invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterceptionPoint {
    PreUserPrompt,
    PreMcpToolUse,
    PreRunCommand,
    PreFilesystemWrite,
    PreWriteCode,
    PostWrite,
    PostSession,
    PostRefusal,
}

impl InterceptionPoint {
    /// All eight points, in dispatch-table declaration order.
    pub const ALL: [InterceptionPoint; 8] = [
        InterceptionPoint::PreUserPrompt,
        InterceptionPoint::PreMcpToolUse,
        InterceptionPoint::PreRunCommand,
        InterceptionPoint::PreFilesystemWrite,
        InterceptionPoint::PreWriteCode,
        InterceptionPoint::PostWrite,
        InterceptionPoint::PostSession,
        InterceptionPoint::PostRefusal,
    ];

    /// The kebab-case name used on the CLI and in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            InterceptionPoint::PreUserPrompt => "pre-user-prompt",
            InterceptionPoint::PreMcpToolUse => "pre-mcp-tool-use",
            InterceptionPoint::PreRunCommand => "pre-run-command",
            InterceptionPoint::PreFilesystemWrite => "pre-filesystem-write",
            InterceptionPoint::PreWriteCode => "pre-write-code",
            InterceptionPoint::PostWrite => "post-write",
            InterceptionPoint::PostSession => "post-session",
            InterceptionPoint::PostRefusal => "post-refusal",
        }
    }

    /// Parse a kebab-case interception-point name.
    pub fn parse(name: &str) -> Option<InterceptionPoint> {
        InterceptionPoint::ALL
            .into_iter()
            .find(|point| point.as_str() == name)
    }
}

impl fmt::Display for InterceptionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
