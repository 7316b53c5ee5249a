use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::InterceptError;

/// A single content edit: `{ path, old_string, new_string }` (spec
/// §6).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Edit {
    pub path: String,
    #[serde(default)]
    pub old_string: String,
    #[serde(default)]
    pub new_string: String,
}

/// `tool_info` as named in spec §6.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolInfo {
    #[serde(default)]
    pub tool_name: Option<String>,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub edits: Vec<Edit>,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub arguments: Option<serde_json::Value>,
}

/// A structured refusal record, as consulted by H21 (spec §4.7, §6).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefusalInfo {
    #[serde(default)]
    pub refused: bool,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Vec<String>,
    #[serde(default)]
    pub recovery_steps: Vec<String>,
    #[serde(default)]
    pub exit_code: Option<i32>,
}

/// The intercept payload every hook receives on stdin (spec §6).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterceptPayload {
    #[serde(default)]
    pub tool_info: ToolInfo,
    #[serde(default)]
    pub conversation_context: String,
    #[serde(default)]
    pub refusal_info: Option<RefusalInfo>,
}

impl InterceptPayload {
    /// Parse a payload from a UTF-8 JSON reader.
    pub fn from_reader(mut reader: impl Read) -> Result<Self, InterceptError> {
        let mut buf = String::new();
        reader.read_to_string(&mut buf)?;
        Self::from_str(&buf)
    }

    /// Parse a payload from a JSON string.
    pub fn from_str(raw: &str) -> Result<Self, InterceptError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Read and parse a payload from standard input.
    pub fn read_stdin() -> Result<Self, InterceptError> {
        Self::from_reader(std::io::stdin())
    }

    /// Substring markers found in `conversation_context` (spec §6).
    pub fn has_marker(&self, marker: &str) -> bool {
        self.conversation_context.contains(marker)
    }
}
