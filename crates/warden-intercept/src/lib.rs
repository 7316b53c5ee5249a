//! # warden-intercept
//!
//! The wire contract between the host agent and the warden gateway:
//! the JSON **intercept payload** read from stdin (spec §6) and the
//! structured **Decision** every hook produces, which the CLI
//! entrypoint renders to stdout/stderr and an exit code.
//!
//! ## Quick Example
//!
//! ```rust
//! use warden_intercept::{Decision, InterceptPayload};
//!
//! let payload: InterceptPayload = serde_json::from_str(
//!     r#"{"tool_info": {"tool_name": "run_command", "command": "ls"}, "conversation_context": ""}"#
//! ).unwrap();
//! assert_eq!(payload.tool_info.tool_name.as_deref(), Some("run_command"));
//!
//! let decision = Decision::block("command_blocked", "Direct command execution is disabled.");
//! assert_eq!(decision.exit_code(), 2);
//! ```

pub mod decision;
pub mod error;
pub mod payload;

pub use decision::{Decision, DecisionStatus};
pub use error::InterceptError;
pub use payload::{Edit, InterceptPayload, RefusalInfo, ToolInfo};
