use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the session state store.
///
/// None of these are raised for *absence* of state — absent state
/// always resolves to a documented default (spec §4.2, Invariant 5).
/// They are raised for genuine I/O failure or for an attempted
/// lifecycle back-transition, both of which are structural violations
/// a mandatory hook must treat as block (spec §7, kind 2).
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to read session state file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write session state file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("session state file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("lifecycle back-transition rejected: {from:?} -> {to:?}")]
    BackTransition { from: crate::Lifecycle, to: crate::Lifecycle },
}
