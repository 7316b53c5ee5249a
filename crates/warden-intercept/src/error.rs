use thiserror::Error;

/// Errors that can arise while parsing an intercept payload. Per spec
/// §7 kind 3 ("Input malformation"), the response to this error is a
/// property of the *hook's declared posture*, not of this crate: a
/// mandatory hook blocks on a parse failure, an advisory hook emits a
/// neutral allow. This crate only reports that parsing failed.
#[derive(Debug, Error)]
pub enum InterceptError {
    #[error("failed to read intercept payload from stdin: {0}")]
    ReadFailed(#[from] std::io::Error),

    #[error("intercept payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
