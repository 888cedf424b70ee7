//! Error types for the action engine.

/// Errors from rewriting, action parsing, and handler execution.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("Malformed action: {0}")]
    MalformedAction(String),
    #[error("Payload validation failed: {0}")]
    InvalidPayload(String),
    #[error("Action handler failed: {0}")]
    HandlerFailed(String),
    #[error("Invalid rewrite rule '{pattern}': {reason}")]
    InvalidRule { pattern: String, reason: String },
}

impl From<serde_json::Error> for ActionError {
    fn from(err: serde_json::Error) -> Self {
        ActionError::MalformedAction(err.to_string())
    }
}
