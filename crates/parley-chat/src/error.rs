//! Error types for the chat pipeline.
//!
//! Nothing in the event path is fatal; these cover construction and the
//! explicit transcript lookups.

/// Errors from the chat pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("duplicate context id: {0}")]
    DuplicateContext(String),
    #[error("transcript entry not found: {0}")]
    EntryNotFound(u64),
}
