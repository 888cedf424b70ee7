//! Command dispatch for Parley.
//!
//! Recognises utterances that encode device actions through pluggable
//! rewriters, parses the encoded action, and hands it to the first handler
//! able to launch it.

pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod rewriter;
pub mod types;

pub use dispatcher::CommandDispatcher;
pub use error::ActionError;
pub use handler::{ActionHandler, ActionRegistry};
pub use rewriter::provider::{ConfiguredRewriterProvider, RewriterProvider};
pub use rewriter::table::{RewriteRule, TableRewriter};
pub use rewriter::{EncodedAction, Rewriter};
pub use types::{ActionDescriptor, ActionResult, DispatchFailure, DispatchOutcome};
