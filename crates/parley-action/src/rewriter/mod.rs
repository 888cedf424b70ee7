//! Utterance rewriters.
//!
//! A rewriter is a capability that recognises utterances encoding a command
//! and turns them into an encoded action. Rewriters are applied in order and
//! the first one that recognises the utterance wins.

pub mod provider;
pub mod table;

use std::borrow::Cow;

use parley_core::types::ServiceRef;

/// An action as produced by a rewriter, before it is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedAction {
    /// Id of the rewriter that recognised the utterance.
    pub rewriter_id: String,
    /// Encoded action descriptor (a JSON object).
    pub payload: String,
}

/// Capability mapping an utterance to an encoded action.
pub trait Rewriter: Send + Sync {
    /// Identifier, usually the name of the table it was built from.
    fn id(&self) -> &str;

    /// Language this rewriter was built for.
    fn language(&self) -> &str;

    /// Recognition service this rewriter was built for.
    fn service(&self) -> &ServiceRef;

    /// Returns the encoded action if the utterance is a recognised command.
    fn apply(&self, utterance: &str) -> Option<EncodedAction>;

    /// Text handed to the next rewriter in the chain.
    fn rewrite<'a>(&self, utterance: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(utterance)
    }
}
