//! Command dispatcher.
//!
//! Runs an utterance through the active rewriters and, when one recognises a
//! command, parses the encoded action and launches it through the registry.

use std::borrow::Cow;
use std::sync::Arc;

use crate::handler::ActionRegistry;
use crate::rewriter::Rewriter;
use crate::types::{ActionDescriptor, DispatchFailure, DispatchOutcome};

/// Turns command utterances into launched actions.
pub struct CommandDispatcher {
    registry: ActionRegistry,
}

impl CommandDispatcher {
    pub fn new(registry: ActionRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Try the utterance as a command.
    ///
    /// Rewriters are applied in order; each one sees the text produced by the
    /// previous one's `rewrite`. The first that recognises a command decides
    /// the outcome. Never fails: parse and launch problems are reported as
    /// `DispatchFailed`.
    pub fn try_dispatch(
        &self,
        utterance: &str,
        rewriters: &[Arc<dyn Rewriter>],
    ) -> DispatchOutcome {
        let mut text = Cow::Borrowed(utterance);
        for rewriter in rewriters {
            if let Some(encoded) = rewriter.apply(&text) {
                tracing::debug!(
                    rewriter = %encoded.rewriter_id,
                    utterance = %utterance,
                    "Utterance recognised as command"
                );
                return self.launch_encoded(&encoded.payload);
            }
            let next = rewriter.rewrite(&text).into_owned();
            text = Cow::Owned(next);
        }
        DispatchOutcome::NotACommand
    }

    /// Parse an encoded action and launch it.
    pub fn launch_encoded(&self, encoded: &str) -> DispatchOutcome {
        match ActionDescriptor::parse(encoded) {
            Ok(descriptor) => self.launch(&descriptor),
            Err(e) => {
                tracing::warn!(error = %e, "Encoded action could not be parsed");
                DispatchOutcome::DispatchFailed(DispatchFailure::MalformedAction)
            }
        }
    }

    /// Launch a parsed action through the first handler that accepts it.
    ///
    /// A handler that fails to launch passes the action on to the next
    /// candidate; if none succeeds the outcome is `NoHandler`.
    pub fn launch(&self, descriptor: &ActionDescriptor) -> DispatchOutcome {
        for handler in self.registry.candidates(descriptor) {
            tracing::debug!(handler = handler.id(), plan = %handler.describe(descriptor), "Launching action");
            match handler.launch(descriptor) {
                Ok(result) => {
                    tracing::info!(
                        handler = handler.id(),
                        action = %descriptor.target(),
                        message = %result.message,
                        "Action dispatched"
                    );
                    return DispatchOutcome::Dispatched;
                }
                Err(e) => {
                    tracing::warn!(
                        handler = handler.id(),
                        action = %descriptor.target(),
                        error = %e,
                        "Handler failed to launch action"
                    );
                }
            }
        }
        tracing::warn!(action = %descriptor.target(), "No handler available for action");
        DispatchOutcome::DispatchFailed(DispatchFailure::NoHandler)
    }
}
