//! Action handler registry and trait definition.
//!
//! Defines the `ActionHandler` trait and the ordered registry the dispatcher
//! consults to find a handler for an action descriptor.

pub mod alarm;
pub mod notification;
pub mod view_url;

use crate::error::ActionError;
use crate::types::{ActionDescriptor, ActionResult};

pub use alarm::AlarmHandler;
pub use notification::NotificationHandler;
pub use view_url::ViewUrlHandler;

/// A capability able to launch some class of actions.
///
/// `launch` hands the action off and returns; it never waits for the
/// launched activity to finish.
pub trait ActionHandler: Send + Sync {
    /// Stable identifier used in logs.
    fn id(&self) -> &'static str;

    /// Whether this handler can service the descriptor.
    fn can_handle(&self, action: &ActionDescriptor) -> bool;

    /// Launch the action.
    fn launch(&self, action: &ActionDescriptor) -> Result<ActionResult, ActionError>;

    /// Human-readable description of what `launch` would do.
    fn describe(&self, action: &ActionDescriptor) -> String;
}

/// Ordered collection of installed handlers.
#[derive(Default)]
pub struct ActionRegistry {
    handlers: Vec<Box<dyn ActionHandler>>,
}

impl ActionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in handlers installed.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_defaults();
        registry
    }

    /// Install a handler. Earlier handlers take precedence.
    pub fn register(&mut self, handler: Box<dyn ActionHandler>) {
        tracing::debug!(handler = handler.id(), "Registered action handler");
        self.handlers.push(handler);
    }

    /// Install the built-in handlers.
    pub fn register_defaults(&mut self) {
        self.register(Box::new(ViewUrlHandler));
        self.register(Box::new(NotificationHandler));
        self.register(Box::new(AlarmHandler));
    }

    /// Handlers able to service the descriptor, in registration order.
    pub fn candidates<'a>(
        &'a self,
        action: &'a ActionDescriptor,
    ) -> impl Iterator<Item = &'a dyn ActionHandler> + 'a {
        self.handlers
            .iter()
            .map(|h| h.as_ref())
            .filter(move |h| h.can_handle(action))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
