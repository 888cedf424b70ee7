//! Notification action handler.
//!
//! Delivers a short notification message to the user.

use crate::error::ActionError;
use crate::handler::ActionHandler;
use crate::types::{ActionDescriptor, ActionResult};

pub const ACTION_NOTIFY: &str = "parley.action.NOTIFY";

/// Handler for notify actions carrying `extras.message`.
pub struct NotificationHandler;

fn message(action: &ActionDescriptor) -> Option<&str> {
    action
        .extra_str("message")
        .map(str::trim)
        .filter(|m| !m.is_empty())
}

impl ActionHandler for NotificationHandler {
    fn id(&self) -> &'static str {
        "notification"
    }

    fn can_handle(&self, action: &ActionDescriptor) -> bool {
        action.is_action(ACTION_NOTIFY) && message(action).is_some()
    }

    fn launch(&self, action: &ActionDescriptor) -> Result<ActionResult, ActionError> {
        let message = message(action).ok_or_else(|| {
            ActionError::InvalidPayload("Notification message must not be empty".to_string())
        })?;
        let title = action.extra_str("title").unwrap_or("Parley");

        tracing::info!(title = %title, message = %message, "Notification shown");

        Ok(ActionResult {
            handler: self.id().to_string(),
            message: format!("Notification shown: {}", message),
        })
    }

    fn describe(&self, action: &ActionDescriptor) -> String {
        format!(
            "Show notification: {}",
            action.extra_str("message").unwrap_or("<no message>")
        )
    }
}
