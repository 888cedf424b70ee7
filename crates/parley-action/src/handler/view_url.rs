//! URL view action handler.
//!
//! Opens `http://` and `https://` URLs in the default browser.

use crate::error::ActionError;
use crate::handler::ActionHandler;
use crate::types::{ActionDescriptor, ActionResult};

pub const ACTION_VIEW: &str = "android.intent.action.VIEW";

/// Handler for VIEW actions carrying a web URL.
///
/// Only allows `http://` and `https://` schemes. Rejects `javascript:`,
/// `file://`, `data:`, and all other schemes.
pub struct ViewUrlHandler;

fn web_url(action: &ActionDescriptor) -> Option<&str> {
    action
        .data
        .as_deref()
        .filter(|url| url.starts_with("http://") || url.starts_with("https://"))
}

impl ActionHandler for ViewUrlHandler {
    fn id(&self) -> &'static str {
        "view_url"
    }

    fn can_handle(&self, action: &ActionDescriptor) -> bool {
        action.is_action(ACTION_VIEW) && web_url(action).is_some()
    }

    fn launch(&self, action: &ActionDescriptor) -> Result<ActionResult, ActionError> {
        let url = web_url(action).ok_or_else(|| {
            ActionError::InvalidPayload(format!(
                "Unsupported URL scheme. Only http:// and https:// are allowed, got: {}",
                action.data.as_deref().unwrap_or("")
            ))
        })?;

        tracing::info!(url = %url, "Opened URL");

        Ok(ActionResult {
            handler: self.id().to_string(),
            message: format!("Opened URL: {}", url),
        })
    }

    fn describe(&self, action: &ActionDescriptor) -> String {
        format!("Open URL: {}", action.data.as_deref().unwrap_or("<no url>"))
    }
}
