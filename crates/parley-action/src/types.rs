//! Core types and value objects for the action engine.
//!
//! Defines the structured action descriptor produced from an encoded command,
//! handler results, and the outcome of a dispatch attempt.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ActionError;

// =============================================================================
// Action descriptor
// =============================================================================

/// Intent-like payload describing a device or application action.
///
/// Encoded as a JSON object, e.g.
/// `{"action": "android.intent.action.VIEW", "data": "https://example.com"}`.
/// At least one of `action` or `component` must be present.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActionDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub extras: serde_json::Map<String, serde_json::Value>,
}

impl ActionDescriptor {
    /// Parse an encoded action.
    ///
    /// Fails with `ActionError::MalformedAction` when the text is not a JSON
    /// object of the expected shape or names neither an action nor a component.
    pub fn parse(encoded: &str) -> Result<Self, ActionError> {
        let descriptor: ActionDescriptor = serde_json::from_str(encoded.trim())?;

        let has_action = descriptor
            .action
            .as_deref()
            .is_some_and(|a| !a.trim().is_empty());
        let has_component = descriptor
            .component
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty());
        if !has_action && !has_component {
            return Err(ActionError::MalformedAction(
                "descriptor names neither an action nor a component".to_string(),
            ));
        }

        Ok(descriptor)
    }

    /// Whether this descriptor carries the given action name.
    pub fn is_action(&self, action: &str) -> bool {
        self.action.as_deref() == Some(action)
    }

    /// Short label for logging: the component if set, otherwise the action.
    pub fn target(&self) -> &str {
        self.component
            .as_deref()
            .filter(|c| !c.is_empty())
            .or(self.action.as_deref())
            .unwrap_or("<none>")
    }

    /// String-valued extra.
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extras.get(key).and_then(|v| v.as_str())
    }

    /// Integer-valued extra. Accepts a JSON number or a numeric string, since
    /// rewrite templates substitute captured digits as text.
    pub fn extra_u64(&self, key: &str) -> Option<u64> {
        match self.extras.get(key)? {
            serde_json::Value::Number(n) => n.as_u64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

// =============================================================================
// Handler results and dispatch outcome
// =============================================================================

/// Result returned by action handlers once the action has been handed off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult {
    pub handler: String,
    pub message: String,
}

/// Why a recognised command could not be dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchFailure {
    /// No installed handler could service the descriptor.
    NoHandler,
    /// The encoded action could not be parsed.
    MalformedAction,
}

impl DispatchFailure {
    pub fn reason(&self) -> &'static str {
        match self {
            DispatchFailure::NoHandler => "no handler available",
            DispatchFailure::MalformedAction => "malformed action",
        }
    }
}

impl fmt::Display for DispatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

/// Outcome of trying an utterance as a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// No rewriter recognised the utterance. The common case.
    NotACommand,
    /// A handler accepted the action.
    Dispatched,
    DispatchFailed(DispatchFailure),
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchOutcome::NotACommand => write!(f, "not a command"),
            DispatchOutcome::Dispatched => write!(f, "dispatched"),
            DispatchOutcome::DispatchFailed(reason) => write!(f, "dispatch failed: {}", reason),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
