//! Conversational context table.
//!
//! Maps trigger phrases to a named context and each context to the replies
//! worth suggesting. Phrase matching is exact and case-sensitive; when a
//! phrase appears in more than one context the first declared wins.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::ChatError;

/// A named bucket of trigger phrases and suggested replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextEntry {
    pub context_id: String,
    pub trigger_phrases: Vec<String>,
    pub suggested_replies: Vec<String>,
}

impl ContextEntry {
    pub fn new<P, R>(context_id: &str, trigger_phrases: P, suggested_replies: R) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            context_id: context_id.to_string(),
            trigger_phrases: trigger_phrases.into_iter().map(Into::into).collect(),
            suggested_replies: suggested_replies.into_iter().map(Into::into).collect(),
        }
    }
}

type SeedRow = (&'static str, &'static [&'static str], &'static [&'static str]);

const SEED: &[SeedRow] = &[
    ("greetings", &["hello", "hi"], &["hello", "hi"]),
    (
        "introductions",
        &["how are you", "how's it going", "what's up"],
        &[
            "good, you",
            "bad",
            "okay",
            "doing good, you",
            "i'm okay",
            "i'm doing well, how about you",
        ],
    ),
    (
        "food service",
        &["what would you like to order"],
        &["can i please get"],
    ),
];

/// Immutable, ordered context table.
#[derive(Debug, Clone)]
pub struct ContextTable {
    entries: Vec<ContextEntry>,
}

impl ContextTable {
    /// Build a table, rejecting duplicate context ids.
    pub fn new(entries: Vec<ContextEntry>) -> Result<Self, ChatError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.context_id.as_str()) {
                return Err(ChatError::DuplicateContext(entry.context_id.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// The built-in table: greetings, introductions, food service.
    pub fn seeded() -> Self {
        Self {
            entries: SEED
                .iter()
                .map(|(id, phrases, replies)| {
                    ContextEntry::new(id, phrases.iter().copied(), replies.iter().copied())
                })
                .collect(),
        }
    }

    /// Context id of the first entry whose trigger phrases contain `phrase`.
    pub fn lookup(&self, phrase: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.trigger_phrases.iter().any(|p| p == phrase))
            .map(|e| e.context_id.as_str())
    }

    /// Suggested replies for a context id; empty for unknown ids.
    pub fn replies_for(&self, context_id: &str) -> &[String] {
        self.entries
            .iter()
            .find(|e| e.context_id == context_id)
            .map(|e| e.suggested_replies.as_slice())
            .unwrap_or(&[])
    }

    pub fn entries(&self) -> &[ContextEntry] {
        &self.entries
    }
}

impl Default for ContextTable {
    fn default() -> Self {
        Self::seeded()
    }
}
