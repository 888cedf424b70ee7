//! Suggested-reply lookup.

use std::sync::Arc;

use crate::context::ContextTable;

/// Replies offered for the most recent utterance. Replaced wholesale on
/// every utterance.
pub type SuggestionSet = Vec<String>;

/// Resolves an utterance to the suggested replies of its context.
///
/// A pure function of the utterance and the table: no session memory, no
/// normalisation, exact phrase equality only.
#[derive(Debug, Clone)]
pub struct SuggestionResolver {
    table: Arc<ContextTable>,
}

impl SuggestionResolver {
    pub fn new(table: Arc<ContextTable>) -> Self {
        Self { table }
    }

    pub fn resolve(&self, utterance: &str) -> SuggestionSet {
        if utterance.trim().is_empty() {
            return SuggestionSet::new();
        }
        match self.table.lookup(utterance) {
            Some(context_id) => self.table.replies_for(context_id).to_vec(),
            None => SuggestionSet::new(),
        }
    }

    pub fn table(&self) -> &ContextTable {
        &self.table
    }
}

impl Default for SuggestionResolver {
    fn default() -> Self {
        Self::new(Arc::new(ContextTable::seeded()))
    }
}
