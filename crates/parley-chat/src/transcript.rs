//! Append-only conversation transcript.
//!
//! Entries are numbered in insertion order and never edited or removed.
//! Snapshots share storage with the log and stay valid across later appends:
//! the log copies on write only while a snapshot is outstanding.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parley_core::types::RecognitionErrorCode;
use serde::{Serialize, Serializer};

/// What a transcript entry records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EntryKind {
    /// A final speech result, as spoken.
    Utterance(String),
    /// A recognition error reported by the speech source.
    ErrorMarker(RecognitionErrorCode),
    /// A suggested reply the user picked.
    SuggestionChoice(String),
}

/// One numbered transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    pub seq: u64,
    #[serde(flatten)]
    pub kind: EntryKind,
    pub recorded_at: DateTime<Utc>,
}

impl TranscriptEntry {
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::Utterance(text) | EntryKind::SuggestionChoice(text) => Some(text),
            EntryKind::ErrorMarker(_) => None,
        }
    }
}

impl fmt::Display for TranscriptEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            EntryKind::Utterance(text) | EntryKind::SuggestionChoice(text) => f.write_str(text),
            EntryKind::ErrorMarker(code) => write!(f, "* ERROR: {}", code),
        }
    }
}

/// Point-in-time view of the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranscriptSnapshot(Arc<Vec<TranscriptEntry>>);

impl Deref for TranscriptSnapshot {
    type Target = [TranscriptEntry];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Serialize for TranscriptSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

impl<'a> IntoIterator for &'a TranscriptSnapshot {
    type Item = &'a TranscriptEntry;
    type IntoIter = std::slice::Iter<'a, TranscriptEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The session transcript.
#[derive(Debug, Default)]
pub struct ConversationLog {
    entries: Arc<Vec<TranscriptEntry>>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return its sequence number.
    pub fn append(&mut self, kind: EntryKind) -> u64 {
        let seq = self.entries.len() as u64;
        Arc::make_mut(&mut self.entries).push(TranscriptEntry {
            seq,
            kind,
            recorded_at: Utc::now(),
        });
        seq
    }

    /// Snapshot of every entry so far, in insertion order.
    pub fn all(&self) -> TranscriptSnapshot {
        TranscriptSnapshot(Arc::clone(&self.entries))
    }

    pub fn get(&self, seq: u64) -> Option<&TranscriptEntry> {
        usize::try_from(seq).ok().and_then(|i| self.entries.get(i))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
