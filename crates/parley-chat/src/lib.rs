//! Utterance-processing pipeline for Parley.
//!
//! Folds final speech results into a running transcript, dispatches command
//! utterances, and offers suggested replies from a fixed conversational
//! context table.

pub mod context;
pub mod error;
pub mod render;
pub mod session;
pub mod suggestion;
pub mod transcript;

pub use context::{ContextEntry, ContextTable};
pub use error::ChatError;
pub use render::{NullSink, RenderSink, RenderView};
pub use session::{ChatSession, SessionConfig, SessionEvent, SessionState};
pub use suggestion::{SuggestionResolver, SuggestionSet};
pub use transcript::{ConversationLog, EntryKind, TranscriptEntry, TranscriptSnapshot};
