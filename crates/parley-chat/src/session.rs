//! Chat session state machine.
//!
//! Events arrive one at a time from the speech source and the suggestion UI:
//! - ComboChange: any state -> Ready (rewriters rebuilt)
//! - FinalResult: first candidate logged, tried as a command, and resolved
//!   for suggestions; -> AwaitingChoice if any, otherwise -> Ready
//! - Error: any state -> Ready, error marker logged, suggestions untouched
//! - SuggestionChosen: non-blank choice logged, suggestions cleared -> Ready
//!
//! Every event ends with the current view being handed to the render sink.

use std::fmt;
use std::sync::Arc;

use parley_action::{CommandDispatcher, DispatchOutcome, Rewriter, RewriterProvider};
use parley_core::config::ParleyConfig;
use parley_core::types::{RecognitionErrorCode, ServiceRef};
use serde::Serialize;
use uuid::Uuid;

use crate::context::ContextTable;
use crate::error::ChatError;
use crate::render::{RenderSink, RenderView};
use crate::suggestion::{SuggestionResolver, SuggestionSet};
use crate::transcript::{ConversationLog, EntryKind, TranscriptSnapshot};

/// Lifecycle state of a chat session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No language/service combination bound yet.
    Idle,
    /// Rewriters bound, waiting for speech.
    Ready,
    /// Suggestions are on display and none has been picked.
    AwaitingChoice,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "Idle"),
            SessionState::Ready => write!(f, "Ready"),
            SessionState::AwaitingChoice => write!(f, "AwaitingChoice"),
        }
    }
}

/// Events a session consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    ComboChange {
        language: String,
        service: ServiceRef,
    },
    StartListening,
    FinalResult(Vec<String>),
    Error(RecognitionErrorCode),
    SuggestionChosen(String),
    /// A transcript entry was activated for re-execution.
    EntryActivated(u64),
}

/// Session settings taken from `ParleyConfig`.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Rewrite tables requested on every language/service change.
    pub rewrite_tables: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from(&ParleyConfig::default())
    }
}

impl From<&ParleyConfig> for SessionConfig {
    fn from(config: &ParleyConfig) -> Self {
        Self {
            rewrite_tables: config.rewrites.tables.clone(),
        }
    }
}

/// Orchestrates transcript, command dispatch, and suggestions for one
/// conversation.
pub struct ChatSession {
    id: Uuid,
    config: SessionConfig,
    state: SessionState,
    transcript: ConversationLog,
    resolver: SuggestionResolver,
    dispatcher: CommandDispatcher,
    provider: Arc<dyn RewriterProvider>,
    active_rewriters: Vec<Arc<dyn Rewriter>>,
    last_suggestions: SuggestionSet,
    sink: Box<dyn RenderSink>,
}

impl ChatSession {
    /// Create a session over the built-in context table.
    pub fn new(
        config: SessionConfig,
        provider: Arc<dyn RewriterProvider>,
        dispatcher: CommandDispatcher,
        sink: Box<dyn RenderSink>,
    ) -> Self {
        Self::with_context_table(
            config,
            Arc::new(ContextTable::seeded()),
            provider,
            dispatcher,
            sink,
        )
    }

    /// Create a session over a custom context table.
    pub fn with_context_table(
        config: SessionConfig,
        table: Arc<ContextTable>,
        provider: Arc<dyn RewriterProvider>,
        dispatcher: CommandDispatcher,
        sink: Box<dyn RenderSink>,
    ) -> Self {
        let id = Uuid::new_v4();
        tracing::debug!(session = %id, "Chat session created");
        Self {
            id,
            config,
            state: SessionState::Idle,
            transcript: ConversationLog::new(),
            resolver: SuggestionResolver::new(table),
            dispatcher,
            provider,
            active_rewriters: Vec::new(),
            last_suggestions: SuggestionSet::new(),
            sink,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn transcript(&self) -> TranscriptSnapshot {
        self.transcript.all()
    }

    pub fn suggestions(&self) -> &[String] {
        &self.last_suggestions
    }

    pub fn active_rewriters(&self) -> &[Arc<dyn Rewriter>] {
        &self.active_rewriters
    }

    /// Current transcript and suggestions. Has no side effects.
    pub fn render_data(&self) -> RenderView {
        RenderView {
            transcript: self.transcript.all(),
            suggestions: self.last_suggestions.clone(),
            state: self.state,
        }
    }

    /// Route an event to its handler.
    pub fn handle(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::ComboChange { language, service } => {
                self.on_combo_change(&language, &service)
            }
            SessionEvent::StartListening => self.on_start_listening(),
            SessionEvent::FinalResult(results) => {
                self.on_final_result(&results);
            }
            SessionEvent::Error(code) => self.on_error(code),
            SessionEvent::SuggestionChosen(text) => self.on_suggestion_chosen(&text),
            SessionEvent::EntryActivated(seq) => {
                if let Err(e) = self.on_entry_activated(seq) {
                    tracing::warn!(session = %self.id, error = %e, "Entry activation ignored");
                    self.emit();
                }
            }
        }
    }

    /// Rebuild the active rewriters for a new language/service pair.
    pub fn on_combo_change(&mut self, language: &str, service: &ServiceRef) {
        self.active_rewriters =
            self.provider
                .rewriters(language, service, &self.config.rewrite_tables);
        tracing::info!(
            session = %self.id,
            language = %language,
            service = %service,
            rewriters = self.active_rewriters.len(),
            "Rewriters rebuilt"
        );
        self.transition(SessionState::Ready);
        self.emit();
    }

    /// Listening started. Nothing changes; the view is re-emitted.
    pub fn on_start_listening(&mut self) {
        tracing::trace!(session = %self.id, "Listening started");
        self.emit();
    }

    /// Process a final speech result.
    ///
    /// Only the first candidate is used. Returns the dispatch outcome, or
    /// `None` when `results` is empty and nothing happened.
    pub fn on_final_result(&mut self, results: &[String]) -> Option<DispatchOutcome> {
        let Some(text) = results.first() else {
            tracing::debug!(session = %self.id, "Empty final result ignored");
            self.emit();
            return None;
        };

        if results.len() > 1 {
            tracing::debug!(
                session = %self.id,
                discarded = results.len() - 1,
                "Using first recognition candidate"
            );
        }

        self.transcript.append(EntryKind::Utterance(text.clone()));

        let outcome = self.dispatcher.try_dispatch(text, &self.active_rewriters);
        if let DispatchOutcome::DispatchFailed(reason) = outcome {
            tracing::warn!(session = %self.id, utterance = %text, reason = %reason, "Command dispatch failed");
        }

        self.last_suggestions = self.resolver.resolve(text);
        if self.last_suggestions.is_empty() {
            self.transition(SessionState::Ready);
        } else {
            self.transition(SessionState::AwaitingChoice);
        }
        self.emit();
        Some(outcome)
    }

    /// Record a recognition error.
    pub fn on_error(&mut self, code: RecognitionErrorCode) {
        tracing::warn!(session = %self.id, code = code.code(), error = code.describe(), "Recognition error");
        self.transcript.append(EntryKind::ErrorMarker(code));
        self.transition(SessionState::Ready);
        self.emit();
    }

    /// Fold a picked suggestion into the transcript.
    ///
    /// Blank text, or a pick while no suggestions are on display, changes
    /// nothing.
    pub fn on_suggestion_chosen(&mut self, text: &str) {
        if text.trim().is_empty() {
            tracing::debug!(session = %self.id, "Blank suggestion choice ignored");
        } else if self.last_suggestions.is_empty() {
            tracing::debug!(session = %self.id, choice = %text, "No suggestions on display, choice ignored");
        } else {
            self.transcript
                .append(EntryKind::SuggestionChoice(text.to_string()));
            self.last_suggestions.clear();
            self.transition(SessionState::Ready);
        }
        self.emit();
    }

    /// Launch a transcript entry's text as an encoded action, bypassing the
    /// rewriters. Transcript and suggestions are left as they are.
    pub fn on_entry_activated(&mut self, seq: u64) -> Result<DispatchOutcome, ChatError> {
        let entry = self
            .transcript
            .get(seq)
            .ok_or(ChatError::EntryNotFound(seq))?;
        let outcome = self.dispatcher.launch_encoded(&entry.to_string());
        tracing::info!(session = %self.id, seq, outcome = %outcome, "Transcript entry activated");
        self.emit();
        Ok(outcome)
    }

    fn transition(&mut self, next: SessionState) {
        if self.state != next {
            tracing::debug!(session = %self.id, "Chat session state: {} -> {}", self.state, next);
            self.state = next;
        }
    }

    fn emit(&mut self) {
        let view = self.render_data();
        self.sink.render(&view);
    }
}

// =============================================================================
// Tests
// =============================================================================
