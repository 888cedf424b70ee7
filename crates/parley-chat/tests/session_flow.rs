//! End-to-end tests for the chat session.
//!
//! Drives a session the way the speech source and suggestion UI would and
//! checks transcript, suggestions, state, dispatched actions, and rendered
//! frames together.

use std::sync::{Arc, Mutex};

use parley_action::{
    ActionDescriptor, ActionError, ActionHandler, ActionRegistry, ActionResult, CommandDispatcher,
    ConfiguredRewriterProvider, DispatchFailure, DispatchOutcome,
};
use parley_chat::{
    ChatSession, EntryKind, RenderView, SessionConfig, SessionEvent, SessionState,
};
use parley_core::config::{ParleyConfig, RewriteRuleConfig};
use parley_core::types::{RecognitionErrorCode, ServiceRef};

// =============================================================================
// Helpers
// =============================================================================

type Frames = Arc<Mutex<Vec<RenderView>>>;
type Launches = Arc<Mutex<Vec<String>>>;

/// Handler that accepts every descriptor and records its data URI, or its
/// target when there is none.
struct RecordingHandler {
    launches: Launches,
}

impl ActionHandler for RecordingHandler {
    fn id(&self) -> &'static str {
        "recording"
    }

    fn can_handle(&self, _action: &ActionDescriptor) -> bool {
        true
    }

    fn launch(&self, action: &ActionDescriptor) -> Result<ActionResult, ActionError> {
        let record = action.data.as_deref().unwrap_or(action.target());
        self.launches.lock().unwrap().push(record.to_string());
        Ok(ActionResult {
            handler: self.id().to_string(),
            message: "recorded".to_string(),
        })
    }

    fn describe(&self, action: &ActionDescriptor) -> String {
        format!("Record {}", action.target())
    }
}

struct Harness {
    session: ChatSession,
    frames: Frames,
    launches: Launches,
}

fn harness_with(config: &ParleyConfig, registry: ActionRegistry) -> Harness {
    let frames: Frames = Arc::new(Mutex::new(Vec::new()));
    let sink_frames = Arc::clone(&frames);
    let session = ChatSession::new(
        SessionConfig::from(config),
        Arc::new(ConfiguredRewriterProvider::new(&config.rewrites)),
        CommandDispatcher::new(registry),
        Box::new(move |view: &RenderView| sink_frames.lock().unwrap().push(view.clone())),
    );
    Harness {
        session,
        frames,
        launches: Arc::new(Mutex::new(Vec::new())),
    }
}

/// Session over the built-in tables whose only handler records launches.
fn harness() -> Harness {
    let launches: Launches = Arc::new(Mutex::new(Vec::new()));
    let mut registry = ActionRegistry::new();
    registry.register(Box::new(RecordingHandler {
        launches: Arc::clone(&launches),
    }));
    let mut h = harness_with(&ParleyConfig::default(), registry);
    h.launches = launches;
    h
}

fn results(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn transcript_kinds(session: &ChatSession) -> Vec<EntryKind> {
    session.transcript().iter().map(|e| e.kind.clone()).collect()
}

fn utterance(text: &str) -> EntryKind {
    EntryKind::Utterance(text.to_string())
}

fn choice(text: &str) -> EntryKind {
    EntryKind::SuggestionChoice(text.to_string())
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn greeting_then_choice() {
    let mut h = harness();
    let svc = ServiceRef::new("svc");

    h.session.on_combo_change("en", &svc);
    h.session.on_final_result(&results(&["hi"]));
    assert_eq!(transcript_kinds(&h.session), vec![utterance("hi")]);
    assert_eq!(h.session.suggestions(), ["hello", "hi"]);
    assert_eq!(h.session.state(), SessionState::AwaitingChoice);

    h.session.on_suggestion_chosen("hello");
    assert_eq!(
        transcript_kinds(&h.session),
        vec![utterance("hi"), choice("hello")]
    );
    assert!(h.session.suggestions().is_empty());
    assert_eq!(h.session.state(), SessionState::Ready);
}

#[test]
fn only_first_candidate_is_logged() {
    let mut h = harness();
    h.session.on_combo_change("en", &ServiceRef::new("svc"));
    for count in 1..=5 {
        let candidates: Vec<String> = (0..count).map(|i| format!("candidate {}", i)).collect();
        h.session.on_final_result(&candidates);
    }
    let kinds = transcript_kinds(&h.session);
    assert_eq!(kinds.len(), 5);
    assert!(kinds.iter().all(|k| *k == utterance("candidate 0")));
}

#[test]
fn empty_results_leave_everything_alone() {
    let mut h = harness();
    h.session.on_combo_change("en", &ServiceRef::new("svc"));
    h.session.on_final_result(&results(&["how are you"]));
    let before = h.session.render_data();

    assert!(h.session.on_final_result(&[]).is_none());
    assert_eq!(h.session.render_data(), before);
    assert_eq!(h.session.state(), SessionState::AwaitingChoice);
}

#[test]
fn unknown_phrase_settles_in_ready() {
    let mut h = harness();
    h.session.on_combo_change("en", &ServiceRef::new("svc"));
    h.session.on_final_result(&results(&["hello"]));
    h.session.on_final_result(&results(&["xyz-not-a-phrase"]));
    assert!(h.session.suggestions().is_empty());
    assert_eq!(h.session.state(), SessionState::Ready);
}

#[test]
fn blank_choice_changes_nothing() {
    let mut h = harness();
    h.session.on_combo_change("en", &ServiceRef::new("svc"));
    h.session.on_final_result(&results(&["what would you like to order"]));
    h.session.on_suggestion_chosen("");
    assert_eq!(transcript_kinds(&h.session), vec![utterance("what would you like to order")]);
    assert_eq!(h.session.suggestions(), ["can i please get"]);
    assert_eq!(h.session.state(), SessionState::AwaitingChoice);

    h.session.on_suggestion_chosen("hi");
    assert_eq!(h.session.transcript().last().map(|e| e.kind.clone()), Some(choice("hi")));
    assert!(h.session.suggestions().is_empty());
}

#[test]
fn render_data_is_stable_between_events() {
    let mut h = harness();
    h.session.on_combo_change("en", &ServiceRef::new("svc"));
    h.session.on_final_result(&results(&["hi"]));
    h.session.on_error(RecognitionErrorCode::NO_MATCH);
    let first = h.session.render_data();
    let second = h.session.render_data();
    assert_eq!(first, second);
    assert_eq!(first.transcript.len(), 2);
}

#[test]
fn session_survives_every_error_kind() {
    let mut h = harness();
    h.session.on_combo_change("en", &ServiceRef::new("svc"));
    h.session.on_final_result(&results(&["how's it going"]));
    for code in 1..=9 {
        h.session.on_error(RecognitionErrorCode(code));
        assert_eq!(h.session.state(), SessionState::Ready);
        assert_eq!(h.session.suggestions().len(), 6);
    }
    let markers: Vec<String> = h
        .session
        .transcript()
        .iter()
        .skip(1)
        .map(|e| e.to_string())
        .collect();
    assert_eq!(markers.first().map(String::as_str), Some("* ERROR: 1"));
    assert_eq!(markers.last().map(String::as_str), Some("* ERROR: 9"));

    h.session.on_suggestion_chosen("okay");
    assert_eq!(h.session.transcript().len(), 11);
    assert_eq!(h.session.state(), SessionState::Ready);
}

// =============================================================================
// Command dispatch
// =============================================================================

#[test]
fn command_utterance_reaches_handler() {
    let mut h = harness();
    h.session.on_combo_change("en-US", &ServiceRef::new("svc"));
    let outcome = h
        .session
        .on_final_result(&results(&["  open   https://example.com  "]));
    assert_eq!(outcome, Some(DispatchOutcome::Dispatched));
    assert_eq!(*h.launches.lock().unwrap(), vec!["https://example.com"]);
    // Logged as spoken, not as rewritten.
    assert_eq!(
        transcript_kinds(&h.session),
        vec![utterance("  open   https://example.com  ")]
    );
}

#[test]
fn plain_chat_is_not_a_command() {
    let mut h = harness();
    h.session.on_combo_change("en-US", &ServiceRef::new("svc"));
    assert_eq!(
        h.session.on_final_result(&results(&["hello"])),
        Some(DispatchOutcome::NotACommand)
    );
    assert!(h.launches.lock().unwrap().is_empty());
}

#[test]
fn no_handler_keeps_utterance_and_suggestions_flow() {
    let mut h = harness_with(&ParleyConfig::default(), ActionRegistry::new());
    h.session.on_combo_change("en-US", &ServiceRef::new("svc"));
    assert_eq!(
        h.session.on_final_result(&results(&["remind me to call mum"])),
        Some(DispatchOutcome::DispatchFailed(DispatchFailure::NoHandler))
    );
    assert_eq!(transcript_kinds(&h.session), vec![utterance("remind me to call mum")]);
    assert_eq!(h.session.state(), SessionState::Ready);

    h.session.on_final_result(&results(&["hi"]));
    assert_eq!(h.session.state(), SessionState::AwaitingChoice);
}

#[test]
fn malformed_table_payload_is_reported() {
    let mut config = ParleyConfig::default();
    config.rewrites.tables = vec!["Broken".to_string()];
    config.rewrites.definitions.insert(
        "Broken".to_string(),
        vec![RewriteRuleConfig {
            utterance: "^do it$".to_string(),
            replacement: String::new(),
            command: Some("activity".to_string()),
            args: vec!["not json".to_string()],
            locale: None,
            service: None,
        }],
    );
    let mut h = harness_with(&config, ActionRegistry::with_defaults());
    h.session.on_combo_change("en-US", &ServiceRef::new("svc"));
    assert_eq!(
        h.session.on_final_result(&results(&["do it"])),
        Some(DispatchOutcome::DispatchFailed(DispatchFailure::MalformedAction))
    );
    assert_eq!(h.session.transcript().len(), 1);
}

#[test]
fn locale_scoped_rule_follows_combo_changes() {
    let mut config = ParleyConfig::default();
    config.rewrites.tables = vec!["Local".to_string()];
    config.rewrites.definitions.insert(
        "Local".to_string(),
        vec![RewriteRuleConfig {
            utterance: "^ava (\\S+)$".to_string(),
            replacement: String::new(),
            command: Some("activity".to_string()),
            args: vec![r#"{"action": "android.intent.action.VIEW", "data": "https://$1"}"#.to_string()],
            locale: Some("et".to_string()),
            service: None,
        }],
    );
    let launches: Launches = Arc::new(Mutex::new(Vec::new()));
    let mut registry = ActionRegistry::new();
    registry.register(Box::new(RecordingHandler {
        launches: Arc::clone(&launches),
    }));
    let mut h = harness_with(&config, registry);

    h.session.on_combo_change("en-US", &ServiceRef::new("svc"));
    assert_eq!(
        h.session.on_final_result(&results(&["ava example.ee"])),
        Some(DispatchOutcome::NotACommand)
    );

    h.session.on_combo_change("et-EE", &ServiceRef::new("svc"));
    assert_eq!(
        h.session.on_final_result(&results(&["ava example.ee"])),
        Some(DispatchOutcome::Dispatched)
    );
    assert_eq!(*launches.lock().unwrap(), vec!["https://example.ee"]);
}

#[test]
fn transcript_entry_can_be_relaunched() {
    let mut h = harness();
    h.session.on_combo_change("en", &ServiceRef::new("svc"));
    h.session.on_final_result(&results(&[
        r#"{"component": "org.example/.Settings"}"#,
    ]));
    h.session.on_final_result(&results(&["hi"]));
    let before = h.session.render_data();

    h.session.handle(SessionEvent::EntryActivated(0));
    assert_eq!(*h.launches.lock().unwrap(), vec!["org.example/.Settings"]);
    assert_eq!(h.session.render_data(), before);
}

// =============================================================================
// Rendering
// =============================================================================

#[test]
fn sink_sees_one_frame_per_event() {
    let mut h = harness();
    let events = vec![
        SessionEvent::ComboChange {
            language: "en".to_string(),
            service: ServiceRef::new("svc"),
        },
        SessionEvent::StartListening,
        SessionEvent::FinalResult(results(&["hello"])),
        SessionEvent::SuggestionChosen("hi".to_string()),
        SessionEvent::Error(RecognitionErrorCode::SPEECH_TIMEOUT),
    ];
    let count = events.len();
    for event in events {
        h.session.handle(event);
    }

    let frames = h.frames.lock().unwrap();
    assert_eq!(frames.len(), count);
    let states: Vec<SessionState> = frames.iter().map(|f| f.state).collect();
    assert_eq!(
        states,
        vec![
            SessionState::Ready,
            SessionState::Ready,
            SessionState::AwaitingChoice,
            SessionState::Ready,
            SessionState::Ready,
        ]
    );
    assert_eq!(frames[2].suggestions, vec!["hello", "hi"]);
    assert!(frames[3].suggestions.is_empty());
    assert_eq!(*frames.last().unwrap(), h.session.render_data());
}

#[test]
fn frames_are_point_in_time() {
    let mut h = harness();
    h.session.on_combo_change("en", &ServiceRef::new("svc"));
    h.session.on_final_result(&results(&["hi"]));
    h.session.on_suggestion_chosen("hello");

    let frames = h.frames.lock().unwrap();
    assert_eq!(frames[0].transcript.len(), 0);
    assert_eq!(frames[1].transcript.len(), 1);
    assert_eq!(frames[2].transcript.len(), 2);
}

#[test]
fn frame_serializes_as_json() {
    let mut h = harness();
    h.session.on_combo_change("en", &ServiceRef::new("svc"));
    h.session.on_final_result(&results(&["hi"]));

    let json = serde_json::to_value(h.session.render_data()).unwrap();
    assert_eq!(json["state"], "awaiting_choice");
    assert_eq!(json["suggestions"], serde_json::json!(["hello", "hi"]));
    assert_eq!(json["transcript"][0]["seq"], 0);
    assert_eq!(json["transcript"][0]["kind"], "utterance");
    assert_eq!(json["transcript"][0]["value"], "hi");
}
