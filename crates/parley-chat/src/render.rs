//! Render output of the chat session.
//!
//! The session never draws anything; after each event it hands the current
//! transcript and suggestion set to a `RenderSink`.

use serde::Serialize;

use crate::session::SessionState;
use crate::suggestion::SuggestionSet;
use crate::transcript::TranscriptSnapshot;

/// Everything a UI needs to draw the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderView {
    pub transcript: TranscriptSnapshot,
    pub suggestions: SuggestionSet,
    pub state: SessionState,
}

/// Receives a render view after every session event.
pub trait RenderSink {
    fn render(&mut self, view: &RenderView);
}

impl<F> RenderSink for F
where
    F: FnMut(&RenderView),
{
    fn render(&mut self, view: &RenderView) {
        self(view)
    }
}

/// Sink that discards every view.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn render(&mut self, _view: &RenderView) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::{ConversationLog, EntryKind};

    fn view() -> RenderView {
        let mut log = ConversationLog::new();
        log.append(EntryKind::Utterance("hi".to_string()));
        RenderView {
            transcript: log.all(),
            suggestions: vec!["hello".to_string(), "hi".to_string()],
            state: SessionState::AwaitingChoice,
        }
    }

    #[test]
    fn test_closure_sink_receives_view() {
        let mut seen = Vec::new();
        {
            let mut sink = |v: &RenderView| seen.push(v.suggestions.len());
            sink.render(&view());
            sink.render(&view());
        }
        assert_eq!(seen, vec![2, 2]);
    }

    #[test]
    fn test_null_sink() {
        let mut sink = NullSink;
        sink.render(&view());
    }

    #[test]
    fn test_view_serializes() {
        let json = serde_json::to_value(view()).unwrap();
        assert_eq!(json["state"], "awaiting_choice");
        assert_eq!(json["suggestions"][1], "hi");
        assert_eq!(json["transcript"][0]["kind"], "utterance");
        assert_eq!(json["transcript"][0]["value"], "hi");
    }
}
