//! Stdout render sinks for the console.

use std::io::Write;

use parley_chat::{RenderSink, RenderView};

/// Prints transcript entries as they appear, followed by the current
/// suggestions.
#[derive(Debug, Default)]
pub struct TextSink<W> {
    out: W,
    printed: usize,
    last_suggestions: Vec<String>,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            printed: 0,
            last_suggestions: Vec::new(),
        }
    }

    fn write_frame(&mut self, view: &RenderView) -> std::io::Result<()> {
        for entry in view.transcript.iter().skip(self.printed) {
            writeln!(self.out, "[{}] {}", entry.seq, entry)?;
        }
        self.printed = view.transcript.len();

        if view.suggestions != self.last_suggestions {
            if view.suggestions.is_empty() {
                writeln!(self.out, "   (no suggestions)")?;
            } else {
                writeln!(self.out, "   suggestions: {}", view.suggestions.join(" | "))?;
            }
            self.last_suggestions = view.suggestions.clone();
        }
        self.out.flush()
    }
}

impl<W: Write> RenderSink for TextSink<W> {
    fn render(&mut self, view: &RenderView) {
        if let Err(e) = self.write_frame(view) {
            tracing::warn!(error = %e, "Failed to write frame");
        }
    }
}

/// Prints every frame as one JSON line.
#[derive(Debug, Default)]
pub struct JsonSink<W> {
    out: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn write_frame(&mut self, view: &RenderView) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.out, view)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

impl<W: Write> RenderSink for JsonSink<W> {
    fn render(&mut self, view: &RenderView) {
        if let Err(e) = self.write_frame(view) {
            tracing::warn!(error = %e, "Failed to write frame");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use parley_action::{ActionRegistry, CommandDispatcher, ConfiguredRewriterProvider};
    use parley_chat::{ChatSession, SessionConfig};
    use parley_core::types::ServiceRef;

    /// Drive a session and return the views it rendered.
    fn views() -> Vec<RenderView> {
        let frames = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink_frames = Arc::clone(&frames);
        let mut session = ChatSession::new(
            SessionConfig::default(),
            Arc::new(ConfiguredRewriterProvider::builtin()),
            CommandDispatcher::new(ActionRegistry::new()),
            Box::new(move |v: &RenderView| sink_frames.lock().unwrap().push(v.clone())),
        );
        session.on_combo_change("en", &ServiceRef::new("svc"));
        session.on_final_result(&["hi".to_string()]);
        session.on_suggestion_chosen("hello");
        let out = frames.lock().unwrap().clone();
        out
    }

    #[test]
    fn test_text_sink_prints_new_entries_once() {
        let mut sink = TextSink::new(Vec::new());
        for view in views() {
            sink.render(&view);
        }
        let text = String::from_utf8(sink.out).unwrap();
        assert_eq!(
            text,
            "[0] hi\n   suggestions: hello | hi\n[1] hello\n   (no suggestions)\n"
        );
    }

    #[test]
    fn test_json_sink_writes_one_line_per_frame() {
        let mut sink = JsonSink::new(Vec::new());
        for view in views() {
            sink.render(&view);
        }
        let text = String::from_utf8(sink.out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        let last: serde_json::Value = serde_json::from_str(lines[2]).unwrap();
        assert_eq!(last["state"], "ready");
        assert_eq!(last["transcript"][1]["kind"], "suggestion_choice");
    }
}
