//! Console line parsing.
//!
//! Lines starting with `:` are control commands; anything else is a final
//! speech result whose candidates are separated by `|`.

use parley_chat::SessionEvent;
use parley_core::types::{RecognitionErrorCode, ServiceRef};

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    Event(SessionEvent),
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown command: :{0}")]
    UnknownCommand(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

pub const HELP: &str = "\
commands:
  <text>[|<alt>...]     final speech result; alternatives separated by '|'
  :combo <lang> <svc>   switch language and recognition service
  :listen               start-of-listening notification
  :error <code>         recognition error (1-9)
  :choose <text>        pick a suggested reply
  :run <seq>            re-launch a transcript entry as an encoded action
  :quit                 exit";

/// Parse one console line. At most `max_results` candidates are kept.
pub fn parse_line(line: &str, max_results: usize) -> Result<ConsoleInput, InputError> {
    let Some(command) = line.strip_prefix(':') else {
        return Ok(ConsoleInput::Event(SessionEvent::FinalResult(candidates(
            line,
            max_results,
        ))));
    };

    let (name, rest) = command
        .split_once(char::is_whitespace)
        .unwrap_or((command, ""));
    let rest = rest.trim();

    let event = match name {
        "quit" | "q" => return Ok(ConsoleInput::Quit),
        "listen" => SessionEvent::StartListening,
        "combo" => {
            let mut parts = rest.split_whitespace();
            match (parts.next(), parts.next(), parts.next()) {
                (Some(language), Some(service), None) => SessionEvent::ComboChange {
                    language: language.to_string(),
                    service: ServiceRef::new(service),
                },
                _ => return Err(InputError::Usage(":combo <lang> <svc>")),
            }
        }
        "error" => rest
            .parse::<i32>()
            .map(|code| SessionEvent::Error(RecognitionErrorCode(code)))
            .map_err(|_| InputError::Usage(":error <code>"))?,
        "choose" => SessionEvent::SuggestionChosen(rest.to_string()),
        "run" => rest
            .parse::<u64>()
            .map(SessionEvent::EntryActivated)
            .map_err(|_| InputError::Usage(":run <seq>"))?,
        other => return Err(InputError::UnknownCommand(other.to_string())),
    };
    Ok(ConsoleInput::Event(event))
}

fn candidates(line: &str, max_results: usize) -> Vec<String> {
    if line.trim().is_empty() {
        return Vec::new();
    }
    line.split('|')
        .map(|c| c.trim().to_string())
        .take(max_results.max(1))
        .collect()
}
