//! Parley console binary - composition root.
//!
//! 1. Load configuration from TOML
//! 2. Build the rewriter provider, action registry, and chat session
//! 3. Feed stdin lines to the session as speech events, one at a time
//!
//! Frames go to stdout; logs go to stderr.

mod cli;
mod console;
mod input;

use std::sync::Arc;

use clap::Parser;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;

use parley_action::{ActionRegistry, CommandDispatcher, ConfiguredRewriterProvider};
use parley_chat::{ChatSession, RenderSink, SessionConfig, SessionEvent};
use parley_core::config::ParleyConfig;
use parley_core::types::ServiceRef;

use cli::CliArgs;
use console::{JsonSink, TextSink};
use input::{parse_line, ConsoleInput};

/// Read stdin lines and forward them as session events until EOF or `:quit`.
async fn read_console(tx: mpsc::Sender<SessionEvent>, max_results: usize) {
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stdin");
                break;
            }
        };
        match parse_line(&line, max_results) {
            Ok(ConsoleInput::Event(event)) => {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
            Ok(ConsoleInput::Quit) => break,
            Err(e) => {
                eprintln!("{}\n{}", e, input::HELP);
            }
        }
    }
    tracing::debug!("Console reader finished");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let config = ParleyConfig::load_or_default(&config_file);

    // Tracing.
    let level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Parley v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Session.
    let provider = Arc::new(ConfiguredRewriterProvider::new(&config.rewrites));
    tracing::info!(
        tables = ?provider.table_names().collect::<Vec<_>>(),
        "Rewrite tables available"
    );
    let dispatcher = CommandDispatcher::new(ActionRegistry::with_defaults());
    let sink: Box<dyn RenderSink> = if args.json {
        Box::new(JsonSink::new(std::io::stdout()))
    } else {
        Box::new(TextSink::new(std::io::stdout()))
    };
    let mut session = ChatSession::new(SessionConfig::from(&config), provider, dispatcher, sink);
    tracing::info!(session = %session.id(), "Chat session ready");

    // Event channel. The session consumes events strictly one at a time.
    let (tx, mut rx) = mpsc::channel::<SessionEvent>(64);

    let language = args.language.unwrap_or(config.speech.language);
    let service = args.service.unwrap_or(config.speech.service);
    tx.send(SessionEvent::ComboChange {
        language,
        service: ServiceRef::new(service),
    })
    .await?;

    if !args.json {
        eprintln!("{}", input::HELP);
    }

    let max_results = config.speech.max_results;
    tokio::spawn(read_console(tx, max_results));

    while let Some(event) = rx.recv().await {
        session.handle(event);
    }

    tracing::info!(entries = session.transcript().len(), "Parley shutting down");
    Ok(())
}
