//! ConciergeBot console demo
//!
//! Runs the dispatch engine against stdin/stdout with the deterministic
//! keyword recognizer and an in-memory state store. One line in, the
//! engine's replies out.

use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};

use ConciergeBot::{
    config::Settings,
    recognizer::KeywordRecognizer,
    state::MemoryStateStore,
    utils::logging,
    TurnDriver,
};

/// Generic apology for any turn that errors out
const TURN_ERROR_TEXT: &str = "Sorry, it looks like something went wrong.";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration, falling back to defaults for the demo
    let settings = match Settings::new() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("No configuration found ({}), using defaults", e);
            Settings::default()
        }
    };
    settings.validate()?;

    // Initialize logging; the guard keeps the file writer flushing
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting ConciergeBot console demo...");

    let recognizer = Arc::new(KeywordRecognizer::new());
    let store = Arc::new(MemoryStateStore::new());
    let driver = TurnDriver::new(&settings, recognizer, store);

    let conversation_id = uuid::Uuid::new_v4().to_string();
    info!(conversation_id = %conversation_id, "Conversation started");

    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(b"ConciergeBot ready. Say something (Ctrl-D to quit).\n> ")
        .await?;
    stdout.flush().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let utterance = line.trim();
        if utterance.is_empty() {
            stdout.write_all(b"> ").await?;
            stdout.flush().await?;
            continue;
        }

        match driver.take_turn(&conversation_id, utterance).await {
            Ok(response) => {
                for message in &response.messages {
                    stdout.write_all(format!("{}\n", message).as_bytes()).await?;
                }
                if !response.suggested_actions.is_empty() {
                    stdout
                        .write_all(
                            format!("  [{}]\n", response.suggested_actions.join(" | ")).as_bytes(),
                        )
                        .await?;
                }
            }
            Err(e) => {
                // Recognizer or state-store failures surface as one generic apology
                logging::log_turn_failure(&conversation_id, &e.to_string());
                warn!(error = %e, recoverable = e.is_recoverable(), "Turn error");
                stdout.write_all(format!("{}\n", TURN_ERROR_TEXT).as_bytes()).await?;
            }
        }

        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
    }

    info!("Conversation ended");
    Ok(())
}
