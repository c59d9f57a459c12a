//! ConciergeBot dispatch engine
//!
//! A channel-agnostic conversational dispatch engine: recognizers map
//! utterances to intents, an interruption policy decides whether a new
//! request may interrupt the active dialog, an intent router picks the
//! dialog to run, and a turn driver orchestrates it all against a
//! persistent conversation context.

#![allow(non_snake_case)]

pub mod config;
pub mod dialog;
pub mod dispatch;
pub mod recognizer;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{ConciergeError, Result};

// Re-export main components for easy access
pub use dialog::{DialogId, FlowRegistry};
pub use dispatch::{InterruptionPolicy, IntentRouter, TurnDriver, TurnResponse, TurnStatus};
pub use recognizer::{Intent, Recognition, Recognizer};
pub use state::{ConversationContext, MemoryStateStore, RedisStateStore, StateStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
