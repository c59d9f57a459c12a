//! Interruption policy
//!
//! Decides, given the requested intent and the currently active dialog,
//! whether the interruption is allowed. Pure and synchronous.

use crate::config::DispatchConfig;
use crate::dialog::DialogId;
use crate::recognizer::Intent;

/// Reply when a global query interrupts a dialog that forbids it
pub const UNABLE_TO_PROCESS_TEXT: &str =
    "Sorry! I'm unable to process that. You can say 'cancel' to cancel this conversation..";

/// Outcome of evaluating an interruption request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterruptionOutcome {
    pub allowed: bool,
    /// User-facing message when not allowed
    pub reason: String,
}

impl InterruptionOutcome {
    fn allowed() -> Self {
        Self {
            allowed: true,
            reason: String::new(),
        }
    }

    fn denied(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: reason.into(),
        }
    }
}

/// Evaluates whether a requested operation may proceed this turn
#[derive(Debug, Clone)]
pub struct InterruptionPolicy {
    nothing_to_cancel_text: String,
}

impl InterruptionPolicy {
    pub fn new(config: &DispatchConfig) -> Self {
        Self {
            nothing_to_cancel_text: config.nothing_to_cancel_text.clone(),
        }
    }

    /// Evaluate the requested intent against the active dialog
    pub fn evaluate(&self, active_dialog: Option<DialogId>, requested: Intent) -> InterruptionOutcome {
        match active_dialog {
            None => {
                if requested == Intent::Cancel {
                    return InterruptionOutcome::denied(self.nothing_to_cancel_text.clone());
                }
                InterruptionOutcome::allowed()
            }
            Some(active) => {
                // A capability query cannot interrupt the identification dialog
                if requested == Intent::WhatCanYouDo && active == DialogId::WhoAreYou {
                    return InterruptionOutcome::denied(UNABLE_TO_PROCESS_TEXT);
                }
                InterruptionOutcome::allowed()
            }
        }
    }
}
