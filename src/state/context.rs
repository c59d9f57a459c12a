//! Conversation context management
//!
//! This module tracks per-conversation state: the active dialog at the top
//! of the stack, the current step within it, and named data slots collected
//! across turns (user profile, reservation details).

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc, Duration};

use crate::dialog::DialogId;
use crate::utils::errors::{ConciergeError, Result};

/// Well-known slot holding the user profile
pub const USER_PROFILE_SLOT: &str = "userProfile";
/// Well-known slot holding in-progress reservation details
pub const RESERVATION_SLOT: &str = "reservationProperty";

/// Per-conversation state persisted between turns.
///
/// At most one dialog is active at a time; `dialog`/`step` model the top of
/// the stack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationContext {
    /// Conversation this context belongs to
    pub conversation_id: String,
    /// Currently active dialog, if any
    pub dialog: Option<DialogId>,
    /// Current step within the active dialog
    pub step: Option<String>,
    /// Named data slots
    pub data: HashMap<String, serde_json::Value>,
    /// When this context expires (for cleanup)
    pub expires_at: Option<DateTime<Utc>>,
    /// When this context was last updated
    pub updated_at: DateTime<Utc>,
}

impl ConversationContext {
    /// Create a new context for a conversation
    pub fn new(conversation_id: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            dialog: None,
            step: None,
            data: HashMap::new(),
            expires_at: None,
            updated_at: Utc::now(),
        }
    }

    /// Begin a dialog at its initial step
    pub fn begin_dialog(&mut self, dialog: DialogId, initial_step: &str) {
        self.dialog = Some(dialog);
        self.step = Some(initial_step.to_string());
        self.updated_at = Utc::now();
        self.expires_at = Some(Utc::now() + Duration::hours(24));
    }

    /// Move to the next step in the active dialog
    pub fn next_step(&mut self, step: &str) -> Result<()> {
        if self.dialog.is_none() {
            return Err(ConciergeError::InvalidStateTransition {
                from: "no_dialog".to_string(),
                to: step.to_string(),
            });
        }

        self.step = Some(step.to_string());
        self.updated_at = Utc::now();
        Ok(())
    }

    /// End the active dialog, keeping collected slot data
    pub fn complete_dialog(&mut self) {
        self.dialog = None;
        self.step = None;
        self.expires_at = None;
        self.updated_at = Utc::now();
    }

    /// Cancel the active dialog and discard the reservation slot
    pub fn cancel_dialog(&mut self) {
        self.data.remove(RESERVATION_SLOT);
        self.complete_dialog();
    }

    /// Set a data slot
    pub fn set_data<T: Serialize>(&mut self, key: &str, value: T) -> Result<()> {
        let json_value = serde_json::to_value(value)?;
        self.data.insert(key.to_string(), json_value);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Get a data slot
    pub fn get_data<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Result<Option<T>> {
        if let Some(value) = self.data.get(key) {
            let result: T = serde_json::from_value(value.clone())?;
            Ok(Some(result))
        } else {
            Ok(None)
        }
    }

    /// Get string slot data (convenience method)
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get_data::<String>(key).unwrap_or(None)
    }

    /// Remove a data slot
    pub fn remove_data(&mut self, key: &str) -> Option<serde_json::Value> {
        self.updated_at = Utc::now();
        self.data.remove(key)
    }

    /// Check if context has expired
    pub fn is_expired(&self) -> bool {
        if let Some(expires_at) = self.expires_at {
            Utc::now() > expires_at
        } else {
            false
        }
    }

    /// Set custom expiry time
    pub fn set_expiry(&mut self, expires_at: DateTime<Utc>) {
        self.expires_at = Some(expires_at);
        self.updated_at = Utc::now();
    }

    /// Check if a specific dialog is active
    pub fn is_in_dialog(&self, dialog: DialogId) -> bool {
        self.dialog == Some(dialog)
    }

    /// Check if the active dialog is at a specific step
    pub fn is_at_step(&self, step: &str) -> bool {
        self.step.as_deref() == Some(step)
    }

    /// Get active dialog and step as a tuple
    pub fn current_state(&self) -> (Option<DialogId>, Option<&str>) {
        (self.dialog, self.step.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context() {
        let context = ConversationContext::new("conv-1");
        assert_eq!(context.conversation_id, "conv-1");
        assert!(context.dialog.is_none());
        assert!(context.step.is_none());
        assert!(context.data.is_empty());
        assert!(context.expires_at.is_none());
    }

    #[test]
    fn test_begin_dialog() {
        let mut context = ConversationContext::new("conv-1");
        context.begin_dialog(DialogId::WhoAreYou, "name_input");

        assert!(context.is_in_dialog(DialogId::WhoAreYou));
        assert!(context.is_at_step("name_input"));
        assert!(context.expires_at.is_some());
    }

    #[test]
    fn test_next_step_requires_active_dialog() {
        let mut context = ConversationContext::new("conv-1");
        assert!(context.next_step("anywhere").is_err());

        context.begin_dialog(DialogId::BookTable, "location_input");
        assert!(context.next_step("date_input").is_ok());
        assert!(context.is_at_step("date_input"));
    }

    #[test]
    fn test_complete_keeps_slot_data() {
        let mut context = ConversationContext::new("conv-1");
        context.begin_dialog(DialogId::WhoAreYou, "name_input");
        context.set_data(USER_PROFILE_SLOT, "Vlad").unwrap();
        context.complete_dialog();

        assert!(context.dialog.is_none());
        assert_eq!(context.get_string(USER_PROFILE_SLOT), Some("Vlad".to_string()));
    }

    #[test]
    fn test_cancel_discards_reservation() {
        let mut context = ConversationContext::new("conv-1");
        context.begin_dialog(DialogId::BookTable, "location_input");
        context.set_data(RESERVATION_SLOT, "downtown").unwrap();
        context.cancel_dialog();

        assert!(context.dialog.is_none());
        assert_eq!(context.get_string(RESERVATION_SLOT), None);
    }

    #[test]
    fn test_expiry() {
        let mut context = ConversationContext::new("conv-1");

        context.set_expiry(Utc::now() - Duration::hours(1));
        assert!(context.is_expired());

        context.set_expiry(Utc::now() + Duration::hours(1));
        assert!(!context.is_expired());
    }
}
