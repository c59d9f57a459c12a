//! Dialog flows
//!
//! This module defines the declarative multi-turn dialog flows the engine
//! can run: step definitions, input validation, and the registry that
//! starts, advances and re-prompts flows against a conversation context.

pub mod flows;

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use crate::state::context::{ConversationContext, RESERVATION_SLOT};
use crate::utils::errors::{ConciergeError, Result};

/// Identifies a dialog the engine can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DialogId {
    BookTable,
    WhoAreYou,
    WhatCanYouDo,
    Faq,
}

impl DialogId {
    pub fn as_str(&self) -> &'static str {
        match self {
            DialogId::BookTable => "BookTable",
            DialogId::WhoAreYou => "WhoAreYou",
            DialogId::WhatCanYouDo => "WhatCanYouDo",
            DialogId::Faq => "Faq",
        }
    }
}

impl std::fmt::Display for DialogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Types of input expected in a step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InputType {
    Text,
    Number,
    Date,
    Time,
    Choice(Vec<String>),
}

/// Validation rules for a flow step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepValidation {
    /// Input type expected
    pub input_type: InputType,
    /// Minimum length (for text inputs)
    pub min_length: Option<usize>,
    /// Maximum length (for text inputs)
    pub max_length: Option<usize>,
    /// Pattern to match (regex)
    pub pattern: Option<String>,
    /// Custom validation message
    pub error_message: Option<String>,
}

/// What reaching a terminal step means for the dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowOutcome {
    Complete,
    Cancel,
}

/// A step within a dialog flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowStep {
    /// Step identifier
    pub id: String,
    /// Prompt shown when entering the step; for terminal steps this is the
    /// final reply template
    pub prompt: String,
    /// Context slot receiving the validated input
    pub slot: Option<String>,
    /// Validation rules for user input
    pub validation: Option<StepValidation>,
    /// Possible next steps; empty for terminal steps
    pub next_steps: Vec<String>,
    /// Marks a terminal step
    pub outcome: Option<FlowOutcome>,
}

/// A multi-turn dialog flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogFlow {
    pub id: DialogId,
    /// Initial step when the flow begins
    pub initial_step: String,
    /// All steps in this flow
    pub steps: HashMap<String, FlowStep>,
    /// Whether this flow can be interrupted mid-way
    pub interruptible: bool,
    /// Slots cleared once the flow reaches a terminal step
    pub transient_slots: Vec<String>,
}

/// Result of entering or advancing a flow step
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// The flow waits for user input with this prompt
    Waiting { prompt: String },
    /// The input failed validation; the step does not advance
    Invalid { message: String },
    /// The flow finished; reply rendered from collected slots
    Complete { reply: String },
    /// The flow was cancelled from within
    Cancelled { reply: String },
}

/// Registry owning all dialog flows
#[derive(Debug, Clone)]
pub struct FlowRegistry {
    flows: HashMap<DialogId, DialogFlow>,
}

impl FlowRegistry {
    /// Create a registry with the built-in concierge flows
    pub fn new() -> Self {
        let mut registry = Self {
            flows: HashMap::new(),
        };

        registry.register(flows::create_who_are_you_flow());
        registry.register(flows::create_book_table_flow());
        registry.register(flows::create_what_can_you_do_flow());
        registry.register(flows::create_faq_flow());
        registry
    }

    /// Register a flow
    pub fn register(&mut self, flow: DialogFlow) {
        self.flows.insert(flow.id, flow);
    }

    /// Get a flow by id
    pub fn flow(&self, id: DialogId) -> Option<&DialogFlow> {
        self.flows.get(&id)
    }

    /// Check whether a flow allows interruption
    pub fn can_interrupt(&self, id: DialogId) -> bool {
        self.flow(id).map(|f| f.interruptible).unwrap_or(true)
    }

    /// Begin a flow on the given context
    pub fn begin(&self, context: &mut ConversationContext, id: DialogId) -> Result<StepOutcome> {
        let flow = self.flow(id)
            .ok_or_else(|| ConciergeError::UnknownDialog(id.to_string()))?;

        context.begin_dialog(id, &flow.initial_step);
        self.enter_step(context, id, &flow.initial_step.clone())
    }

    /// Advance the active flow with one user input
    pub fn advance(&self, context: &mut ConversationContext, input: &str) -> Result<StepOutcome> {
        let dialog = context.dialog
            .ok_or_else(|| ConciergeError::InvalidStateTransition {
                from: "no_dialog".to_string(),
                to: "advance".to_string(),
            })?;

        let flow = self.flow(dialog)
            .ok_or_else(|| ConciergeError::UnknownDialog(dialog.to_string()))?;

        let step_id = context.step.clone()
            .ok_or_else(|| ConciergeError::InvalidStateTransition {
                from: dialog.to_string(),
                to: "advance".to_string(),
            })?;

        let step = flow.steps.get(&step_id)
            .ok_or_else(|| ConciergeError::InvalidInput(format!("Unknown step: {}", step_id)))?;

        let input = input.trim();
        if let Some(validation) = &step.validation {
            if let Err(message) = validate_input(input, validation) {
                return Ok(StepOutcome::Invalid { message });
            }
        }

        if let Some(slot) = step.slot.clone() {
            context.set_data(&slot, input)?;
        }

        // Choice inputs select the matching successor; everything else
        // follows the single next step.
        let next_id = match &step.validation {
            Some(StepValidation { input_type: InputType::Choice(_), .. }) => {
                let choice = input.to_lowercase();
                step.next_steps
                    .iter()
                    .find(|s| **s == choice)
                    .or_else(|| step.next_steps.first())
            }
            _ => step.next_steps.first(),
        };

        let next_id = next_id
            .ok_or_else(|| ConciergeError::InvalidStateTransition {
                from: step_id.clone(),
                to: "terminal".to_string(),
            })?
            .clone();

        if !flow.steps.contains_key(&next_id) {
            return Err(ConciergeError::InvalidInput(format!("Unknown step: {}", next_id)));
        }

        context.next_step(&next_id)?;
        self.enter_step(context, dialog, &next_id)
    }

    /// Cancel the active flow, discarding its transient slots
    pub fn cancel(&self, context: &mut ConversationContext) {
        if let Some(flow) = context.dialog.and_then(|d| self.flow(d)) {
            for slot in flow.transient_slots.clone() {
                context.remove_data(&slot);
            }
        }
        context.cancel_dialog();
    }

    /// Render the current step's prompt again (e.g. after a denied interruption)
    pub fn reprompt(&self, context: &ConversationContext) -> Result<String> {
        let dialog = context.dialog
            .ok_or_else(|| ConciergeError::InvalidInput("No active dialog".to_string()))?;

        let flow = self.flow(dialog)
            .ok_or_else(|| ConciergeError::UnknownDialog(dialog.to_string()))?;

        let step_id = context.step.as_ref()
            .ok_or_else(|| ConciergeError::InvalidInput("No active step".to_string()))?;

        let step = flow.steps.get(step_id)
            .ok_or_else(|| ConciergeError::InvalidInput(format!("Unknown step: {}", step_id)))?;

        Ok(render_template(&step.prompt, context))
    }

    fn enter_step(
        &self,
        context: &mut ConversationContext,
        dialog: DialogId,
        step_id: &str,
    ) -> Result<StepOutcome> {
        let flow = self.flow(dialog)
            .ok_or_else(|| ConciergeError::UnknownDialog(dialog.to_string()))?;

        let step = flow.steps.get(step_id)
            .ok_or_else(|| ConciergeError::InvalidInput(format!("Unknown step: {}", step_id)))?;

        let reply = render_template(&step.prompt, context);

        match step.outcome {
            None => Ok(StepOutcome::Waiting { prompt: reply }),
            Some(FlowOutcome::Complete) => {
                if dialog == DialogId::BookTable {
                    self.store_reservation(context)?;
                }
                for slot in flow.transient_slots.clone() {
                    context.remove_data(&slot);
                }
                context.complete_dialog();
                Ok(StepOutcome::Complete { reply })
            }
            Some(FlowOutcome::Cancel) => {
                for slot in flow.transient_slots.clone() {
                    context.remove_data(&slot);
                }
                context.cancel_dialog();
                Ok(StepOutcome::Cancelled { reply })
            }
        }
    }

    /// Bundle the collected booking slots into the reservation property
    fn store_reservation(&self, context: &mut ConversationContext) -> Result<()> {
        let reservation = serde_json::json!({
            "location": context.get_string("location"),
            "date": context.get_string("date"),
            "time": context.get_string("time"),
            "partySize": context.get_string("partySize"),
        });
        context.set_data(RESERVATION_SLOT, reservation)
    }
}

impl Default for FlowRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Replace `{slot}` tokens in a template with context slot values
fn render_template(template: &str, context: &ConversationContext) -> String {
    let mut rendered = template.to_string();
    for (key, value) in &context.data {
        let token = format!("{{{}}}", key);
        if rendered.contains(&token) {
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            rendered = rendered.replace(&token, &text);
        }
    }
    rendered
}

/// Validate input against a step's rules; returns the user-facing message on failure
fn validate_input(input: &str, validation: &StepValidation) -> std::result::Result<(), String> {
    let message = |fallback: String| {
        validation.error_message.clone().unwrap_or(fallback)
    };

    if let Some(min_length) = validation.min_length {
        if input.len() < min_length {
            return Err(message(format!("Input too short (minimum {} characters)", min_length)));
        }
    }

    if let Some(max_length) = validation.max_length {
        if input.len() > max_length {
            return Err(message(format!("Input too long (maximum {} characters)", max_length)));
        }
    }

    if let Some(pattern) = &validation.pattern {
        // Patterns are fixed at flow-definition time
        let regex = regex::Regex::new(pattern)
            .map_err(|_| "Input format is invalid".to_string())?;
        if !regex.is_match(input) {
            return Err(message("Input format is invalid".to_string()));
        }
    }

    match &validation.input_type {
        InputType::Number => {
            if input.parse::<f64>().is_err() {
                return Err(message("Invalid number format".to_string()));
            }
        }
        InputType::Date => {
            if chrono::NaiveDate::parse_from_str(input, "%Y-%m-%d").is_err() {
                return Err(message("Invalid date format (YYYY-MM-DD)".to_string()));
            }
        }
        InputType::Time => {
            if chrono::NaiveTime::parse_from_str(input, "%H:%M").is_err() {
                return Err(message("Invalid time format (HH:MM)".to_string()));
            }
        }
        InputType::Choice(choices) => {
            if !choices.iter().any(|c| c.eq_ignore_ascii_case(input)) {
                return Err(message(
                    format!("Invalid choice. Available options: {}", choices.join(", "))
                ));
            }
        }
        InputType::Text => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::context::USER_PROFILE_SLOT;

    #[test]
    fn test_registry_has_builtin_flows() {
        let registry = FlowRegistry::new();

        assert!(registry.flow(DialogId::WhoAreYou).is_some());
        assert!(registry.flow(DialogId::BookTable).is_some());
        assert!(registry.flow(DialogId::WhatCanYouDo).is_some());
        assert!(registry.flow(DialogId::Faq).is_some());
    }

    #[test]
    fn test_who_are_you_is_not_interruptible() {
        let registry = FlowRegistry::new();
        assert!(!registry.can_interrupt(DialogId::WhoAreYou));
        assert!(registry.can_interrupt(DialogId::BookTable));
    }

    #[test]
    fn test_who_are_you_flow() {
        let registry = FlowRegistry::new();
        let mut context = ConversationContext::new("conv-1");

        let outcome = registry.begin(&mut context, DialogId::WhoAreYou).unwrap();
        assert!(matches!(outcome, StepOutcome::Waiting { .. }));

        let outcome = registry.advance(&mut context, "Vlad").unwrap();
        match outcome {
            StepOutcome::Complete { reply } => assert!(reply.contains("Vlad")),
            other => panic!("expected completion, got {:?}", other),
        }

        // Name persists in the user profile after the dialog ends
        assert_eq!(context.get_string(USER_PROFILE_SLOT), Some("Vlad".to_string()));
        assert!(context.dialog.is_none());
    }

    #[test]
    fn test_who_are_you_rejects_invalid_name() {
        let registry = FlowRegistry::new();
        let mut context = ConversationContext::new("conv-1");

        registry.begin(&mut context, DialogId::WhoAreYou).unwrap();

        let outcome = registry.advance(&mut context, "X").unwrap();
        assert!(matches!(outcome, StepOutcome::Invalid { .. }));
        // Step did not advance
        assert!(context.is_at_step("name_input"));
    }

    #[test]
    fn test_book_table_happy_path() {
        let registry = FlowRegistry::new();
        let mut context = ConversationContext::new("conv-1");

        registry.begin(&mut context, DialogId::BookTable).unwrap();
        registry.advance(&mut context, "downtown").unwrap();
        registry.advance(&mut context, "2026-09-15").unwrap();
        registry.advance(&mut context, "19:30").unwrap();
        registry.advance(&mut context, "4").unwrap();

        let outcome = registry.advance(&mut context, "confirm").unwrap();
        match outcome {
            StepOutcome::Complete { reply } => {
                assert!(reply.contains("downtown"));
                assert!(reply.contains("2026-09-15"));
                assert!(reply.contains("19:30"));
                assert!(reply.contains("4"));
            }
            other => panic!("expected completion, got {:?}", other),
        }

        // Reservation property was stored, transient slots cleared
        assert!(context.data.contains_key(RESERVATION_SLOT));
        assert_eq!(context.get_string("location"), None);
    }

    #[test]
    fn test_book_table_cancel_at_confirmation() {
        let registry = FlowRegistry::new();
        let mut context = ConversationContext::new("conv-1");

        registry.begin(&mut context, DialogId::BookTable).unwrap();
        registry.advance(&mut context, "downtown").unwrap();
        registry.advance(&mut context, "2026-09-15").unwrap();
        registry.advance(&mut context, "19:30").unwrap();
        registry.advance(&mut context, "4").unwrap();

        let outcome = registry.advance(&mut context, "cancel").unwrap();
        assert!(matches!(outcome, StepOutcome::Cancelled { .. }));
        assert!(context.dialog.is_none());
        assert!(!context.data.contains_key(RESERVATION_SLOT));
    }

    #[test]
    fn test_book_table_confirmation_rejects_other_input() {
        let registry = FlowRegistry::new();
        let mut context = ConversationContext::new("conv-1");

        registry.begin(&mut context, DialogId::BookTable).unwrap();
        registry.advance(&mut context, "downtown").unwrap();
        registry.advance(&mut context, "2026-09-15").unwrap();
        registry.advance(&mut context, "19:30").unwrap();
        registry.advance(&mut context, "4").unwrap();

        let outcome = registry.advance(&mut context, "maybe").unwrap();
        assert!(matches!(outcome, StepOutcome::Invalid { .. }));
        assert!(context.is_at_step("confirmation"));
    }

    #[test]
    fn test_book_table_date_validation() {
        let registry = FlowRegistry::new();
        let mut context = ConversationContext::new("conv-1");

        registry.begin(&mut context, DialogId::BookTable).unwrap();
        registry.advance(&mut context, "downtown").unwrap();

        let outcome = registry.advance(&mut context, "next tuesday").unwrap();
        assert!(matches!(outcome, StepOutcome::Invalid { .. }));

        let outcome = registry.advance(&mut context, "2026-09-15").unwrap();
        assert!(matches!(outcome, StepOutcome::Waiting { .. }));
    }

    #[test]
    fn test_what_can_you_do_completes_immediately() {
        let registry = FlowRegistry::new();
        let mut context = ConversationContext::new("conv-1");

        let outcome = registry.begin(&mut context, DialogId::WhatCanYouDo).unwrap();
        assert!(matches!(outcome, StepOutcome::Complete { .. }));
        assert!(context.dialog.is_none());
    }

    #[test]
    fn test_faq_renders_answer_slot() {
        let registry = FlowRegistry::new();
        let mut context = ConversationContext::new("conv-1");
        context.set_data("faqAnswer", "We open at 9am.").unwrap();

        let outcome = registry.begin(&mut context, DialogId::Faq).unwrap();
        match outcome {
            StepOutcome::Complete { reply } => assert_eq!(reply, "We open at 9am."),
            other => panic!("expected completion, got {:?}", other),
        }
        // The answer slot is transient
        assert_eq!(context.get_string("faqAnswer"), None);
    }

    #[test]
    fn test_reprompt_returns_current_prompt() {
        let registry = FlowRegistry::new();
        let mut context = ConversationContext::new("conv-1");

        let outcome = registry.begin(&mut context, DialogId::BookTable).unwrap();
        let prompt = match outcome {
            StepOutcome::Waiting { prompt } => prompt,
            other => panic!("expected waiting, got {:?}", other),
        };

        assert_eq!(registry.reprompt(&context).unwrap(), prompt);
    }
}
