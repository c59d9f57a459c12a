//! Built-in concierge dialog flows

use std::collections::HashMap;
use crate::state::context::USER_PROFILE_SLOT;
use super::{DialogFlow, DialogId, FlowOutcome, FlowStep, InputType, StepValidation};

/// Create the "who are you" flow: asks for the user's name and greets them.
/// Not interruptible; a user mid-identification has to finish or cancel.
pub fn create_who_are_you_flow() -> DialogFlow {
    let mut steps = HashMap::new();

    steps.insert("name_input".to_string(), FlowStep {
        id: "name_input".to_string(),
        prompt: "Hello, I'm the concierge bot! What's your name?".to_string(),
        slot: Some(USER_PROFILE_SLOT.to_string()),
        validation: Some(StepValidation {
            input_type: InputType::Text,
            min_length: Some(2),
            max_length: Some(50),
            pattern: Some(r"^[a-zA-Z\s]+$".to_string()),
            error_message: Some("Names should be 2-50 characters, letters and spaces only. What's your name?".to_string()),
        }),
        next_steps: vec!["greeting".to_string()],
        outcome: None,
    });

    steps.insert("greeting".to_string(), FlowStep {
        id: "greeting".to_string(),
        prompt: format!("Hello {{{}}}, nice to meet you!", USER_PROFILE_SLOT),
        slot: None,
        validation: None,
        next_steps: vec![],
        outcome: Some(FlowOutcome::Complete),
    });

    DialogFlow {
        id: DialogId::WhoAreYou,
        initial_step: "name_input".to_string(),
        steps,
        interruptible: false,
        transient_slots: vec![],
    }
}

/// Create the table booking flow: location, date, time, party size, confirm.
pub fn create_book_table_flow() -> DialogFlow {
    let mut steps = HashMap::new();

    steps.insert("location_input".to_string(), FlowStep {
        id: "location_input".to_string(),
        prompt: "Sure, I can help with that! Which location would you like to book a table at?".to_string(),
        slot: Some("location".to_string()),
        validation: Some(StepValidation {
            input_type: InputType::Text,
            min_length: Some(2),
            max_length: Some(100),
            pattern: None,
            error_message: Some("Please give me a location name.".to_string()),
        }),
        next_steps: vec!["date_input".to_string()],
        outcome: None,
    });

    steps.insert("date_input".to_string(), FlowStep {
        id: "date_input".to_string(),
        prompt: "What date should I book the table for? (YYYY-MM-DD)".to_string(),
        slot: Some("date".to_string()),
        validation: Some(StepValidation {
            input_type: InputType::Date,
            min_length: None,
            max_length: None,
            pattern: None,
            error_message: Some("Please give me a valid date (YYYY-MM-DD).".to_string()),
        }),
        next_steps: vec!["time_input".to_string()],
        outcome: None,
    });

    steps.insert("time_input".to_string(), FlowStep {
        id: "time_input".to_string(),
        prompt: "What time works for you? (HH:MM)".to_string(),
        slot: Some("time".to_string()),
        validation: Some(StepValidation {
            input_type: InputType::Time,
            min_length: None,
            max_length: None,
            pattern: None,
            error_message: Some("Please give me a valid time (HH:MM).".to_string()),
        }),
        next_steps: vec!["party_size_input".to_string()],
        outcome: None,
    });

    steps.insert("party_size_input".to_string(), FlowStep {
        id: "party_size_input".to_string(),
        prompt: "How many guests should I book for?".to_string(),
        slot: Some("partySize".to_string()),
        validation: Some(StepValidation {
            input_type: InputType::Number,
            min_length: None,
            max_length: None,
            pattern: Some(r"^\d{1,2}$".to_string()),
            error_message: Some("Please give me a number of guests (1-99).".to_string()),
        }),
        next_steps: vec!["confirmation".to_string()],
        outcome: None,
    });

    steps.insert("confirmation".to_string(), FlowStep {
        id: "confirmation".to_string(),
        prompt: "Booking a table for {partySize} at {location} on {date} at {time}. Should I go ahead? (confirm/cancel)".to_string(),
        slot: None,
        validation: Some(StepValidation {
            input_type: InputType::Choice(vec!["confirm".to_string(), "cancel".to_string()]),
            min_length: None,
            max_length: None,
            pattern: None,
            error_message: Some("Please say 'confirm' or 'cancel'.".to_string()),
        }),
        next_steps: vec!["confirm".to_string(), "cancel".to_string()],
        outcome: None,
    });

    steps.insert("confirm".to_string(), FlowStep {
        id: "confirm".to_string(),
        prompt: "Your table for {partySize} at {location} on {date} at {time} is booked. See you soon!".to_string(),
        slot: None,
        validation: None,
        next_steps: vec![],
        outcome: Some(FlowOutcome::Complete),
    });

    steps.insert("cancel".to_string(), FlowStep {
        id: "cancel".to_string(),
        prompt: "Okay, I've dropped that booking request.".to_string(),
        slot: None,
        validation: None,
        next_steps: vec![],
        outcome: Some(FlowOutcome::Cancel),
    });

    DialogFlow {
        id: DialogId::BookTable,
        initial_step: "location_input".to_string(),
        steps,
        interruptible: true,
        transient_slots: vec![
            "location".to_string(),
            "date".to_string(),
            "time".to_string(),
            "partySize".to_string(),
        ],
    }
}

/// Create the single-turn capability summary flow
pub fn create_what_can_you_do_flow() -> DialogFlow {
    let mut steps = HashMap::new();

    steps.insert("summary".to_string(), FlowStep {
        id: "summary".to_string(),
        prompt: "I can book a table for you, tell you who I am, and answer questions about \
                 locations, opening hours and the menu."
            .to_string(),
        slot: None,
        validation: None,
        next_steps: vec![],
        outcome: Some(FlowOutcome::Complete),
    });

    DialogFlow {
        id: DialogId::WhatCanYouDo,
        initial_step: "summary".to_string(),
        steps,
        interruptible: true,
        transient_slots: vec![],
    }
}

/// Create the single-turn FAQ flow; the answer comes from the FAQ recognizer
/// via the `faqAnswer` slot the driver sets before beginning the flow.
pub fn create_faq_flow() -> DialogFlow {
    let mut steps = HashMap::new();

    steps.insert("answer".to_string(), FlowStep {
        id: "answer".to_string(),
        prompt: "{faqAnswer}".to_string(),
        slot: None,
        validation: None,
        next_steps: vec![],
        outcome: Some(FlowOutcome::Complete),
    });

    DialogFlow {
        id: DialogId::Faq,
        initial_step: "answer".to_string(),
        steps,
        interruptible: true,
        transient_slots: vec!["faqAnswer".to_string()],
    }
}
