//! Recognizer types and trait seam
//!
//! A recognizer maps raw utterance text to an intent, a confidence score
//! and a set of extracted entities. Recognizers are black-box collaborators;
//! the engine only consumes their output.

pub mod arbitration;
pub mod http;
pub mod keyword;

use serde::{Deserialize, Serialize};
use crate::utils::errors::Result;

pub use arbitration::{Arbitration, RecognizerSource, arbitrate};
pub use http::HttpRecognizer;
pub use keyword::KeywordRecognizer;

/// Named categories of user requests the engine understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    BookTable,
    WhoAreYou,
    WhatCanYouDo,
    Help,
    ChitChat,
    Faq,
    Cancel,
    None,
}

impl Intent {
    /// Canonical wire name for this intent
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::BookTable => "BookTable",
            Intent::WhoAreYou => "WhoAreYou",
            Intent::WhatCanYouDo => "WhatCanYouDo",
            Intent::Help => "Help",
            Intent::ChitChat => "ChitChat",
            Intent::Faq => "Faq",
            Intent::Cancel => "Cancel",
            Intent::None => "None",
        }
    }

    /// Parse a wire name; unknown names map to `None` rather than failing,
    /// matching how an unrecognized intent falls through to the default branch.
    pub fn parse(name: &str) -> Intent {
        match name {
            "BookTable" => Intent::BookTable,
            "WhoAreYou" => Intent::WhoAreYou,
            "WhatCanYouDo" => Intent::WhatCanYouDo,
            "Help" => Intent::Help,
            "ChitChat" => Intent::ChitChat,
            "Faq" | "QnA" => Intent::Faq,
            "Cancel" => Intent::Cancel,
            _ => Intent::None,
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named value extracted from user input alongside an intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub value: String,
}

impl Entity {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The result of a recognition pass over one utterance.
/// Produced fresh each turn and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recognition {
    pub intent: Intent,
    /// Confidence score in [0, 1]
    pub score: f32,
    /// Entities in the order the recognizer extracted them
    pub entities: Vec<Entity>,
}

impl Recognition {
    pub fn new(intent: Intent, score: f32) -> Self {
        Self {
            intent,
            score,
            entities: Vec::new(),
        }
    }

    pub fn with_entities(intent: Intent, score: f32, entities: Vec<Entity>) -> Self {
        Self {
            intent,
            score,
            entities,
        }
    }

    /// Recognition carrying no intent at all
    pub fn none() -> Self {
        Self::new(Intent::None, 0.0)
    }

    /// Look up the first entity with the given name
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }
}

/// Black-box NLU collaborator
#[async_trait::async_trait]
pub trait Recognizer: Send + Sync {
    /// Map raw utterance text to an intent, score and entities
    async fn recognize(&self, utterance: &str) -> Result<Recognition>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_round_trip() {
        for intent in [
            Intent::BookTable,
            Intent::WhoAreYou,
            Intent::WhatCanYouDo,
            Intent::Help,
            Intent::ChitChat,
            Intent::Faq,
            Intent::Cancel,
            Intent::None,
        ] {
            assert_eq!(Intent::parse(intent.as_str()), intent);
        }
    }

    #[test]
    fn test_unknown_intent_maps_to_none() {
        assert_eq!(Intent::parse("OrderPizza"), Intent::None);
        assert_eq!(Intent::parse(""), Intent::None);
    }

    #[test]
    fn test_entity_lookup_preserves_order() {
        let recognition = Recognition::with_entities(
            Intent::BookTable,
            0.8,
            vec![
                Entity::new("location", "Seattle"),
                Entity::new("location", "Redmond"),
            ],
        );
        assert_eq!(recognition.entity("location").unwrap().value, "Seattle");
        assert!(recognition.entity("partySize").is_none());
    }
}
