//! Intent router
//!
//! Maps a recognized intent to a dialog-start action through a static table.
//! Low-confidence and unmapped intents fall through to a fallback reply with
//! a web-search suggestion link.

use crate::config::DispatchConfig;
use crate::dialog::DialogId;
use crate::recognizer::{Intent, Recognition};

/// Command produced by routing one recognition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAction {
    /// Begin the named dialog
    Begin(DialogId),
    /// Cancel the active dialog stack
    CancelActive,
    /// Emit the fallback messages; no dialog begins
    Fallback { messages: Vec<String> },
}

/// Routes intents to dialogs
#[derive(Debug, Clone)]
pub struct IntentRouter {
    min_score: f32,
    fallback_text: String,
    search_url_base: String,
}

impl IntentRouter {
    pub fn new(config: &DispatchConfig) -> Self {
        Self {
            min_score: config.min_score,
            fallback_text: config.fallback_text.clone(),
            search_url_base: config.search_url_base.clone(),
        }
    }

    /// The static intent-to-dialog table. Help, ChitChat and Faq all share
    /// the FAQ knowledge base, so they route to the same dialog.
    pub fn dialog_for(intent: Intent) -> Option<DialogId> {
        match intent {
            Intent::BookTable => Some(DialogId::BookTable),
            Intent::WhoAreYou => Some(DialogId::WhoAreYou),
            Intent::WhatCanYouDo => Some(DialogId::WhatCanYouDo),
            Intent::Help => Some(DialogId::Faq),
            Intent::ChitChat => Some(DialogId::Faq),
            Intent::Faq => Some(DialogId::Faq),
            Intent::Cancel => None,
            Intent::None => None,
        }
    }

    /// Route one recognition to a dialog-start action
    pub fn route(&self, recognition: &Recognition, utterance: &str) -> RouteAction {
        if recognition.score < self.min_score {
            return self.fallback(utterance);
        }

        match recognition.intent {
            Intent::Cancel => RouteAction::CancelActive,
            intent => match Self::dialog_for(intent) {
                Some(dialog) => RouteAction::Begin(dialog),
                None => self.fallback(utterance),
            },
        }
    }

    fn fallback(&self, utterance: &str) -> RouteAction {
        RouteAction::Fallback {
            messages: vec![
                self.fallback_text.clone(),
                format!(
                    "Follow [this link]({}{}) to search the web!",
                    self.search_url_base,
                    urlencoding::encode(utterance)
                ),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> IntentRouter {
        IntentRouter::new(&crate::config::Settings::default().dispatch)
    }

    #[test]
    fn test_mapped_intents_route_to_exactly_one_dialog() {
        assert_eq!(IntentRouter::dialog_for(Intent::BookTable), Some(DialogId::BookTable));
        assert_eq!(IntentRouter::dialog_for(Intent::WhoAreYou), Some(DialogId::WhoAreYou));
        assert_eq!(IntentRouter::dialog_for(Intent::WhatCanYouDo), Some(DialogId::WhatCanYouDo));
        assert_eq!(IntentRouter::dialog_for(Intent::Help), Some(DialogId::Faq));
        assert_eq!(IntentRouter::dialog_for(Intent::ChitChat), Some(DialogId::Faq));
        assert_eq!(IntentRouter::dialog_for(Intent::Faq), Some(DialogId::Faq));
    }

    #[test]
    fn test_unmapped_intents_fall_through() {
        assert_eq!(IntentRouter::dialog_for(Intent::None), None);
        assert_eq!(IntentRouter::dialog_for(Intent::Cancel), None);
    }

    #[test]
    fn test_low_confidence_falls_back() {
        let recognition = Recognition::new(Intent::BookTable, 0.3);
        let action = router().route(&recognition, "book something");
        assert!(matches!(action, RouteAction::Fallback { .. }));
    }

    #[test]
    fn test_trusted_intent_begins_dialog() {
        let recognition = Recognition::new(Intent::BookTable, 0.8);
        let action = router().route(&recognition, "book a table");
        assert_eq!(action, RouteAction::Begin(DialogId::BookTable));
    }

    #[test]
    fn test_fallback_carries_search_link() {
        let recognition = Recognition::none();
        match router().route(&recognition, "play some jazz") {
            RouteAction::Fallback { messages } => {
                assert_eq!(messages.len(), 2);
                assert!(messages[0].contains("still learning"));
                assert!(messages[1].contains("https://www.bing.com/search?q=play%20some%20jazz"));
            }
            other => panic!("expected fallback, got {:?}", other),
        }
    }

    #[test]
    fn test_cancel_routes_to_cancel_active() {
        let recognition = Recognition::new(Intent::Cancel, 1.0);
        assert_eq!(router().route(&recognition, "cancel"), RouteAction::CancelActive);
    }
}
