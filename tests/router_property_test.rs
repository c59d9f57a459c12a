//! Property tests for routing totality
//!
//! Every recognition, whatever its intent and score, must route to exactly
//! one action without panicking, and unmapped or untrusted input must always
//! land in the fallback branch.

use assert_matches::assert_matches;
use proptest::prelude::*;

use ConciergeBot::config::Settings;
use ConciergeBot::dispatch::router::{IntentRouter, RouteAction};
use ConciergeBot::recognizer::{Intent, KeywordRecognizer, Recognition, Recognizer};

fn any_intent() -> impl Strategy<Value = Intent> {
    prop_oneof![
        Just(Intent::BookTable),
        Just(Intent::WhoAreYou),
        Just(Intent::WhatCanYouDo),
        Just(Intent::Help),
        Just(Intent::ChitChat),
        Just(Intent::Faq),
        Just(Intent::Cancel),
        Just(Intent::None),
    ]
}

proptest! {
    #[test]
    fn every_recognition_routes_to_exactly_one_action(
        intent in any_intent(),
        score in 0.0f32..=1.0,
        utterance in ".{0,80}",
    ) {
        let settings = Settings::default();
        let router = IntentRouter::new(&settings.dispatch);
        let recognition = Recognition::new(intent, score);

        let action = router.route(&recognition, &utterance);

        if score < settings.dispatch.min_score {
            assert_matches!(action, RouteAction::Fallback { .. });
        } else {
            match IntentRouter::dialog_for(intent) {
                Some(dialog) => prop_assert_eq!(action, RouteAction::Begin(dialog)),
                None if intent == Intent::Cancel => {
                    prop_assert_eq!(action, RouteAction::CancelActive)
                }
                None => assert_matches!(action, RouteAction::Fallback { messages } if messages.len() == 2),
            }
        }
    }

    #[test]
    fn keyword_recognition_never_fails(utterance in "[a-z ?!.]{0,60}") {
        let recognizer = KeywordRecognizer::new();
        let recognition = tokio_test::block_on(recognizer.recognize(&utterance)).unwrap();

        prop_assert!(recognition.score == 0.0 || recognition.score == 1.0);
        if recognition.intent == Intent::None {
            prop_assert_eq!(recognition.score, 0.0);
        }
    }
}
