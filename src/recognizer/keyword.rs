//! Keyword recognizer
//!
//! A deterministic recognizer matching lowercased keywords against a fixed
//! table. Used by the console binary and by tests; a keyword hit scores 1.0,
//! anything else comes back as no intent.

use crate::utils::errors::Result;
use super::{Intent, Recognition, Recognizer};

/// Keyword-table recognizer
#[derive(Debug, Clone)]
pub struct KeywordRecognizer {
    table: Vec<(&'static str, Intent)>,
}

impl KeywordRecognizer {
    /// Create a recognizer with the default concierge keyword table
    pub fn new() -> Self {
        Self {
            table: vec![
                ("book", Intent::BookTable),
                ("table", Intent::BookTable),
                ("reserve", Intent::BookTable),
                ("who are you", Intent::WhoAreYou),
                ("your name", Intent::WhoAreYou),
                ("what can you do", Intent::WhatCanYouDo),
                ("help", Intent::Help),
                ("hours", Intent::Faq),
                ("open", Intent::Faq),
                ("menu", Intent::Faq),
                ("hi", Intent::ChitChat),
                ("hello", Intent::ChitChat),
                ("cancel", Intent::Cancel),
            ],
        }
    }

    fn match_keyword(&self, utterance: &str) -> Option<Intent> {
        let text = utterance.to_lowercase();
        // Longer keywords are checked first so "what can you do" beats "you"
        self.table
            .iter()
            .filter(|(keyword, _)| text.contains(keyword))
            .max_by_key(|(keyword, _)| keyword.len())
            .map(|(_, intent)| *intent)
    }
}

impl Default for KeywordRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Recognizer for KeywordRecognizer {
    async fn recognize(&self, utterance: &str) -> Result<Recognition> {
        match self.match_keyword(utterance) {
            Some(intent) => Ok(Recognition::new(intent, 1.0)),
            None => Ok(Recognition::none()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_keyword_hit() {
        let recognizer = KeywordRecognizer::new();
        let result = recognizer.recognize("I want to book a table").await.unwrap();
        assert_eq!(result.intent, Intent::BookTable);
        assert_eq!(result.score, 1.0);
    }

    #[tokio::test]
    async fn test_longest_keyword_wins() {
        let recognizer = KeywordRecognizer::new();
        let result = recognizer.recognize("what can you do for me?").await.unwrap();
        assert_eq!(result.intent, Intent::WhatCanYouDo);
    }

    #[tokio::test]
    async fn test_no_match_is_none() {
        let recognizer = KeywordRecognizer::new();
        let result = recognizer.recognize("xyzzy").await.unwrap();
        assert_eq!(result.intent, Intent::None);
        assert_eq!(result.score, 0.0);
    }

    #[tokio::test]
    async fn test_case_insensitive() {
        let recognizer = KeywordRecognizer::new();
        let result = recognizer.recognize("CANCEL").await.unwrap();
        assert_eq!(result.intent, Intent::Cancel);
    }
}
