//! Recognizer arbitration
//!
//! When the primary NLU recognizer and the FAQ recognizer disagree on who
//! should handle an utterance, a small fixed rule cascade picks a winner
//! before falling back to asking the user to disambiguate.

use crate::config::ArbitrationConfig;
use super::Recognition;

/// Which recognizer produced the winning result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecognizerSource {
    Nlu,
    Faq,
}

/// Outcome of arbitrating between two candidate recognitions
#[derive(Debug, Clone, PartialEq)]
pub enum Arbitration {
    /// One candidate won; carries the winning recognition
    Winner {
        source: RecognizerSource,
        recognition: Recognition,
    },
    /// No rule fired; the user must be asked to disambiguate
    Ambiguous {
        nlu: Recognition,
        faq: Recognition,
    },
}

/// Pick a winner between the NLU and FAQ results.
///
/// Rules are evaluated in priority order:
/// 1. High confidence from NLU and low confidence from FAQ => NLU wins.
/// 2. Low confidence from NLU and high confidence from FAQ => FAQ wins.
/// 3. FAQ has an exact match => FAQ wins.
/// 4. FAQ came back with no match => NLU wins.
/// Otherwise the result is ambiguous.
pub fn arbitrate(nlu: Recognition, faq: Recognition, config: &ArbitrationConfig) -> Arbitration {
    if nlu.score >= config.high_confidence && faq.score <= config.low_confidence {
        return Arbitration::Winner {
            source: RecognizerSource::Nlu,
            recognition: nlu,
        };
    }

    if nlu.score <= config.low_confidence && faq.score >= config.high_confidence {
        return Arbitration::Winner {
            source: RecognizerSource::Faq,
            recognition: faq,
        };
    }

    if faq.score >= config.faq_exact_match {
        return Arbitration::Winner {
            source: RecognizerSource::Faq,
            recognition: faq,
        };
    }

    if faq.score <= config.faq_no_match {
        return Arbitration::Winner {
            source: RecognizerSource::Nlu,
            recognition: nlu,
        };
    }

    Arbitration::Ambiguous { nlu, faq }
}
