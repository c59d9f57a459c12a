//! HTTP recognizer client
//!
//! This client calls a LUIS-style NLU endpoint over HTTP, including
//! client setup, response parsing and error handling. The endpoint is a
//! black box; only its response shape is assumed.

use std::time::Duration;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::config::RecognizerConfig;
use crate::utils::errors::{ConciergeError, RecognizerError, Result};
use super::{Entity, Intent, Recognition, Recognizer};

/// NLU endpoint response structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NluResponse {
    #[serde(rename = "topScoringIntent")]
    pub top_scoring_intent: NluIntent,
    #[serde(default)]
    pub entities: Vec<NluEntity>,
}

/// Top scoring intent from the NLU endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NluIntent {
    pub intent: String,
    pub score: f32,
}

/// Entity extracted by the NLU endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NluEntity {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub entity: String,
}

/// HTTP client for an NLU recognizer endpoint
#[derive(Debug, Clone)]
pub struct HttpRecognizer {
    client: Client,
    config: RecognizerConfig,
}

impl HttpRecognizer {
    /// Create a new HttpRecognizer instance
    pub fn new(config: RecognizerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("ConciergeBot/1.0")
            .build()
            .map_err(ConciergeError::Http)?;

        Ok(Self { client, config })
    }

    async fn make_nlu_request(&self, utterance: &str) -> Result<NluResponse> {
        let url = format!("{}?q={}", self.config.nlu_url, urlencoding::encode(utterance));

        debug!(url = %url, "Making NLU request");

        let response = self.client
            .get(&url)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ConciergeError::Recognizer(RecognizerError::Timeout)
                } else if e.is_connect() {
                    ConciergeError::Recognizer(RecognizerError::ServiceUnavailable)
                } else {
                    ConciergeError::Recognizer(RecognizerError::RequestFailed(e.to_string()))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ConciergeError::Recognizer(RecognizerError::RequestFailed(
                format!("HTTP {}: {}", status, error_text)
            )));
        }

        response.json().await
            .map_err(|e| ConciergeError::Recognizer(RecognizerError::InvalidResponse(e.to_string())))
    }
}

#[async_trait::async_trait]
impl Recognizer for HttpRecognizer {
    async fn recognize(&self, utterance: &str) -> Result<Recognition> {
        let response = self.make_nlu_request(utterance).await?;

        let intent = Intent::parse(&response.top_scoring_intent.intent);
        let score = response.top_scoring_intent.score.clamp(0.0, 1.0);
        let entities = response.entities
            .into_iter()
            .map(|e| Entity::new(e.entity_type, e.entity))
            .collect();

        debug!(intent = %intent, score = score, "NLU recognition complete");

        Ok(Recognition::with_entities(intent, score, entities))
    }
}
