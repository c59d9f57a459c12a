//! Engine settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main engine configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub recognizer: RecognizerConfig,
    pub dispatch: DispatchConfig,
    pub redis: RedisConfig,
    pub logging: LoggingConfig,
}

/// NLU recognizer endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecognizerConfig {
    pub nlu_url: String,
    pub timeout_seconds: u64,
    pub arbitration: ArbitrationConfig,
}

/// Thresholds for the NLU-vs-FAQ winner rules
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArbitrationConfig {
    /// Score at or above which a result counts as high confidence
    pub high_confidence: f32,
    /// Score at or below which a result counts as low confidence
    pub low_confidence: f32,
    /// FAQ score at or above which the match is treated as exact
    pub faq_exact_match: f32,
    /// FAQ score at or below which the FAQ is treated as having no match
    pub faq_no_match: f32,
}

/// Turn dispatch configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DispatchConfig {
    /// Minimum recognizer score for a recognized intent to be trusted
    pub min_score: f32,
    /// Reply when the user cancels with no dialog in progress
    pub nothing_to_cancel_text: String,
    /// First line of the fallback reply for unrecognized input
    pub fallback_text: String,
    /// Base URL for the fallback web-search suggestion
    pub search_url_base: String,
}

/// Redis configuration for conversation state
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedisConfig {
    pub url: String,
    pub prefix: String,
    pub ttl_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
    pub max_files: u32,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("CONCIERGE"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::ConciergeError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            recognizer: RecognizerConfig {
                nlu_url: "http://localhost:5000/recognize".to_string(),
                timeout_seconds: 5,
                arbitration: ArbitrationConfig::default(),
            },
            dispatch: DispatchConfig {
                min_score: 0.5,
                nothing_to_cancel_text: "Sure, but there is nothing to cancel..".to_string(),
                fallback_text: "I'm still learning.. Sorry, I do not know how to help you with that.".to_string(),
                search_url_base: "https://www.bing.com/search?q=".to_string(),
            },
            redis: RedisConfig {
                url: "redis://localhost:6379".to_string(),
                prefix: "conciergebot:".to_string(),
                ttl_seconds: 3600,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "/var/log/conciergebot".to_string(),
                max_files: 5,
            },
        }
    }
}

impl Default for ArbitrationConfig {
    fn default() -> Self {
        Self {
            high_confidence: 0.9,
            low_confidence: 0.5,
            faq_exact_match: 0.95,
            faq_no_match: 0.05,
        }
    }
}
