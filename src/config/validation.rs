//! Configuration validation module
//!
//! This module provides validation functions for engine configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{ConciergeError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_recognizer_config(&settings.recognizer)?;
    validate_dispatch_config(&settings.dispatch)?;
    validate_redis_config(&settings.redis)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate recognizer configuration
fn validate_recognizer_config(config: &super::RecognizerConfig) -> Result<()> {
    if config.nlu_url.is_empty() {
        return Err(ConciergeError::Config(
            "Recognizer NLU URL is required".to_string()
        ));
    }

    url::Url::parse(&config.nlu_url)
        .map_err(|e| ConciergeError::Config(format!("Invalid NLU URL: {}", e)))?;

    if config.timeout_seconds == 0 {
        return Err(ConciergeError::Config(
            "Recognizer timeout must be greater than 0".to_string()
        ));
    }

    let arb = &config.arbitration;
    for (name, value) in [
        ("high_confidence", arb.high_confidence),
        ("low_confidence", arb.low_confidence),
        ("faq_exact_match", arb.faq_exact_match),
        ("faq_no_match", arb.faq_no_match),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConciergeError::Config(
                format!("Arbitration threshold {} must be in [0, 1]", name)
            ));
        }
    }

    if arb.low_confidence >= arb.high_confidence {
        return Err(ConciergeError::Config(
            "Arbitration low_confidence must be below high_confidence".to_string()
        ));
    }

    if arb.faq_no_match >= arb.faq_exact_match {
        return Err(ConciergeError::Config(
            "Arbitration faq_no_match must be below faq_exact_match".to_string()
        ));
    }

    Ok(())
}

/// Validate dispatch configuration
fn validate_dispatch_config(config: &super::DispatchConfig) -> Result<()> {
    if !(0.0..=1.0).contains(&config.min_score) {
        return Err(ConciergeError::Config(
            "Dispatch min_score must be in [0, 1]".to_string()
        ));
    }

    if config.nothing_to_cancel_text.is_empty() {
        return Err(ConciergeError::Config(
            "Dispatch nothing_to_cancel_text is required".to_string()
        ));
    }

    if config.fallback_text.is_empty() {
        return Err(ConciergeError::Config(
            "Dispatch fallback_text is required".to_string()
        ));
    }

    url::Url::parse(&config.search_url_base)
        .map_err(|e| ConciergeError::Config(format!("Invalid search URL base: {}", e)))?;

    Ok(())
}

/// Validate redis configuration
fn validate_redis_config(config: &super::RedisConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(ConciergeError::Config(
            "Redis URL is required".to_string()
        ));
    }

    if !config.url.starts_with("redis://") && !config.url.starts_with("rediss://") {
        return Err(ConciergeError::Config(
            "Redis URL must start with redis:// or rediss://".to_string()
        ));
    }

    if config.ttl_seconds == 0 {
        return Err(ConciergeError::Config(
            "Redis TTL must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(ConciergeError::Config(
            format!("Invalid log level: {}", config.level)
        ));
    }

    if config.file_path.is_empty() {
        return Err(ConciergeError::Config(
            "Log file path is required".to_string()
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_min_score_out_of_range() {
        let mut settings = Settings::default();
        settings.dispatch.min_score = 1.5;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_inverted_arbitration_bounds() {
        let mut settings = Settings::default();
        settings.recognizer.arbitration.low_confidence = 0.95;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_invalid_redis_url() {
        let mut settings = Settings::default();
        settings.redis.url = "http://localhost".to_string();
        assert!(validate_settings(&settings).is_err());
    }
}
