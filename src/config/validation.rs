//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that every TTL pattern compiles
//! - Validate value ranges (TTLs and timeouts > 0, statuses in range)
//! - Detect duplicate status mappings
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PipelineConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use regex::Regex;
use thiserror::Error;
use url::Url;

use crate::config::schema::PipelineConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("api.base_url '{0}' is not an http(s) URL")]
    InvalidBaseUrl(String),

    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),

    #[error("cache.ttl_rules[{index}] pattern '{pattern}' is invalid: {reason}")]
    InvalidPattern {
        index: usize,
        pattern: String,
        reason: String,
    },

    #[error("cache.ttl_rules[{0}].ttl_ms must be greater than zero")]
    ZeroRuleTtl(usize),

    #[error("errors.mappings status {0} is outside 0 and 100..=599")]
    InvalidStatus(u16),

    #[error("errors.mappings status {0} is mapped more than once")]
    DuplicateStatus(u16),

    #[error("session.login_path '{0}' must start with '/'")]
    InvalidLoginPath(String),

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    InvalidLogLevel(String),
}

fn valid_status(status: u16) -> bool {
    status == 0 || (100..=599).contains(&status)
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &PipelineConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.api.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => errors.push(ValidationError::InvalidBaseUrl(config.api.base_url.clone())),
    }
    if config.api.timeout_secs == 0 {
        errors.push(ValidationError::NotPositive("api.timeout_secs"));
    }
    if config.api.connect_timeout_secs == 0 {
        errors.push(ValidationError::NotPositive("api.connect_timeout_secs"));
    }

    if config.cache.default_ttl_ms == 0 {
        errors.push(ValidationError::NotPositive("cache.default_ttl_ms"));
    }
    for (index, rule) in config.cache.ttl_rules.iter().enumerate() {
        if let Err(e) = Regex::new(&rule.pattern) {
            errors.push(ValidationError::InvalidPattern {
                index,
                pattern: rule.pattern.clone(),
                reason: e.to_string(),
            });
        }
        if rule.ttl_ms == 0 {
            errors.push(ValidationError::ZeroRuleTtl(index));
        }
    }

    let mut seen = HashSet::new();
    for mapping in &config.errors.mappings {
        if !valid_status(mapping.status) {
            errors.push(ValidationError::InvalidStatus(mapping.status));
        } else if !seen.insert(mapping.status) {
            errors.push(ValidationError::DuplicateStatus(mapping.status));
        }
    }
    for status in &config.errors.server_down_statuses {
        if !valid_status(*status) {
            errors.push(ValidationError::InvalidStatus(*status));
        }
    }
    let notify = &config.errors.notify;
    if notify.auth_expired_ms == 0 {
        errors.push(ValidationError::NotPositive("errors.notify.auth_expired_ms"));
    }
    if notify.server_down_ms == 0 {
        errors.push(ValidationError::NotPositive("errors.notify.server_down_ms"));
    }
    if notify.default_ms == 0 {
        errors.push(ValidationError::NotPositive("errors.notify.default_ms"));
    }

    if !config.session.login_path.starts_with('/') {
        errors.push(ValidationError::InvalidLoginPath(config.session.login_path.clone()));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::InvalidLogLevel(config.observability.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
