//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the API location (parseable URL, http/https, absolute endpoint path)
//! - Validate value ranges (timeout > 0, redirect delays bounded)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use crate::config::schema::ClientConfig;

/// Upper bound for any redirect delay.
pub const MAX_REDIRECT_DELAY_MS: u64 = 60_000;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match url::Url::parse(&config.api.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::new(
            "api.base_url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new("api.base_url", e.to_string())),
    }

    if !config.api.endpoint_path.starts_with('/') {
        errors.push(ValidationError::new("api.endpoint_path", "must start with '/'"));
    }

    if config.api.timeout_secs == 0 {
        errors.push(ValidationError::new("api.timeout_secs", "must be greater than 0"));
    }

    let delays = [
        ("session.guard_redirect_delay_ms", config.session.guard_redirect_delay_ms),
        ("session.login_redirect_delay_ms", config.session.login_redirect_delay_ms),
        ("session.register_redirect_delay_ms", config.session.register_redirect_delay_ms),
    ];
    for (field, value) in delays {
        if value > MAX_REDIRECT_DELAY_MS {
            errors.push(ValidationError::new(
                field,
                format!("{} exceeds maximum of {} ms", value, MAX_REDIRECT_DELAY_MS),
            ));
        }
    }

    if config.session.remembered_path.as_os_str().is_empty() {
        errors.push(ValidationError::new("session.remembered_path", "must not be empty"));
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
