//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Reject cookie attributes a browser would refuse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::AppConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than zero"));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be greater than zero"));
    }

    let cookie_name = &config.session.cookie_name;
    if cookie_name.is_empty() {
        errors.push(ValidationError::new("session.cookie_name", "must not be empty"));
    } else if cookie_name
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || "()<>@,;:\\\"/[]?={}".contains(c))
    {
        errors.push(ValidationError::new(
            "session.cookie_name",
            format!("'{}' contains characters not allowed in a cookie name", cookie_name),
        ));
    }

    if !config.session.cookie_path.starts_with('/') {
        errors.push(ValidationError::new("session.cookie_path", "must start with '/'"));
    }

    if config.session.idle_timeout_secs == 0 {
        errors.push(ValidationError::new("session.idle_timeout_secs", "must be greater than zero"));
    }

    if config.session.purge_interval_secs == 0 {
        errors.push(ValidationError::new("session.purge_interval_secs", "must be greater than zero"));
    }

    if let Err(e) = EnvFilter::try_new(&config.observability.log_level) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("invalid filter directive: {}", e),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_zero_idle_timeout_rejected() {
        let mut config = AppConfig::default();
        config.session.idle_timeout_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "session.idle_timeout_secs");
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AppConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.timeouts.request_secs = 0;
        config.session.cookie_name = "bad name".into();
        config.session.cookie_path = "relative".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "timeouts.request_secs",
                "session.cookie_name",
                "session.cookie_path",
            ]
        );
    }

    #[test]
    fn test_non_positive_csrf_tokens_is_allowed() {
        let mut config = AppConfig::default();
        config.forms.csrf_tokens = 0;
        assert!(validate_config(&config).is_ok());

        config.forms.csrf_tokens = -3;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_metrics_address_only_checked_when_enabled() {
        let mut config = AppConfig::default();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "observability.metrics_address");
    }
}
