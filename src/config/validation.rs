//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0) and formats (URLs, addresses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::RouterConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("navigation.post_marker must start with '#', got '{0}'")]
    MarkerWithoutHash(String),

    #[error("views.timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("views.base_url '{url}' is invalid: {message}")]
    BaseUrl { url: String, message: String },

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),
}

/// Check a parsed configuration.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let required = [
        ("render.element_id", &config.render.element_id),
        ("render.not_found_view", &config.render.not_found_view),
        ("views.extension", &config.views.extension),
        ("navigation.post_path", &config.navigation.post_path),
        ("navigation.default_path", &config.navigation.default_path),
        ("navigation.stash_key", &config.navigation.stash_key),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            errors.push(ValidationError::Empty { field });
        }
    }

    if !config.navigation.post_marker.starts_with('#') {
        errors.push(ValidationError::MarkerWithoutHash(
            config.navigation.post_marker.clone(),
        ));
    }

    if config.views.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if let Err(e) = Url::parse(&config.views.base_url) {
        errors.push(ValidationError::BaseUrl {
            url: config.views.base_url.clone(),
            message: e.to_string(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
