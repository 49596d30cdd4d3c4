//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check bind and upstream addresses actually parse
//! - Check origins are usable as header values
//! - Detect duplicate resource groups
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::uri::Authority;
use axum::http::HeaderValue;
use thiserror::Error;

use crate::config::schema::GatewayConfig;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a valid socket address")]
    BindAddress(String),

    #[error("cors.allowed_origins entry '{0}' is not a valid header value")]
    Origin(String),

    #[error("cors.allowed_suffixes entry '{0}' must be a non-empty suffix starting with '.'")]
    Suffix(String),

    #[error("limits.max_body_bytes must be greater than zero")]
    BodyLimit,

    #[error("resource name '{0}' must be a single non-empty path segment")]
    ResourceName(String),

    #[error("duplicate resource group '{0}'")]
    DuplicateResource(String),

    #[error("resource '{0}' has an invalid upstream authority '{1}'")]
    Upstream(String, String),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    for origin in &config.cors.allowed_origins {
        if HeaderValue::from_str(origin).is_err() {
            errors.push(ValidationError::Origin(origin.clone()));
        }
    }

    for suffix in &config.cors.allowed_suffixes {
        if suffix.len() < 2 || !suffix.starts_with('.') {
            errors.push(ValidationError::Suffix(suffix.clone()));
        }
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::BodyLimit);
    }

    let mut seen = HashSet::new();
    for resource in &config.resources {
        if resource.name.is_empty() || resource.name.contains('/') {
            errors.push(ValidationError::ResourceName(resource.name.clone()));
        }
        if !seen.insert(resource.name.as_str()) {
            errors.push(ValidationError::DuplicateResource(resource.name.clone()));
        }
        if resource.upstream.parse::<Authority>().is_err() {
            errors.push(ValidationError::Upstream(
                resource.name.clone(),
                resource.upstream.clone(),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
