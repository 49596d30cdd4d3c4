//! Configuration loading from disk and the process environment.

use std::env;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{Environment, GatewayConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Listening port override.
pub const ENV_PORT: &str = "PORT";
/// Deployment mode override (production/development).
pub const ENV_APP_ENV: &str = "APP_ENV";
/// Comma-separated origin allow-list override.
pub const ENV_CORS_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: GatewayConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Resolve the effective configuration once at startup: optional TOML file,
/// then environment overrides, then validation.
pub fn resolve_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => GatewayConfig::default(),
    };

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply process-environment overrides to a loaded configuration.
pub fn apply_env_overrides(config: &mut GatewayConfig) {
    apply_overrides(config, |name| env::var(name).ok());
}

/// Override application with an injectable variable source, so the logic is
/// testable without touching the process environment.
fn apply_overrides<F>(config: &mut GatewayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup(ENV_PORT) {
        match port.parse::<u16>() {
            Ok(port) => config.listener.bind_address = format!("0.0.0.0:{port}"),
            Err(_) => tracing::warn!(port = %port, "Ignoring unparseable PORT override"),
        }
    }

    if let Some(mode) = lookup(ENV_APP_ENV) {
        config.environment = Environment::from(mode.as_str());
    }

    if let Some(origins) = lookup(ENV_CORS_ORIGINS) {
        let origins: Vec<String> = origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if !origins.is_empty() {
            config.cors.allowed_origins = origins;
        }
    }
}
