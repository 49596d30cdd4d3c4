//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the booking gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Deployment mode (development or production).
    pub environment: Environment,

    /// Cross-origin admission policy.
    pub cors: CorsConfig,

    /// Request input limits.
    pub limits: LimitsConfig,

    /// Resource groups and the upstream services that handle them.
    pub resources: Vec<ResourceConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            environment: Environment::default(),
            cors: CorsConfig::default(),
            limits: LimitsConfig::default(),
            resources: default_resources(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Deployment mode flag.
///
/// Production mode switches logging to JSON and replaces error detail in
/// responses with a generic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Environment {
    /// Anything other than an explicit "production" flag is development.
    fn from(value: &str) -> Self {
        if value.eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Cross-origin admission inputs: an exact-match allow-list plus trusted
/// origin suffixes. Both are fixed at process start.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins admitted by exact string match.
    pub allowed_origins: Vec<String>,

    /// Origin suffixes admitted regardless of subdomain
    /// (covers preview deployments, e.g. ".vercel.app").
    pub allowed_suffixes: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://d2wjw0tm17zr9g.cloudfront.net".to_string(),
                "https://d2wjw0tm17zr9g.cloudfront.net".to_string(),
                "https://cine-desk.vercel.app".to_string(),
                "https://www.cine-desk.vercel.app".to_string(),
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
                "http://localhost:3001".to_string(),
            ],
            allowed_suffixes: vec![".vercel.app".to_string()],
        }
    }
}

/// Request input limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

/// A resource group and the upstream service that implements it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResourceConfig {
    /// Group name, used as the mount path segment (e.g. "movie").
    pub name: String,

    /// Upstream authority (e.g., "127.0.0.1:4104").
    pub upstream: String,
}

/// The five resource groups of the booking platform with their default
/// local service addresses.
pub fn default_resources() -> Vec<ResourceConfig> {
    [
        ("auth", "127.0.0.1:4101"),
        ("cinema", "127.0.0.1:4102"),
        ("theater", "127.0.0.1:4103"),
        ("movie", "127.0.0.1:4104"),
        ("showtime", "127.0.0.1:4105"),
    ]
    .into_iter()
    .map(|(name, upstream)| ResourceConfig {
        name: name.to_string(),
        upstream: upstream.to_string(),
    })
    .collect()
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
