//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at startup
//! - Per-request access log
//!
//! # Design Decisions
//! - JSON format in production, pretty format in development
//! - Level configurable via config, overridable with RUST_LOG
//! - The access log runs after admission: a rejected origin is reported by
//!   the admission diagnostic instead

use std::time::Instant;

use axum::{
    body::Body,
    http::{header, Request},
    middleware::Next,
    response::Response,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Environment, ObservabilityConfig};
use crate::observability::metrics;

/// Initialize the tracing subscriber. Call once, before anything logs.
pub fn init_tracing(config: &ObservabilityConfig, environment: Environment) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("booking_gateway={},tower_http=info", config.log_level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if environment.is_production() {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Access-log middleware: one structured line per request, plus diagnostic
/// echoes of the origin and header set at debug level.
pub async fn access_log_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    if let Some(origin) = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
    {
        tracing::debug!(origin = %origin, "Request origin");
    }
    tracing::debug!(headers = ?request.headers(), "Request headers");

    let response = next.run(request).await;

    tracing::info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        "request"
    );
    metrics::record_request(method.as_str(), response.status().as_u16(), start);

    response
}
