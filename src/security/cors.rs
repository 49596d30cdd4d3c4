//! Cross-origin admission.
//!
//! # Responsibilities
//! - Decide, before any resource handler runs, whether a request's declared
//!   origin may receive a cross-origin response
//! - Answer pre-flight (OPTIONS) requests without dispatching them
//! - Attach credentialed CORS headers to admitted responses
//!
//! # Design Decisions
//! - The policy is a declarative value (exact origins + trusted suffixes)
//!   evaluated by a pure function, so it is unit-testable without a server
//! - Requests without an Origin header are admitted (non-browser clients)
//! - Rejection produces an explicit 403 that echoes the offending origin;
//!   the decision is recomputed per request, never cached

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashSet;

use crate::config::CorsConfig;
use crate::http::error::{self, GatewayError};
use crate::http::server::AppState;
use crate::observability::metrics;

/// Methods declared to admitted browsers.
pub const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
/// Request headers declared to admitted browsers.
pub const ALLOWED_HEADERS: &str = "Content-Type, Authorization, Cookie";
/// Response headers browsers may read from admitted responses.
pub const EXPOSED_HEADERS: &str = "Set-Cookie";

/// Declarative origin policy: exact matches plus trusted suffixes.
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    exact: HashSet<String>,
    suffixes: Vec<String>,
}

/// Outcome of evaluating a request origin against the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginDecision {
    Admit,
    Reject { origin: String },
}

impl OriginPolicy {
    pub fn from_config(cors: &CorsConfig) -> Self {
        Self {
            exact: cors.allowed_origins.iter().cloned().collect(),
            suffixes: cors.allowed_suffixes.clone(),
        }
    }

    /// Evaluate a declared origin. First match wins: absent origins are
    /// admitted, then the exact allow-list, then the trusted suffixes.
    pub fn evaluate(&self, origin: Option<&str>) -> OriginDecision {
        let Some(origin) = origin else {
            return OriginDecision::Admit;
        };

        if self.exact.contains(origin) {
            return OriginDecision::Admit;
        }

        if self.suffixes.iter().any(|s| origin.ends_with(s.as_str())) {
            return OriginDecision::Admit;
        }

        OriginDecision::Reject {
            origin: origin.to_string(),
        }
    }
}

/// Admission middleware. Runs before logging, sanitization and dispatch so a
/// rejected origin never reaches resource handlers.
pub async fn cors_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    match state.policy.evaluate(origin.as_deref()) {
        OriginDecision::Reject { origin } => {
            tracing::warn!(origin = %origin, "Blocked by CORS");
            metrics::record_origin_rejected();
            error::respond(
                GatewayError::OriginRejected { origin },
                state.config.environment,
            )
        }
        OriginDecision::Admit => {
            if request.method() == Method::OPTIONS {
                return preflight_response(origin.as_deref());
            }

            let mut response = next.run(request).await;
            apply_cors_headers(response.headers_mut(), origin.as_deref());
            response
        }
    }
}

/// Answer a pre-flight probe from the admission decision alone.
fn preflight_response(origin: Option<&str>) -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    let headers = response.headers_mut();

    if let Some(value) = origin.and_then(|o| HeaderValue::from_str(o).ok()) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
    headers.insert(header::VARY, HeaderValue::from_static("Origin"));

    response
}

/// Credentialed CORS headers for an admitted (non-preflight) response.
fn apply_cors_headers(headers: &mut HeaderMap, origin: Option<&str>) {
    if let Some(value) = origin.and_then(|o| HeaderValue::from_str(o).ok()) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
        headers.insert(
            header::ACCESS_CONTROL_EXPOSE_HEADERS,
            HeaderValue::from_static(EXPOSED_HEADERS),
        );
        headers.insert(header::VARY, HeaderValue::from_static("Origin"));
    }
}
