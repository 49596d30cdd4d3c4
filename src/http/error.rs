//! Gateway failure taxonomy and the terminal error responder.
//!
//! Every failure raised by middleware or dispatch ends at [`respond`], which
//! converts it into exactly one HTTP response. Nothing is retried here: this
//! layer has no knowledge of whether the underlying operation is idempotent.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::config::Environment;

/// Message returned for rejected origins.
pub const ORIGIN_REJECTED_MESSAGE: &str = "CORS error - Origin not allowed";
/// Message replacing error detail in production responses.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Failures raised by the gateway itself.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Origin failed the admission policy.
    #[error("origin not allowed: {origin}")]
    OriginRejected { origin: String },

    /// Request body could not be read within the configured limit.
    #[error("failed to read request body: {0}")]
    BodyRead(String),

    /// Declared-JSON body failed to parse.
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// The resource service behind a group could not be reached or failed.
    #[error("upstream request failed: {0}")]
    Upstream(String),

    /// Anything that should not happen with validated configuration.
    #[error("internal gateway error: {0}")]
    Internal(String),
}

/// JSON body shared by all failure responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            origin: None,
        }
    }
}

/// Terminal responder. Origin rejections get a 403 that echoes the origin;
/// everything else is a 500 whose detail leaks only outside production.
pub fn respond(err: GatewayError, environment: Environment) -> Response {
    tracing::error!(error = %err, "Request failed");

    match err {
        GatewayError::OriginRejected { origin } => (
            StatusCode::FORBIDDEN,
            Json(ErrorBody {
                success: false,
                message: ORIGIN_REJECTED_MESSAGE.to_string(),
                origin: Some(origin),
            }),
        )
            .into_response(),
        other => {
            let message = if environment.is_production() {
                INTERNAL_ERROR_MESSAGE.to_string()
            } else {
                other.to_string()
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::new(message))).into_response()
        }
    }
}
