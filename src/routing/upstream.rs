//! Upstream delegation for resource groups.
//!
//! # Responsibilities
//! - Rewrite an admitted request's URI onto the group's upstream authority
//! - Propagate headers and the request ID
//! - Relay the upstream response to the client unchanged
//!
//! # Design Decisions
//! - The mount prefix is already stripped by the router, so both aliases of
//!   a group present identical paths to the upstream
//! - No retries and no liveness bookkeeping at this layer; a forwarding
//!   failure goes straight to the terminal responder

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{
        uri::{Authority, PathAndQuery, Scheme},
        HeaderValue, Request, Uri,
    },
    response::{IntoResponse, Response},
    Extension,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::http::error::{self, GatewayError};
use crate::http::request::X_REQUEST_ID;
use crate::http::server::AppState;
use crate::observability::metrics;

/// Shared client used for all upstream traffic, built once at startup.
pub type ForwardClient = Client<HttpConnector, Body>;

pub fn build_client() -> ForwardClient {
    Client::builder(TokioExecutor::new()).build(HttpConnector::new())
}

/// A resource group's forwarding target, attached to its routes at mount
/// time.
#[derive(Debug, Clone)]
pub struct ResourceTarget {
    pub group: Arc<str>,
    pub authority: Authority,
}

/// Forward the (already admitted and sanitized) request to the group's
/// upstream service.
pub async fn forward(
    State(state): State<AppState>,
    Extension(target): Extension<ResourceTarget>,
    request: Request<Body>,
) -> Response {
    let start = Instant::now();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let method = request.method().to_string();

    tracing::debug!(
        request_id = %request_id,
        group = %target.group,
        path = %request.uri().path(),
        "Dispatching to resource service"
    );

    let (mut parts, body) = request.into_parts();

    let mut uri_parts = parts.uri.clone().into_parts();
    uri_parts.scheme = Some(Scheme::HTTP);
    uri_parts.authority = Some(target.authority.clone());
    if uri_parts.path_and_query.is_none() {
        uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    parts.uri = match Uri::from_parts(uri_parts) {
        Ok(uri) => uri,
        Err(e) => {
            return error::respond(
                GatewayError::Internal(e.to_string()),
                state.config.environment,
            );
        }
    };

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        parts.headers.insert(X_REQUEST_ID, value);
    }

    match state.client.request(Request::from_parts(parts, body)).await {
        Ok(response) => {
            let status = response.status();
            metrics::record_upstream(&method, status.as_u16(), &target.group, start);

            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body)).into_response()
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                group = %target.group,
                error = %e,
                "Upstream error"
            );
            metrics::record_upstream(&method, 500, &target.group, start);
            error::respond(GatewayError::Upstream(e.to_string()), state.config.environment)
        }
    }
}
