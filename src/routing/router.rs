//! Route table construction.
//!
//! # Responsibilities
//! - Register the health check and every resource group
//! - Mount each group under every prefix in [`MOUNT_PREFIXES`] with a single
//!   registration call, so the aliases cannot drift apart
//! - Answer unmatched paths with a JSON 404
//!
//! # Design Decisions
//! - The table is immutable after construction (thread-safe without locks)
//! - Nesting strips the matched prefix, so `/movie/list` and
//!   `/api/movie/list` reach the upstream as the same `/list`
//! - Health never touches resource services; it is a liveness probe only

use std::sync::Arc;

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::IntoResponse,
    routing::{any, get},
    Extension, Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::config::Environment;
use crate::http::error::ErrorBody;
use crate::http::server::AppState;
use crate::routing::upstream::{self, ResourceTarget};

/// Every resource group (and the health check) is registered once per entry
/// in this list. The `/api` alias exists for the serverless deployment
/// target; the bare alias keeps older callers working.
pub const MOUNT_PREFIXES: [&str; 2] = ["/api", ""];

/// Build the complete route table.
pub fn build_routes(state: AppState) -> Router {
    let mut app = Router::new();

    for prefix in MOUNT_PREFIXES {
        app = app.route(&format!("{prefix}/health"), get(health));
    }

    for resource in &state.config.resources {
        let authority = match resource.upstream.parse() {
            Ok(authority) => authority,
            Err(e) => {
                // Unreachable with validated config; skip rather than panic.
                tracing::error!(
                    resource = %resource.name,
                    upstream = %resource.upstream,
                    error = %e,
                    "Skipping resource with unparseable upstream"
                );
                continue;
            }
        };
        let target = ResourceTarget {
            group: Arc::from(resource.name.as_str()),
            authority,
        };
        app = mount_group(app, &resource.name, target);
    }

    app.fallback(not_found).with_state(state)
}

/// Mount one resource group under every alias prefix.
fn mount_group(mut app: Router<AppState>, name: &str, target: ResourceTarget) -> Router<AppState> {
    let group = Router::new()
        .route("/", any(upstream::forward))
        .route("/{*rest}", any(upstream::forward))
        .layer(Extension(target));

    for prefix in MOUNT_PREFIXES {
        app = app.nest(&format!("{prefix}/{name}"), group.clone());
    }
    app
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
    environment: Environment,
}

/// Liveness probe, served directly by the gateway.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        environment: state.config.environment,
    })
}

/// Catch-all for unmatched paths. Not an error as far as logging goes.
async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody::new(format!("Route {} not found", uri.path()))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::config::GatewayConfig;
    use crate::http::server::GatewayServer;

    fn router() -> Router {
        GatewayServer::new(GatewayConfig::default()).into_router()
    }

    #[tokio::test]
    async fn health_is_served_under_both_prefixes() {
        for path in ["/health", "/api/health"] {
            let response = router()
                .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{path}");

            let body = to_bytes(response.into_body(), 1024).await.unwrap();
            let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(json["status"], "OK");
            assert_eq!(json["environment"], "development");
            assert!(json["timestamp"].is_string());
        }
    }

    #[tokio::test]
    async fn unmatched_path_names_the_route() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/does-not-exist")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Route /does-not-exist not found");
    }
}
