//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the axum Router with all handlers
//! - Wire up the middleware pipeline in its fixed order
//! - Serve with graceful shutdown, or hand the composed router to an
//!   embedding host that binds no socket itself

use std::sync::Arc;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::http::request::RequestIdLayer;
use crate::observability::logging;
use crate::routing;
use crate::routing::upstream::{self, ForwardClient};
use crate::security::cors::{self, OriginPolicy};
use crate::security::headers;
use crate::security::sanitize::{self, Sanitizer};

/// Application state injected into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub policy: Arc<OriginPolicy>,
    pub sanitizers: Arc<Vec<Box<dyn Sanitizer>>>,
    pub client: ForwardClient,
}

/// HTTP server for the booking gateway.
pub struct GatewayServer {
    router: Router,
    config: Arc<GatewayConfig>,
}

impl GatewayServer {
    /// Compose the gateway from a resolved configuration.
    pub fn new(config: GatewayConfig) -> Self {
        let config = Arc::new(config);
        let state = AppState {
            config: config.clone(),
            policy: Arc::new(OriginPolicy::from_config(&config.cors)),
            sanitizers: Arc::new(sanitize::default_sanitizers()),
            client: upstream::build_client(),
        };

        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the router with the middleware pipeline.
    ///
    /// Stage order is a correctness requirement, not a preference: admission
    /// runs before logging and sanitization so rejected origins never reach
    /// dispatch, and the body is buffered before anything reads it.
    fn build_router(state: AppState) -> Router {
        let routes = headers::apply(routing::build_routes(state.clone()));

        routes.layer(
            ServiceBuilder::new()
                .layer(RequestIdLayer)
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    cors::cors_middleware,
                ))
                .layer(middleware::from_fn(logging::access_log_middleware))
                .layer(middleware::from_fn_with_state(
                    state,
                    sanitize::sanitize_middleware,
                )),
        )
    }

    /// The composed handler, for serverless hosts that never bind a socket.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
