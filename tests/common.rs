//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::{Method, StatusCode, Uri};
use axum::Router;
use tokio::net::TcpListener;

use booking_gateway::config::{GatewayConfig, ResourceConfig};
use booking_gateway::{GatewayServer, Shutdown};

async fn serve(addr: SocketAddr, app: Router) {
    let listener = TcpListener::bind(addr).await.unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
}

/// Mock resource service answering every request with a fixed body.
pub async fn start_mock_upstream(addr: SocketAddr, body: &'static str) {
    let app = Router::new().fallback(move || async move { body });
    serve(addr, app).await;
}

/// Mock resource service echoing the method and the URI it received, so
/// tests can observe exactly what arrived after mount-prefix stripping.
pub async fn start_echo_upstream(addr: SocketAddr) {
    let app = Router::new().fallback(|method: Method, uri: Uri| async move {
        format!("{method} {uri}")
    });
    serve(addr, app).await;
}

/// Mock resource service echoing the request body it received.
pub async fn start_body_echo_upstream(addr: SocketAddr) {
    let app = Router::new().fallback(|body: String| async move { body });
    serve(addr, app).await;
}

/// Mock resource service echoing one request header it received.
pub async fn start_header_echo_upstream(addr: SocketAddr, header_name: &'static str) {
    let app = Router::new().fallback(move |headers: axum::http::HeaderMap| async move {
        headers
            .get(header_name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string()
    });
    serve(addr, app).await;
}

/// Mock resource service with a programmable response.
pub async fn start_programmable_upstream<F, Fut>(addr: SocketAddr, handler: F)
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = (u16, String)> + Send + 'static,
{
    let handler = std::sync::Arc::new(handler);
    let app = Router::new().fallback(move || {
        let handler = handler.clone();
        async move {
            let (status, body) = handler().await;
            (
                StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                body,
            )
        }
    });
    serve(addr, app).await;
}

/// Gateway config bound to the given address with the given resource groups.
pub fn gateway_config(bind: SocketAddr, resources: &[(&str, SocketAddr)]) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = bind.to_string();
    config.resources = resources
        .iter()
        .map(|(name, addr)| ResourceConfig {
            name: name.to_string(),
            upstream: addr.to_string(),
        })
        .collect();
    config
}

/// Boot a gateway and wait for it to accept connections.
pub async fn spawn_gateway(config: GatewayConfig) -> Shutdown {
    let bind = config.listener.bind_address.clone();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = GatewayServer::new(config);
    let listener = TcpListener::bind(&bind).await.unwrap();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(200)).await;
    shutdown
}
