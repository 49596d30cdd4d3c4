//! Routing, health and error-path tests for the gateway.

use std::net::SocketAddr;

use booking_client::BookingClient;
use booking_gateway::config::Environment;

mod common;

#[tokio::test]
async fn test_health_is_served_under_both_prefixes() {
    let gateway_addr: SocketAddr = "127.0.0.1:29201".parse().unwrap();
    let shutdown = common::spawn_gateway(common::gateway_config(gateway_addr, &[])).await;

    let client = reqwest::Client::new();
    for path in ["/health", "/api/health"] {
        let res = client
            .get(format!("http://{gateway_addr}{path}"))
            .send()
            .await
            .expect("Gateway unreachable");
        assert_eq!(res.status(), 200, "{path}");

        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["status"], "OK");
        assert_eq!(body["environment"], "development");
        assert!(body["timestamp"].is_string());
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_resource_aliases_reach_the_same_upstream_path() {
    let upstream_addr: SocketAddr = "127.0.0.1:29211".parse().unwrap();
    let gateway_addr: SocketAddr = "127.0.0.1:29212".parse().unwrap();

    common::start_echo_upstream(upstream_addr).await;
    let shutdown =
        common::spawn_gateway(common::gateway_config(gateway_addr, &[("movie", upstream_addr)]))
            .await;

    let client = reqwest::Client::new();
    let bare = client
        .get(format!("http://{gateway_addr}/movie/list?sort=asc"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let prefixed = client
        .get(format!("http://{gateway_addr}/api/movie/list?sort=asc"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    // Both aliases strip their mount prefix, so the upstream sees one path.
    assert_eq!(bare, prefixed);
    assert_eq!(bare, "GET /list?sort=asc");

    shutdown.trigger();
}

#[tokio::test]
async fn test_unmatched_route_is_a_json_404() {
    let gateway_addr: SocketAddr = "127.0.0.1:29221".parse().unwrap();
    let shutdown = common::spawn_gateway(common::gateway_config(gateway_addr, &[])).await;

    let res = reqwest::Client::new()
        .get(format!("http://{gateway_addr}/does-not-exist"))
        .send()
        .await
        .expect("Gateway unreachable");

    assert_eq!(res.status(), 404);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Route /does-not-exist not found");

    shutdown.trigger();
}

#[tokio::test]
async fn test_upstream_failure_keeps_detail_in_development() {
    let gateway_addr: SocketAddr = "127.0.0.1:29231".parse().unwrap();
    // Nothing listens on the upstream port.
    let dead_upstream: SocketAddr = "127.0.0.1:29239".parse().unwrap();

    let shutdown =
        common::spawn_gateway(common::gateway_config(gateway_addr, &[("movie", dead_upstream)]))
            .await;

    let res = reqwest::Client::new()
        .get(format!("http://{gateway_addr}/movie/list"))
        .send()
        .await
        .expect("Gateway unreachable");

    assert_eq!(res.status(), 500);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    let message = body["message"].as_str().unwrap();
    assert_ne!(message, "Internal server error");
    assert!(message.contains("upstream request failed"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_upstream_failure_is_generic_in_production() {
    let gateway_addr: SocketAddr = "127.0.0.1:29241".parse().unwrap();
    let dead_upstream: SocketAddr = "127.0.0.1:29249".parse().unwrap();

    let mut config = common::gateway_config(gateway_addr, &[("movie", dead_upstream)]);
    config.environment = Environment::Production;
    let shutdown = common::spawn_gateway(config).await;

    let res = reqwest::Client::new()
        .get(format!("http://{gateway_addr}/movie/list"))
        .send()
        .await
        .expect("Gateway unreachable");

    assert_eq!(res.status(), 500);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Internal server error");

    shutdown.trigger();
}

#[tokio::test]
async fn test_operator_input_is_scrubbed_before_dispatch() {
    let upstream_addr: SocketAddr = "127.0.0.1:29251".parse().unwrap();
    let gateway_addr: SocketAddr = "127.0.0.1:29252".parse().unwrap();

    common::start_body_echo_upstream(upstream_addr).await;
    let shutdown =
        common::spawn_gateway(common::gateway_config(gateway_addr, &[("auth", upstream_addr)]))
            .await;

    let res = reqwest::Client::new()
        .post(format!("http://{gateway_addr}/api/auth/login"))
        .json(&serde_json::json!({
            "email": "user@example.com",
            "password": { "$gt": "" }
        }))
        .send()
        .await
        .expect("Gateway unreachable");

    assert_eq!(res.status(), 200);
    let forwarded: serde_json::Value = res.json().await.unwrap();
    assert_eq!(forwarded["email"], "user@example.com");
    assert_eq!(forwarded["password"], serde_json::json!({}));

    shutdown.trigger();
}

#[tokio::test]
async fn test_cookies_reach_the_resource_service() {
    let upstream_addr: SocketAddr = "127.0.0.1:29291".parse().unwrap();
    let gateway_addr: SocketAddr = "127.0.0.1:29292".parse().unwrap();

    common::start_header_echo_upstream(upstream_addr, "cookie").await;
    let shutdown =
        common::spawn_gateway(common::gateway_config(gateway_addr, &[("auth", upstream_addr)]))
            .await;

    let res = reqwest::Client::new()
        .get(format!("http://{gateway_addr}/api/auth/me"))
        .header("Cookie", "session=abc123")
        .send()
        .await
        .expect("Gateway unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "session=abc123");

    shutdown.trigger();
}

#[tokio::test]
async fn test_hardening_headers_and_request_id_on_responses() {
    let gateway_addr: SocketAddr = "127.0.0.1:29261".parse().unwrap();
    let shutdown = common::spawn_gateway(common::gateway_config(gateway_addr, &[])).await;

    let res = reqwest::Client::new()
        .get(format!("http://{gateway_addr}/health"))
        .header("x-request-id", "it-test-42")
        .send()
        .await
        .expect("Gateway unreachable");

    let headers = res.headers();
    assert!(headers
        .get("content-security-policy")
        .unwrap()
        .to_str()
        .unwrap()
        .contains("default-src 'self'"));
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-request-id").unwrap(), "it-test-42");

    shutdown.trigger();
}

#[tokio::test]
async fn test_sdk_client_reaches_the_gateway() {
    let gateway_addr: SocketAddr = "127.0.0.1:29271".parse().unwrap();
    let shutdown = common::spawn_gateway(common::gateway_config(gateway_addr, &[])).await;

    let client = BookingClient::new(format!("http://{gateway_addr}")).unwrap();
    let res = client.get("/health").await.expect("Gateway unreachable");

    assert_eq!(res.status(), 200);

    shutdown.trigger();
}
