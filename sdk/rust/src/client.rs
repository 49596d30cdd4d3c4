//! HTTP client configuration for the booking platform API.
//!
//! Production builds talk to the gateway through the relative `/api` path
//! (same host, serverless-friendly); development builds honor an environment
//! override before falling back to the local gateway address. Every request
//! carries credentials: the client keeps session cookies and replays them.

use reqwest::{Client, Response};
use serde::Serialize;

/// Base used by production builds.
pub const PRODUCTION_BASE: &str = "/api";
/// Base used by development builds with no override.
pub const LOCAL_BASE: &str = "http://localhost:3000";
/// Development-time override for the API base address.
pub const BASE_URL_ENV: &str = "BOOKING_API_BASE_URL";

/// Build mode the client is configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    Development,
    Production,
}

/// Select the API base address for a build mode.
pub fn resolve_base(mode: BuildMode, override_url: Option<&str>) -> String {
    match mode {
        BuildMode::Production => PRODUCTION_BASE.to_string(),
        BuildMode::Development => override_url
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| LOCAL_BASE.to_string()),
    }
}

/// Client for the booking platform API.
pub struct BookingClient {
    client: Client,
    base_url: String,
}

impl BookingClient {
    /// Build a client against an explicit base address. Cookies are stored
    /// and attached to every request automatically.
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().cookie_store(true).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Build a client whose base address is resolved from the build mode
    /// and the `BOOKING_API_BASE_URL` override.
    pub fn from_env(mode: BuildMode) -> Result<Self, reqwest::Error> {
        let override_url = std::env::var(BASE_URL_ENV).ok();
        Self::new(resolve_base(mode, override_url.as_deref()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get(&self, path: &str) -> Result<Response, reqwest::Error> {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
    }

    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Response, reqwest::Error> {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
    }

    pub async fn put_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Response, reqwest::Error> {
        self.client
            .put(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<Response, reqwest::Error> {
        self.client
            .delete(format!("{}{}", self.base_url, path))
            .send()
            .await
    }
}
