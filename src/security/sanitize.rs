//! Input sanitization.
//!
//! # Responsibilities
//! - Buffer the request body under the configured size cap
//! - Scrub document-database query operators out of body and query input
//! - Neutralize markup in string input before it reaches resource handlers
//!
//! # Design Decisions
//! - The exact stripping rule lives behind the `Sanitizer` trait; the stage
//!   itself only decodes, runs the chain, and re-encodes
//! - Applied uniformly to JSON bodies and query strings
//! - Failures here surface through the central error responder

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderValue, Request, Uri},
    middleware::Next,
    response::Response,
};
use serde_json::Value;

use crate::http::error::{self, GatewayError};
use crate::http::server::AppState;

/// A single scrubbing rule applied to decoded request input.
pub trait Sanitizer: Send + Sync + std::fmt::Debug {
    /// Scrub a decoded document in place.
    fn scrub(&self, value: &mut Value);
}

/// Removes keys that would be interpreted as query operators by the
/// document database behind the resource services ("$"-prefixed or dotted).
#[derive(Debug, Default)]
pub struct OperatorSanitizer;

impl Sanitizer for OperatorSanitizer {
    fn scrub(&self, value: &mut Value) {
        match value {
            Value::Object(map) => {
                let flagged: Vec<String> = map
                    .keys()
                    .filter(|k| k.starts_with('$') || k.contains('.'))
                    .cloned()
                    .collect();
                for key in flagged {
                    map.remove(&key);
                }
                for child in map.values_mut() {
                    self.scrub(child);
                }
            }
            Value::Array(items) => {
                for child in items {
                    self.scrub(child);
                }
            }
            _ => {}
        }
    }
}

/// Escapes markup delimiters in string values so stored input cannot be
/// replayed as script.
#[derive(Debug, Default)]
pub struct MarkupSanitizer;

impl Sanitizer for MarkupSanitizer {
    fn scrub(&self, value: &mut Value) {
        match value {
            Value::String(s) => {
                if s.contains(['<', '>']) {
                    *s = s.replace('<', "&lt;").replace('>', "&gt;");
                }
            }
            Value::Object(map) => {
                for child in map.values_mut() {
                    self.scrub(child);
                }
            }
            Value::Array(items) => {
                for child in items {
                    self.scrub(child);
                }
            }
            _ => {}
        }
    }
}

/// The default scrubbing chain.
pub fn default_sanitizers() -> Vec<Box<dyn Sanitizer>> {
    vec![Box::new(OperatorSanitizer), Box::new(MarkupSanitizer)]
}

/// Sanitization middleware. Runs after admission and before dispatch.
pub async fn sanitize_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    match scrub_request(&state, request).await {
        Ok(request) => next.run(request).await,
        Err(err) => error::respond(err, state.config.environment),
    }
}

async fn scrub_request(
    state: &AppState,
    request: Request<Body>,
) -> Result<Request<Body>, GatewayError> {
    let (mut parts, body) = request.into_parts();

    if let Some(query) = parts.uri.query() {
        let scrubbed = scrub_query(&state.sanitizers, query);
        if scrubbed != query {
            parts.uri = rebuild_uri(&parts.uri, &scrubbed)?;
        }
    }

    // Oversized bodies fail here, before any later stage reads them.
    let bytes = axum::body::to_bytes(body, state.config.limits.max_body_bytes)
        .await
        .map_err(|e| GatewayError::BodyRead(e.to_string()))?;

    let bytes = if is_json(&parts.headers) && !bytes.is_empty() {
        let mut value: Value = serde_json::from_slice(&bytes)
            .map_err(|e| GatewayError::MalformedBody(e.to_string()))?;
        for sanitizer in state.sanitizers.iter() {
            sanitizer.scrub(&mut value);
        }
        Bytes::from(
            serde_json::to_vec(&value).map_err(|e| GatewayError::Internal(e.to_string()))?,
        )
    } else {
        bytes
    };

    // The body is now fully buffered with a known length.
    parts.headers.remove(header::TRANSFER_ENCODING);
    if !bytes.is_empty() || parts.headers.contains_key(header::CONTENT_LENGTH) {
        parts
            .headers
            .insert(header::CONTENT_LENGTH, HeaderValue::from(bytes.len()));
    }

    Ok(Request::from_parts(parts, Body::from(bytes)))
}

fn is_json(headers: &header::HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("application/json"))
        .unwrap_or(false)
}

/// Decode a query string into a document (repeated keys become arrays),
/// run the chain, and re-encode it.
fn scrub_query(sanitizers: &[Box<dyn Sanitizer>], query: &str) -> String {
    let mut doc = Value::Object(query_to_map(query));
    for sanitizer in sanitizers {
        sanitizer.scrub(&mut doc);
    }
    match doc {
        Value::Object(map) => map_to_query(&map),
        _ => String::new(),
    }
}

fn query_to_map(query: &str) -> serde_json::Map<String, Value> {
    let mut map = serde_json::Map::new();
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        let key = key.into_owned();
        let value = Value::String(value.into_owned());
        match map.get_mut(&key) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                map.insert(key, value);
            }
        }
    }
    map
}

fn map_to_query(map: &serde_json::Map<String, Value>) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in map {
        match value {
            Value::Array(items) => {
                for item in items {
                    serializer.append_pair(key, item.as_str().unwrap_or_default());
                }
            }
            Value::String(s) => {
                serializer.append_pair(key, s);
            }
            other => {
                serializer.append_pair(key, &other.to_string());
            }
        }
    }
    serializer.finish()
}

fn rebuild_uri(uri: &Uri, query: &str) -> Result<Uri, GatewayError> {
    let path = uri.path();
    let path_and_query = if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(
        path_and_query
            .parse()
            .map_err(|e: axum::http::uri::InvalidUri| GatewayError::Internal(e.to_string()))?,
    );
    Uri::from_parts(parts).map_err(|e| GatewayError::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn operator_keys_are_stripped_recursively() {
        let mut doc = json!({
            "email": "user@example.com",
            "password": { "$gt": "" },
            "profile": { "a.b": 1, "name": "ok" },
            "tags": [ { "$where": "1" } ]
        });
        OperatorSanitizer.scrub(&mut doc);
        assert_eq!(
            doc,
            json!({
                "email": "user@example.com",
                "password": {},
                "profile": { "name": "ok" },
                "tags": [ {} ]
            })
        );
    }

    #[test]
    fn markup_is_escaped_in_string_values() {
        let mut doc = json!({ "name": "<script>alert(1)</script>", "age": 3 });
        MarkupSanitizer.scrub(&mut doc);
        assert_eq!(
            doc,
            json!({ "name": "&lt;script&gt;alert(1)&lt;/script&gt;", "age": 3 })
        );
    }

    #[test]
    fn query_operator_pairs_are_dropped() {
        let sanitizers = default_sanitizers();
        let scrubbed = scrub_query(&sanitizers, "title=dune&$where=1");
        assert_eq!(scrubbed, "title=dune");
    }

    #[test]
    fn repeated_query_keys_survive_scrubbing() {
        let sanitizers = default_sanitizers();
        let scrubbed = scrub_query(&sanitizers, "genre=drama&genre=scifi");
        assert_eq!(scrubbed, "genre=drama&genre=scifi");
    }

    #[test]
    fn clean_query_is_unchanged() {
        let sanitizers = default_sanitizers();
        assert_eq!(scrub_query(&sanitizers, "page=2&size=20"), "page=2&size=20");
    }
}
