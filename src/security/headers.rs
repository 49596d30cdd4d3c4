//! Security response headers.
//!
//! # Responsibilities
//! - Restrictive default content-source policy for anything the API serves
//! - Standard hardening headers (nosniff, frame options, referrer policy)
//!
//! # Design Decisions
//! - No cross-origin-embedder-policy header: it would break cross-origin
//!   consumption of the API by the browser client
//! - Headers are set if not already present, so upstream services keep the
//!   final say over their own responses

use axum::http::{header, HeaderValue};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

/// Content sources allowed in responses: scripts and defaults from self,
/// inline styles tolerated, images also from data: and https:.
pub const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; script-src 'self'; \
     style-src 'self' 'unsafe-inline'; img-src 'self' data: https:";

/// Wrap a router with the hardening headers.
pub fn apply(router: Router) -> Router {
    router
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(CONTENT_SECURITY_POLICY),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
}
