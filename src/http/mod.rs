//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, middleware pipeline in fixed order)
//!     → request.rs (assign request ID)
//!     → security (origin admission, input sanitization)
//!     → routing (health, resource dispatch, fallback)
//!     → error.rs (terminal responder for any raised failure)
//! ```

pub mod error;
pub mod request;
pub mod server;

pub use request::{RequestId, RequestIdExt, RequestIdLayer, X_REQUEST_ID};
pub use server::GatewayServer;
