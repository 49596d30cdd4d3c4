//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → cors.rs (origin admission, pre-flight answers)
//!     → sanitize.rs (scrub operator/markup input from body and query)
//!     → Pass to routing
//! Outgoing response:
//!     → headers.rs (content-source policy, hardening headers)
//! ```
//!
//! # Design Decisions
//! - Fail closed: an origin that matches neither the allow-list nor a
//!   trusted suffix is rejected before dispatch
//! - No trust in client input

pub mod cors;
pub mod headers;
pub mod sanitize;

pub use cors::{OriginDecision, OriginPolicy};
pub use sanitize::Sanitizer;
