//! Routing subsystem.
//!
//! # Responsibilities
//! - Build the route table: health, resource groups, fallback
//! - Delegate dispatched requests to the group's upstream service
//!
//! # Design Decisions
//! - One registration call per resource walks the mount-prefix list, so the
//!   `/api` and bare aliases are guaranteed to stay identical
//! - Explicit JSON 404 rather than a silent default

pub mod router;
pub mod upstream;

pub use router::{build_routes, MOUNT_PREFIXES};
pub use upstream::ResourceTarget;
