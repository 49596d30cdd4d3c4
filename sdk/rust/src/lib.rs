//! Typed client for the booking platform API.

pub mod client;

pub use client::{resolve_base, BookingClient, BuildMode, BASE_URL_ENV, LOCAL_BASE, PRODUCTION_BASE};
