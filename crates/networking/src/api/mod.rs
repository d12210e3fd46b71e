//! High-level API wrappers for storefront endpoints
//!
//! This module provides convenient wrappers around the raw HTTP client,
//! adding validation before anything goes over the wire.

mod auth;
mod catalog;

pub use auth::*;
pub use catalog::*;
