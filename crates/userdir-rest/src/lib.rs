//! # Userdir REST
//!
//! REST API layer using Axum for the user directory.
//! Provides HTTP endpoints for users and their contacts, avatar upload,
//! the manual cache refresh trigger, health probes and metrics.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use router::*;
pub use state::*;
