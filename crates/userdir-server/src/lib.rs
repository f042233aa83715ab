//! # User Directory Server Library
//!
//! Dependency injection wiring, startup helpers and the server lifecycle
//! shared by the `userdir-server` and `userdir-refresh` binaries.

pub mod app;
pub mod di;
pub mod startup;
