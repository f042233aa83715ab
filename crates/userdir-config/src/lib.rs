//! # Userdir Config
//!
//! Configuration management for the user directory service.
//! Configuration is layered from files, `USERDIR__` environment variables
//! and legacy bare environment variables.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
