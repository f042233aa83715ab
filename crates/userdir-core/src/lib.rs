//! # Userdir Core
//!
//! Core types, traits, and error definitions for the user directory.
//! This crate holds the domain model (users and their contacts) and the
//! error taxonomy shared by every other layer.

pub mod domain;
pub mod error;
pub mod id;
pub mod result;
pub mod traits;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use result::*;
pub use traits::*;
pub use validation::*;

// Re-export shaku for dependency injection
pub use shaku::{module, HasComponent, Interface};
