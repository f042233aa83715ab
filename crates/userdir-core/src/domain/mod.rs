//! # Directory Domain
//!
//! Domain entities and value objects for the user directory: a `User`
//! owns an ordered set of `Contact` records.

pub mod entities;
pub mod value_objects;

pub use entities::*;
pub use value_objects::*;
