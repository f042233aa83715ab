//! Domain entities.

mod contact;
mod user;

pub use contact::*;
pub use user::*;
