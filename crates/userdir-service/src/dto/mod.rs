//! Data Transfer Objects (DTOs).

mod avatar_dto;
mod refresh_dto;
mod user_dto;

pub use avatar_dto::*;
pub use refresh_dto::*;
pub use user_dto::*;
