//! Domain value objects.

mod contact_type;
mod status;

pub use contact_type::*;
pub use status::*;
