//! # Userdir Security
//!
//! Password hashing. Stored user passwords are argon2id PHC strings.

pub mod password;

pub use password::*;
