//! DAO (Data Access Object) layer.
//!
//! DAOs provide low-level, single-source data access abstractions.
//!
//! Hierarchy:
//! ```text
//! Service → Repository (interface + impl) → DAO (interface + impl) → DB
//! ```

pub mod r#impl;
pub mod user_dao;

pub use r#impl::{InMemoryUserDao, PgUserDaoImpl};
pub use user_dao::UserDao;
