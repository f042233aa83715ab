//! # Userdir Repository
//!
//! Record store for users and their contacts:
//!
//! ```text
//! Service
//!   ↓  Arc<dyn UserRepository>  (domain interface)
//! UserRepositoryImpl            (repository impl, coordinates the DAO)
//!   ↓  Arc<dyn UserDao>         (DAO interface)
//! PgUserDaoImpl                 (DAO impl, PostgreSQL / SQLx)
//!   ↓
//! PostgreSQL
//! ```
//!
//! Schema migrations live in the workspace `migrations/` directory and are
//! embedded by [`DatabasePool::run_migrations`](DatabasePoolInterface::run_migrations).

pub mod dao;
pub mod pool;
pub mod traits;
pub mod r#impl;

pub use dao::{InMemoryUserDao, PgUserDaoImpl, UserDao};
pub use pool::*;
pub use r#impl::UserRepositoryImpl;
pub use traits::*;
