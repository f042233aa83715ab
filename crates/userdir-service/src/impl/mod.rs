//! Service implementations.
//!
//! This module contains the concrete implementations of service traits.
//! Trait definitions live in the crate root modules (`user_service.rs`,
//! `refresh.rs`).

pub mod cache_refresher_impl;
pub mod user_service_impl;

pub use cache_refresher_impl::{CacheRefresherComponent, CacheRefresherComponentParameters};
pub use user_service_impl::{UserServiceComponent, UserServiceComponentParameters};
