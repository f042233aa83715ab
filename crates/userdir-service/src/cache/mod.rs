//! Caching infrastructure for the service layer.
//!
//! The user directory caches one JSON snapshot per user under
//! [`cache_keys::user`]. Two backends implement [`CacheInterface`]: Redis for
//! deployments, and an in-process map for tests and single-node runs.

mod cache_interface;
pub mod cache_keys;
mod memory_cache;
mod redis_cache;

pub use cache_interface::{CacheExt, CacheInterface};
pub use memory_cache::InMemoryCache;
pub use redis_cache::{RedisCacheService, RedisCacheServiceParameters};
