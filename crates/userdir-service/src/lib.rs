//! # Userdir Service
//!
//! Service layer of the user directory. It orchestrates the record store,
//! the user cache and the avatar blob store:
//!
//! - reads are read-through: cache first, store on a miss, then populate;
//! - writes commit to the store first, then invalidate the cached snapshot;
//! - [`CacheRefresher`] rebuilds every cached snapshot in one sweep.
//!
//! Cache failures never fail a request. Every dependency call runs under
//! the deadline configured in [`ServiceSettings`].

pub mod cache;
pub mod dto;
pub mod r#impl;
pub mod refresh;
pub mod settings;
pub mod storage;
pub mod user_service;

pub use cache::*;
pub use dto::*;
pub use r#impl::*;
pub use refresh::*;
pub use settings::*;
pub use storage::*;
pub use user_service::*;
