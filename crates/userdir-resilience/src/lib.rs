//! # Userdir Resilience
//!
//! Per-call deadlines and retry for dependency connections.

pub mod retry;
pub mod timeout;

pub use retry::*;
pub use timeout::*;
