//! REST API controllers.

pub mod health_controller;
pub mod jobs_controller;
pub mod metrics_controller;
pub mod upload_controller;
pub mod user_controller;

pub use health_controller::*;
