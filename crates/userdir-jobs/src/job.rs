//! Job definition.

use crate::error::JobResult;
use async_trait::async_trait;

/// A unit of work the scheduler can fire.
#[async_trait]
pub trait Job: Send + Sync + 'static {
    /// Stable name used in logs and metrics.
    fn name(&self) -> &str;

    /// Runs the job once.
    async fn run(&self) -> JobResult<()>;
}
