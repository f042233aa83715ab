//! Timeout wrapper for async operations.

use std::future::Future;
use std::time::Duration;
use userdir_core::DirectoryError;

/// Runs `fut` under a deadline.
///
/// An elapsed deadline becomes `DirectoryError::Timeout` naming the
/// operation; the operation's own error passes through unchanged.
pub async fn with_deadline<Fut, T>(operation: &str, duration: Duration, fut: Fut) -> Result<T, DirectoryError>
where
    Fut: Future<Output = Result<T, DirectoryError>>,
{
    tokio::time::timeout(duration, fut).await.map_err(|_| {
        DirectoryError::Timeout(format!("{operation} timed out after {}ms", duration.as_millis()))
    })?
}
