use std::path::Path;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::error::Error;

/// Capability for testing whether a filesystem path exists.
///
/// This is the only handle the sweepers keep on the filesystem.
/// Implementations must be safe to call concurrently for read-only queries.
///
/// Unit tests substitute [crate::util::test::StaticPathChecker] so sweep
/// decisions can be exercised without touching the real filesystem.
#[async_trait]
pub trait PathChecker: std::fmt::Debug + Send + Sync {
    /// Returns whether `path` exists, or [Error::Interrupted] when `token`
    /// has been cancelled.
    async fn exists(&self, token: &CancellationToken, path: &Path) -> Result<bool, Error>;
}

#[async_trait]
impl PathChecker for Box<dyn PathChecker> {
    async fn exists(&self, token: &CancellationToken, path: &Path) -> Result<bool, Error> {
        (**self).exists(token, path).await
    }
}

/// [PathChecker] backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPathChecker;

#[async_trait]
impl PathChecker for SystemPathChecker {
    async fn exists(&self, token: &CancellationToken, path: &Path) -> Result<bool, Error> {
        if token.is_cancelled() {
            return Err(Error::Interrupted);
        }
        // An indeterminate answer (e.g. a permission error on a parent
        // directory) counts as present: entries are only swept on a definite
        // absence.
        Ok(tokio::fs::try_exists(path).await.unwrap_or(true))
    }
}
