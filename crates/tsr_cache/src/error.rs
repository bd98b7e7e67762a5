//! Error types for cache operations.

use std::path::PathBuf;

/// Errors that can occur during cache operations.
///
/// A missing entry is not an error: lookups report it as `None`. Anything
/// that surfaces here means the cache root itself is unusable (bad
/// permissions, a file where a directory should be, non-UTF-8 garbage in an
/// entry) and is meant to abort the calling operation rather than degrade
/// to a silent recompile.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An I/O error occurred while reading, writing, or removing cache files.
    #[error("cache I/O error at {}: {source}", path.display())]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

impl CacheError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
