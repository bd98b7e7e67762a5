//! Error types for configuration loading and caching.

use std::path::PathBuf;

use tsr_cache::CacheError;

/// Errors that can occur while reading configuration.
///
/// An invalid `tsconfig.json` is not one of them: parser diagnostics come
/// back inside [`ResolvedConfig`](crate::ResolvedConfig) and the caller
/// decides whether they are fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The project configuration file does not exist.
    #[error("expected the \"tsconfig.json\" file to exist in the app root ({})", path.display())]
    Missing {
        /// Where the file was looked for.
        path: PathBuf,
    },

    /// An I/O error other than not-found occurred while reading a file.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The cache could not be read or written.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// A config record could not be serialized for the cache.
    #[error("failed to serialize config record: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The hook settings file could not be parsed.
    #[error("invalid settings in {}: {reason}", path.display())]
    InvalidSettings {
        /// The settings file.
        path: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },
}
