//! Error types for compiling and registering the hook.

use std::path::PathBuf;

use tsr_cache::CacheError;
use tsr_config::ConfigError;
use tsr_diagnostics::Diagnostic;

use crate::transform::TransformStage;

/// Errors raised while compiling a single file.
///
/// Translator diagnostics are not errors; they are reported and the
/// output is returned regardless.
#[derive(Debug, thiserror::Error)]
pub enum CompilerError {
    /// The output cache could not be read or written.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The source file could not be read.
    #[error("failed to read source {}: {source}", path.display())]
    Read {
        /// The source file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// A transformer specifier could not be resolved.
#[derive(Debug, thiserror::Error)]
#[error("unable to resolve transformer \"{specifier}\" ({stage}): {reason}")]
pub struct TransformError {
    /// The specifier as written in the config.
    pub specifier: String,
    /// The stage it was listed under.
    pub stage: TransformStage,
    /// Why resolution failed.
    pub reason: String,
}

impl TransformError {
    /// Creates an error for `specifier` at `stage`.
    pub fn new(specifier: impl Into<String>, stage: TransformStage, reason: impl Into<String>) -> Self {
        Self {
            specifier: specifier.into(),
            stage,
            reason: reason.into(),
        }
    }
}

/// Errors that abort [`register`](crate::register).
#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    /// The project config or hook settings could not be read.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The project config parsed with diagnostics. They have already been
    /// reported.
    #[error("{} has {} error(s)", path.display(), diagnostics.len())]
    InvalidConfig {
        /// The project config file.
        path: PathBuf,
        /// What the parser reported.
        diagnostics: Vec<Diagnostic>,
    },

    /// A configured transformer could not be resolved.
    #[error(transparent)]
    Transform(#[from] TransformError),
}
