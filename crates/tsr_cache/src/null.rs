//! No-op cache store used when caching is disabled.

use std::path::{Path, PathBuf};

use crate::error::CacheError;
use crate::key::ArtifactKind;
use crate::store::CacheStore;

/// A cache that remembers nothing.
///
/// Every lookup misses, every write and eviction does nothing, and cache
/// paths are empty. Nothing is ever created on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCacheStore;

impl CacheStore for NullCacheStore {
    fn make_cache_path(&self, _file_path: &Path, _contents: &str, _kind: ArtifactKind) -> PathBuf {
        PathBuf::new()
    }

    fn get(&self, _cache_path: &Path) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    fn set(&self, _cache_path: &Path, _contents: &str) -> Result<(), CacheError> {
        Ok(())
    }

    fn clear_for_file(&self, _file_path: &Path) -> Result<(), CacheError> {
        Ok(())
    }

    fn clear_all(&self) -> Result<(), CacheError> {
        Ok(())
    }

    fn is_persistent(&self) -> bool {
        false
    }
}
