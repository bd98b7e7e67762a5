//! The cache contract shared by the disk and no-op stores.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::disk::DiskCacheStore;
use crate::error::CacheError;
use crate::key::ArtifactKind;
use crate::null::NullCacheStore;

/// Read/write/evict primitives over cache entries.
///
/// Paths handed to [`get`](Self::get) and [`set`](Self::set) come from
/// [`make_cache_path`](Self::make_cache_path) on the same store.
pub trait CacheStore: Send + Sync {
    /// Returns where the entry for `contents` of `file_path` lives.
    ///
    /// Pure: never touches the filesystem.
    fn make_cache_path(&self, file_path: &Path, contents: &str, kind: ArtifactKind) -> PathBuf;

    /// Reads an entry. A missing entry is `Ok(None)`; every other failure
    /// is an error.
    fn get(&self, cache_path: &Path) -> Result<Option<String>, CacheError>;

    /// Writes an entry, creating intermediate directories. Sibling entries
    /// in the same namespace are left alone.
    fn set(&self, cache_path: &Path, contents: &str) -> Result<(), CacheError>;

    /// Removes every entry ever written for `file_path`.
    fn clear_for_file(&self, file_path: &Path) -> Result<(), CacheError>;

    /// Removes the whole cache root.
    fn clear_all(&self) -> Result<(), CacheError>;

    /// Returns `true` if entries are actually persisted.
    fn is_persistent(&self) -> bool;
}

/// Picks the store implementation once, up front.
///
/// With caching enabled this is a [`DiskCacheStore`] rooted at
/// `cache_root`; otherwise a [`NullCacheStore`], and `cache_root` is
/// ignored.
pub fn select_store(enabled: bool, app_root: &Path, cache_root: &Path) -> Arc<dyn CacheStore> {
    if enabled {
        tracing::debug!(cache_root = %cache_root.display(), "using disk cache");
        Arc::new(DiskCacheStore::new(app_root, cache_root))
    } else {
        tracing::debug!("caching disabled");
        Arc::new(NullCacheStore)
    }
}
