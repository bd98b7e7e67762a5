//! Eviction helpers for a caller-owned file watcher.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tsr_cache::{CacheError, CacheStore, DiskCacheStore};
use tsr_config::{default_cache_dir, ConfigCache, ConfigError};

/// Cache maintenance for watch mode.
///
/// A watcher calls [`clear`](Self::clear) with each changed file, and
/// checks [`is_config_stale`](Self::is_config_stale) to decide whether the
/// whole cache should go.
pub struct WatcherHelpers {
    store: Arc<DiskCacheStore>,
    config: ConfigCache,
}

impl WatcherHelpers {
    /// Creates helpers for `app_root`. Without `cache_path` the default
    /// cache directory is used.
    pub fn new(app_root: &Path, cache_path: Option<&Path>) -> Self {
        let cache_root: PathBuf = cache_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| default_cache_dir(app_root));
        let store = Arc::new(DiskCacheStore::new(app_root, &cache_root));
        let config = ConfigCache::new(app_root, store.clone());
        Self { store, config }
    }

    /// Returns the cache root being maintained.
    pub fn cache_root(&self) -> &Path {
        self.store.cache_root()
    }

    /// Evicts every entry for `file_path`, or the whole cache for `None`.
    pub fn clear(&self, file_path: Option<&Path>) -> Result<(), CacheError> {
        match file_path {
            Some(file) => self.store.clear_for_file(file),
            None => self.store.clear_all(),
        }
    }

    /// Returns `true` if the current project config has no usable cached
    /// record.
    pub fn is_config_stale(&self) -> Result<bool, ConfigError> {
        self.config.is_stale()
    }
}
