//! On-disk cache store.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::CacheError;
use crate::key::{is_valid_namespace, namespace_key, ArtifactKind, CacheKey};
use crate::store::CacheStore;

/// Cache store backed by a directory tree.
///
/// Entries are plain UTF-8 files at `<cache_root>/<namespace>/<hash><ext>`.
/// There is no index or manifest: whether the exact path exists is the
/// only metadata. Writes go through a temporary file in the target
/// directory and are renamed into place, so a reader never sees a
/// half-written entry.
///
/// A file whose namespace is not a plain directory name (the app root,
/// `..`) has no entries: its cache path is empty, lookups miss, writes are
/// dropped and eviction does nothing. No operation ever touches anything
/// outside the cache root.
#[derive(Debug, Clone)]
pub struct DiskCacheStore {
    /// Directory that namespaces are computed relative to.
    app_root: PathBuf,
    /// Root directory for all cache files.
    cache_root: PathBuf,
}

impl DiskCacheStore {
    /// Creates a store for files under `app_root`, caching into `cache_root`.
    pub fn new(app_root: &Path, cache_root: &Path) -> Self {
        Self {
            app_root: app_root.to_path_buf(),
            cache_root: cache_root.to_path_buf(),
        }
    }

    /// Returns the cache root directory.
    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    /// Returns the namespace directory holding every entry for `file_path`,
    /// or `None` if the file has no usable namespace.
    pub fn namespace_dir(&self, file_path: &Path) -> Option<PathBuf> {
        let namespace = namespace_key(&self.app_root, file_path);
        is_valid_namespace(&namespace).then(|| self.cache_root.join(namespace))
    }
}

/// Removes a directory tree, treating "already gone" as success.
fn remove_tree(dir: &Path) -> Result<(), CacheError> {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(CacheError::io(dir, e)),
    }
}

impl CacheStore for DiskCacheStore {
    fn make_cache_path(&self, file_path: &Path, contents: &str, kind: ArtifactKind) -> PathBuf {
        let key = CacheKey::new(&self.app_root, file_path, contents, kind);
        if !is_valid_namespace(&key.namespace) {
            tracing::debug!(file = %file_path.display(), "no namespace, not cacheable");
            return PathBuf::new();
        }
        self.cache_root.join(key.relative_path())
    }

    fn get(&self, cache_path: &Path) -> Result<Option<String>, CacheError> {
        if cache_path.as_os_str().is_empty() {
            return Ok(None);
        }
        match std::fs::read_to_string(cache_path) {
            Ok(contents) => {
                tracing::debug!(path = %cache_path.display(), "reading from cache");
                Ok(Some(contents))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::io(cache_path, e)),
        }
    }

    fn set(&self, cache_path: &Path, contents: &str) -> Result<(), CacheError> {
        if cache_path.as_os_str().is_empty() {
            return Ok(());
        }
        tracing::debug!(path = %cache_path.display(), "writing to cache");
        let dir = cache_path.parent().unwrap_or(&self.cache_root);
        std::fs::create_dir_all(dir).map_err(|e| CacheError::io(dir, e))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| CacheError::io(dir, e))?;
        tmp.write_all(contents.as_bytes())
            .map_err(|e| CacheError::io(tmp.path(), e))?;
        tmp.persist(cache_path)
            .map_err(|e| CacheError::io(cache_path, e.error))?;
        Ok(())
    }

    fn clear_for_file(&self, file_path: &Path) -> Result<(), CacheError> {
        let Some(dir) = self.namespace_dir(file_path) else {
            tracing::debug!(file = %file_path.display(), "no namespace to clear");
            return Ok(());
        };
        tracing::debug!(file = %file_path.display(), dir = %dir.display(), "clear cache for file");
        remove_tree(&dir)
    }

    fn clear_all(&self) -> Result<(), CacheError> {
        tracing::debug!(cache_root = %self.cache_root.display(), "clear all cache");
        remove_tree(&self.cache_root)
    }

    fn is_persistent(&self) -> bool {
        true
    }
}
