//! Content-addressed disk cache for compiled output and parsed config.
//!
//! Every entry lives at `<cache_root>/<namespace>/<hash><ext>`: the
//! namespace is derived from the source file's path relative to the app
//! root, the hash from the text being cached against. Editing a file moves
//! its lookups to a new path, so entries never need rewriting, and evicting
//! everything ever produced for a file is a single directory removal.
//!
//! [`select_store`] picks between [`DiskCacheStore`] and the no-op
//! [`NullCacheStore`] once, so callers are written against [`CacheStore`]
//! without branching on whether caching is enabled.

#![warn(missing_docs)]

pub mod disk;
pub mod error;
pub mod key;
pub mod null;
pub mod store;

pub use disk::DiskCacheStore;
pub use error::CacheError;
pub use key::{is_valid_namespace, namespace_key, ArtifactKind, CacheKey};
pub use null::NullCacheStore;
pub use store::{select_store, CacheStore};
