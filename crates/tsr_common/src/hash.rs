//! Content hashing for cache entry identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of hash bytes kept. Forty bits is plenty to tell apart the
/// handful of historical versions stored for a single source file.
const HASH_LEN: usize = 5;

/// A short content fingerprint computed with XXH3.
///
/// Two texts with the same `ContentHash` are assumed to be identical. The
/// hash is the second dimension of every cache key: editing a file changes
/// its hash, which points lookups at a fresh cache path and leaves the old
/// entry orphaned. It is not a cryptographic digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; HASH_LEN]);

impl ContentHash {
    /// Computes a content hash from a byte slice.
    pub fn from_bytes(data: &[u8]) -> Self {
        let full = xxhash_rust::xxh3::xxh3_64(data).to_be_bytes();
        let mut bytes = [0u8; HASH_LEN];
        bytes.copy_from_slice(&full[..HASH_LEN]);
        Self(bytes)
    }

    /// Computes a content hash of UTF-8 text.
    pub fn from_text(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({self})")
    }
}
