//! Shared foundational types used across the tsr crates.
//!
//! Currently this is the content hash that forms the second dimension of
//! every cache key.

#![warn(missing_docs)]

pub mod hash;

pub use hash::ContentHash;
