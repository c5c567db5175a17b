#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

/// A hash map built on the chained hash table.
///
/// This module provides a `HashMap` that wraps the `HashTable` and provides a
/// key-value map interface driven by a pluggable bucket index function.
pub mod hash_map;

pub mod hash_table;

/// Bucket index functions.
///
/// This module provides the `BucketIndex` trait that maps a key and a bucket
/// count to a bucket, along with a reference string hash and an adapter for
/// any `BuildHasher`.
pub mod index;

mod error;

pub use error::Error;
pub use error::Result;
pub use hash_map::Entry;
pub use hash_map::HashMap;
pub use hash_table::HashTable;
pub use index::BucketIndex;
pub use index::BuildHasherIndex;
pub use index::DefaultIndex;
#[cfg(feature = "foldhash")]
pub use index::FoldIndex;
pub use index::StringHash;
