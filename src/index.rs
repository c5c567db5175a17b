use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

/// Maps a key to a bucket slot for a given bucket count.
///
/// Implementations must be deterministic: the same `(key, capacity)` pair must
/// always produce the same index, otherwise lookups and rehashing disagree about
/// where an entry lives. The returned index must lie in `[0, capacity)`. The
/// table checks this on every call and fails the operation with
/// [`Error::OutOfBounds`](crate::Error::OutOfBounds) instead of storing the
/// entry anywhere.
///
/// The table always passes the capacity it wants the index for. While
/// resizing, that is the new capacity rather than the current one. The
/// capacity passed by the table is never zero.
///
/// Any `Fn(&K, usize) -> usize` closure is a `BucketIndex<K>`.
///
/// # Examples
///
/// ```rust
/// use chain_hash::BucketIndex;
///
/// let by_value = |key: &u32, capacity: usize| *key as usize % capacity;
/// assert_eq!(by_value.index(&17, 16), 1);
/// ```
pub trait BucketIndex<K: ?Sized> {
    /// Returns the bucket slot for `key` in a table with `capacity` buckets.
    fn index(&self, key: &K, capacity: usize) -> usize;
}

impl<K, F> BucketIndex<K> for F
where
    K: ?Sized,
    F: Fn(&K, usize) -> usize,
{
    #[inline]
    fn index(&self, key: &K, capacity: usize) -> usize {
        self(key, capacity)
    }
}

/// A polynomial string hash.
///
/// The hash runs Horner's method with multiplier 31 over the UTF-16 code units
/// of the key, wrapping as a signed 32-bit integer. The slot is the absolute
/// value of the hash modulo the capacity.
///
/// It is stateless, so a single value can be shared between any number of
/// tables.
///
/// # Examples
///
/// ```rust
/// use chain_hash::BucketIndex;
/// use chain_hash::StringHash;
///
/// assert_eq!(StringHash::hash("a"), 97);
/// assert_eq!(StringHash.index("a", 16), 1);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StringHash;

impl StringHash {
    /// Returns the raw signed hash of `key` before reduction.
    pub fn hash(key: &str) -> i32 {
        key.encode_utf16()
            .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(unit as i32))
    }
}

impl<K> BucketIndex<K> for StringHash
where
    K: AsRef<str> + ?Sized,
{
    #[inline]
    fn index(&self, key: &K, capacity: usize) -> usize {
        Self::hash(key.as_ref()).unsigned_abs() as usize % capacity
    }
}

/// Adapts any [`BuildHasher`] into a [`BucketIndex`] for `Hash` keys.
///
/// The full 64-bit hash is reduced modulo the capacity.
#[derive(Default, Clone)]
pub struct BuildHasherIndex<S> {
    hash_builder: S,
}

impl<S> BuildHasherIndex<S> {
    /// Wraps `hash_builder`.
    pub fn new(hash_builder: S) -> Self {
        Self { hash_builder }
    }

    /// Returns a reference to the wrapped hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }
}

impl<S> Debug for BuildHasherIndex<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BuildHasherIndex").finish_non_exhaustive()
    }
}

impl<K, S> BucketIndex<K> for BuildHasherIndex<S>
where
    K: Hash + ?Sized,
    S: BuildHasher,
{
    #[inline]
    fn index(&self, key: &K, capacity: usize) -> usize {
        (self.hash_builder.hash_one(key) % capacity as u64) as usize
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// A [`BuildHasherIndex`] backed by foldhash's randomly seeded fast hasher.
        pub type FoldIndex = BuildHasherIndex<foldhash::fast::RandomState>;

        /// The index function used by [`HashMap`](crate::HashMap) when none is
        /// named.
        pub type DefaultIndex = FoldIndex;
    } else {
        /// The index function used by [`HashMap`](crate::HashMap) when none is
        /// named.
        pub type DefaultIndex = BuildHasherIndex<std::hash::RandomState>;
    }
}
