use core::fmt::Debug;
use core::marker::PhantomData;

use crate::error::Result;
use crate::hash_table::DEFAULT_CAPACITY;
use crate::hash_table::DEFAULT_LOAD_FACTOR;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;
use crate::index::BucketIndex;
use crate::index::DefaultIndex;

/// A hash map implemented with separate chaining, using [`HashTable`] as the
/// underlying storage.
///
/// `HashMap<K, V, H>` stores key-value pairs and asks its index function `H`
/// for the bucket of each key, passing the current bucket count explicitly.
/// Keys are compared with `Eq`.
///
/// Every keyed operation returns a [`Result`] because the index function may
/// return an out-of-range bucket, which fails the operation with
/// [`Error::OutOfBounds`](crate::Error::OutOfBounds) and leaves the map
/// unchanged. A missing key is reported as `Ok(None)` or `Ok(false)`, never as
/// an error.
///
/// Insertions that push `len / capacity` above the load factor double the
/// bucket count and rehash every entry. Removals never shrink the map.
///
/// # Examples
///
/// ```rust
/// use chain_hash::HashMap;
/// use chain_hash::StringHash;
///
/// let mut map = HashMap::with_hasher(StringHash);
/// map.set("name", "John")?.set("city", "Oslo")?;
///
/// assert_eq!(map.get(&"name")?, Some(&"John"));
/// assert!(map.has(&"city")?);
/// assert_eq!(map.remove(&"city")?, Some("Oslo"));
/// assert_eq!(map.len(), 1);
/// # Ok::<(), chain_hash::Error>(())
/// ```
#[derive(Clone)]
pub struct HashMap<K, V, H = DefaultIndex> {
    table: HashTable<(K, V)>,
    hasher: H,
}

impl<K, V, H> Debug for HashMap<K, V, H>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> HashMap<K, V> {
    /// Returns a [`Builder`] for configuring a new map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::HashMap;
    /// # use chain_hash::StringHash;
    /// #
    /// let map: HashMap<&str, i32, _> = HashMap::builder()
    ///     .capacity(64)
    ///     .load_factor(0.5)
    ///     .hasher(StringHash)
    ///     .build()?;
    /// assert_eq!(map.capacity(), 64);
    /// # Ok::<(), chain_hash::Error>(())
    /// ```
    pub fn builder() -> Builder<K, V> {
        Builder::default()
    }
}

impl<K, V, H> HashMap<K, V, H> {
    /// Creates an empty map with 16 buckets and a load factor of 0.75 that
    /// uses `hasher` to pick buckets.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::HashMap;
    /// # use chain_hash::StringHash;
    /// #
    /// let map: HashMap<String, u32, _> = HashMap::with_hasher(StringHash);
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 16);
    /// assert_eq!(map.load_factor(), 0.75);
    /// ```
    pub fn with_hasher(hasher: H) -> Self {
        Self {
            table: HashTable::default(),
            hasher,
        }
    }

    /// Creates an empty map with `capacity` buckets.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) if
    /// `capacity` is zero.
    pub fn with_capacity_and_hasher(capacity: usize, hasher: H) -> Result<Self> {
        Self::with_config(capacity, DEFAULT_LOAD_FACTOR, hasher)
    }

    /// Creates an empty map with `capacity` buckets that grows once
    /// `len / capacity` exceeds `load_factor`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) if
    /// `capacity` is zero or `load_factor` is not a finite number greater than
    /// zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::HashMap;
    /// # use chain_hash::StringHash;
    /// #
    /// let mut map = HashMap::with_config(2, 0.75, StringHash)?;
    /// map.set("a", 1)?.set("b", 2)?.set("c", 3)?;
    /// assert_eq!(map.capacity(), 4);
    /// # Ok::<(), chain_hash::Error>(())
    /// ```
    pub fn with_config(capacity: usize, load_factor: f64, hasher: H) -> Result<Self> {
        Ok(Self {
            table: HashTable::with_capacity_and_load_factor(capacity, load_factor)?,
            hasher,
        })
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the current number of buckets.
    ///
    /// The bucket count starts at the requested capacity and doubles on every
    /// resize. It is never reduced, not even by [`clear`](Self::clear).
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the load factor threshold.
    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    /// Returns a reference to the map's index function.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Removes all entries, keeping the current bucket count.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::HashMap;
    /// # use chain_hash::StringHash;
    /// #
    /// let mut map = HashMap::with_config(2, 0.75, StringHash)?;
    /// map.set("a", 1)?.set("b", 2)?;
    /// let capacity = map.capacity();
    ///
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), capacity);
    /// assert_eq!(map.get(&"a")?, None);
    /// # Ok::<(), chain_hash::Error>(())
    /// ```
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns the keys in traversal order: bucket by bucket, and within a
    /// bucket in insertion order.
    ///
    /// The order depends on the index function and changes after a resize.
    pub fn keys(&self) -> Vec<&K> {
        self.iter().map(|(k, _)| k).collect()
    }

    /// Returns the values in the same traversal order as
    /// [`keys`](Self::keys).
    pub fn values(&self) -> Vec<&V> {
        self.iter().map(|(_, v)| v).collect()
    }

    /// Returns the key-value pairs in the same traversal order as
    /// [`keys`](Self::keys).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::HashMap;
    /// # use chain_hash::StringHash;
    /// #
    /// let mut map = HashMap::with_hasher(StringHash);
    /// map.set("name", "John")?;
    ///
    /// assert_eq!(map.keys(), vec![&"name"]);
    /// assert_eq!(map.values(), vec![&"John"]);
    /// assert_eq!(map.entries(), vec![(&"name", &"John")]);
    /// # Ok::<(), chain_hash::Error>(())
    /// ```
    pub fn entries(&self) -> Vec<(&K, &V)> {
        self.iter().collect()
    }

    /// Returns a lazy iterator over the key-value pairs in traversal order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator that removes and yields every key-value pair in
    /// traversal order. The bucket count is kept.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Returns the number of entries in each bucket, in bucket order.
    pub fn chain_lengths(&self) -> Vec<usize> {
        self.table.chain_lengths()
    }
}

impl<K, V, H> HashMap<K, V, H>
where
    K: Eq,
    H: BucketIndex<K>,
{
    fn bucket_of(&self, key: &K) -> usize {
        self.hasher.index(key, self.table.capacity())
    }

    /// Stores `value` under `key` and returns the map for chaining.
    ///
    /// An existing value for `key` is overwritten in place and the length is
    /// unchanged. A new key is appended to its bucket's chain, and the map is
    /// resized if the new length exceeds the load factor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`](crate::Error::OutOfBounds) if the index
    /// function returns a bucket outside the current capacity, or outside the
    /// new capacity while resizing. The map is left unchanged.
    pub fn set(&mut self, key: K, value: V) -> Result<&mut Self> {
        self.insert(key, value)?;
        Ok(self)
    }

    /// Inserts a key-value pair, returning the previous value for `key` if
    /// there was one.
    ///
    /// # Errors
    ///
    /// Fails like [`set`](Self::set).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::HashMap;
    /// # use chain_hash::StringHash;
    /// #
    /// let mut map = HashMap::with_hasher(StringHash);
    /// assert_eq!(map.insert("a", 1)?, None);
    /// assert_eq!(map.insert("a", 2)?, Some(1));
    /// assert_eq!(map.get(&"a")?, Some(&2));
    /// # Ok::<(), chain_hash::Error>(())
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>> {
        let hasher = &self.hasher;
        let table = &mut self.table;
        let index = hasher.index(&key, table.capacity());
        match table.entry(index, |(k, _)| k == &key)? {
            TableEntry::Occupied(mut entry) => {
                let old_value = core::mem::replace(&mut entry.get_mut().1, value);
                Ok(Some(old_value))
            }
            TableEntry::Vacant(entry) => {
                entry.insert((key, value), |(k, _), capacity| hasher.index(k, capacity))?;
                Ok(None)
            }
        }
    }

    /// Returns a reference to the value stored under `key`, or `None` if the
    /// key is absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`](crate::Error::OutOfBounds) if the index
    /// function returns a bucket outside the current capacity.
    pub fn get(&self, key: &K) -> Result<Option<&V>> {
        let found = self.table.find(self.bucket_of(key), |(k, _)| k == key)?;
        Ok(found.map(|(_, v)| v))
    }

    /// Returns the stored key and value for `key`.
    ///
    /// # Errors
    ///
    /// Fails like [`get`](Self::get).
    pub fn get_key_value(&self, key: &K) -> Result<Option<(&K, &V)>> {
        let found = self.table.find(self.bucket_of(key), |(k, _)| k == key)?;
        Ok(found.map(|(k, v)| (k, v)))
    }

    /// Returns a mutable reference to the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Fails like [`get`](Self::get).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::HashMap;
    /// # use chain_hash::StringHash;
    /// #
    /// let mut map = HashMap::with_hasher(StringHash);
    /// map.set("a", 1)?;
    /// if let Some(x) = map.get_mut(&"a")? {
    ///     *x += 10;
    /// }
    /// assert_eq!(map.get(&"a")?, Some(&11));
    /// # Ok::<(), chain_hash::Error>(())
    /// ```
    pub fn get_mut(&mut self, key: &K) -> Result<Option<&mut V>> {
        let index = self.bucket_of(key);
        let found = self.table.find_mut(index, |(k, _)| k == key)?;
        Ok(found.map(|(_, v)| v))
    }

    /// Returns `true` if a value is stored under `key`.
    ///
    /// # Errors
    ///
    /// Fails like [`get`](Self::get).
    pub fn has(&self, key: &K) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Same as [`has`](Self::has).
    pub fn contains_key(&self, key: &K) -> Result<bool> {
        self.has(key)
    }

    /// Removes `key` from the map, returning its value if it was present.
    ///
    /// Other entries in the same bucket keep their order. The bucket count is
    /// never reduced.
    ///
    /// # Errors
    ///
    /// Fails like [`get`](Self::get). The map is left unchanged.
    pub fn remove(&mut self, key: &K) -> Result<Option<V>> {
        Ok(self.remove_entry(key)?.map(|(_, v)| v))
    }

    /// Removes `key` from the map, returning the stored key and value if the
    /// key was present.
    ///
    /// # Errors
    ///
    /// Fails like [`get`](Self::get). The map is left unchanged.
    pub fn remove_entry(&mut self, key: &K) -> Result<Option<(K, V)>> {
        let index = self.bucket_of(key);
        self.table.remove(index, |(k, _)| k == key)
    }

    /// Gets the given key's entry for in-place manipulation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`](crate::Error::OutOfBounds) if the index
    /// function returns a bucket outside the current capacity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::HashMap;
    /// # use chain_hash::StringHash;
    /// #
    /// let mut map = HashMap::with_hasher(StringHash);
    /// for word in ["a", "b", "a"] {
    ///     *map.entry(word)?.or_insert(0)? += 1;
    /// }
    /// assert_eq!(map.get(&"a")?, Some(&2));
    /// assert_eq!(map.get(&"b")?, Some(&1));
    /// # Ok::<(), chain_hash::Error>(())
    /// ```
    pub fn entry(&mut self, key: K) -> Result<Entry<'_, K, V, H>> {
        let hasher = &self.hasher;
        let table = &mut self.table;
        let index = hasher.index(&key, table.capacity());
        Ok(match table.entry(index, |(k, _)| k == &key)? {
            TableEntry::Occupied(entry) => Entry::Occupied(OccupiedEntry { entry }),
            TableEntry::Vacant(entry) => Entry::Vacant(VacantEntry { entry, key, hasher }),
        })
    }
}

impl<K, V, H> HashMap<K, V, H>
where
    H: Default,
{
    /// Creates an empty map with the default capacity, load factor and a
    /// default-constructed index function.
    pub fn new() -> Self {
        Self::with_hasher(H::default())
    }

    /// Creates an empty map with `capacity` buckets and a default-constructed
    /// index function.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) if
    /// `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_capacity_and_hasher(capacity, H::default())
    }
}

impl<K, V, H> Default for HashMap<K, V, H>
where
    H: Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, K, V, H> IntoIterator for &'a HashMap<K, V, H> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Configures and builds a [`HashMap`].
///
/// Created by [`HashMap::builder`]. Unset options fall back to 16 buckets, a
/// load factor of 0.75 and [`DefaultIndex`].
pub struct Builder<K, V, H = DefaultIndex> {
    capacity: usize,
    load_factor: f64,
    hasher: H,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V> Default for Builder<K, V> {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
            hasher: DefaultIndex::default(),
            _marker: PhantomData,
        }
    }
}

impl<K, V, H> Debug for Builder<K, V, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Builder")
            .field("capacity", &self.capacity)
            .field("load_factor", &self.load_factor)
            .finish_non_exhaustive()
    }
}

impl<K, V, H> Builder<K, V, H> {
    /// Sets the initial number of buckets.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the load factor threshold.
    pub fn load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    /// Sets the index function.
    pub fn hasher<T>(self, hasher: T) -> Builder<K, V, T> {
        Builder {
            capacity: self.capacity,
            load_factor: self.load_factor,
            hasher,
            _marker: PhantomData,
        }
    }

    /// Builds the map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) if
    /// the capacity is zero or the load factor is not a finite number greater
    /// than zero.
    pub fn build(self) -> Result<HashMap<K, V, H>> {
        HashMap::with_config(self.capacity, self.load_factor, self.hasher)
    }
}

/// A view into a single entry in the map, which may either be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashMap`].
///
/// [`entry`]: HashMap::entry
pub enum Entry<'a, K, V, H> {
    /// The key is not in the map.
    Vacant(VacantEntry<'a, K, V, H>),
    /// The key is in the map.
    Occupied(OccupiedEntry<'a, K, V>),
}

impl<'a, K, V, H> Entry<'a, K, V, H>
where
    H: BucketIndex<K>,
{
    /// Ensures a value is stored by inserting `default` if the entry is
    /// vacant, and returns a mutable reference to the value.
    ///
    /// # Errors
    ///
    /// Fails like [`VacantEntry::insert`].
    pub fn or_insert(self, default: V) -> Result<&'a mut V> {
        match self {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Like [`or_insert`](Self::or_insert), computing the value only when the
    /// entry is vacant.
    pub fn or_insert_with<F>(self, default: F) -> Result<&'a mut V>
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Like [`or_insert`](Self::or_insert) with `V::default()`.
    pub fn or_default(self) -> Result<&'a mut V>
    where
        V: Default,
    {
        self.or_insert_with(V::default)
    }
}

impl<K, V, H> Entry<'_, K, V, H> {
    /// Calls `f` on the value if the entry is occupied.
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Returns the entry's key.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

/// A view into a vacant entry in a [`HashMap`].
pub struct VacantEntry<'a, K, V, H> {
    entry: crate::hash_table::VacantEntry<'a, (K, V)>,
    key: K,
    hasher: &'a H,
}

impl<'a, K, V, H> VacantEntry<'a, K, V, H> {
    /// Returns the key that would be inserted.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Takes ownership of the key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Inserts `value` under the entry's key and returns a mutable reference
    /// to it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`](crate::Error::OutOfBounds) if the
    /// insertion triggers a resize and the index function returns a bucket
    /// outside the new capacity. The map is left unchanged.
    pub fn insert(self, value: V) -> Result<&'a mut V>
    where
        H: BucketIndex<K>,
    {
        let hasher = self.hasher;
        let (_, value) = self
            .entry
            .insert((self.key, value), |(k, _), capacity| hasher.index(k, capacity))?;
        Ok(value)
    }
}

/// A view into an occupied entry in a [`HashMap`].
pub struct OccupiedEntry<'a, K, V> {
    entry: crate::hash_table::OccupiedEntry<'a, (K, V)>,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// Returns the stored key.
    pub fn key(&self) -> &K {
        &self.entry.get().0
    }

    /// Returns the stored value.
    pub fn get(&self) -> &V {
        &self.entry.get().1
    }

    /// Returns the stored value mutably.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.entry.get_mut().1
    }

    /// Converts the entry into a mutable reference bound to the map's
    /// lifetime.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.entry.into_mut().1
    }

    /// Replaces the stored value, returning the old one.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(&mut self.entry.get_mut().1, value)
    }

    /// Removes the entry, returning its value.
    pub fn remove(self) -> V {
        self.entry.remove().1
    }

    /// Removes the entry, returning the stored key and value.
    pub fn remove_entry(self) -> (K, V) {
        self.entry.remove()
    }
}

/// An iterator over the key-value pairs of a [`HashMap`] in traversal order.
pub struct Iter<'a, K, V> {
    inner: crate::hash_table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// A draining iterator over the key-value pairs of a [`HashMap`].
pub struct Drain<'a, K, V> {
    inner: crate::hash_table::Drain<'a, (K, V)>,
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Drain<'_, K, V> {}
