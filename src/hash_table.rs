//! A raw separate-chaining hash table.
//!
//! [`HashTable`] stores values in a bucket array where every bucket is a
//! chain of values kept in append order. It knows nothing about keys: callers
//! supply the bucket index for the value they are looking for along with an
//! equality predicate, and a rehash function whenever an insertion might grow
//! the table. [`HashMap`](crate::HashMap) is built on top of it.

use core::fmt::Debug;

use crate::error::Error;
use crate::error::Result;

/// Bucket count used when no capacity is requested.
pub const DEFAULT_CAPACITY: usize = 16;

/// Load factor used when none is requested.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

cfg_if::cfg_if! {
    if #[cfg(feature = "logging")] {
        fn log_resize(from: usize, to: usize, len: usize) {
            log::debug!("resizing chained table from {from} to {to} buckets ({len} entries)");
        }

        fn log_rejected_index(index: usize, capacity: usize) {
            log::warn!("rejected bucket index {index} for capacity {capacity}");
        }
    } else {
        #[inline(always)]
        fn log_resize(_from: usize, _to: usize, _len: usize) {}

        #[inline(always)]
        fn log_rejected_index(_index: usize, _capacity: usize) {}
    }
}

#[inline]
fn checked_index(index: usize, capacity: usize) -> Result<usize> {
    if index < capacity {
        Ok(index)
    } else {
        log_rejected_index(index, capacity);
        Err(Error::OutOfBounds { index, capacity })
    }
}

fn empty_buckets<T>(capacity: usize) -> Vec<Vec<T>> {
    let mut buckets = Vec::with_capacity(capacity);
    buckets.resize_with(capacity, Vec::new);
    buckets
}

/// A hash table using separate chaining.
///
/// Each bucket is a `Vec<T>` in append order. Empty buckets are unallocated
/// vectors, so storage for a chain is only created when its first value
/// arrives, and released again when its last value is removed.
///
/// Every operation takes a bucket index computed by the caller for the
/// table's current [`capacity`](Self::capacity). Indices outside
/// `[0, capacity)` are rejected with [`Error::OutOfBounds`] before the table
/// is touched.
///
/// After an insertion, if `len > load_factor * capacity`, the bucket array is
/// rebuilt at double the capacity and every value is rehashed, in bucket order
/// and then chain order, with the rehash function supplied to the insertion.
/// The table never shrinks.
///
/// # Examples
///
/// ```rust
/// use chain_hash::BucketIndex;
/// use chain_hash::StringHash;
/// use chain_hash::hash_table::Entry;
/// use chain_hash::hash_table::HashTable;
///
/// let rehash = |s: &String, capacity: usize| StringHash.index(s, capacity);
///
/// let mut table = HashTable::with_capacity(4)?;
/// let index = StringHash.index("key", table.capacity());
///
/// match table.entry(index, |s: &String| s == "key")? {
///     Entry::Vacant(entry) => {
///         entry.insert("key".to_string(), rehash)?;
///     }
///     Entry::Occupied(_) => unreachable!(),
/// }
///
/// let index = StringHash.index("key", table.capacity());
/// assert_eq!(table.find(index, |s| s == "key")?, Some(&"key".to_string()));
/// # Ok::<(), chain_hash::Error>(())
/// ```
#[derive(Clone)]
pub struct HashTable<T> {
    buckets: Vec<Vec<T>>,
    populated: usize,
    load_factor: f64,
}

impl<T> Debug for HashTable<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashTable")
            .field("capacity", &self.capacity())
            .field("populated", &self.populated)
            .field("load_factor", &self.load_factor)
            .field("buckets", &self.buckets)
            .finish()
    }
}

impl<T> Default for HashTable<T> {
    /// Creates an empty table with [`DEFAULT_CAPACITY`] buckets and
    /// [`DEFAULT_LOAD_FACTOR`].
    fn default() -> Self {
        Self {
            buckets: empty_buckets(DEFAULT_CAPACITY),
            populated: 0,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

impl<T> HashTable<T> {
    /// Creates an empty table with `capacity` buckets and the default load
    /// factor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_capacity_and_load_factor(capacity, DEFAULT_LOAD_FACTOR)
    }

    /// Creates an empty table with `capacity` buckets that grows once
    /// `len / capacity` exceeds `load_factor`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `capacity` is zero or
    /// `load_factor` is not a finite number greater than zero. Nothing is
    /// allocated in that case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::Error;
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<u32> = HashTable::with_capacity_and_load_factor(8, 0.5)?;
    /// assert_eq!(table.capacity(), 8);
    /// assert_eq!(table.load_factor(), 0.5);
    ///
    /// assert!(matches!(
    ///     HashTable::<u32>::with_capacity_and_load_factor(0, 0.5),
    ///     Err(Error::InvalidArgument { .. })
    /// ));
    /// # Ok::<(), Error>(())
    /// ```
    pub fn with_capacity_and_load_factor(capacity: usize, load_factor: f64) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidArgument {
                reason: "capacity must be non-zero",
            });
        }
        if !load_factor.is_finite() || load_factor <= 0.0 {
            return Err(Error::InvalidArgument {
                reason: "load factor must be a finite number greater than zero",
            });
        }

        Ok(Self {
            buckets: empty_buckets(capacity),
            populated: 0,
            load_factor,
        })
    }

    /// Returns the number of values in the table.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table contains no values.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the current number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the load factor threshold.
    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// Returns the chain length of every bucket, in bucket order.
    ///
    /// Useful for judging how well an index function spreads its keys.
    pub fn chain_lengths(&self) -> Vec<usize> {
        self.buckets.iter().map(Vec::len).collect()
    }

    /// Returns a reference to the first value in bucket `index` matching `eq`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `index >= capacity`.
    pub fn find(&self, index: usize, eq: impl Fn(&T) -> bool) -> Result<Option<&T>> {
        let index = checked_index(index, self.capacity())?;
        Ok(self.buckets[index].iter().find(|value| eq(value)))
    }

    /// Returns a mutable reference to the first value in bucket `index`
    /// matching `eq`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `index >= capacity`.
    pub fn find_mut(&mut self, index: usize, eq: impl Fn(&T) -> bool) -> Result<Option<&mut T>> {
        let index = checked_index(index, self.capacity())?;
        Ok(self.buckets[index].iter_mut().find(|value| eq(value)))
    }

    /// Removes and returns the first value in bucket `index` matching `eq`.
    ///
    /// The remaining values in the chain keep their order. The capacity is
    /// never reduced.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `index >= capacity`.
    pub fn remove(&mut self, index: usize, eq: impl Fn(&T) -> bool) -> Result<Option<T>> {
        match self.entry(index, eq)? {
            Entry::Occupied(entry) => Ok(Some(entry.remove())),
            Entry::Vacant(_) => Ok(None),
        }
    }

    /// Looks up the first value in bucket `index` matching `eq` for in-place
    /// manipulation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `index >= capacity`.
    pub fn entry(&mut self, index: usize, eq: impl Fn(&T) -> bool) -> Result<Entry<'_, T>> {
        let bucket = checked_index(index, self.capacity())?;
        let slot = self.buckets[bucket].iter().position(|value| eq(value));
        Ok(match slot {
            Some(slot) => Entry::Occupied(OccupiedEntry {
                table: self,
                bucket,
                slot,
            }),
            None => Entry::Vacant(VacantEntry {
                table: self,
                bucket,
            }),
        })
    }

    /// Removes all values, keeping the current capacity.
    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(|bucket| *bucket = Vec::new());
        self.populated = 0;
    }

    /// Returns an iterator over all values, in bucket order and then chain
    /// order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            buckets: self.buckets.iter(),
            chain: Default::default(),
            remaining: self.populated,
        }
    }

    /// Returns an iterator that removes and yields all values in bucket order
    /// and then chain order. The capacity is kept.
    ///
    /// Values not consumed before the iterator is dropped are dropped with it.
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain {
            table: self,
            bucket_index: 0,
            chain: Vec::new().into_iter(),
        }
    }

    fn exceeds_load_factor(&self, capacity: usize) -> bool {
        self.populated as f64 > self.load_factor * capacity as f64
    }

    /// Rebuilds the bucket array at double the current capacity.
    ///
    /// All target indices are validated before the bucket array is replaced,
    /// so on error the table is unchanged. `track` is a `(bucket, slot)`
    /// position in the old array; its position in the new array is returned.
    #[cold]
    #[inline(never)]
    fn resize_rehash(
        &mut self,
        rehash: impl Fn(&T, usize) -> usize,
        track: (usize, usize),
    ) -> Result<(usize, usize)> {
        let old_capacity = self.capacity();
        let capacity = old_capacity
            .checked_mul(2)
            .ok_or(Error::CapacityOverflow {
                capacity: old_capacity,
            })?;

        let targets = self
            .iter()
            .map(|value| checked_index(rehash(value, capacity), capacity))
            .collect::<Result<Vec<usize>>>()?;

        log_resize(old_capacity, capacity, self.populated);

        let tracked = self.buckets[..track.0].iter().map(Vec::len).sum::<usize>() + track.1;
        let old_buckets = core::mem::replace(&mut self.buckets, empty_buckets(capacity));

        let mut moved = track;
        let values = old_buckets.into_iter().flatten();
        for (position, (value, target)) in values.zip(targets).enumerate() {
            let chain = &mut self.buckets[target];
            if position == tracked {
                moved = (target, chain.len());
            }
            chain.push(value);
        }

        Ok(moved)
    }
}

impl<'a, T> IntoIterator for &'a HashTable<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A view into a single bucket position, which may either be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, T> {
    /// No value in the bucket matched.
    Vacant(VacantEntry<'a, T>),
    /// A value in the bucket matched.
    Occupied(OccupiedEntry<'a, T>),
}

impl<'a, T> Entry<'a, T> {
    /// Returns the matched value, inserting `default` first if the entry is
    /// vacant.
    ///
    /// # Errors
    ///
    /// Fails like [`VacantEntry::insert`].
    pub fn or_insert(self, default: T, rehash: impl Fn(&T, usize) -> usize) -> Result<&'a mut T> {
        match self {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => entry.insert(default, rehash),
        }
    }
}

/// A view into a bucket with no matching value.
pub struct VacantEntry<'a, T> {
    table: &'a mut HashTable<T>,
    bucket: usize,
}

impl<'a, T> VacantEntry<'a, T> {
    /// Appends `value` to the bucket's chain and returns a mutable reference
    /// to it.
    ///
    /// If the insertion pushes the table over its load factor, the table is
    /// resized and `rehash` is called for every value with the new capacity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `rehash` produces an index outside
    /// the new capacity, or [`Error::CapacityOverflow`] if the capacity cannot
    /// be doubled. In both cases `value` is dropped and the table is left as
    /// it was before the call.
    pub fn insert(self, value: T, rehash: impl Fn(&T, usize) -> usize) -> Result<&'a mut T> {
        let table = self.table;
        let chain = &mut table.buckets[self.bucket];
        chain.push(value);
        let mut position = (self.bucket, chain.len() - 1);
        table.populated += 1;

        if table.exceeds_load_factor(table.capacity()) {
            match table.resize_rehash(rehash, position) {
                Ok(moved) => position = moved,
                Err(err) => {
                    let chain = &mut table.buckets[self.bucket];
                    chain.pop();
                    if chain.is_empty() {
                        *chain = Vec::new();
                    }
                    table.populated -= 1;
                    return Err(err);
                }
            }
        }

        Ok(&mut table.buckets[position.0][position.1])
    }

    /// Returns the bucket index this entry would insert into.
    pub fn bucket(&self) -> usize {
        self.bucket
    }
}

/// A view into a matched value.
pub struct OccupiedEntry<'a, T> {
    table: &'a mut HashTable<T>,
    bucket: usize,
    slot: usize,
}

impl<'a, T> OccupiedEntry<'a, T> {
    /// Gets a reference to the value.
    pub fn get(&self) -> &T {
        &self.table.buckets[self.bucket][self.slot]
    }

    /// Gets a mutable reference to the value.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.table.buckets[self.bucket][self.slot]
    }

    /// Converts the entry into a mutable reference bound to the table's
    /// lifetime.
    pub fn into_mut(self) -> &'a mut T {
        &mut self.table.buckets[self.bucket][self.slot]
    }

    /// Removes the value from its chain and returns it.
    ///
    /// Values after it in the chain keep their relative order.
    pub fn remove(self) -> T {
        let chain = &mut self.table.buckets[self.bucket];
        let value = chain.remove(self.slot);
        if chain.is_empty() {
            *chain = Vec::new();
        }
        self.table.populated -= 1;
        value
    }
}

/// An iterator over the values of a [`HashTable`].
///
/// This struct is created by the [`iter`] method on [`HashTable`].
///
/// [`iter`]: HashTable::iter
pub struct Iter<'a, T> {
    buckets: core::slice::Iter<'a, Vec<T>>,
    chain: core::slice::Iter<'a, T>,
    remaining: usize,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.clone(),
            chain: self.chain.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(value) = self.chain.next() {
                self.remaining -= 1;
                return Some(value);
            }
            self.chain = self.buckets.next()?.iter();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> core::iter::FusedIterator for Iter<'_, T> {}

/// A draining iterator over the values of a [`HashTable`].
///
/// This struct is created by the [`drain`] method on [`HashTable`].
///
/// [`drain`]: HashTable::drain
pub struct Drain<'a, T> {
    table: &'a mut HashTable<T>,
    bucket_index: usize,
    chain: std::vec::IntoIter<T>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(value) = self.chain.next() {
                self.table.populated -= 1;
                return Some(value);
            }
            let bucket = self.table.buckets.get_mut(self.bucket_index)?;
            self.chain = core::mem::take(bucket).into_iter();
            self.bucket_index += 1;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.table.populated, Some(self.table.populated))
    }
}

impl<T> ExactSizeIterator for Drain<'_, T> {}

impl<T> Drop for Drain<'_, T> {
    fn drop(&mut self) {
        for _ in &mut *self {}
    }
}
