/// The error type for fallible [`HashMap`](crate::HashMap) and
/// [`HashTable`](crate::HashTable) operations.
///
/// A missing key is never an error. Lookups report absence through `None`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A construction parameter was rejected before any storage was allocated.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the argument.
        reason: &'static str,
    },

    /// The bucket index function returned an index outside `[0, capacity)`.
    ///
    /// `capacity` is the bucket count the index was requested for, which is the
    /// target capacity when the failure happens during a resize.
    #[error("bucket index {index} is out of bounds for capacity {capacity}")]
    OutOfBounds {
        /// The index returned by the index function.
        index: usize,
        /// The capacity passed to the index function.
        capacity: usize,
    },

    /// Doubling the bucket array would overflow `usize`.
    #[error("cannot grow a table of capacity {capacity}")]
    CapacityOverflow {
        /// The capacity at the time growth was attempted.
        capacity: usize,
    },
}

/// A specialized [`Result`](core::result::Result) for table operations.
pub type Result<T> = core::result::Result<T, Error>;
