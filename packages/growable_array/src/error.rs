use std::alloc::Layout;
use std::collections::TryReserveError;

use thiserror::Error;

/// Errors that can occur when operating on a [`GrowableArray`][crate::GrowableArray].
///
/// Popping from an empty array is not an error; it is signaled by an absent result.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The slot table could not be allocated or grown.
    #[error("cannot allocate slot table for {requested_capacity} slots")]
    SlotAllocation {
        /// The capacity the slot table was being resized to.
        requested_capacity: usize,

        /// The failure reported by the allocator.
        #[source]
        source: TryReserveError,
    },

    /// The global allocator could not provide memory for an owned element.
    #[error("memory allocation of {layout:?} for an owned element failed")]
    ElementAllocation {
        /// The layout of the allocation request that failed.
        layout: Layout,
    },

    /// A growth step would take the capacity past `usize::MAX`.
    #[error("capacity {capacity} cannot grow by {additional} more slots")]
    CapacityOverflow {
        /// The capacity before the growth step.
        capacity: usize,

        /// The number of slots the growth step wanted to add.
        additional: usize,
    },

    /// The caller provided a value that the operation cannot work with.
    #[error("invalid value for '{argument}': {problem}")]
    InvalidArgument {
        /// The name of the argument that was invalid.
        argument: &'static str,

        /// A human-readable description of the problem.
        problem: &'static str,
    },

    /// A bulk operation was given operands that cannot be combined.
    #[error("cannot combine arrays: {problem}")]
    Precomposition {
        /// A human-readable description of the problem.
        problem: &'static str,
    },

    /// A slot index at or past the end of the slot table was used.
    #[error("slot index {index} is out of range for capacity {capacity}")]
    IndexOutOfRange {
        /// The index that was requested.
        index: usize,

        /// The capacity of the array at the time of the request.
        capacity: usize,
    },
}

/// A specialized `Result` type for array operations, returning the crate's
/// [`Error`] type as the error value.
pub type Result<T> = std::result::Result<T, Error>;
