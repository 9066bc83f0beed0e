use std::marker::PhantomData;
use std::num::NonZero;

use new_zealand::nz;

use crate::{DropPolicy, GrowableArray, Result};

/// Number of slots added to the slot table on each growth step, unless configured otherwise.
pub const DEFAULT_EXPAND_RATE: NonZero<usize> = nz!(10);

/// Number of slots an array starts with, unless configured otherwise.
pub const DEFAULT_INITIAL_CAPACITY: usize = DEFAULT_EXPAND_RATE.get();

/// Builder for creating an instance of [`GrowableArray`].
///
/// You only need to use this builder if you want to customize the array configuration. The
/// default configuration is available via [`GrowableArray::with_capacity()`][1].
///
/// # Examples
///
/// ```
/// use growable_array::{DropPolicy, GrowableArray};
/// use new_zealand::nz;
///
/// let array = GrowableArray::<u32>::builder()
///     .initial_capacity(5)
///     .expand_rate(nz!(4))
///     .drop_policy(DropPolicy::MustNotDropItems)
///     .build()
///     .unwrap();
///
/// assert_eq!(array.capacity(), 5);
/// assert_eq!(array.expand_rate().get(), 4);
/// ```
///
/// [1]: GrowableArray::with_capacity
#[must_use]
pub struct GrowableArrayBuilder<T> {
    initial_capacity: usize,
    expand_rate: NonZero<usize>,
    drop_policy: DropPolicy,

    _item: PhantomData<T>,
}

impl<T> std::fmt::Debug for GrowableArrayBuilder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrowableArrayBuilder")
            .field(
                "item_type",
                &std::format_args!("{}", std::any::type_name::<T>()),
            )
            .field("initial_capacity", &self.initial_capacity)
            .field("expand_rate", &self.expand_rate)
            .field("drop_policy", &self.drop_policy)
            .finish()
    }
}

impl<T> GrowableArrayBuilder<T> {
    pub(crate) fn new() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            expand_rate: DEFAULT_EXPAND_RATE,
            drop_policy: DropPolicy::default(),
            _item: PhantomData,
        }
    }

    /// Sets the number of slots the array starts with. Must be greater than zero, which is
    /// verified by [`build()`][Self::build].
    pub fn initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Sets the number of slots added on each growth step. This also sets the floor that
    /// contraction never goes below (`expand_rate + 1` slots).
    pub fn expand_rate(mut self, expand_rate: NonZero<usize>) -> Self {
        self.expand_rate = expand_rate;
        self
    }

    /// Sets the [drop policy][DropPolicy] for the array. This governs how to treat owned
    /// elements remaining in the array when the array is dropped.
    pub fn drop_policy(mut self, policy: DropPolicy) -> Self {
        self.drop_policy = policy;
        self
    }

    /// Builds the array with the specified configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`][crate::Error::InvalidArgument] if the initial
    /// capacity is zero or `T` is zero-sized, and
    /// [`Error::SlotAllocation`][crate::Error::SlotAllocation] if the slot table cannot be
    /// allocated.
    pub fn build<'a>(self) -> Result<GrowableArray<'a, T>> {
        GrowableArray::new_inner(self.initial_capacity, self.expand_rate, self.drop_policy)
    }
}
