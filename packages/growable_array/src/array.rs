use std::num::NonZero;
use std::{mem, thread};

use num_integer::Integer;
use tracing::{debug, trace, warn};

use crate::{DropPolicy, Element, Error, GrowableArrayBuilder, Owned, Result};

/// An index-addressable array of individually allocated elements that grows and contracts in
/// fixed steps.
///
/// Each slot of the array is either empty or holds an [`Element`], which is one of:
///
/// * an [`Owned`] element, allocated via [`Owned::allocate()`] and freed by the array when the
///   array is cleared or dropped, or
/// * a borrowed `&'a T`, which the array only references and never frees.
///
/// The logically occupied slots are the prefix `0..len()`. [`remove()`][Self::remove] may leave
/// empty slots (holes) inside that prefix; [`compact()`][Self::compact] closes them.
///
/// # Resource usage
///
/// Growth is reactive: a [`push()`][Self::push] that leaves the array full adds exactly
/// [`expand_rate()`][Self::expand_rate] slots. Contraction is opportunistic: after a
/// [`pop()`][Self::pop] the slot table is shrunk to `max(len, expand_rate) + 1` slots when the
/// new length is past the first `expand_rate` slots and is not itself a multiple of
/// `expand_rate`. Contraction never goes below `expand_rate + 1` slots.
///
/// # Examples
///
/// ```
/// use growable_array::{GrowableArray, Owned};
///
/// let shared = 7;
///
/// let mut array = GrowableArray::<i32>::with_capacity(5).unwrap();
///
/// array.push_borrowed(&shared).unwrap();
/// array.push_owned(Owned::allocate_with(8).unwrap()).unwrap();
///
/// assert_eq!(array.len(), 2);
/// assert_eq!(array.get(0).unwrap(), Some(&7));
///
/// // The owned element comes back to us; the array no longer frees it.
/// let last = array.pop().unwrap();
/// assert!(last.is_owned());
/// assert_eq!(*last, 8);
/// ```
///
/// # Thread safety
///
/// The array is not internally synchronized. It is thread-mobile ([`Send`]) when its elements
/// allow it and can be shared between threads behind a [`Mutex`][std::sync::Mutex].
#[derive(Debug)]
pub struct GrowableArray<'a, T> {
    /// The slot table. Its length is the capacity of the array.
    ///
    /// Slots at index `size` and above are always empty.
    slots: Vec<Option<Element<'a, T>>>,

    size: usize,

    expand_rate: NonZero<usize>,

    drop_policy: DropPolicy,
}

impl<'a, T> GrowableArray<'a, T> {
    /// Starts building a new [`GrowableArray`].
    ///
    /// # Example
    ///
    /// ```
    /// use growable_array::GrowableArray;
    ///
    /// let array = GrowableArray::<u64>::builder()
    ///     .initial_capacity(32)
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(array.capacity(), 32);
    /// ```
    pub fn builder() -> GrowableArrayBuilder<T> {
        GrowableArrayBuilder::new()
    }

    /// Creates an array with `initial_capacity` empty slots and the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `initial_capacity` is zero or `T` is zero-sized and
    /// [`Error::SlotAllocation`] if the slot table cannot be allocated.
    pub fn with_capacity(initial_capacity: usize) -> Result<Self> {
        Self::builder().initial_capacity(initial_capacity).build()
    }

    pub(crate) fn new_inner(
        initial_capacity: usize,
        expand_rate: NonZero<usize>,
        drop_policy: DropPolicy,
    ) -> Result<Self> {
        if size_of::<T>() == 0 {
            return Err(Error::InvalidArgument {
                argument: "T",
                problem: "elements must have a non-zero size",
            });
        }

        if initial_capacity == 0 {
            return Err(Error::InvalidArgument {
                argument: "initial_capacity",
                problem: "an array must start with at least one slot",
            });
        }

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(initial_capacity)
            .map_err(|source| Error::SlotAllocation {
                requested_capacity: initial_capacity,
                source,
            })?;
        slots.resize_with(initial_capacity, || None);

        Ok(Self {
            slots,
            size: 0,
            expand_rate,
            drop_policy,
        })
    }

    /// The number of logically occupied slots, including any holes left by
    /// [`remove()`][Self::remove].
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Whether no slots are logically occupied.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// The number of slots in the slot table.
    #[must_use]
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// The number of slots added on each growth step.
    #[must_use]
    #[inline]
    pub fn expand_rate(&self) -> NonZero<usize> {
        self.expand_rate
    }

    /// Changes the number of slots added on each growth step. Takes effect on the next growth or
    /// contraction; the current capacity is left alone.
    #[inline]
    pub fn set_expand_rate(&mut self, expand_rate: NonZero<usize>) {
        self.expand_rate = expand_rate;
    }

    /// The size in bytes of one element.
    #[must_use]
    #[inline]
    pub const fn element_size() -> usize {
        size_of::<T>()
    }

    /// The drop policy the array was built with.
    #[must_use]
    #[inline]
    pub fn drop_policy(&self) -> DropPolicy {
        self.drop_policy
    }

    /// Returns the element in slot `index`, or `None` if the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index` is not less than the capacity.
    pub fn get(&self, index: usize) -> Result<Option<&T>> {
        self.slots
            .get(index)
            .map(Option::as_deref)
            .ok_or_else(|| self.out_of_range(index))
    }

    /// Stores `element` in slot `index` and returns the previous occupant, if any.
    ///
    /// The previous occupant is handed back, not freed. If `index` is at or past the current
    /// length, the length grows to `index + 1`; any slots skipped over stay empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index` is not less than the capacity. The element
    /// is dropped in that case.
    pub fn set(&mut self, index: usize, element: Element<'a, T>) -> Result<Option<Element<'a, T>>> {
        let capacity = self.capacity();

        let slot = self
            .slots
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, capacity })?;

        let previous = slot.replace(element);

        if index >= self.size {
            // Cannot overflow: index is below capacity, which fits in memory.
            self.size = index.wrapping_add(1);
        }

        Ok(previous)
    }

    /// Takes the element out of slot `index`, leaving the slot empty, and returns it.
    ///
    /// Ownership moves back to the caller; the array does not free anything. The length is not
    /// changed, so removing from the middle leaves a hole.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index` is not less than the capacity.
    pub fn remove(&mut self, index: usize) -> Result<Option<Element<'a, T>>> {
        let capacity = self.capacity();

        self.slots
            .get_mut(index)
            .map(Option::take)
            .ok_or(Error::IndexOutOfRange { index, capacity })
    }

    /// Adds exactly [`expand_rate()`][Self::expand_rate] empty slots to the slot table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityOverflow`] if the new capacity does not fit in `usize` and
    /// [`Error::SlotAllocation`] if the slot table cannot be grown. The array is unchanged on
    /// error.
    pub fn expand(&mut self) -> Result<()> {
        let capacity = self.capacity();
        let additional = self.expand_rate.get();

        let new_capacity = capacity
            .checked_add(additional)
            .ok_or(Error::CapacityOverflow {
                capacity,
                additional,
            })?;

        self.resize(new_capacity)
    }

    /// Resizes the slot table to `max(len, expand_rate) + 1` slots.
    ///
    /// This usually shrinks the slot table but grows it if the array currently has fewer than
    /// `expand_rate + 1` slots.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityOverflow`] if the expand rate is `usize::MAX` and
    /// [`Error::SlotAllocation`] if the slot table needs to grow and cannot.
    pub fn contract(&mut self) -> Result<()> {
        let floor = self.size.max(self.expand_rate.get());

        let new_capacity = floor.checked_add(1).ok_or(Error::CapacityOverflow {
            capacity: floor,
            additional: 1,
        })?;

        self.resize(new_capacity)
    }

    fn resize(&mut self, new_capacity: usize) -> Result<()> {
        if new_capacity == 0 {
            return Err(Error::InvalidArgument {
                argument: "new_capacity",
                problem: "the slot table must keep at least one slot",
            });
        }

        let old_capacity = self.capacity();

        if new_capacity > old_capacity {
            // Cannot underflow: we just checked that the new capacity is the greater one.
            let additional = new_capacity.wrapping_sub(old_capacity);

            self.slots
                .try_reserve_exact(additional)
                .map_err(|source| Error::SlotAllocation {
                    requested_capacity: new_capacity,
                    source,
                })?;
            self.slots.resize_with(new_capacity, || None);
        } else {
            debug_assert!(
                new_capacity >= self.size,
                "contraction must not cut off occupied slots"
            );

            self.slots.truncate(new_capacity);
            self.slots.shrink_to_fit();
        }

        trace!(old_capacity, new_capacity, "resized slot table");

        Ok(())
    }

    /// Appends an element at index [`len()`][Self::len], growing the slot table by
    /// [`expand_rate()`][Self::expand_rate] if this leaves the array full.
    ///
    /// # Errors
    ///
    /// Returns the error of the growth step if the array could not grow. When the array was
    /// filled by this push, the element stays stored and the array remains full at its old
    /// capacity; the next push retries the growth first. When the array was already full
    /// before this push and still cannot grow, the element is dropped.
    pub fn push(&mut self, element: Element<'a, T>) -> Result<()> {
        self.push_slot(Some(element))
    }

    /// Appends an element whose memory the array becomes responsible for.
    ///
    /// # Errors
    ///
    /// See [`push()`][Self::push].
    pub fn push_owned(&mut self, element: Owned<T>) -> Result<()> {
        self.push(Element::Owned(element))
    }

    /// Appends a reference to an element the caller remains responsible for.
    ///
    /// # Errors
    ///
    /// See [`push()`][Self::push].
    pub fn push_borrowed(&mut self, element: &'a T) -> Result<()> {
        self.push(Element::Borrowed(element))
    }

    pub(crate) fn push_slot(&mut self, slot: Option<Element<'a, T>>) -> Result<()> {
        if self.size == self.capacity() {
            // Either a previous growth step failed or `set()` filled the last slot.
            self.expand()?;
        }

        let target = self
            .slots
            .get_mut(self.size)
            .expect("the slot table has room past the last occupied slot - we just ensured it");
        *target = slot;

        // Cannot overflow: size is below capacity, which fits in memory.
        self.size = self.size.wrapping_add(1);

        if self.size == self.capacity() {
            self.expand()?;
        }

        Ok(())
    }

    /// Removes the last logically occupied slot and returns its element.
    ///
    /// Returns `None` if the array is empty. Also returns `None` (while still shortening the
    /// array) if the last slot was a hole left by [`remove()`][Self::remove].
    ///
    /// The slot table may be contracted afterwards, see the type-level documentation.
    pub fn pop(&mut self) -> Option<Element<'a, T>> {
        let end = self.size.checked_sub(1)?;

        let element = self.slots.get_mut(end).and_then(Option::take);
        self.size = end;

        if self.should_contract()
            && let Err(error) = self.contract()
        {
            // The pop itself succeeded, we just keep the larger slot table.
            warn!(%error, capacity = self.capacity(), "failed to contract slot table after pop");
        }

        element
    }

    /// Contraction happens when the end is past the first `expand_rate` slots and does not fall
    /// exactly on an `expand_rate` boundary.
    fn should_contract(&self) -> bool {
        let expand_rate = self.expand_rate.get();

        self.size > expand_rate && !Integer::is_multiple_of(&self.size, &expand_rate)
    }

    /// Empties every slot and resets the length to zero. Owned elements are freed, borrowed
    /// elements are merely forgotten. The capacity is not changed.
    ///
    /// # Example
    ///
    /// ```
    /// use growable_array::{GrowableArray, Owned};
    ///
    /// let mut array = GrowableArray::<String>::with_capacity(5).unwrap();
    /// array
    ///     .push_owned(Owned::allocate_with("freed by clear".to_string()).unwrap())
    ///     .unwrap();
    ///
    /// array.clear();
    ///
    /// assert!(array.is_empty());
    /// assert_eq!(array.capacity(), 5);
    /// ```
    pub fn clear(&mut self) {
        let owned_count = self.owned_count();

        self.slots.fill_with(|| None);
        self.size = 0;

        debug!(owned_count, capacity = self.capacity(), "cleared array");
    }

    /// Releases the slot table and hands back every owned element still stored in the array,
    /// in slot order. Borrowed elements are simply forgotten.
    ///
    /// # Example
    ///
    /// ```
    /// use growable_array::{GrowableArray, Owned};
    ///
    /// let mut array = GrowableArray::<u32>::with_capacity(5).unwrap();
    /// array.push_owned(Owned::allocate_with(1).unwrap()).unwrap();
    /// array.push_owned(Owned::allocate_with(2).unwrap()).unwrap();
    ///
    /// let elements = array.destroy();
    /// assert_eq!(elements.iter().map(|e| **e).collect::<Vec<_>>(), vec![1, 2]);
    /// ```
    #[must_use]
    pub fn destroy(mut self) -> Vec<Owned<T>> {
        let owned = mem::take(&mut self.slots)
            .into_iter()
            .flatten()
            .filter_map(Element::into_owned)
            .collect();

        self.size = 0;

        owned
    }

    /// Frees every owned element (as [`clear()`][Self::clear] does) and releases the slot table.
    pub fn clear_destroy(mut self) {
        self.clear();
    }

    /// Iterates over the logically occupied slots in order, yielding `None` for holes.
    pub fn iter(&self) -> impl Iterator<Item = Option<&T>> {
        self.occupied().iter().map(Option::as_deref)
    }

    /// The logically occupied slots, `0..len()`.
    pub(crate) fn occupied(&self) -> &[Option<Element<'a, T>>] {
        self.slots
            .get(..self.size)
            .expect("size never exceeds the capacity")
    }

    /// The logically occupied slots, `0..len()`.
    pub(crate) fn occupied_mut(&mut self) -> &mut [Option<Element<'a, T>>] {
        self.slots
            .get_mut(..self.size)
            .expect("size never exceeds the capacity")
    }

    /// Shortens the logical length. The caller must have emptied every slot being cut off.
    pub(crate) fn truncate_len(&mut self, new_len: usize) {
        debug_assert!(new_len <= self.size);
        debug_assert!(
            self.occupied()
                .get(new_len..)
                .is_some_and(|tail| tail.iter().all(Option::is_none)),
            "slots past the new length must be empty"
        );

        self.size = new_len;
    }

    fn owned_count(&self) -> usize {
        self.occupied()
            .iter()
            .flatten()
            .filter(|element| element.is_owned())
            .count()
    }

    fn out_of_range(&self, index: usize) -> Error {
        Error::IndexOutOfRange {
            index,
            capacity: self.capacity(),
        }
    }
}

impl<T> Drop for GrowableArray<'_, T> {
    fn drop(&mut self) {
        // If we are already panicking, we do not want to panic again because that will
        // simply obscure whatever the original panic was, leading to debug difficulties.
        if thread::panicking() || !matches!(self.drop_policy, DropPolicy::MustNotDropItems) {
            return;
        }

        let owned_count = self.owned_count();

        assert!(
            owned_count == 0,
            "dropped a GrowableArray with {owned_count} owned elements - this is forbidden by DropPolicy::MustNotDropItems"
        );
    }
}
