use std::num::NonZero;

use tracing::debug;

use crate::{Element, Error, GrowableArray, RandomSource, Result};

impl<'a, T> GrowableArray<'a, T> {
    /// Creates a new array referencing every element of this one for which `predicate` returns
    /// `true`, in the same order. Elements are not copied and this array is left unchanged.
    ///
    /// The new array starts with a capacity equal to the length of this one. Holes are skipped.
    ///
    /// Returns `Ok(None)` if this array is empty.
    ///
    /// # Errors
    ///
    /// Returns an allocation error if the new array's slot table cannot be allocated or grown.
    ///
    /// # Example
    ///
    /// ```
    /// use growable_array::{GrowableArray, Owned};
    ///
    /// let mut array = GrowableArray::<i32>::with_capacity(8).unwrap();
    /// for value in 1..=6 {
    ///     array.push_owned(Owned::allocate_with(value).unwrap()).unwrap();
    /// }
    ///
    /// let even = array.filter(|value| value % 2 == 0).unwrap().unwrap();
    ///
    /// let even_values = even.iter().flatten().copied().collect::<Vec<_>>();
    /// assert_eq!(even_values, vec![2, 4, 6]);
    /// ```
    pub fn filter<P>(&self, mut predicate: P) -> Result<Option<GrowableArray<'_, T>>>
    where
        P: FnMut(&T) -> bool,
    {
        if self.is_empty() {
            return Ok(None);
        }

        let mut filtered = GrowableArray::builder()
            .initial_capacity(self.len())
            .build()?;

        for element in self.occupied().iter().flatten() {
            let element: &T = element;

            if predicate(element) {
                filtered.push_borrowed(element)?;
            }
        }

        Ok(Some(filtered))
    }

    /// Appends references to every slot of `source` (holes included) onto the end of this array,
    /// each append following the same growth policy as [`push()`][Self::push].
    ///
    /// Both arrays have the same element type, so mixing element sizes is impossible. The source
    /// is left unchanged and keeps responsibility for any owned elements it holds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Precomposition`] if `source` is empty, or an allocation error if this
    /// array cannot grow. Elements appended before a growth failure stay appended.
    pub fn push_all(&mut self, source: &'a GrowableArray<'_, T>) -> Result<()> {
        if source.is_empty() {
            return Err(Error::Precomposition {
                problem: "the source array is empty",
            });
        }

        for slot in source.occupied() {
            self.push_slot(slot.as_deref().map(Element::Borrowed))?;
        }

        Ok(())
    }

    /// For every element in `to_remove`, removes the first slot of this array that holds that
    /// very element (same address, not just an equal value). Afterwards the array is compacted.
    ///
    /// Returns the number of slots that were removed. Removed references are discarded; nothing
    /// is freed.
    ///
    /// # Example
    ///
    /// ```
    /// use growable_array::GrowableArray;
    ///
    /// let (a, b, also_b) = (1, 2, 2);
    ///
    /// let mut array = GrowableArray::<i32>::with_capacity(4).unwrap();
    /// array.push_borrowed(&a).unwrap();
    /// array.push_borrowed(&b).unwrap();
    /// array.push_borrowed(&also_b).unwrap();
    ///
    /// let mut to_remove = GrowableArray::<i32>::with_capacity(4).unwrap();
    /// to_remove.push_borrowed(&b).unwrap();
    ///
    /// assert_eq!(array.remove_all(&to_remove), 1);
    ///
    /// // `also_b` has the same value as `b` but is a different element, so it stays.
    /// assert_eq!(array.len(), 2);
    /// assert!(std::ptr::eq(array.get(1).unwrap().unwrap(), &also_b));
    /// ```
    pub fn remove_all(&mut self, to_remove: &GrowableArray<'_, T>) -> usize {
        let mut removed = 0_usize;

        for target in to_remove.occupied().iter().flatten() {
            let target: &T = target;

            let matching_slot = self
                .occupied_mut()
                .iter_mut()
                .find(|slot| matches!(slot, Some(element) if element.is_same_as(target)));

            if let Some(slot) = matching_slot {
                // Only borrowed elements can match here: nothing outside can reference one of
                // our owned elements while we hold `&mut self`.
                drop(slot.take());

                // Cannot overflow: bounded by the number of slots.
                removed = removed.wrapping_add(1);
            }
        }

        if removed > 0 {
            self.compact();
        }

        debug!(removed, remaining = self.len(), "removed elements by identity");

        removed
    }

    /// Closes the holes left by [`remove()`][Self::remove] by moving later elements down,
    /// preserving their order. The length shrinks by the number of holes; the capacity is not
    /// changed.
    pub fn compact(&mut self) {
        let slots = self.occupied_mut();

        let mut next = 0_usize;

        for index in 0..slots.len() {
            if slots.get(index).is_some_and(Option::is_some) {
                slots.swap(next, index);

                // Cannot overflow: bounded by the number of slots.
                next = next.wrapping_add(1);
            }
        }

        self.truncate_len(next);
    }

    /// Permutes the logically occupied slots in place, using the thread-local random number
    /// generator. See [`shuffle_with()`][Self::shuffle_with] for the exact procedure.
    pub fn shuffle(&mut self) {
        self.shuffle_with(&mut rand::rng());
    }

    /// Permutes the logically occupied slots in place, drawing random numbers from `source`.
    ///
    /// This is a single descending Fisher-Yates-style pass: for each `j` from `len - 1` down to
    /// `2`, slot `j - 1` is swapped with a slot drawn uniformly from `0..j`. As a consequence,
    /// the last slot never moves and slot 0 is only ever the target of a swap. Arrays with fewer
    /// than three slots are left as they are.
    pub fn shuffle_with<R>(&mut self, source: &mut R)
    where
        R: RandomSource + ?Sized,
    {
        let slots = self.occupied_mut();

        for bound in (2..slots.len()).rev().filter_map(NonZero::new) {
            let target = source.next_below(bound);

            // Cannot underflow: the bound is at least 2.
            slots.swap(target, bound.get().wrapping_sub(1));
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    #![allow(
        clippy::indexing_slicing,
        clippy::arithmetic_side_effects,
        reason = "we do not need to worry about these things when writing test code"
    )]

    use std::ptr;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::Owned;

    struct AlwaysZero;

    impl RandomSource for AlwaysZero {
        fn next_below(&mut self, _upper_bound: NonZero<usize>) -> usize {
            0
        }
    }

    #[derive(Default)]
    struct RecordingSource {
        bounds: Vec<usize>,
    }

    impl RandomSource for RecordingSource {
        fn next_below(&mut self, upper_bound: NonZero<usize>) -> usize {
            self.bounds.push(upper_bound.get());
            upper_bound.get() - 1
        }
    }

    fn borrowing<'a>(values: &'a [i32]) -> GrowableArray<'a, i32> {
        let mut array = GrowableArray::with_capacity(values.len().max(1)).unwrap();

        for value in values {
            array.push_borrowed(value).unwrap();
        }

        array
    }

    fn contents(array: &GrowableArray<'_, i32>) -> Vec<Option<i32>> {
        array.iter().map(|slot| slot.copied()).collect()
    }

    #[test]
    fn filter_keeps_matching_elements_in_order() {
        let values = [5, 8, 1, 4, 6, 3];
        let array = borrowing(&values);

        let filtered = array.filter(|value| value % 2 == 0).unwrap().unwrap();

        assert_eq!(contents(&filtered), vec![Some(8), Some(4), Some(6)]);
        assert_eq!(filtered.capacity(), values.len());

        // The source is untouched.
        assert_eq!(array.len(), values.len());
        assert_eq!(contents(&array)[0], Some(5));
    }

    #[test]
    fn filter_references_source_elements() {
        let mut array = GrowableArray::<i32>::with_capacity(4).unwrap();
        array.push_owned(Owned::allocate_with(10).unwrap()).unwrap();
        array.push_owned(Owned::allocate_with(11).unwrap()).unwrap();

        let filtered = array.filter(|_| true).unwrap().unwrap();

        for index in 0..2 {
            assert!(ptr::eq(
                filtered.get(index).unwrap().unwrap(),
                array.get(index).unwrap().unwrap()
            ));
        }
    }

    #[test]
    fn filter_skips_holes() {
        let values = [1, 2, 3];
        let mut array = borrowing(&values);
        _ = array.remove(1).unwrap();

        let filtered = array.filter(|_| true).unwrap().unwrap();

        assert_eq!(contents(&filtered), vec![Some(1), Some(3)]);
    }

    #[test]
    fn filter_empty_is_none() {
        let array = GrowableArray::<i32>::with_capacity(4).unwrap();

        assert!(array.filter(|_| true).unwrap().is_none());
    }

    #[test]
    fn filter_with_no_matches_is_empty_array() {
        let values = [1, 3, 5];
        let array = borrowing(&values);

        let filtered = array.filter(|value| *value > 100).unwrap().unwrap();

        assert!(filtered.is_empty());
    }

    #[test]
    fn push_all_appends_in_order() {
        let first = [1, 2];
        let second = [3, 4, 5];

        let source = borrowing(&second);
        let mut destination = borrowing(&first);
        let old_len = destination.len();

        destination.push_all(&source).unwrap();

        assert_eq!(destination.len(), old_len + source.len());
        assert_eq!(
            contents(&destination),
            vec![Some(1), Some(2), Some(3), Some(4), Some(5)]
        );
        assert!(destination.len() <= destination.capacity());

        assert!(ptr::eq(destination.get(2).unwrap().unwrap(), &second[0]));
    }

    #[test]
    fn push_all_references_owned_source_elements() {
        let mut source = GrowableArray::<i32>::with_capacity(4).unwrap();
        source.push_owned(Owned::allocate_with(7).unwrap()).unwrap();

        let mut destination = GrowableArray::<i32>::with_capacity(4).unwrap();
        destination.push_all(&source).unwrap();

        assert!(ptr::eq(
            destination.get(0).unwrap().unwrap(),
            source.get(0).unwrap().unwrap()
        ));
        assert!(source.get(0).unwrap().is_some());
    }

    #[test]
    fn push_all_keeps_holes() {
        let values = [1, 2, 3];
        let mut source = borrowing(&values);
        _ = source.remove(1).unwrap();

        let mut destination = GrowableArray::<i32>::with_capacity(2).unwrap();
        destination.push_all(&source).unwrap();

        assert_eq!(contents(&destination), vec![Some(1), None, Some(3)]);
    }

    #[test]
    fn push_all_from_empty_source_is_error() {
        let source = GrowableArray::<i32>::with_capacity(4).unwrap();
        let mut destination = GrowableArray::<i32>::with_capacity(4).unwrap();

        assert!(matches!(
            destination.push_all(&source),
            Err(Error::Precomposition { .. })
        ));
        assert!(destination.is_empty());
    }

    #[test]
    fn remove_all_removes_by_identity_only() {
        let shared = [10, 20, 30, 40];
        let lookalikes = [20, 40];

        let mut array = GrowableArray::<i32>::with_capacity(4).unwrap();
        for value in shared.iter().chain(lookalikes.iter()) {
            array.push_borrowed(value).unwrap();
        }

        let mut to_remove = GrowableArray::<i32>::with_capacity(4).unwrap();
        to_remove.push_borrowed(&shared[1]).unwrap();
        to_remove.push_borrowed(&shared[3]).unwrap();

        let removed = array.remove_all(&to_remove);

        assert_eq!(removed, 2);
        assert_eq!(contents(&array), vec![Some(10), Some(30), Some(20), Some(40)]);

        // The equal-valued lookalikes are still there, by identity.
        assert!(ptr::eq(array.get(2).unwrap().unwrap(), &lookalikes[0]));
        assert!(ptr::eq(array.get(3).unwrap().unwrap(), &lookalikes[1]));

        // The removal set is unchanged.
        assert_eq!(to_remove.len(), 2);
    }

    #[test]
    fn remove_all_takes_first_match_only() {
        let value = 5;
        let other = 6;

        let mut array = GrowableArray::<i32>::with_capacity(4).unwrap();
        array.push_borrowed(&value).unwrap();
        array.push_borrowed(&other).unwrap();
        array.push_borrowed(&value).unwrap();

        let mut to_remove = GrowableArray::<i32>::with_capacity(4).unwrap();
        to_remove.push_borrowed(&value).unwrap();

        assert_eq!(array.remove_all(&to_remove), 1);

        assert_eq!(array.len(), 2);
        assert!(ptr::eq(array.get(0).unwrap().unwrap(), &other));
        assert!(ptr::eq(array.get(1).unwrap().unwrap(), &value));
    }

    #[test]
    fn remove_all_without_matches_changes_nothing() {
        let values = [1, 2, 3];
        let strangers = [1, 2, 3];

        let mut array = borrowing(&values);
        let to_remove = borrowing(&strangers);

        assert_eq!(array.remove_all(&to_remove), 0);
        assert_eq!(contents(&array), vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn remove_all_leaves_owned_elements_alone() {
        let mut array = GrowableArray::<i32>::with_capacity(4).unwrap();
        array.push_owned(Owned::allocate_with(1).unwrap()).unwrap();

        let lookalike = 1;
        let mut to_remove = GrowableArray::<i32>::with_capacity(4).unwrap();
        to_remove.push_borrowed(&lookalike).unwrap();

        assert_eq!(array.remove_all(&to_remove), 0);
        assert_eq!(array.len(), 1);
    }

    #[test]
    fn compact_closes_holes_in_order() {
        let values = [1, 2, 3, 4, 5];
        let mut array = borrowing(&values);
        let capacity = array.capacity();

        _ = array.remove(0).unwrap();
        _ = array.remove(2).unwrap();
        _ = array.remove(4).unwrap();

        array.compact();

        assert_eq!(contents(&array), vec![Some(2), Some(4)]);
        assert_eq!(array.capacity(), capacity);
    }

    #[test]
    fn compact_without_holes_changes_nothing() {
        let values = [1, 2, 3];
        let mut array = borrowing(&values);

        array.compact();

        assert_eq!(contents(&array), vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn shuffle_empty_is_noop() {
        let mut array = GrowableArray::<i32>::with_capacity(4).unwrap();

        array.shuffle();
        array.shuffle_with(&mut AlwaysZero);

        assert!(array.is_empty());
    }

    #[test]
    fn shuffle_with_short_array_is_noop() {
        let values = [1, 2];
        let mut array = borrowing(&values);

        let mut source = RecordingSource::default();
        array.shuffle_with(&mut source);

        assert!(source.bounds.is_empty());
        assert_eq!(contents(&array), vec![Some(1), Some(2)]);
    }

    #[test]
    fn shuffle_with_draws_descending_bounds() {
        let values = [0, 1, 2, 3, 4, 5];
        let mut array = borrowing(&values);

        let mut source = RecordingSource::default();
        array.shuffle_with(&mut source);

        assert_eq!(source.bounds, vec![5, 4, 3, 2]);

        // Always drawing the top of the range swaps every slot with itself.
        assert_eq!(
            contents(&array),
            values.iter().copied().map(Some).collect::<Vec<_>>()
        );
    }

    #[test]
    fn shuffle_with_always_zero_rotates_prefix() {
        let values = [0, 1, 2, 3, 4];
        let mut array = borrowing(&values);

        array.shuffle_with(&mut AlwaysZero);

        assert_eq!(
            contents(&array),
            vec![Some(1), Some(2), Some(3), Some(0), Some(4)]
        );
    }

    #[test]
    fn shuffle_is_permutation_that_keeps_last_slot() {
        let values = (0..50).collect::<Vec<i32>>();
        let mut array = borrowing(&values);

        array.shuffle_with(&mut StdRng::seed_from_u64(0xdec0de));

        let mut shuffled = contents(&array)
            .into_iter()
            .map(|slot| slot.expect("shuffle does not create holes"))
            .collect::<Vec<_>>();

        assert_eq!(shuffled.last(), Some(&49));

        shuffled.sort_unstable();
        assert_eq!(shuffled, values);
    }

    #[test]
    fn shuffle_with_thread_rng_keeps_elements() {
        let values = (0..20).collect::<Vec<i32>>();
        let mut array = borrowing(&values);

        array.shuffle();

        assert_eq!(array.len(), values.len());
        for value in &values {
            assert!(array.iter().flatten().any(|element| ptr::eq(element, value)));
        }
    }
}
