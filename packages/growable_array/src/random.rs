use std::num::NonZero;

use rand::Rng;

/// A source of uniformly distributed random integers, as consumed by
/// [`GrowableArray::shuffle_with()`][crate::GrowableArray::shuffle_with].
///
/// Every [`rand::Rng`] is a `RandomSource`, so most callers never implement this trait
/// themselves. Implement it directly to drive a shuffle from a scripted or external source.
///
/// # Examples
///
/// ```
/// use growable_array::GrowableArray;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let values = [1, 2, 3, 4, 5];
///
/// let mut array = GrowableArray::<i32>::with_capacity(5).unwrap();
/// for value in &values {
///     array.push_borrowed(value).unwrap();
/// }
///
/// array.shuffle_with(&mut StdRng::seed_from_u64(1234));
/// assert_eq!(array.len(), 5);
/// ```
pub trait RandomSource {
    /// Returns a uniformly distributed value in `0..upper_bound`.
    fn next_below(&mut self, upper_bound: NonZero<usize>) -> usize;
}

impl<R: Rng + ?Sized> RandomSource for R {
    #[inline]
    fn next_below(&mut self, upper_bound: NonZero<usize>) -> usize {
        self.random_range(0..upper_bound.get())
    }
}
