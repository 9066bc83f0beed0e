/// Determines what happens to owned elements still held by an array when the array is dropped.
///
/// Borrowed elements are never affected by the drop policy because the array does not own them.
///
/// # Examples
///
/// ```
/// use growable_array::{DropPolicy, GrowableArray};
///
/// let array = GrowableArray::<u32>::builder()
///     .drop_policy(DropPolicy::MustNotDropItems)
///     .build()
///     .unwrap();
///
/// // An array without owned elements may always be dropped.
/// drop(array);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum DropPolicy {
    /// Owned elements still in the array are freed when the array is dropped. This is the default.
    #[default]
    MayDropItems,

    /// The array will panic if it still holds owned elements when it is dropped.
    ///
    /// Use this when every owned element is expected to be taken back via [`pop()`][1],
    /// [`remove()`][2] or [`destroy()`][3], or freed explicitly via [`clear()`][4] or
    /// [`clear_destroy()`][5], and forgetting to do so is a bug.
    ///
    /// [1]: crate::GrowableArray::pop
    /// [2]: crate::GrowableArray::remove
    /// [3]: crate::GrowableArray::destroy
    /// [4]: crate::GrowableArray::clear
    /// [5]: crate::GrowableArray::clear_destroy
    MustNotDropItems,
}
