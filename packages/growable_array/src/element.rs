use std::alloc::{self, Layout};
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};

use crate::{Error, Result};

/// An element allocated by the array's allocation helper, whose memory the array takes
/// responsibility for once the element is stored in it.
///
/// An `Owned<T>` exists independently of any array. It can be allocated up front, filled in via
/// [`DerefMut`] and only then pushed into an array. Dropping it (or calling
/// [`release()`][Self::release]) frees the memory.
///
/// # Examples
///
/// ```
/// use growable_array::{GrowableArray, Owned};
///
/// let mut array = GrowableArray::<i32>::with_capacity(5).unwrap();
///
/// let mut value = Owned::<i32>::allocate().unwrap();
/// *value = 333;
///
/// array.push_owned(value).unwrap();
/// assert_eq!(array.get(0).unwrap(), Some(&333));
/// ```
#[derive(Debug)]
pub struct Owned<T>(Box<T>);

impl<T> Owned<T> {
    /// Allocates memory for one element and moves `value` into it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `T` is zero-sized and
    /// [`Error::ElementAllocation`] if the global allocator cannot provide the memory.
    pub fn allocate_with(value: T) -> Result<Self> {
        let layout = Layout::new::<T>();

        if layout.size() == 0 {
            return Err(Error::InvalidArgument {
                argument: "T",
                problem: "elements must have a non-zero size",
            });
        }

        // SAFETY: The layout has a non-zero size, as checked above.
        let ptr = unsafe { alloc::alloc(layout) }.cast::<T>();

        let Some(ptr) = NonNull::new(ptr) else {
            return Err(Error::ElementAllocation { layout });
        };

        // SAFETY: The pointer was just allocated with the layout of T, so it is valid for
        // writes and properly aligned. Nothing has been written there yet.
        unsafe {
            ptr.write(value);
        }

        // SAFETY: The memory was allocated by the global allocator with `Layout::new::<T>()`
        // and holds an initialized T, which is exactly what a Box expects to take over.
        let boxed = unsafe { Box::from_raw(ptr.as_ptr()) };

        Ok(Self(boxed))
    }

    /// Frees the element. Equivalent to dropping it, spelled out for call sites that want to
    /// make the end of the element's life explicit.
    #[inline]
    pub fn release(self) {
        drop(self);
    }

    /// Moves the value out of its allocation, freeing the allocation.
    #[must_use]
    #[inline]
    pub fn into_inner(self) -> T {
        *self.0
    }
}

impl<T: Default> Owned<T> {
    /// Allocates memory for one element, initialized to `T::default()`.
    ///
    /// # Errors
    ///
    /// See [`allocate_with()`][Self::allocate_with].
    pub fn allocate() -> Result<Self> {
        Self::allocate_with(T::default())
    }
}

impl<T> Deref for Owned<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for Owned<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

/// The contents of one occupied slot of a [`GrowableArray`][crate::GrowableArray].
///
/// The variant records who is responsible for the element's memory:
///
/// * [`Element::Owned`] - the array is. Clearing or dropping the array frees the element.
/// * [`Element::Borrowed`] - the caller is. The array only holds a shared reference and
///   never frees the element, whatever operation is performed on the array.
///
/// Identity-based operations such as [`remove_all()`][crate::GrowableArray::remove_all]
/// compare the address of the element, not its value.
#[derive(Debug)]
#[expect(
    clippy::exhaustive_enums,
    reason = "an element is either owned by the array or borrowed from the caller"
)]
pub enum Element<'a, T> {
    /// An element the array is responsible for freeing.
    Owned(Owned<T>),

    /// An element owned by someone else, referenced by the array.
    Borrowed(&'a T),
}

impl<T> Element<'_, T> {
    /// Whether the array is responsible for freeing this element.
    #[must_use]
    #[inline]
    pub fn is_owned(&self) -> bool {
        matches!(self, Self::Owned(_))
    }

    /// Returns the owned element, or `None` if the element is borrowed.
    #[must_use]
    #[inline]
    pub fn into_owned(self) -> Option<Owned<T>> {
        match self {
            Self::Owned(owned) => Some(owned),
            Self::Borrowed(_) => None,
        }
    }

    /// Whether this element is the very same object as `other`, by address.
    #[must_use]
    #[inline]
    pub fn is_same_as(&self, other: &T) -> bool {
        ptr::eq(&**self, other)
    }
}

impl<T> Deref for Element<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        match self {
            Self::Owned(owned) => &**owned,
            Self::Borrowed(borrowed) => *borrowed,
        }
    }
}

impl<T> From<Owned<T>> for Element<'_, T> {
    #[inline]
    fn from(value: Owned<T>) -> Self {
        Self::Owned(value)
    }
}

impl<'a, T> From<&'a T> for Element<'a, T> {
    #[inline]
    fn from(value: &'a T) -> Self {
        Self::Borrowed(value)
    }
}
