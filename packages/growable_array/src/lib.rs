#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! A resizable array of individually allocated elements, reachable by index, that grows and
//! contracts in fixed steps.
//!
//! This crate provides [`GrowableArray`], an index-addressable sequence of element slots with:
//!
//! - **Explicit element ownership**: each slot holds either an [`Owned`] element that the array
//!   frees, or a borrowed `&T` that the caller remains responsible for. The split is part of the
//!   type, so the array can never free something it does not own.
//! - **Step-wise growth**: a push that fills the array adds exactly
//!   [`expand_rate`](GrowableArray::expand_rate) slots.
//! - **Opportunistic contraction**: pops shrink the slot table when the new length crosses an
//!   expand-rate boundary, never below `expand_rate + 1` slots.
//! - **Bulk operations**: [`filter`](GrowableArray::filter),
//!   [`push_all`](GrowableArray::push_all), identity-based
//!   [`remove_all`](GrowableArray::remove_all) and [`shuffle`](GrowableArray::shuffle).
//!
//! # Example
//!
//! ```
//! use growable_array::{GrowableArray, Owned};
//!
//! let mut array = GrowableArray::<i32>::with_capacity(5).unwrap();
//!
//! for i in 0..100 {
//!     let mut value = Owned::<i32>::allocate().unwrap();
//!     *value = i * 333;
//!     array.push_owned(value).unwrap();
//! }
//!
//! assert_eq!(array.len(), 100);
//! assert_eq!(array.capacity(), 105);
//!
//! // Popping hands the element back to the caller.
//! let last = array.pop().unwrap();
//! assert_eq!(*last, 99 * 333);
//!
//! // Whatever is still in the array is freed when the array is cleared or dropped.
//! array.clear();
//! assert!(array.is_empty());
//! ```
//!
//! # Borrowed elements
//!
//! Elements owned elsewhere can be stored by reference. The array never frees them, and
//! identity-based operations compare their addresses rather than their values:
//!
//! ```
//! use growable_array::GrowableArray;
//!
//! let names = ["Alice".to_string(), "Bob".to_string(), "Charlie".to_string()];
//!
//! let mut everyone = GrowableArray::<String>::with_capacity(3).unwrap();
//! for name in &names {
//!     everyone.push_borrowed(name).unwrap();
//! }
//!
//! let mut leaving = GrowableArray::<String>::with_capacity(1).unwrap();
//! leaving.push_borrowed(&names[1]).unwrap();
//!
//! assert_eq!(everyone.remove_all(&leaving), 1);
//! assert_eq!(everyone.len(), 2);
//! ```

mod array;
mod builder;
mod bulk;
mod drop_policy;
mod element;
mod error;
mod random;

pub use array::GrowableArray;
pub use builder::*;
pub use drop_policy::*;
pub use element::*;
pub use error::*;
pub use random::*;
