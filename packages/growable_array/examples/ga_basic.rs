//! Basic usage of the `growable_array` crate:
//!
//! * Creating an array.
//! * Pushing owned elements and watching the capacity grow.
//! * Popping elements back off and watching the capacity contract.

use growable_array::{GrowableArray, Owned};

fn main() {
    let mut array = GrowableArray::<i32>::with_capacity(5).unwrap();

    println!(
        "Empty array: length {}, capacity {}, expand rate {}",
        array.len(),
        array.capacity(),
        array.expand_rate()
    );

    // Owned elements are allocated up front and filled in before they are pushed.
    for i in 0..100 {
        let mut value = Owned::<i32>::allocate().unwrap();
        *value = i * 333;
        array.push_owned(value).unwrap();
    }

    println!(
        "After 100 pushes: length {}, capacity {}",
        array.len(),
        array.capacity()
    );

    // Popping hands ownership back to us. Dropping the element frees it.
    while let Some(element) = array.pop() {
        if array.len() % 25 == 0 {
            println!(
                "Popped {}, length is now {}, capacity {}",
                *element,
                array.len(),
                array.capacity()
            );
        }
    }

    println!(
        "Empty again: length {}, capacity {}",
        array.len(),
        array.capacity()
    );
}
