//! Mixing owned and borrowed elements in one `GrowableArray`:
//!
//! * Borrowed elements stay the caller's responsibility.
//! * Owned elements are freed by `clear()` or handed back by `destroy()`.
//! * Filtering and identity-based removal work on references, not copies.

use growable_array::{DropPolicy, GrowableArray, Owned};

fn main() {
    let guests = ["Alice".to_string(), "Bob".to_string()];

    // With this policy, dropping an array that still holds owned elements is a bug and panics.
    let mut table = GrowableArray::<String>::builder()
        .initial_capacity(4)
        .drop_policy(DropPolicy::MustNotDropItems)
        .build()
        .unwrap();

    for guest in &guests {
        table.push_borrowed(guest).unwrap();
    }

    table
        .push_owned(Owned::allocate_with("Charlie".to_string()).unwrap())
        .unwrap();

    let long_names = table.filter(|name| name.len() > 3).unwrap().unwrap();
    println!("Guests with long names: {}", long_names.len());
    drop(long_names);

    // Bob leaves. We remove him by identity, so only the very string we passed in goes away.
    let mut leaving = GrowableArray::<String>::with_capacity(1).unwrap();
    leaving.push_borrowed(&guests[1]).unwrap();

    let removed = table.remove_all(&leaving);
    println!("Removed {removed} guest(s), {} remain", table.len());

    table.shuffle();

    for name in table.iter().flatten() {
        println!("Seated: {name}");
    }

    // Take back the owned elements so the drop policy is satisfied.
    let owned = table.destroy();
    println!("Handed back {} owned element(s)", owned.len());
}
