//! Elixir Term Conversion Utilities
//!
//! Small helpers for moving extraction results onto the BEAM heap.

use rustler::{Env, NewBinary, Term};

/// Create a binary term from raw bytes
pub fn bytes_to_binary<'a>(env: Env<'a>, bytes: &[u8]) -> Term<'a> {
    let mut binary = NewBinary::new(env, bytes.len());
    binary.as_mut_slice().copy_from_slice(bytes);
    binary.into()
}

/// Build a list of binaries. Built back-to-front: list_prepend is O(1).
pub fn byte_list<'a, I>(env: Env<'a>, items: I) -> Term<'a>
where
    I: IntoIterator,
    I::IntoIter: DoubleEndedIterator,
    I::Item: AsRef<[u8]>,
{
    let mut list = Term::list_new_empty(env);
    for item in items.into_iter().rev() {
        list = list.list_prepend(bytes_to_binary(env, item.as_ref()));
    }
    list
}
