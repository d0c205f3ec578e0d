//! Canonical headword ordering for the index file.
//!
//! The legacy dictionary format sorts its index with an ASCII-only
//! case-insensitive byte comparison, breaking ties with a plain byte
//! comparison of the original strings. Readers of the format binary-search
//! the index with the same rule, so this comparator must be reproduced
//! exactly. Only `'A'..='Z'` fold; every other byte, including multi-byte
//! UTF-8 sequences, passes through unchanged.

use std::cmp::Ordering;

/// Compare two headwords in canonical index order.
pub fn compare(a: &str, b: &str) -> Ordering {
    let folded = a
        .bytes()
        .map(|byte| byte.to_ascii_lowercase())
        .cmp(b.bytes().map(|byte| byte.to_ascii_lowercase()));
    match folded {
        Ordering::Equal => a.as_bytes().cmp(b.as_bytes()),
        other => other,
    }
}
