//! Helper functions for native function implementations.
//!
//! These never abort on allocation failure: they return `None` and leave it
//! to the calling native function to raise a script error.

/// Text placed before the name by `cpp_hello`.
pub const GREETING_PREFIX: &[u8] = b"Hello from C++23, ";

/// Concatenate two byte strings into a new buffer.
pub fn safe_concat(a: &[u8], b: &[u8]) -> Option<Vec<u8>> {
    let len = a.len().checked_add(b.len())?;
    let mut out = Vec::new();
    out.try_reserve_exact(len).ok()?;
    out.extend_from_slice(a);
    out.extend_from_slice(b);
    Some(out)
}

/// `"Hello from C++23, " + name + "!"`
pub fn greeting(name: &[u8]) -> Option<Vec<u8>> {
    let head = safe_concat(GREETING_PREFIX, name)?;
    safe_concat(&head, b"!")
}

/// Split `subject` at every occurrence of `delimiter`.
///
/// Always yields at least one segment. Joining the segments with the
/// delimiter gives back `subject`.
pub fn split(subject: &[u8], delimiter: u8) -> Option<Vec<&[u8]>> {
    let count = subject.iter().filter(|&&b| b == delimiter).count() + 1;
    let mut parts = Vec::new();
    parts.try_reserve_exact(count).ok()?;
    parts.extend(subject.split(|&b| b == delimiter));
    Some(parts)
}
