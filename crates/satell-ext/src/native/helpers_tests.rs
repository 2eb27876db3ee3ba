//! Tests for helper functions

use super::helpers::*;

#[test]
fn test_safe_concat() {
    assert_eq!(safe_concat(b"foo", b"bar"), Some(b"foobar".to_vec()));
}

#[test]
fn test_safe_concat_empty_parts() {
    assert_eq!(safe_concat(b"", b""), Some(Vec::new()));
    assert_eq!(safe_concat(b"a", b""), Some(b"a".to_vec()));
}

#[test]
fn test_greeting_world() {
    assert_eq!(
        greeting(b"World"),
        Some(b"Hello from C++23, World!".to_vec())
    );
}

#[test]
fn test_greeting_keeps_interior_nul() {
    let greeting = greeting(b"a\0b").unwrap();
    assert_eq!(greeting, b"Hello from C++23, a\0b!".to_vec());
}

#[test]
fn test_split_basic() {
    let parts = split(b"a,b,c", b',').unwrap();
    let expected: Vec<&[u8]> = vec![&b"a"[..], &b"b"[..], &b"c"[..]];
    assert_eq!(parts, expected);
}

#[test]
fn test_split_no_delimiter() {
    let parts = split(b"hello", b',').unwrap();
    let expected: Vec<&[u8]> = vec![&b"hello"[..]];
    assert_eq!(parts, expected);
}

#[test]
fn test_split_empty_input() {
    let parts = split(b"", b',').unwrap();
    let expected: Vec<&[u8]> = vec![&b""[..]];
    assert_eq!(parts, expected);
}

#[test]
fn test_split_consecutive_delimiters() {
    let parts = split(b"a,,b", b',').unwrap();
    let expected: Vec<&[u8]> = vec![&b"a"[..], &b""[..], &b"b"[..]];
    assert_eq!(parts, expected);
}

#[test]
fn test_split_leading_and_trailing_delimiters() {
    let parts = split(b",a,", b',').unwrap();
    let expected: Vec<&[u8]> = vec![&b""[..], &b"a"[..], &b""[..]];
    assert_eq!(parts, expected);
}

#[test]
fn test_split_only_delimiters() {
    let parts = split(b"::", b':').unwrap();
    assert_eq!(parts.len(), 3);
    assert!(parts.iter().all(|p| p.is_empty()));
}
