//! Tests for string native functions

use super::strings::*;
use satell_core::{State, Value};

fn list_of(value: &Value) -> Vec<Value> {
    match value {
        Value::Table(t) => t.borrow().sequence().to_vec(),
        other => panic!("Expected table result, got {other:?}"),
    }
}

#[test]
fn test_cpp_hello() {
    let mut state = State::new();
    let results = state
        .call_native("cpp_hello", cpp_hello, vec![Value::from("World")])
        .unwrap();
    assert_eq!(results, vec![Value::from("Hello from C++23, World!")]);
}

#[test]
fn test_cpp_hello_no_args() {
    let mut state = State::new();
    let err = state.call_native("cpp_hello", cpp_hello, vec![]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "bad argument #1 to 'cpp_hello' (string expected, got no value)"
    );
}

#[test]
fn test_cpp_hello_table_arg() {
    let mut state = State::new();
    let err = state
        .call_native("cpp_hello", cpp_hello, vec![Value::table(Default::default())])
        .unwrap_err();
    assert!(err.to_string().contains("string expected, got table"));
}

#[test]
fn test_cpp_version() {
    let mut state = State::new();
    let results = state.call_native("cpp_version", cpp_version, vec![]).unwrap();
    assert_eq!(results.len(), 1);
    let text = results[0].as_str().unwrap();
    assert!(text.starts_with("Satell C++ Extensions v"));
    assert_eq!(text, VERSION);
}

#[test]
fn test_cpp_version_ignores_extra_args() {
    let mut state = State::new();
    let results = state
        .call_native("cpp_version", cpp_version, vec![Value::Number(1.0)])
        .unwrap();
    assert_eq!(results, vec![Value::from(VERSION)]);
}

#[test]
fn test_split() {
    let mut state = State::new();
    let results = state
        .call_native("split", cpp_split, vec![Value::from("a b c"), Value::from(" ")])
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(
        list_of(&results[0]),
        vec![Value::from("a"), Value::from("b"), Value::from("c")]
    );
}

#[test]
fn test_split_empty_subject() {
    let mut state = State::new();
    let results = state
        .call_native("split", cpp_split, vec![Value::from(""), Value::from(",")])
        .unwrap();
    assert_eq!(list_of(&results[0]), vec![Value::from("")]);
}

#[test]
fn test_split_empty_delimiter() {
    let mut state = State::new();
    let err = state
        .call_native("split", cpp_split, vec![Value::from("abc"), Value::from("")])
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "bad argument #2 to 'split' (delimiter must be a single character)"
    );
    assert_eq!(state.top(), 0);
}

#[test]
fn test_split_long_delimiter() {
    let mut state = State::new();
    let err = state
        .call_native("split", cpp_split, vec![Value::from("a::b"), Value::from("::")])
        .unwrap_err();
    assert!(err.to_string().contains("delimiter must be a single character"));
}

#[test]
fn test_split_number_subject() {
    let mut state = State::new();
    let err = state
        .call_native("split", cpp_split, vec![Value::Number(12.0), Value::from(",")])
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "bad argument #1 to 'split' (string expected, got number)"
    );
}
