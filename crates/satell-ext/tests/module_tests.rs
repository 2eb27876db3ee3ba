//! End-to-end tests: open the module the way a host does and call its
//! functions through the module table.

use proptest::prelude::*;
use satell_core::{State, Value};
use satell_ext::{MODULE_NAME, SATELL_EXTLIB, luaopen_satell_ext};

/// Open the module through `require` and fetch one of its functions.
fn module_function(state: &mut State, name: &str) -> Value {
    satell_ext::preload(state);
    let module = state.require(MODULE_NAME).expect("module should open");
    let Value::Table(table) = module else {
        panic!("Expected module table");
    };
    let func = table.borrow().get(name).cloned();
    func.unwrap_or_else(|| panic!("module has no function '{name}'"))
}

fn join(parts: &[Value], delimiter: u8) -> Vec<u8> {
    let mut out = Vec::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            out.push(delimiter);
        }
        out.extend_from_slice(part.as_bytes().expect("segments are strings"));
    }
    out
}

fn split_via_bridge(state: &mut State, subject: &[u8], delimiter: u8) -> Vec<Value> {
    let split = module_function(state, "split");
    let results = state
        .pcall(&split, vec![Value::string(subject), Value::string([delimiter])])
        .expect("split should succeed");
    assert_eq!(results.len(), 1);
    let Value::Table(parts) = &results[0] else {
        panic!("Expected table result, got {:?}", results[0]);
    };
    parts.borrow().sequence().to_vec()
}

#[test]
fn test_entry_point_returns_one_table() {
    let mut state = State::new();
    let results = state
        .call_native("luaopen_satell_ext", luaopen_satell_ext, vec![])
        .unwrap();
    assert_eq!(results.len(), 1);
    let Value::Table(module) = &results[0] else {
        panic!("Expected module table");
    };
    assert_eq!(module.borrow().keys(), vec!["cpp_hello", "cpp_version", "split"]);
    assert_eq!(state.top(), 0);
}

#[test]
fn test_registration_table_layout() {
    let names: Vec<_> = satell_core::bridge::entries(&SATELL_EXTLIB)
        .map(|(name, func)| {
            assert!(func.is_some());
            name.to_str().unwrap()
        })
        .collect();
    assert_eq!(names, vec!["cpp_hello", "cpp_version", "split"]);
    assert!(SATELL_EXTLIB.last().unwrap().is_sentinel());
}

#[test]
fn test_require_returns_same_table() {
    let mut state = State::new();
    satell_ext::preload(&mut state);
    let a = state.require(MODULE_NAME).unwrap();
    let b = state.require(MODULE_NAME).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_hello_world() {
    let mut state = State::new();
    let hello = module_function(&mut state, "cpp_hello");
    let results = state.pcall(&hello, vec![Value::from("World")]).unwrap();
    assert_eq!(results, vec![Value::from("Hello from C++23, World!")]);
}

#[test]
fn test_version_is_text() {
    let mut state = State::new();
    let version = module_function(&mut state, "cpp_version");
    let results = state.pcall(&version, vec![]).unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].as_str().unwrap().contains("Satell C++ Extensions"));
}

#[test]
fn test_split_error_names_registered_function() {
    let mut state = State::new();
    let split = module_function(&mut state, "split");
    let err = state
        .pcall(&split, vec![Value::from("a,b"), Value::from(",,")])
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "bad argument #2 to 'split' (delimiter must be a single character)"
    );
    assert_eq!(state.top(), 0);
}

#[test]
fn test_wrong_argument_types_raise_script_errors() {
    let mut state = State::new();
    let hello = module_function(&mut state, "cpp_hello");
    let split = module_function(&mut state, "split");

    let cases = vec![
        (hello.clone(), vec![Value::Number(5.0)], "bad argument #1 to 'cpp_hello'"),
        (hello, vec![Value::Boolean(false)], "string expected, got boolean"),
        (split.clone(), vec![Value::from("a,b"), Value::Nil], "bad argument #2 to 'split'"),
        (split, vec![Value::Nil, Value::from(",")], "string expected, got nil"),
    ];

    for (func, args, expected) in cases {
        let err = state.pcall(&func, args).unwrap_err();
        assert!(
            err.to_string().contains(expected),
            "error '{}' should contain '{}'",
            err,
            expected
        );
    }
}

#[test]
fn test_split_without_delimiter_occurrence() {
    let mut state = State::new();
    let parts = split_via_bridge(&mut state, b"no delimiters here", b',');
    assert_eq!(parts, vec![Value::from("no delimiters here")]);
}

#[test]
fn test_split_empty_text() {
    let mut state = State::new();
    let parts = split_via_bridge(&mut state, b"", b';');
    assert_eq!(parts, vec![Value::from("")]);
}

proptest! {
    #[test]
    fn prop_split_then_join_round_trips(
        subject in proptest::collection::vec(prop_oneof![Just(b','), any::<u8>()], 0..64),
        delimiter in prop_oneof![Just(b','), any::<u8>()],
    ) {
        let mut state = State::new();
        let parts = split_via_bridge(&mut state, &subject, delimiter);
        prop_assert_eq!(join(&parts, delimiter), subject.clone());
        let occurrences = subject.iter().filter(|&&b| b == delimiter).count();
        prop_assert_eq!(parts.len(), occurrences + 1);
    }

    #[test]
    fn prop_bad_delimiter_length_pushes_nothing(
        subject in ".*",
        delimiter in prop_oneof![Just(String::new()), "[a-z]{2,5}"],
    ) {
        let mut state = State::new();
        let split = module_function(&mut state, "split");
        let result = state.pcall(&split, vec![Value::from(subject), Value::from(delimiter)]);
        prop_assert!(result.is_err());
        prop_assert_eq!(state.top(), 0);
    }
}
