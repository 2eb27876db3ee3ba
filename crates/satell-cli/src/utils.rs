//! Shared CLI utilities for argument parsing and result formatting

use satell_core::{State, Value};
use serde::Serialize;
use std::panic;

/// Replace the default panic hook with one that logs at debug level.
///
/// Panics inside native functions already reach the user as script errors;
/// the default hook would print a second, raw report for each of them.
/// Run with `RUST_LOG=debug` to see the panic location.
pub fn install_panic_hook() {
    panic::set_hook(Box::new(|info| {
        log::debug!("{}", info);
    }));
}

/// A host state with the built-in extension registered.
pub fn new_state() -> State {
    let mut state = State::new();
    satell_ext::preload(&mut state);
    state
}

/// Turn a command-line argument into a value.
/// With `typed`, `nil`, `true`, `false` and numbers are recognised.
pub fn parse_arg(arg: &str, typed: bool) -> Value {
    if !typed {
        return Value::from(arg);
    }
    match arg {
        "nil" => Value::Nil,
        "true" => Value::Boolean(true),
        "false" => Value::Boolean(false),
        _ => arg
            .parse::<f64>()
            .map(Value::Number)
            .unwrap_or_else(|_| Value::from(arg)),
    }
}

/// JSON rendering of a value: non-empty sequences become arrays, other tables
/// objects, with integer keys written as decimal strings.
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Nil => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => serde_json::Number::from_f64(*n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(String::from_utf8_lossy(s).into_owned()),
        Value::Table(t) => {
            let table = t.borrow();
            if table.len() > 0 && table.is_sequence() {
                serde_json::Value::Array(table.sequence().iter().map(to_json).collect())
            } else {
                let integers = table
                    .integer_entries()
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), to_json(v)));
                let fields = table
                    .keys()
                    .into_iter()
                    .filter_map(|k| table.get(k).map(|v| (k.to_string(), to_json(v))));
                serde_json::Value::Object(integers.chain(fields).collect())
            }
        }
        Value::NativeFunction { name, .. } => {
            serde_json::Value::String(format!("function: builtin '{name}'"))
        }
    }
}

/// Output of `satell call --json`.
#[derive(Debug, Serialize)]
pub struct CallReport {
    pub function: String,
    pub results: Vec<serde_json::Value>,
}

/// Plain-text rendering of one result line. Strings print as-is; inside a
/// table they are quoted.
pub fn format_result(value: &Value) -> String {
    match value {
        Value::Table(t) => {
            let table = t.borrow();
            let items: Vec<String> = table.sequence().iter().map(format_item).collect();
            format!("[{}]", items.join(", "))
        }
        other => other.to_string(),
    }
}

fn format_item(value: &Value) -> String {
    match value {
        Value::String(_) => format!("{:?}", value.to_string()),
        other => format_result(other),
    }
}
