//! Error types for the two sides of the bridge

use super::value::Value;
use std::path::PathBuf;
use thiserror::Error;

/// Unwinding payload used by [`State::error`](super::State::error).
///
/// This is the interpreter's own error-signalling mechanism. It travels
/// through `C-unwind` native frames and is caught by the host at the call
/// boundary, where it becomes a [`ScriptError`]. The error value itself
/// waits in the state, since values are not `Send`.
#[derive(Debug, Clone, Copy)]
pub struct ErrorSignal;

/// A script-visible error: what a protected call observes.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptError {
    pub value: Value,
}

impl ScriptError {
    pub fn new(value: Value) -> Self {
        ScriptError { value }
    }

    pub fn message(message: impl Into<String>) -> Self {
        ScriptError {
            value: Value::from(message.into()),
        }
    }
}

impl std::fmt::Display for ScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Value::String(_) => write!(f, "{}", self.value),
            other => write!(f, "(error object is a {} value)", other.type_name()),
        }
    }
}

impl std::error::Error for ScriptError {}

/// Failures of the host module system.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("module '{name}' not found:{}", format_tried(.tried))]
    NotFound { name: String, tried: Vec<PathBuf> },

    #[error("cannot load native library '{}': {source}", .path.display())]
    Library {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[error("entry point '{symbol}' not found in '{}'", .path.display())]
    MissingSymbol { symbol: String, path: PathBuf },

    #[error("loop or previous error loading module '{name}' ({})", .chain.join(" -> "))]
    Cycle { name: String, chain: Vec<String> },

    #[error("error loading module '{name}': {source}")]
    Script {
        name: String,
        #[source]
        source: ScriptError,
    },
}

fn format_tried(tried: &[PathBuf]) -> String {
    let mut out = String::from("\n\tno field package.preload");
    for path in tried {
        out.push_str(&format!("\n\tno file '{}'", path.display()));
    }
    out
}
