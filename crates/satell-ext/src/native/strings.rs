//! String functions: cpp_hello, cpp_version, split

use super::helpers::{greeting, split};
use satell_core::native_function;

/// Reported by `cpp_version()`.
pub const VERSION: &str = concat!(
    "Satell C++ Extensions v",
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("SATELL_RUSTC_VERSION"),
    ")"
);

native_function! {
    /// Native function: cpp_hello(name: String) -> String
    pub fn cpp_hello(state) {
        let name = state.check_string(1);
        match greeting(&name) {
            Some(text) => {
                state.push_string(text);
                1
            }
            None => {
                log::warn!("allocation failed in cpp_hello ({} byte name)", name.len());
                state.error("not enough memory")
            }
        }
    }
}

native_function! {
    /// Native function: cpp_version() -> String
    pub fn cpp_version(state) {
        state.push_string(VERSION);
        1
    }
}

native_function! {
    /// Native function: split(subject: String, delimiter: String) -> List
    /// The delimiter must be exactly one byte.
    pub fn cpp_split(state) {
        let subject = state.check_string(1);
        let delimiter = state.check_string(2);
        let &[delimiter] = &*delimiter else {
            state.arg_error(2, "delimiter must be a single character")
        };

        let Some(parts) = split(&subject, delimiter) else {
            log::warn!("allocation failed in split ({} byte subject)", subject.len());
            state.error("not enough memory")
        };

        state.create_table(parts.len(), 0);
        for (i, part) in parts.iter().enumerate() {
            state.push_string(part);
            state.raw_seti(-2, i as i64 + 1);
        }
        1
    }
}
