//! Host side of the Satell native call bridge.
//!
//! `satell-core` defines how the interpreter calls functions implemented in
//! Rust (or any language that can export the C ABI), how those functions
//! exchange values with the interpreter through the call frame, and how
//! extension modules are registered and loaded.

pub mod bridge;
pub mod vm;

// Re-export commonly used types for convenience
pub use bridge::{CFunction, Reg};
pub use vm::{LoadError, ScriptError, State, Table, Value};
