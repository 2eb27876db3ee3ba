//! Satell extension module: string utilities implemented in Rust.
//!
//! Build as a `cdylib` and put it on the native search path to load it with
//! `require("satell_ext")`, or link the `rlib` into a host and call
//! [`preload`] to register it statically.

pub mod native;

use satell_core::{Reg, State, native_module};

pub use native::{cpp_hello, cpp_split, cpp_version};

/// Crate version and git revision of this build.
pub const BUILD_INFO: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (git:",
    env!("SATELL_GIT_HASH"),
    ")"
);

/// Name scripts use to require this module.
pub const MODULE_NAME: &str = "satell_ext";

/// Registration table of the module, in export order.
pub static SATELL_EXTLIB: [Reg; 4] = [
    Reg::new(c"cpp_hello", cpp_hello),
    Reg::new(c"cpp_version", cpp_version),
    Reg::new(c"split", cpp_split),
    Reg::SENTINEL,
];

native_module! {
    /// Module-open entry point, resolved by name by the host's loader.
    pub fn luaopen_satell_ext => SATELL_EXTLIB
}

/// Register the module in the state's preload table, for hosts that link
/// the extension statically.
pub fn preload(state: &mut State) {
    state.preload(MODULE_NAME, luaopen_satell_ext);
}
