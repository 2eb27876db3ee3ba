//! Native functions exported by the module.
//!
//! - `strings`: the script-callable functions (`cpp_hello`, `cpp_version`, `split`)
//! - `helpers`: byte-string helpers that report allocation failure as `None`

pub mod helpers;
pub mod strings;

pub use strings::{VERSION, cpp_hello, cpp_split, cpp_version};

#[cfg(test)]
mod helpers_tests;
#[cfg(test)]
mod strings_tests;
