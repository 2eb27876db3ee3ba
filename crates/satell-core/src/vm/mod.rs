mod errors;
mod frames;
mod stack;
mod state;

pub mod modules;
pub mod value;

pub use errors::*;
pub use frames::*;
pub use stack::*;
pub use state::*;
pub use value::{Table, Value};
