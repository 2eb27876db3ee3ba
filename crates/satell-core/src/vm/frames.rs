//! Call frame bookkeeping for native calls

use std::rc::Rc;

/// One active call. Arguments start at `base` on the value stack; anything
/// pushed by the callee lands above them.
#[derive(Debug, Clone)]
pub struct CallInfo {
    pub base: usize,
    /// Name the callee was registered under, for `bad argument` messages.
    pub name: Rc<str>,
}

impl CallInfo {
    pub fn new(base: usize, name: Rc<str>) -> Self {
        CallInfo { base, name }
    }
}
