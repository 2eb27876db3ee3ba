//! Native call bridge: calling convention, registration tables and the
//! plain-linkage declaration layer.
//!
//! A native function is any function of type [`CFunction`]: it takes the
//! interpreter state handle, reads its arguments from the current call frame,
//! pushes its results and returns how many it pushed. Script errors are raised
//! with [`State::error`], which unwinds through the `C-unwind` frame back to
//! the host.
//!
//! Extension crates do not write the `extern` declarations by hand. The
//! [`native_function!`](crate::native_function) and
//! [`native_module!`](crate::native_module) macros generate them, so the
//! function bodies stay plain Rust over `&mut State`.

use crate::vm::{ErrorSignal, State};
use libc::{c_char, c_int};
use std::any::Any;
use std::ffi::CStr;
use std::panic::{self, AssertUnwindSafe};

/// Signature of every function the host calls through the bridge.
pub type CFunction = unsafe extern "C-unwind" fn(*mut State) -> c_int;

/// One entry of a registration table.
///
/// Layout matches the C `{ const char *name; lua_CFunction func; }` pair so
/// that a table can be handed to C-linkage host code unchanged. Entries are
/// built only through [`Reg::new`] and [`Reg::SENTINEL`], so `name` is either
/// null or a `'static` NUL-terminated string.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Reg {
    name: *const c_char,
    func: Option<CFunction>,
}

// Entries only point at 'static string literals and never change.
unsafe impl Sync for Reg {}

impl Reg {
    /// The terminating entry of every registration table.
    pub const SENTINEL: Reg = Reg {
        name: std::ptr::null(),
        func: None,
    };

    pub const fn new(name: &'static CStr, func: CFunction) -> Self {
        Reg {
            name: name.as_ptr(),
            func: Some(func),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.name.is_null()
    }

    /// The exported name, or `None` for the sentinel.
    pub fn name(&self) -> Option<&'static CStr> {
        if self.name.is_null() {
            None
        } else {
            // SAFETY: non-null names always come from a `&'static CStr` in `Reg::new`.
            Some(unsafe { CStr::from_ptr(self.name) })
        }
    }

    pub fn func(&self) -> Option<CFunction> {
        self.func
    }
}

/// Iterate the entries of a registration table up to its sentinel.
///
/// A table without a sentinel is consumed to its end.
pub fn entries(regs: &[Reg]) -> impl Iterator<Item = (&'static CStr, Option<CFunction>)> + '_ {
    regs.iter()
        .map_while(|reg| reg.name().map(|name| (name, reg.func())))
}

/// Run a native function body, turning a Rust panic into a script error.
///
/// Script errors raised by the body pass through untouched; any other panic
/// is caught here so it never unwinds into the host as a native fault. The
/// error names the function as it was registered, like `bad argument` does.
pub fn guard<F>(state: &mut State, body: F) -> c_int
where
    F: FnOnce(&mut State) -> c_int,
{
    match panic::catch_unwind(AssertUnwindSafe(|| body(&mut *state))) {
        Ok(n) => n,
        Err(payload) if payload.is::<ErrorSignal>() => panic::resume_unwind(payload),
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            let name = state.current_name().to_string();
            log::debug!("native function '{}' panicked: {}", name, message);
            state.error(format!("native function '{name}' panicked: {message}"))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic payload"
    }
}

/// Declare a native function with the bridge calling convention.
///
/// ```ignore
/// native_function! {
///     /// greet(name) -> string
///     pub fn greet(state) {
///         let name = state.check_string(1);
///         state.push_string(&name);
///         1
///     }
/// }
/// ```
///
/// expands to an `unsafe extern "C-unwind" fn(*mut State) -> c_int` whose
/// body runs inside [`guard`].
#[macro_export]
macro_rules! native_function {
    ($(#[$meta:meta])* $vis:vis fn $name:ident($state:ident) $body:block) => {
        $(#[$meta])*
        $vis unsafe extern "C-unwind" fn $name(raw: *mut $crate::State) -> ::std::ffi::c_int {
            // SAFETY: the host passes the live state of the current call and
            // holds no other reference to it while the function runs.
            let state: &mut $crate::State = unsafe { &mut *raw };
            $crate::bridge::guard(state, |$state: &mut $crate::State| $body)
        }
    };
}

/// Declare a module-open entry point with an unmangled name.
///
/// The generated function creates a new table from the registration list,
/// leaves it on the stack and returns `1`, exactly like any other native
/// function, because the host's loader calls it like one.
#[macro_export]
macro_rules! native_module {
    ($(#[$meta:meta])* $vis:vis fn $open:ident => $lib:expr) => {
        $(#[$meta])*
        #[unsafe(no_mangle)]
        $vis unsafe extern "C-unwind" fn $open(raw: *mut $crate::State) -> ::std::ffi::c_int {
            // SAFETY: see `native_function!`.
            let state: &mut $crate::State = unsafe { &mut *raw };
            state.new_lib(&$lib);
            1
        }
    };
}
