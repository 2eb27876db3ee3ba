//! The interpreter state handle seen by native functions.

use super::errors::{ErrorSignal, ScriptError};
use super::frames::CallInfo;
use super::stack::absolute_index;
use super::value::{Table, Value};
use crate::bridge::{self, CFunction, Reg};
use libloading::Library;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

/// Interpreter state: the value stack, the active call frames, globals and
/// the module registry.
///
/// Native functions only ever see the part of the stack that belongs to
/// their own call: index `1` is their first argument, `-1` the last value
/// they pushed.
pub struct State {
    stack: Vec<Value>,
    frames: Vec<CallInfo>,
    globals: Table,
    // Error value in flight between `error_value` and the catching call.
    pending_error: Cell<Option<Value>>,
    pub(crate) loaded: HashMap<String, Value>,
    pub(crate) preload: HashMap<String, CFunction>,
    pub(crate) loading: Vec<String>,
    pub(crate) cpath: Option<String>,
    // Declared last: values holding function pointers into these libraries
    // must be dropped before the libraries are unloaded.
    pub(crate) libraries: Vec<Library>,
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl State {
    pub fn new() -> Self {
        State {
            stack: Vec::new(),
            frames: Vec::new(),
            globals: Table::new(),
            pending_error: Cell::new(None),
            loaded: HashMap::new(),
            preload: HashMap::new(),
            loading: Vec::new(),
            cpath: None,
            libraries: Vec::new(),
        }
    }

    fn base(&self) -> usize {
        self.frames.last().map_or(0, |f| f.base)
    }

    /// Name the running native function was registered under.
    pub(crate) fn current_name(&self) -> &str {
        self.frames.last().map_or("?", |f| &*f.name)
    }

    /// Number of values in the current frame.
    pub fn top(&self) -> usize {
        self.stack.len() - self.base()
    }

    /// Value at a frame-relative index, or `None` if the slot does not exist.
    pub fn value(&self, idx: i32) -> Option<&Value> {
        absolute_index(self.base(), self.stack.len(), idx).map(|slot| &self.stack[slot])
    }

    pub fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    pub fn push_nil(&mut self) {
        self.stack.push(Value::Nil);
    }

    pub fn push_number(&mut self, n: f64) {
        self.stack.push(Value::Number(n));
    }

    pub fn push_boolean(&mut self, b: bool) {
        self.stack.push(Value::Boolean(b));
    }

    /// Push a copy of `bytes` as a string value.
    pub fn push_string(&mut self, bytes: impl AsRef<[u8]>) {
        self.stack.push(Value::string(bytes));
    }

    /// Remove `n` values from the top of the current frame.
    pub fn pop(&mut self, n: usize) {
        let keep = self.stack.len().saturating_sub(n).max(self.base());
        self.stack.truncate(keep);
    }

    /// Push a new empty table sized for `narr` sequence entries and `nrec` fields.
    pub fn create_table(&mut self, narr: usize, nrec: usize) {
        self.stack.push(Value::table(Table::with_capacity(narr, nrec)));
    }

    fn table_at(&self, idx: i32) -> Rc<RefCell<Table>> {
        match self.value(idx) {
            Some(Value::Table(t)) => t.clone(),
            Some(other) => self.error(format!("table expected, got {}", other.type_name())),
            None => self.error("table expected, got no value"),
        }
    }

    /// `t[n] = v` without metamethods, where `t` is at `idx` and `v` is the
    /// value on top of the stack. Pops `v`.
    pub fn raw_seti(&mut self, idx: i32, n: i64) {
        let table = self.table_at(idx);
        let value = self.stack.pop().unwrap_or(Value::Nil);
        table.borrow_mut().set_index(n, value);
    }

    /// `t[key] = v`, where `t` is at `idx` and `v` is on top of the stack. Pops `v`.
    pub fn set_field(&mut self, idx: i32, key: &str) {
        let table = self.table_at(idx);
        let value = self.stack.pop().unwrap_or(Value::Nil);
        table.borrow_mut().set(key, value);
    }

    /// Create a new table and register every function of `regs` in it.
    /// The table is left on the stack.
    pub fn new_lib(&mut self, regs: &[Reg]) {
        let count = bridge::entries(regs).count();
        self.create_table(0, count);
        self.set_funcs(regs);
    }

    /// Register the functions of `regs` into the table on top of the stack,
    /// in array order, stopping at the sentinel. An entry without a function
    /// is registered as `false`.
    pub fn set_funcs(&mut self, regs: &[Reg]) {
        for (name, func) in bridge::entries(regs) {
            let name = name.to_string_lossy();
            match func {
                Some(func) => self.push(Value::native(&name, func)),
                None => self.push_boolean(false),
            }
            log::debug!("registering native function '{}'", name);
            self.set_field(-2, &name);
        }
    }

    pub fn get_global(&self, name: &str) -> Value {
        self.globals.get(name).cloned().unwrap_or(Value::Nil)
    }

    pub fn set_global(&mut self, name: &str, value: Value) {
        self.globals.set(name, value);
    }

    /// Bind a native function as a global.
    pub fn register(&mut self, name: &str, func: CFunction) {
        self.set_global(name, Value::native(name, func));
    }

    // ---- Checked argument extraction -------------------------------------

    /// Raise a script error. Never returns.
    pub fn error(&self, message: impl Into<String>) -> ! {
        self.error_value(Value::from(message.into()))
    }

    /// Raise a script error carrying an arbitrary value.
    pub fn error_value(&self, value: Value) -> ! {
        self.pending_error.set(Some(value));
        panic::resume_unwind(Box::new(ErrorSignal))
    }

    /// Raise `bad argument #arg to '<function>' (<extramsg>)`.
    pub fn arg_error(&self, arg: i32, extramsg: &str) -> ! {
        self.error(format!(
            "bad argument #{} to '{}' ({})",
            arg,
            self.current_name(),
            extramsg
        ))
    }

    /// Raise `bad argument` with `<expected> expected, got <actual>`.
    pub fn type_error(&self, arg: i32, expected: &str) -> ! {
        let actual = self.value(arg).map_or("no value", Value::type_name);
        self.arg_error(arg, &format!("{} expected, got {}", expected, actual))
    }

    /// Argument `arg` as a string. Numbers are not converted.
    pub fn check_string(&self, arg: i32) -> Rc<[u8]> {
        match self.value(arg) {
            Some(Value::String(s)) => s.clone(),
            _ => self.type_error(arg, "string"),
        }
    }

    pub fn check_number(&self, arg: i32) -> f64 {
        match self.value(arg) {
            Some(Value::Number(n)) => *n,
            _ => self.type_error(arg, "number"),
        }
    }

    pub fn check_table(&self, arg: i32) -> Rc<RefCell<Table>> {
        match self.value(arg) {
            Some(Value::Table(t)) => t.clone(),
            _ => self.type_error(arg, "table"),
        }
    }

    /// Argument `arg` of any type, including nil, but it must be present.
    pub fn check_any(&self, arg: i32) -> Value {
        match self.value(arg) {
            Some(v) => v.clone(),
            None => self.arg_error(arg, "value expected"),
        }
    }

    /// Argument `arg` as a string, or `default` if it is absent or nil.
    pub fn opt_string(&self, arg: i32, default: &[u8]) -> Rc<[u8]> {
        match self.value(arg) {
            None | Some(Value::Nil) => Rc::from(default),
            Some(_) => self.check_string(arg),
        }
    }

    // ---- Calling ---------------------------------------------------------

    /// Call `func` with `args` in protected mode.
    ///
    /// Script errors raised anywhere inside the call come back as `Err`, and
    /// the stack is restored to what it was before the call.
    pub fn pcall(&mut self, func: &Value, args: Vec<Value>) -> Result<Vec<Value>, ScriptError> {
        match func {
            Value::NativeFunction { name, func } => self.call_native(name, *func, args),
            other => Err(ScriptError::message(format!(
                "attempt to call a {} value",
                other.type_name()
            ))),
        }
    }

    /// Call `func` with `args`, propagating script errors to the enclosing
    /// protected call. Meant for use inside native functions.
    pub fn call(&mut self, func: &Value, args: Vec<Value>) -> Vec<Value> {
        match self.pcall(func, args) {
            Ok(results) => results,
            Err(err) => self.error_value(err.value),
        }
    }

    /// Run a native function in a fresh call frame.
    ///
    /// Returns exactly the values the function reported as results.
    pub fn call_native(
        &mut self,
        name: &str,
        func: CFunction,
        args: Vec<Value>,
    ) -> Result<Vec<Value>, ScriptError> {
        let base = self.stack.len();
        let depth = self.frames.len();
        self.frames.push(CallInfo::new(base, Rc::from(name)));
        self.stack.extend(args);

        let raw: *mut State = self;
        // SAFETY: `raw` comes from a live `&mut self` that is not used again
        // until the native function has returned or unwound.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| unsafe { func(raw) }));

        let result = match outcome {
            Ok(count) => self.collect_results(name, base, count),
            Err(payload) if payload.is::<ErrorSignal>() => {
                Err(ScriptError::new(self.pending_error.take().unwrap_or(Value::Nil)))
            }
            Err(payload) => {
                self.stack.truncate(base);
                self.frames.truncate(depth);
                panic::resume_unwind(payload)
            }
        };

        self.stack.truncate(base);
        self.frames.truncate(depth);
        result
    }

    fn collect_results(
        &mut self,
        name: &str,
        base: usize,
        count: libc::c_int,
    ) -> Result<Vec<Value>, ScriptError> {
        let available = self.stack.len() - base;
        match usize::try_from(count) {
            Ok(n) if n <= available => Ok(self.stack.split_off(self.stack.len() - n)),
            _ => Err(ScriptError::message(format!(
                "native function '{}' returned {} results but pushed {}",
                name, count, available
            ))),
        }
    }
}
