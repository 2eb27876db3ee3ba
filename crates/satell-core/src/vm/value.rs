use crate::bridge::CFunction;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A script value as seen from the native side of the bridge.
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Boolean(bool),
    Number(f64),
    /// Byte string. Pushing text always copies it into a fresh allocation
    /// owned by the interpreter.
    String(Rc<[u8]>),
    Table(Rc<RefCell<Table>>),
    /// A function implemented outside the scripting language.
    /// `name` is the name it was registered under, used in error messages.
    NativeFunction { name: Rc<str>, func: CFunction },
}

impl Value {
    pub fn string(bytes: impl AsRef<[u8]>) -> Self {
        Value::String(Rc::from(bytes.as_ref()))
    }

    pub fn table(table: Table) -> Self {
        Value::Table(Rc::new(RefCell::new(table)))
    }

    pub fn native(name: &str, func: CFunction) -> Self {
        Value::NativeFunction {
            name: Rc::from(name),
            func,
        }
    }

    /// Name of the value's category, as used in `bad argument` messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Table(_) => "table",
            Value::NativeFunction { .. } => "function",
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The string content, if this is a string holding valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Table(a), Value::Table(b)) => {
                // Compare by reference first, then by value
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            }
            (Value::NativeFunction { func: f1, .. }, Value::NativeFunction { func: f2, .. }) => {
                std::ptr::fn_addr_eq(*f1, *f2)
            }
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => {
                // Integral floats print without the fraction, like the interpreter does
                if n.fract() == 0.0 && n.is_finite() {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::String(s) => write!(f, "{}", String::from_utf8_lossy(s)),
            Value::Table(t) => write!(f, "table: {:p}", Rc::as_ptr(t)),
            Value::NativeFunction { name, .. } => write!(f, "function: builtin '{}'", name),
        }
    }
}

/// Interpreter table: a 1-based array part, integer keys that do not fit
/// the array part, and string-keyed fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    array: Vec<Value>,
    sparse: HashMap<i64, Value>,
    fields: HashMap<String, Value>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table with room for `narr` sequence entries and `nrec` fields.
    pub fn with_capacity(narr: usize, nrec: usize) -> Self {
        Table {
            array: Vec::with_capacity(narr),
            sparse: HashMap::new(),
            fields: HashMap::with_capacity(nrec),
        }
    }

    /// Length of the sequence `1..=n`. Integer keys past a hole and string
    /// fields are not counted; see [`Table::is_sequence`].
    pub fn len(&self) -> usize {
        self.array.len()
    }

    pub fn is_empty(&self) -> bool {
        self.array.is_empty() && self.sparse.is_empty() && self.fields.is_empty()
    }

    pub fn get_index(&self, n: i64) -> Option<&Value> {
        if n >= 1 && (n as usize) <= self.array.len() {
            return Some(&self.array[n as usize - 1]);
        }
        self.sparse.get(&n)
    }

    /// Raw integer assignment. Assigning nil removes the entry.
    pub fn set_index(&mut self, n: i64, value: Value) {
        let len = self.array.len() as i64;
        if n >= 1 && n <= len {
            if value.is_nil() {
                // Shrink the sequence; anything past the hole moves to the sparse part
                for (i, v) in self.array.drain(n as usize - 1..).enumerate().skip(1) {
                    self.sparse.insert(n + i as i64, v);
                }
            } else {
                self.array[n as usize - 1] = value;
            }
        } else if n == len + 1 && !value.is_nil() {
            self.array.push(value);
            self.migrate_sparse();
        } else if value.is_nil() {
            self.sparse.remove(&n);
        } else {
            self.sparse.insert(n, value);
        }
    }

    fn migrate_sparse(&mut self) {
        while let Some(v) = self.sparse.remove(&(self.array.len() as i64 + 1)) {
            self.array.push(v);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        if value.is_nil() {
            self.fields.remove(&key);
        } else {
            self.fields.insert(key, value);
        }
    }

    /// True if every entry belongs to the sequence `1..=len`.
    pub fn is_sequence(&self) -> bool {
        self.sparse.is_empty() && self.fields.is_empty()
    }

    /// All integer-keyed entries, sequence and sparse, in key order.
    pub fn integer_entries(&self) -> Vec<(i64, &Value)> {
        let mut entries: Vec<(i64, &Value)> = self
            .array
            .iter()
            .enumerate()
            .map(|(i, v)| (i as i64 + 1, v))
            .chain(self.sparse.iter().map(|(k, v)| (*k, v)))
            .collect();
        entries.sort_unstable_by_key(|(k, _)| *k);
        entries
    }

    /// The sequence part, in index order.
    pub fn sequence(&self) -> &[Value] {
        &self.array
    }

    /// String keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}
