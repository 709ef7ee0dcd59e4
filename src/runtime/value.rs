//! JavaScript value types
//!
//! This module defines the runtime representation of JavaScript values and
//! objects as seen by the array engine.

use super::array::iterator::ArrayIterator;
use super::storage::{ArrayStorage, DenseArray};
use crate::error::{messages, Error, Result};
use bitflags::bitflags;
use rustc_hash::FxHashMap as HashMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Shared handle to a heap object
pub type ObjectRef = Rc<RefCell<Object>>;

/// Type alias for native function implementations: `(this, arguments) -> result`
pub type NativeFn = Rc<dyn Fn(&Value, &[Value]) -> Result<Value>>;

/// Nested arrays deeper than this render as `...` in debug/display output
const DISPLAY_DEPTH: usize = 4;

/// Elements rendered per array in debug/display output
const DISPLAY_ELEMENTS: u32 = 100;

/// A JavaScript value
#[derive(Clone)]
pub enum Value {
    /// undefined
    Undefined,
    /// null
    Null,
    /// Boolean value
    Boolean(bool),
    /// Number (IEEE 754 double)
    Number(f64),
    /// String
    String(String),
    /// Object (includes arrays, functions, proxies, etc.)
    Object(ObjectRef),
}

impl Value {
    /// Check if value is undefined
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if value is nullish (null or undefined)
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Check if value is an object
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Borrow the object handle, if any
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Convert to boolean (truthiness)
    pub fn to_boolean(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Object(_) => true,
        }
    }

    /// Convert to number
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Boolean(true) => 1.0,
            Value::Boolean(false) => 0.0,
            Value::Number(n) => *n,
            Value::String(s) => string_to_number(s),
            // No user valueOf/toString: objects have no prototype chain here
            Value::Object(obj) => match &obj.borrow().kind {
                ObjectKind::Primitive(inner) => inner.to_number(),
                ObjectKind::StringWrapper(s) => string_to_number(s),
                _ => f64::NAN,
            },
        }
    }

    /// ToIntegerOrInfinity: NaN becomes 0, everything else truncates toward zero
    pub fn to_integer(&self) -> f64 {
        let n = self.to_number();
        if n.is_nan() {
            0.0
        } else {
            n.trunc()
        }
    }

    /// ToLength, clamped to the array index space `[0, 2^32 - 1]`
    pub fn to_length(&self) -> u32 {
        let n = self.to_integer();
        if n <= 0.0 {
            0
        } else if n >= u32::MAX as f64 {
            u32::MAX
        } else {
            n as u32
        }
    }

    /// Convert to JavaScript string representation.
    ///
    /// Arrays render their elements without consulting proxies or user code;
    /// the array routines use their own fallible conversion instead.
    pub fn to_js_string(&self) -> String {
        self.to_js_string_at(0)
    }

    fn to_js_string_at(&self, depth: usize) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Boolean(true) => "true".to_string(),
            Value::Boolean(false) => "false".to_string(),
            Value::Number(n) => number_to_string(*n),
            Value::String(s) => s.clone(),
            Value::Object(obj) => {
                let Ok(obj) = obj.try_borrow() else {
                    return "[object Object]".to_string();
                };
                match &obj.kind {
                    ObjectKind::Array(storage) => {
                        if depth >= DISPLAY_DEPTH {
                            return "...".to_string();
                        }
                        let mut rendered = storage
                            .leading_slots(&obj.properties, DISPLAY_ELEMENTS)
                            .iter()
                            .map(|slot| match slot {
                                Some(v) if !v.is_nullish() => v.to_js_string_at(depth + 1),
                                _ => String::new(),
                            })
                            .collect::<Vec<_>>()
                            .join(",");
                        if storage.length() > DISPLAY_ELEMENTS {
                            rendered.push_str(",...");
                        }
                        rendered
                    }
                    ObjectKind::NativeFunction { name, .. } => {
                        format!("function {}() {{ [native code] }}", name)
                    }
                    ObjectKind::StringWrapper(s) => s.clone(),
                    ObjectKind::Primitive(inner) => inner.to_js_string(),
                    ObjectKind::ArrayIterator(_) => "[object Array Iterator]".to_string(),
                    _ => "[object Object]".to_string(),
                }
            }
        }
    }

    /// Short form used in error messages. Arrays are named, not enumerated.
    pub fn describe(&self) -> String {
        if let Value::Object(obj) = self {
            if let Ok(obj) = obj.try_borrow() {
                if matches!(obj.kind, ObjectKind::Array(_)) {
                    return "[object Array]".to_string();
                }
            }
        }
        self.to_js_string()
    }

    /// Strict equality (===)
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            // NaN never equals anything; +0 === -0
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// SameValueZero: like strict equality, but NaN equals NaN
    pub fn same_value_zero(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) if a.is_nan() && b.is_nan() => true,
            _ => self.strict_equals(other),
        }
    }

    /// Check whether the value can be called
    pub fn is_callable(&self) -> bool {
        match self {
            Value::Object(obj) => matches!(obj.borrow().kind, ObjectKind::NativeFunction { .. }),
            _ => false,
        }
    }

    /// Check whether the value can be used with `new`
    pub fn is_constructor(&self) -> bool {
        match self {
            Value::Object(obj) => {
                let obj = obj.borrow();
                matches!(obj.kind, ObjectKind::NativeFunction { .. })
                    && obj.flags.contains(ObjectFlags::CONSTRUCTOR)
            }
            _ => false,
        }
    }

    /// Call the value as a function.
    ///
    /// The callee is cloned out of the object before the call, so the callee may
    /// freely touch any object (itself included) while it runs.
    pub fn call(&self, this: &Value, args: &[Value]) -> Result<Value> {
        let func = match self {
            Value::Object(obj) => match &obj.borrow().kind {
                ObjectKind::NativeFunction { func, .. } => Some(Rc::clone(func)),
                _ => None,
            },
            _ => None,
        };
        match func {
            Some(func) => func(this, args),
            None => Err(Error::type_error(messages::not_a_function(&self.describe()))),
        }
    }

    /// Invoke the value as a constructor
    pub fn construct(&self, args: &[Value]) -> Result<Value> {
        if !self.is_constructor() {
            return Err(Error::type_error(messages::not_a_constructor(&self.describe())));
        }
        self.call(&Value::Undefined, args)
    }

    /// Create a new ordinary object value
    pub fn new_object() -> Value {
        Value::from_object(Object::new(ObjectKind::Ordinary))
    }

    /// Create a new object value with properties
    pub fn new_object_with_properties(properties: HashMap<String, Value>) -> Value {
        let mut object = Object::new(ObjectKind::Ordinary);
        object.properties = properties;
        Value::from_object(object)
    }

    /// Create a new hole-free array value
    pub fn new_array(elements: Vec<Value>) -> Value {
        Value::from_object(Object::new(ObjectKind::Array(ArrayStorage::Dense(
            DenseArray::from_values(elements),
        ))))
    }

    /// Create a new dense array value; `None` slots are holes
    pub fn new_array_with_holes(slots: Vec<Option<Value>>) -> Value {
        Value::from_object(Object::new(ObjectKind::Array(ArrayStorage::Dense(
            DenseArray::from_slots(slots),
        ))))
    }

    /// Create a new sparse (property-map backed) array value
    pub fn new_sparse_array(length: u32, elements: Vec<(u32, Value)>) -> Value {
        let mut object = Object::new(ObjectKind::Array(ArrayStorage::Sparse { length }));
        for (index, value) in elements {
            if index < length {
                object.properties.insert(index.to_string(), value);
            }
        }
        Value::from_object(object)
    }

    /// Create a new native function value
    pub fn new_native_function<F>(name: &str, func: F) -> Value
    where
        F: Fn(&Value, &[Value]) -> Result<Value> + 'static,
    {
        Value::from_object(Object::new(ObjectKind::NativeFunction {
            name: name.to_string(),
            func: Rc::new(func),
        }))
    }

    /// Create a new native function that may also be used as a constructor
    pub fn new_constructor<F>(name: &str, func: F) -> Value
    where
        F: Fn(&Value, &[Value]) -> Result<Value> + 'static,
    {
        let value = Value::new_native_function(name, func);
        if let Value::Object(obj) = &value {
            obj.borrow_mut().flags.insert(ObjectFlags::CONSTRUCTOR);
        }
        value
    }

    /// Create a new proxy wrapping `target`, with traps taken from `handler`
    pub fn new_proxy(target: &Value, handler: &Value) -> Result<Value> {
        match (target, handler) {
            (Value::Object(target), Value::Object(handler)) => {
                Ok(Value::from_object(Object::new(ObjectKind::Proxy {
                    target: Rc::clone(target),
                    handler: Rc::clone(handler),
                })))
            }
            _ => Err(Error::type_error(
                "Cannot create proxy with a non-object as target or handler",
            )),
        }
    }

    /// Wrap an object into a value
    pub fn from_object(object: Object) -> Value {
        Value::Object(Rc::new(RefCell::new(object)))
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

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.strict_equals(other)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_value(self, f, 0)
    }
}

fn fmt_value(value: &Value, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    match value {
        Value::Undefined => write!(f, "undefined"),
        Value::Null => write!(f, "null"),
        Value::Boolean(b) => write!(f, "{}", b),
        Value::Number(n) => write!(f, "{}", number_to_string(*n)),
        Value::String(s) => write!(f, "\"{}\"", s),
        Value::Object(obj) => {
            let Ok(obj) = obj.try_borrow() else {
                return write!(f, "[object (borrowed)]");
            };
            match &obj.kind {
                ObjectKind::Ordinary => write!(f, "{{...}}"),
                ObjectKind::Array(storage) => {
                    if depth >= DISPLAY_DEPTH {
                        return write!(f, "[...]");
                    }
                    write!(f, "[")?;
                    let slots = storage.leading_slots(&obj.properties, DISPLAY_ELEMENTS);
                    for (i, slot) in slots.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        match slot {
                            Some(v) => fmt_value(v, f, depth + 1)?,
                            None => write!(f, "<hole>")?,
                        }
                    }
                    let hidden = storage.length() - slots.len() as u32;
                    if hidden > 0 {
                        write!(f, ", ... {} more", hidden)?;
                    }
                    write!(f, "]")
                }
                ObjectKind::NativeFunction { name, .. } => write!(f, "[Native: {}]", name),
                ObjectKind::Proxy { .. } => write!(f, "[Proxy]"),
                ObjectKind::StringWrapper(s) => write!(f, "[String: \"{}\"]", s),
                ObjectKind::Primitive(inner) => write!(f, "[Primitive: {:?}]", inner),
                ObjectKind::ArrayIterator(_) => write!(f, "[Array Iterator]"),
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_js_string())
    }
}

bitflags! {
    /// Per-object flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ObjectFlags: u8 {
        /// New properties may be added
        const EXTENSIBLE = 1 << 0;
        /// The object is a function usable with `new`
        const CONSTRUCTOR = 1 << 1;
    }
}

/// JavaScript object
pub struct Object {
    /// Object kind
    pub kind: ObjectKind,
    /// Own properties (array indices of sparse arrays live here too)
    pub properties: HashMap<String, Value>,
    /// Object flags
    pub flags: ObjectFlags,
}

impl Object {
    /// Create a new extensible object of the given kind
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            kind,
            properties: HashMap::default(),
            flags: ObjectFlags::EXTENSIBLE,
        }
    }

    /// Whether new properties may be added
    pub fn is_extensible(&self) -> bool {
        self.flags.contains(ObjectFlags::EXTENSIBLE)
    }

    /// Array storage, if this is an array object
    pub fn array_storage(&self) -> Option<&ArrayStorage> {
        match &self.kind {
            ObjectKind::Array(storage) => Some(storage),
            _ => None,
        }
    }

    /// Mutable array storage, if this is an array object
    pub fn array_storage_mut(&mut self) -> Option<&mut ArrayStorage> {
        match &mut self.kind {
            ObjectKind::Array(storage) => Some(storage),
            _ => None,
        }
    }
}

impl Default for Object {
    fn default() -> Self {
        Self::new(ObjectKind::Ordinary)
    }
}

/// Object kinds
pub enum ObjectKind {
    /// Ordinary object
    Ordinary,
    /// Array object, dense or sparse
    Array(ArrayStorage),
    /// Native function
    NativeFunction { name: String, func: NativeFn },
    /// Proxy object with handler traps
    Proxy { target: ObjectRef, handler: ObjectRef },
    /// Boxed string (`ToObject` of a string primitive)
    StringWrapper(String),
    /// Boxed number or boolean
    Primitive(Value),
    /// Iterator returned by `keys`, `values` and `entries`
    ArrayIterator(ArrayIterator),
}

/// Convert a number to its JavaScript string form
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if n == 0.0 {
        "0".to_string()
    } else {
        let mut buffer = ryu_js::Buffer::new();
        buffer.format_finite(n).to_string()
    }
}

/// StringToNumber: whitespace-trimmed decimal, `Infinity`, or `0x`/`0o`/`0b` literals
pub fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let radix = match trimmed.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &trimmed[2..];
        if digits.is_empty() {
            return f64::NAN;
        }
        let mut result = 0.0;
        for c in digits.chars() {
            match c.to_digit(radix) {
                Some(d) => result = result * radix as f64 + d as f64,
                None => return f64::NAN,
            }
        }
        return result;
    }

    let unsigned = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
    if unsigned == "Infinity" {
        return if trimmed.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }
    // Rust's float parser also accepts "inf" and "nan", which JavaScript does not
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return f64::NAN;
    }
    trimmed.parse().unwrap_or(f64::NAN)
}
