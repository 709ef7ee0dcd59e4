//! Shared pieces of the array routines: argument normalization, element access
//! that prefers the dense buffer, species construction and string conversion.

use crate::error::{messages, Error, Result};
use crate::runtime::guard::Access;
use crate::runtime::protocol::{is_array, IndexedObject, SPECIES_KEY};
use crate::runtime::storage::ArrayStorage;
use crate::runtime::value::{Object, ObjectKind, ObjectRef, Value};
use crate::runtime::ArrayEngine;
use rustc_hash::FxHashSet;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

/// Argument `index`, `undefined` when missing
pub(super) fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or(Value::Undefined)
}

/// Index as a number value
pub(super) fn index_value(index: u32) -> Value {
    Value::Number(index as f64)
}

/// Relative index: negative counts from the end, result clamped to `[0, len]`
pub(super) fn relative_index(value: &Value, len: u32) -> u32 {
    let relative = value.to_integer();
    let len_f = len as f64;
    if relative < 0.0 {
        (len_f + relative).max(0.0) as u32
    } else {
        relative.min(len_f) as u32
    }
}

/// Like [`relative_index`], but `undefined` means `len`
pub(super) fn relative_end(value: &Value, len: u32) -> u32 {
    if value.is_undefined() {
        len
    } else {
        relative_index(value, len)
    }
}

/// Raise a TypeError unless `value` is callable
pub(super) fn require_callable(value: &Value, message: &str) -> Result<()> {
    if value.is_callable() {
        Ok(())
    } else {
        Err(Error::type_error(message))
    }
}

/// Raise a RangeError when `len + added` is not a valid array length
pub(super) fn checked_length(len: u32, added: usize) -> Result<u32> {
    u32::try_from(len as u64 + added as u64)
        .map_err(|_| Error::range_error(messages::INVALID_ARRAY_LENGTH))
}

thread_local! {
    /// Arrays currently being joined, by address
    static JOIN_STACK: RefCell<FxHashSet<usize>> = RefCell::new(FxHashSet::default());
}

/// Marks an object as being joined for as long as it is alive
pub(super) struct JoinCycleGuard {
    key: usize,
}

impl JoinCycleGuard {
    /// `None` when `obj` is already being joined further up the stack
    pub(super) fn enter(obj: &ObjectRef) -> Option<Self> {
        let key = Rc::as_ptr(obj) as *const () as usize;
        JOIN_STACK
            .with(|stack| stack.borrow_mut().insert(key))
            .then_some(Self { key })
    }
}

impl Drop for JoinCycleGuard {
    fn drop(&mut self) {
        JOIN_STACK.with(|stack| {
            stack.borrow_mut().remove(&self.key);
        });
    }
}

impl ArrayEngine {
    /// A plain array of `length` holes
    pub(super) fn new_array_object(&self, length: u32) -> ObjectRef {
        let storage = ArrayStorage::with_length(length, self.config().dense_prealloc_limit);
        Rc::new(RefCell::new(Object::new(ObjectKind::Array(storage))))
    }

    /// `ArraySpeciesCreate(original, length)`
    pub(super) fn species_create(&self, original: &ObjectRef, length: u32) -> Result<ObjectRef> {
        if !is_array(&Value::Object(Rc::clone(original))) {
            return Ok(self.new_array_object(length));
        }
        let mut constructor = original.get_named("constructor")?;
        if let Value::Object(ctor) = &constructor {
            constructor = ctor.get_named(SPECIES_KEY)?;
            if constructor.is_null() {
                constructor = Value::Undefined;
            }
        } else if !constructor.is_undefined() {
            return Err(Error::type_error(messages::CONSTRUCTOR_NOT_OBJECT));
        }
        if constructor.is_undefined() {
            return Ok(self.new_array_object(length));
        }
        if !constructor.is_constructor() {
            return Err(Error::type_error(messages::not_a_constructor(&constructor.describe())));
        }

        debug!(length, "invoking species constructor");
        match constructor.construct(&[index_value(length)])? {
            Value::Object(result) => Ok(result),
            _ => Err(Error::type_error(messages::SPECIES_NOT_OBJECT)),
        }
    }

    /// Existence-aware element read. Dense arrays are read straight from the
    /// buffer, everything else goes through `find_by_index`.
    pub(super) fn read_element(&self, obj: &ObjectRef, index: u32) -> Result<Option<Value>> {
        if self.guard().enabled() {
            if let Some(storage) = obj.borrow().array_storage() {
                if let Some(dense) = storage.as_dense() {
                    return Ok(dense.get(index).cloned());
                }
            }
        }
        obj.find_by_index(index)
    }

    /// `Get` of an element; absent elements read as `undefined`
    pub(super) fn get_element(&self, obj: &ObjectRef, index: u32) -> Result<Value> {
        if self.guard().enabled() {
            if let Some(storage) = obj.borrow().array_storage() {
                if let Some(dense) = storage.as_dense() {
                    return Ok(dense.get(index).cloned().unwrap_or(Value::Undefined));
                }
            }
        }
        obj.get_by_index(index)
    }

    /// `CreateDataPropertyOrThrow` on a result array. A fresh dense target is
    /// written in place when the slot already exists.
    pub(super) fn define_element(
        &self,
        target: &ObjectRef,
        index: u32,
        value: Value,
    ) -> Result<()> {
        if self.guard().is_fresh_target(target) {
            let mut obj = target.borrow_mut();
            if let Some(dense) = obj.array_storage_mut().and_then(|s| s.as_dense_mut()) {
                if index < dense.len() {
                    dense.replace(index, value);
                    return Ok(());
                }
            }
        }
        target.put_by_index(index, value, true).map(|_| ())
    }

    /// Clone the whole element buffer when the fast path applies and the
    /// buffer still has exactly `len` slots
    pub(super) fn dense_values(
        &self,
        obj: &ObjectRef,
        len: u32,
        access: Access,
    ) -> Option<Vec<Value>> {
        if self.guard().fast_length(obj, access)? != len {
            return None;
        }
        obj.borrow()
            .array_storage()
            .and_then(ArrayStorage::as_dense)
            .and_then(|dense| dense.to_values())
    }

    /// Whether `obj` may be mutated through its buffer right now
    pub(super) fn is_fast_with_len(&self, obj: &ObjectRef, len: u32, access: Access) -> bool {
        self.guard().fast_length(obj, access) == Some(len)
    }

    /// ToString as used by `join`, `sort` and `toLocaleString`.
    /// Arrays (and array proxies) are joined through their `toString`.
    pub(super) fn to_string_value(&self, value: &Value) -> Result<String> {
        match value {
            Value::Object(obj) if is_array(value) => match self.to_string_object(obj)? {
                Value::Object(_) => {
                    Err(Error::type_error("Cannot convert object to primitive value"))
                }
                primitive => Ok(primitive.to_js_string()),
            },
            other => Ok(other.to_js_string()),
        }
    }
}
