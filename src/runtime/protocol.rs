//! Indexed property protocol
//!
//! The generic, observable way to touch an object's elements. Every routine
//! falls back to these operations whenever the dense fast path is not allowed.
//! Proxy traps run user code, so no `RefCell` borrow is ever held across a trap
//! invocation: each operation copies what it needs out of the object first.

use super::storage::parse_index;
use super::value::{ObjectKind, ObjectRef, Value};
use crate::error::{messages, Error, Result};
use std::rc::Rc;

/// Property key standing in for `Symbol.species`
pub const SPECIES_KEY: &str = "@@species";

/// Property key standing in for `Symbol.isConcatSpreadable`
pub const CONCAT_SPREADABLE_KEY: &str = "@@isConcatSpreadable";

/// A property key as seen by the protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKey<'a> {
    /// Array index, always below `u32::MAX`
    Index(u32),
    /// Any other property name
    Named(&'a str),
}

impl PropertyKey<'_> {
    fn to_key_string(self) -> String {
        match self {
            PropertyKey::Index(index) => index.to_string(),
            PropertyKey::Named(name) => name.to_string(),
        }
    }
}

/// Indexed property operations consumed by the array routines
pub trait IndexedObject {
    /// `[[Get]]` of an index; absent elements read as `undefined`
    fn get_by_index(&self, index: u32) -> Result<Value>;

    /// Existence-aware read: `None` when the index is absent
    fn find_by_index(&self, index: u32) -> Result<Option<Value>>;

    /// `[[Set]]` of an index. Returns `false` on failure when `throw` is off.
    fn put_by_index(&self, index: u32, value: Value, throw: bool) -> Result<bool>;

    /// `[[Delete]]` of an index. Returns `false` on failure when `throw` is off.
    fn delete_by_index(&self, index: u32, throw: bool) -> Result<bool>;

    /// `[[HasProperty]]` of an index
    fn has_property(&self, index: u32) -> Result<bool>;

    /// `ToLength(Get(O, "length"))`
    fn get_length(&self) -> Result<u32>;

    /// `Set(O, "length", length, true)`
    fn set_length(&self, length: u32) -> Result<()>;

    /// `[[IsExtensible]]`
    fn is_extensible(&self) -> Result<bool>;

    /// `[[PreventExtensions]]`
    fn prevent_extensions(&self) -> Result<bool>;

    /// `[[Get]]` of a named property
    fn get_named(&self, key: &str) -> Result<Value>;
}

impl IndexedObject for ObjectRef {
    fn get_by_index(&self, index: u32) -> Result<Value> {
        get(self, index_key(index))
    }

    fn find_by_index(&self, index: u32) -> Result<Option<Value>> {
        find(self, index_key(index))
    }

    fn put_by_index(&self, index: u32, value: Value, throw: bool) -> Result<bool> {
        set(self, index_key(index), value, throw)
    }

    fn delete_by_index(&self, index: u32, throw: bool) -> Result<bool> {
        delete(self, index_key(index), throw)
    }

    fn has_property(&self, index: u32) -> Result<bool> {
        has(self, index_key(index))
    }

    fn get_length(&self) -> Result<u32> {
        if let Some(storage) = self.borrow().array_storage() {
            return Ok(storage.length());
        }
        Ok(get(self, PropertyKey::Named("length"))?.to_length())
    }

    fn set_length(&self, length: u32) -> Result<()> {
        {
            let mut obj = self.borrow_mut();
            let obj = &mut *obj;
            if let ObjectKind::Array(storage) = &mut obj.kind {
                storage.set_length(&mut obj.properties, length);
                return Ok(());
            }
        }
        set(self, PropertyKey::Named("length"), Value::Number(length as f64), true).map(|_| ())
    }

    fn is_extensible(&self) -> Result<bool> {
        let proxy = proxy_parts(self);
        match proxy {
            Some((target, handler)) => match proxy_trap(&handler, "isExtensible")? {
                Some(trap) => Ok(trap
                    .call(&Value::Object(handler), &[Value::Object(target)])?
                    .to_boolean()),
                None => target.is_extensible(),
            },
            None => Ok(self.borrow().is_extensible()),
        }
    }

    fn prevent_extensions(&self) -> Result<bool> {
        let proxy = proxy_parts(self);
        match proxy {
            Some((target, handler)) => match proxy_trap(&handler, "preventExtensions")? {
                Some(trap) => Ok(trap
                    .call(&Value::Object(handler), &[Value::Object(target)])?
                    .to_boolean()),
                None => target.prevent_extensions(),
            },
            None => {
                self.borrow_mut()
                    .flags
                    .remove(super::value::ObjectFlags::EXTENSIBLE);
                Ok(true)
            }
        }
    }

    fn get_named(&self, key: &str) -> Result<Value> {
        get(self, named_key(key))
    }
}

/// Key for an index; `u32::MAX` is not an array index and stays a plain name
fn index_key(index: u32) -> PropertyKey<'static> {
    if index == u32::MAX {
        PropertyKey::Named("4294967295")
    } else {
        PropertyKey::Index(index)
    }
}

fn named_key(key: &str) -> PropertyKey<'_> {
    match parse_index(key) {
        Some(index) => PropertyKey::Index(index),
        None => PropertyKey::Named(key),
    }
}

fn proxy_parts(obj: &ObjectRef) -> Option<(ObjectRef, ObjectRef)> {
    match &obj.borrow().kind {
        ObjectKind::Proxy { target, handler } => Some((Rc::clone(target), Rc::clone(handler))),
        _ => None,
    }
}

/// Look up a trap on the handler; `None` means "forward to the target"
fn proxy_trap(handler: &ObjectRef, name: &str) -> Result<Option<Value>> {
    let trap = get(handler, PropertyKey::Named(name))?;
    if trap.is_nullish() {
        return Ok(None);
    }
    if !trap.is_callable() {
        return Err(Error::type_error(format!("proxy trap '{}' is not a function", name)));
    }
    Ok(Some(trap))
}

fn fail(throw: bool, message: String) -> Result<bool> {
    if throw {
        Err(Error::type_error(message))
    } else {
        Ok(false)
    }
}

/// UTF-16 code unit of a boxed string at `index`, as a one-unit string
fn string_unit(s: &str, index: u32) -> Option<Value> {
    s.encode_utf16()
        .nth(index as usize)
        .map(|unit| Value::String(String::from_utf16_lossy(&[unit])))
}

fn string_length(s: &str) -> u32 {
    s.encode_utf16().count() as u32
}

/// Own-property lookup for everything except proxies
enum OwnLookup {
    Found(Option<Value>),
    Proxy(ObjectRef, ObjectRef),
}

fn own_lookup(obj: &ObjectRef, key: PropertyKey<'_>) -> OwnLookup {
    let o = obj.borrow();
    let found = match (&o.kind, key) {
        (ObjectKind::Proxy { target, handler }, _) => {
            return OwnLookup::Proxy(Rc::clone(target), Rc::clone(handler));
        }
        (ObjectKind::Array(storage), PropertyKey::Index(index)) => {
            storage.get(&o.properties, index).cloned()
        }
        (ObjectKind::Array(storage), PropertyKey::Named("length")) => {
            Some(Value::Number(storage.length() as f64))
        }
        (ObjectKind::StringWrapper(s), PropertyKey::Index(index)) => {
            string_unit(s, index).or_else(|| o.properties.get(&index.to_string()).cloned())
        }
        (ObjectKind::StringWrapper(s), PropertyKey::Named("length")) => {
            Some(Value::Number(string_length(s) as f64))
        }
        (_, key) => o.properties.get(&key.to_key_string()).cloned(),
    };
    OwnLookup::Found(found)
}

/// `[[Get]]`
pub fn get(obj: &ObjectRef, key: PropertyKey<'_>) -> Result<Value> {
    match own_lookup(obj, key) {
        OwnLookup::Found(value) => Ok(value.unwrap_or(Value::Undefined)),
        OwnLookup::Proxy(target, handler) => match proxy_trap(&handler, "get")? {
            Some(trap) => trap.call(
                &Value::Object(handler),
                &[
                    Value::Object(target),
                    Value::String(key.to_key_string()),
                    Value::Object(Rc::clone(obj)),
                ],
            ),
            None => get(&target, key),
        },
    }
}

/// `[[HasProperty]]`
pub fn has(obj: &ObjectRef, key: PropertyKey<'_>) -> Result<bool> {
    match own_lookup(obj, key) {
        OwnLookup::Found(value) => Ok(value.is_some()),
        OwnLookup::Proxy(target, handler) => match proxy_trap(&handler, "has")? {
            Some(trap) => Ok(trap
                .call(
                    &Value::Object(handler),
                    &[Value::Object(target), Value::String(key.to_key_string())],
                )?
                .to_boolean()),
            None => has(&target, key),
        },
    }
}

/// Existence-aware `[[Get]]`: `HasProperty` then `Get` for proxies
pub fn find(obj: &ObjectRef, key: PropertyKey<'_>) -> Result<Option<Value>> {
    match own_lookup(obj, key) {
        OwnLookup::Found(value) => Ok(value),
        OwnLookup::Proxy(..) => {
            if has(obj, key)? {
                Ok(Some(get(obj, key)?))
            } else {
                Ok(None)
            }
        }
    }
}

/// `[[Set]]`
pub fn set(obj: &ObjectRef, key: PropertyKey<'_>, value: Value, throw: bool) -> Result<bool> {
    if let Some((target, handler)) = proxy_parts(obj) {
        return match proxy_trap(&handler, "set")? {
            Some(trap) => {
                let ok = trap
                    .call(
                        &Value::Object(handler),
                        &[
                            Value::Object(target),
                            Value::String(key.to_key_string()),
                            value,
                            Value::Object(Rc::clone(obj)),
                        ],
                    )?
                    .to_boolean();
                if ok {
                    Ok(true)
                } else {
                    fail(throw, messages::proxy_falsish("set", &key.to_key_string()))
                }
            }
            None => set(&target, key, value, throw),
        };
    }

    let mut o = obj.borrow_mut();
    let o = &mut *o;
    let extensible = o.is_extensible();
    match (&mut o.kind, key) {
        (ObjectKind::Array(storage), PropertyKey::Index(index)) => {
            if !extensible && storage.get(&o.properties, index).is_none() {
                return fail(throw, messages::not_extensible(&index.to_string()));
            }
            storage.put(&mut o.properties, index, value);
            Ok(true)
        }
        (ObjectKind::Array(storage), PropertyKey::Named("length")) => {
            let requested = value.to_number();
            let length = value.to_length();
            if requested != length as f64 {
                return Err(Error::range_error(messages::INVALID_ARRAY_LENGTH));
            }
            storage.set_length(&mut o.properties, length);
            Ok(true)
        }
        (ObjectKind::StringWrapper(s), PropertyKey::Index(index)) if index < string_length(s) => {
            fail(throw, messages::read_only(&index.to_string()))
        }
        (ObjectKind::StringWrapper(_), PropertyKey::Named("length")) => {
            fail(throw, messages::read_only("length"))
        }
        (_, key) => {
            let name = key.to_key_string();
            if let Some(slot) = o.properties.get_mut(&name) {
                *slot = value;
                return Ok(true);
            }
            if !extensible {
                return fail(throw, messages::not_extensible(&name));
            }
            o.properties.insert(name, value);
            Ok(true)
        }
    }
}

/// `[[Delete]]`
pub fn delete(obj: &ObjectRef, key: PropertyKey<'_>, throw: bool) -> Result<bool> {
    if let Some((target, handler)) = proxy_parts(obj) {
        return match proxy_trap(&handler, "deleteProperty")? {
            Some(trap) => {
                let ok = trap
                    .call(
                        &Value::Object(handler),
                        &[Value::Object(target), Value::String(key.to_key_string())],
                    )?
                    .to_boolean();
                if ok {
                    Ok(true)
                } else {
                    fail(throw, messages::proxy_falsish("deleteProperty", &key.to_key_string()))
                }
            }
            None => delete(&target, key, throw),
        };
    }

    let mut o = obj.borrow_mut();
    let o = &mut *o;
    match (&mut o.kind, key) {
        (ObjectKind::Array(storage), PropertyKey::Index(index)) => {
            storage.delete(&mut o.properties, index);
            Ok(true)
        }
        (ObjectKind::Array(_), PropertyKey::Named("length")) => {
            fail(throw, messages::cannot_delete("length"))
        }
        (ObjectKind::StringWrapper(s), PropertyKey::Index(index)) if index < string_length(s) => {
            fail(throw, messages::cannot_delete(&index.to_string()))
        }
        (ObjectKind::StringWrapper(_), PropertyKey::Named("length")) => {
            fail(throw, messages::cannot_delete("length"))
        }
        (_, key) => {
            o.properties.remove(&key.to_key_string());
            Ok(true)
        }
    }
}

/// `IsArray`, seeing through proxies
pub fn is_array(value: &Value) -> bool {
    let Value::Object(obj) = value else {
        return false;
    };
    match &obj.borrow().kind {
        ObjectKind::Array(_) => true,
        ObjectKind::Proxy { target, .. } => is_array(&Value::Object(Rc::clone(target))),
        _ => false,
    }
}

/// `IsConcatSpreadable`
pub fn is_concat_spreadable(value: &Value) -> Result<bool> {
    let Value::Object(obj) = value else {
        return Ok(false);
    };
    let spreadable = get(obj, PropertyKey::Named(CONCAT_SPREADABLE_KEY))?;
    if !spreadable.is_undefined() {
        return Ok(spreadable.to_boolean());
    }
    Ok(is_array(value))
}

/// `ToObject`: boxes primitives, rejects `undefined` and `null`
pub fn to_object(value: &Value) -> Result<ObjectRef> {
    let kind = match value {
        Value::Object(obj) => return Ok(Rc::clone(obj)),
        Value::Undefined | Value::Null => {
            return Err(Error::type_error(messages::CONVERT_NULLISH));
        }
        Value::String(s) => ObjectKind::StringWrapper(s.clone()),
        primitive => ObjectKind::Primitive(primitive.clone()),
    };
    match Value::from_object(super::value::Object::new(kind)) {
        Value::Object(obj) => Ok(obj),
        _ => Err(Error::Internal("ToObject produced a primitive".to_string())),
    }
}
