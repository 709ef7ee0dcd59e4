//! Array iterators returned by `keys`, `values` and `entries`

use crate::error::{Error, Result};
use crate::runtime::protocol::IndexedObject;
use crate::runtime::value::{Object, ObjectKind, ObjectRef, Value};
use rustc_hash::FxHashMap as HashMap;

/// What each step of an [`ArrayIterator`] yields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationKind {
    /// The index
    Keys,
    /// The element
    Values,
    /// An `[index, element]` pair
    Entries,
}

/// Iterator state kept inside an iterator object
pub struct ArrayIterator {
    /// `None` once the iterator is exhausted
    iterated: Option<ObjectRef>,
    next_index: u32,
    kind: IterationKind,
}

impl ArrayIterator {
    /// Iterate `iterated` from index 0
    pub fn new(iterated: ObjectRef, kind: IterationKind) -> Self {
        Self {
            iterated: Some(iterated),
            next_index: 0,
            kind,
        }
    }

    /// What this iterator yields
    pub fn kind(&self) -> IterationKind {
        self.kind
    }

    /// Whether the iterator has run past the end of its object
    pub fn is_exhausted(&self) -> bool {
        self.iterated.is_none()
    }
}

/// Wrap a fresh iterator over `obj` in an object value
pub(crate) fn create(obj: &ObjectRef, kind: IterationKind) -> Value {
    Value::from_object(Object::new(ObjectKind::ArrayIterator(ArrayIterator::new(
        ObjectRef::clone(obj),
        kind,
    ))))
}

fn result_object(value: Value, done: bool) -> Value {
    let mut properties = HashMap::default();
    properties.insert("value".to_string(), value);
    properties.insert("done".to_string(), Value::Boolean(done));
    Value::new_object_with_properties(properties)
}

/// `%ArrayIteratorPrototype%.next`
///
/// The length is read again on every step, so elements pushed while iterating
/// are visited and a shrinking array ends the iteration early.
pub(crate) fn next(iterator: &Value) -> Result<Value> {
    let Some(iter_obj) = iterator.as_object() else {
        return Err(Error::type_error("next method called on incompatible receiver"));
    };
    let (iterated, index, kind) = match &iter_obj.borrow().kind {
        ObjectKind::ArrayIterator(it) => (it.iterated.clone(), it.next_index, it.kind),
        _ => return Err(Error::type_error("next method called on incompatible receiver")),
    };

    let Some(iterated) = iterated else {
        return Ok(result_object(Value::Undefined, true));
    };
    let len = iterated.get_length()?;

    let mut iter_ref = iter_obj.borrow_mut();
    let ObjectKind::ArrayIterator(state) = &mut iter_ref.kind else {
        return Err(Error::Internal("iterator changed kind".to_string()));
    };
    if index >= len {
        state.iterated = None;
        return Ok(result_object(Value::Undefined, true));
    }
    state.next_index = index + 1;
    drop(iter_ref);

    let key = Value::Number(index as f64);
    let value = match kind {
        IterationKind::Keys => key,
        IterationKind::Values => iterated.get_by_index(index)?,
        IterationKind::Entries => Value::new_array(vec![key, iterated.get_by_index(index)?]),
    };
    Ok(result_object(value, false))
}
