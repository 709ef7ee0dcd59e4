//! Runtime environment for the array engine
//!
//! This module provides the value types, array storage, the indexed property
//! protocol and the engine that runs the `Array.prototype` routines.

pub mod array;
mod guard;
mod protocol;
mod storage;
mod value;

pub use array::iterator::{ArrayIterator, IterationKind};
pub use array::ArrayMethod;
pub use guard::{Access, EligibilityGuard};
pub use protocol::{
    is_array, is_concat_spreadable, to_object, IndexedObject, PropertyKey, CONCAT_SPREADABLE_KEY,
    SPECIES_KEY,
};
pub use storage::{ArrayStorage, DenseArray, DENSE_MAX_HOLES, DENSE_MAX_NEW_HOLES};
pub use value::{number_to_string, NativeFn, Object, ObjectFlags, ObjectKind, ObjectRef, Value};

use crate::config::EngineConfig;
use crate::error::{messages, Error, Result};

/// The indexed collection engine
///
/// Stateless apart from its configuration, so callbacks that need to re-enter
/// the engine can simply hold a clone of it.
#[derive(Debug, Clone)]
pub struct ArrayEngine {
    config: EngineConfig,
    guard: EligibilityGuard,
}

impl ArrayEngine {
    /// Create an engine with the given configuration
    pub fn new(config: EngineConfig) -> Self {
        let guard = EligibilityGuard::new(config.fast_paths);
        Self { config, guard }
    }

    /// The active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The fast path guard
    pub fn guard(&self) -> &EligibilityGuard {
        &self.guard
    }

    /// Call an array routine by its property name, e.g. `"push"`
    pub fn call(&self, name: &str, this: &Value, args: &[Value]) -> Result<Value> {
        let method = ArrayMethod::from_name(name).ok_or_else(|| {
            Error::type_error(messages::not_a_function(&format!("Array.prototype.{}", name)))
        })?;
        self.call_method(method, this, args)
    }

    /// Advance an iterator returned by `keys`, `values` or `entries`.
    /// Returns a `{ value, done }` result object.
    pub fn iterator_next(&self, iterator: &Value) -> Result<Value> {
        array::iterator::next(iterator)
    }
}

impl Default for ArrayEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Snapshot an array's slots, holes as `None`. Non-arrays yield `None`.
pub fn array_elements(value: &Value) -> Option<Vec<Option<Value>>> {
    let obj = value.as_object()?.borrow();
    obj.array_storage()
        .map(|storage| storage.snapshot(&obj.properties))
}
