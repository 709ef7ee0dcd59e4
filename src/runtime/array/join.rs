//! `join`, `toString` and `toLocaleString`

use super::helpers::JoinCycleGuard;
use crate::error::{messages, Error, Result};
use crate::runtime::protocol::{is_array, IndexedObject};
use crate::runtime::value::{ObjectRef, Value};
use crate::runtime::ArrayEngine;
use std::rc::Rc;

impl ArrayEngine {
    /// `Array.prototype.join`
    pub(super) fn join(&self, o: &ObjectRef, len: u32, separator: &Value) -> Result<Value> {
        let separator = if separator.is_undefined() {
            ",".to_string()
        } else {
            self.to_string_value(separator)?
        };
        self.join_to_string(o, len, &separator).map(Value::String)
    }

    fn join_to_string(&self, o: &ObjectRef, len: u32, separator: &str) -> Result<String> {
        // A cyclic array contributes nothing the second time around
        let Some(_cycle) = JoinCycleGuard::enter(o) else {
            return Ok(String::new());
        };

        let mut result = String::new();
        for k in 0..len {
            if k > 0 {
                result.push_str(separator);
            }
            let element = self.get_element(o, k)?;
            if !element.is_nullish() {
                result.push_str(&self.to_string_value(&element)?);
            }
        }
        Ok(result)
    }

    /// `Array.prototype.toString`: an own callable `join` wins over the built-in one
    pub(super) fn to_string_object(&self, o: &ObjectRef) -> Result<Value> {
        let join = o.get_named("join")?;
        if join.is_callable() {
            return join.call(&Value::Object(Rc::clone(o)), &[]);
        }
        let len = o.get_length()?;
        self.join_to_string(o, len, ",").map(Value::String)
    }

    /// `Array.prototype.toLocaleString`
    pub(super) fn to_locale_string(&self, o: &ObjectRef, len: u32) -> Result<Value> {
        self.locale_join(o, len).map(Value::String)
    }

    fn locale_join(&self, o: &ObjectRef, len: u32) -> Result<String> {
        let Some(_cycle) = JoinCycleGuard::enter(o) else {
            return Ok(String::new());
        };

        let mut result = String::new();
        for k in 0..len {
            if k > 0 {
                result.push(',');
            }
            let element = self.get_element(o, k)?;
            if !element.is_nullish() {
                result.push_str(&self.locale_string_of(&element)?);
            }
        }
        Ok(result)
    }

    fn locale_string_of(&self, element: &Value) -> Result<String> {
        if let Value::Object(obj) = element {
            let method = obj.get_named("toLocaleString")?;
            if method.is_callable() {
                let converted = method.call(element, &[])?;
                return self.to_string_value(&converted);
            }
            if !method.is_undefined() {
                return Err(Error::type_error(messages::not_a_function("toLocaleString")));
            }
            if is_array(element) {
                let len = obj.get_length()?;
                return self.locale_join(obj, len);
            }
        }
        self.to_string_value(element)
    }
}
