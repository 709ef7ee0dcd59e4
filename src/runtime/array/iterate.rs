//! Callback-driven routines
//!
//! The callback may reshape the array it is iterating, so every element is read
//! afresh and no buffer reference outlives a single read.

use super::helpers::{arg, index_value, require_callable};
use crate::error::{messages, Error, Result};
use crate::runtime::value::{ObjectRef, Value};
use crate::runtime::ArrayEngine;
use std::rc::Rc;

/// Which of the three predicate routines is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum PredicateMode {
    Every,
    Some,
    ForEach,
}

/// Result of `find` or `findIndex`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum FindResult {
    Element,
    Index,
}

impl ArrayEngine {
    /// `every`, `some` and `forEach`
    pub(super) fn apply_predicate(
        &self,
        o: &ObjectRef,
        len: u32,
        args: &[Value],
        mode: PredicateMode,
    ) -> Result<Value> {
        let callback = arg(args, 0);
        require_callable(&callback, messages::CALLBACK_NOT_CALLABLE)?;
        let this_arg = arg(args, 1);
        let this_obj = Value::Object(Rc::clone(o));

        for k in 0..len {
            let Some(value) = self.read_element(o, k)? else {
                continue;
            };
            let result = callback
                .call(&this_arg, &[value, index_value(k), this_obj.clone()])?
                .to_boolean();
            match mode {
                PredicateMode::Every if !result => return Ok(Value::Boolean(false)),
                PredicateMode::Some if result => return Ok(Value::Boolean(true)),
                _ => {}
            }
        }

        Ok(match mode {
            PredicateMode::Every => Value::Boolean(true),
            PredicateMode::Some => Value::Boolean(false),
            PredicateMode::ForEach => Value::Undefined,
        })
    }

    /// `Array.prototype.map`
    pub(super) fn map(&self, o: &ObjectRef, len: u32, args: &[Value]) -> Result<Value> {
        let callback = arg(args, 0);
        require_callable(&callback, messages::CALLBACK_NOT_CALLABLE)?;
        let this_arg = arg(args, 1);
        let this_obj = Value::Object(Rc::clone(o));
        let result = self.species_create(o, len)?;

        for k in 0..len {
            let Some(value) = self.read_element(o, k)? else {
                continue;
            };
            let mapped = callback.call(&this_arg, &[value, index_value(k), this_obj.clone()])?;
            self.define_element(&result, k, mapped)?;
        }
        Ok(Value::Object(result))
    }

    /// `Array.prototype.filter`
    pub(super) fn filter(&self, o: &ObjectRef, len: u32, args: &[Value]) -> Result<Value> {
        let callback = arg(args, 0);
        require_callable(&callback, messages::CALLBACK_NOT_CALLABLE)?;
        let this_arg = arg(args, 1);
        let this_obj = Value::Object(Rc::clone(o));
        let result = self.species_create(o, 0)?;

        let mut to = 0;
        for k in 0..len {
            let Some(value) = self.read_element(o, k)? else {
                continue;
            };
            let selected = callback
                .call(&this_arg, &[value.clone(), index_value(k), this_obj.clone()])?
                .to_boolean();
            if selected {
                self.define_element(&result, to, value)?;
                to += 1;
            }
        }
        Ok(Value::Object(result))
    }

    /// `reduce` and `reduceRight`
    pub(super) fn reduce(
        &self,
        o: &ObjectRef,
        len: u32,
        args: &[Value],
        from_right: bool,
    ) -> Result<Value> {
        let callback = arg(args, 0);
        require_callable(&callback, messages::CALLBACK_NOT_CALLABLE)?;
        if len == 0 && args.len() < 2 {
            return Err(Error::type_error(messages::REDUCE_EMPTY));
        }
        let this_obj = Value::Object(Rc::clone(o));

        let mut indices: Box<dyn Iterator<Item = u32>> = if from_right {
            Box::new((0..len).rev())
        } else {
            Box::new(0..len)
        };

        let mut accumulator = match args.get(1) {
            Some(initial) => initial.clone(),
            None => loop {
                let Some(k) = indices.next() else {
                    return Err(Error::type_error(messages::REDUCE_EMPTY));
                };
                if let Some(value) = self.read_element(o, k)? {
                    break value;
                }
            },
        };

        for k in indices {
            let Some(value) = self.read_element(o, k)? else {
                continue;
            };
            accumulator = callback.call(
                &Value::Undefined,
                &[accumulator, value, index_value(k), this_obj.clone()],
            )?;
        }
        Ok(accumulator)
    }

    /// `find` and `findIndex`; holes are visited as `undefined`
    pub(super) fn find(
        &self,
        o: &ObjectRef,
        len: u32,
        args: &[Value],
        want: FindResult,
    ) -> Result<Value> {
        let predicate = arg(args, 0);
        require_callable(&predicate, messages::CALLBACK_NOT_CALLABLE)?;
        let this_arg = arg(args, 1);
        let this_obj = Value::Object(Rc::clone(o));

        for k in 0..len {
            let value = self.get_element(o, k)?;
            let hit = predicate
                .call(&this_arg, &[value.clone(), index_value(k), this_obj.clone()])?
                .to_boolean();
            if hit {
                return Ok(match want {
                    FindResult::Element => value,
                    FindResult::Index => index_value(k),
                });
            }
        }
        Ok(match want {
            FindResult::Element => Value::Undefined,
            FindResult::Index => Value::Number(-1.0),
        })
    }
}
