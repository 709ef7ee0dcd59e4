//! `concat` and `slice`, the copying routines that build a fresh result array

use super::helpers::{arg, relative_end, relative_index};
use super::mutate::with_dense;
use crate::error::{messages, Error, Result};
use crate::runtime::guard::Access;
use crate::runtime::protocol::{is_concat_spreadable, IndexedObject};
use crate::runtime::value::{ObjectRef, Value};
use crate::runtime::ArrayEngine;
use std::rc::Rc;

impl ArrayEngine {
    /// Append the whole buffer of `source` to the fresh dense `target` when
    /// both allow it and `target` currently ends exactly at `at`
    fn append_dense(&self, target: &ObjectRef, at: u32, source: &ObjectRef, len: u32) -> bool {
        if Rc::ptr_eq(target, source) || !self.guard().is_fresh_target(target) {
            return false;
        }
        let Some(values) = self.dense_values(source, len, Access::Read) else {
            return false;
        };
        with_dense(target, |dense| {
            if dense.len() != at {
                return false;
            }
            dense.extend_dense(values);
            true
        })
        .unwrap_or(false)
    }

    /// `Array.prototype.concat`
    pub(super) fn concat(&self, o: &ObjectRef, args: &[Value]) -> Result<Value> {
        let result = self.species_create(o, 0)?;
        let mut n: u32 = 0;

        let items = std::iter::once(Value::Object(Rc::clone(o))).chain(args.iter().cloned());
        for item in items {
            if !is_concat_spreadable(&item)? {
                if n == u32::MAX {
                    return Err(Error::range_error(messages::INVALID_ARRAY_LENGTH));
                }
                result.put_by_index(n, item, true)?;
                n += 1;
                continue;
            }

            let Value::Object(element) = &item else {
                continue;
            };
            let len = element.get_length()?;
            let end = n
                .checked_add(len)
                .ok_or_else(|| Error::range_error(messages::INVALID_ARRAY_LENGTH))?;
            if self.append_dense(&result, n, element, len) {
                n = end;
                continue;
            }
            for k in 0..len {
                if let Some(value) = element.find_by_index(k)? {
                    result.put_by_index(n + k, value, true)?;
                }
            }
            n = end;
        }

        result.set_length(n)?;
        Ok(Value::Object(result))
    }

    /// `Array.prototype.slice`; absent source elements stay absent in the result
    pub(super) fn slice(&self, o: &ObjectRef, len: u32, args: &[Value]) -> Result<Value> {
        let start = relative_index(&arg(args, 0), len);
        let end = relative_end(&arg(args, 1), len);
        let count = end.saturating_sub(start);
        let result = self.species_create(o, count)?;

        if !Rc::ptr_eq(&result, o) && self.guard().is_fresh_target(&result) {
            if let Some(values) = self.dense_values(o, len, Access::Read) {
                let taken = values[start as usize..(start + count) as usize].to_vec();
                with_dense(&result, |dense| dense.set_values(taken));
                return Ok(Value::Object(result));
            }
        }

        for (n, k) in (start..start + count).enumerate() {
            if let Some(value) = o.find_by_index(k)? {
                result.put_by_index(n as u32, value, true)?;
            }
        }
        result.set_length(count)?;
        Ok(Value::Object(result))
    }
}
