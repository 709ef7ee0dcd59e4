//! `indexOf`, `lastIndexOf` and `includes`

use super::helpers::arg;
use crate::error::Result;
use crate::runtime::guard::Access;
use crate::runtime::protocol::IndexedObject;
use crate::runtime::value::{ObjectRef, Value};
use crate::runtime::ArrayEngine;

/// Forward start position from a `fromIndex` argument, `None` when past the end
fn forward_start(from_index: &Value, len: u32) -> Option<u32> {
    let n = from_index.to_integer();
    if n >= len as f64 {
        return None;
    }
    if n >= 0.0 {
        Some(n as u32)
    } else {
        Some((len as f64 + n).max(0.0) as u32)
    }
}

impl ArrayEngine {
    /// Scan the hole-free buffer of `o` for the first index in `range` whose
    /// element satisfies `matches`. `None` when the fast path does not apply.
    fn scan_dense<I>(
        &self,
        o: &ObjectRef,
        len: u32,
        range: I,
        matches: impl Fn(&Value) -> bool,
    ) -> Option<Option<u32>>
    where
        I: Iterator<Item = u32>,
    {
        if !self.is_fast_with_len(o, len, Access::Read) {
            return None;
        }
        let obj = o.borrow();
        let dense = obj.array_storage()?.as_dense()?;
        let slots = dense.slots();
        let limit = slots.len().min(len as usize);
        let mut range = range.filter(|k| (*k as usize) < limit);
        let found = range.find(|k| slots[*k as usize].as_ref().is_some_and(&matches));
        Some(found)
    }

    /// `Array.prototype.indexOf`
    pub(super) fn index_of(&self, o: &ObjectRef, len: u32, args: &[Value]) -> Result<Value> {
        let search = arg(args, 0);
        let Some(start) = (len > 0).then(|| forward_start(&arg(args, 1), len)).flatten() else {
            return Ok(Value::Number(-1.0));
        };

        let found = match self.scan_dense(o, len, start..len, |v| v.strict_equals(&search)) {
            Some(found) => found,
            None => {
                let mut found = None;
                for k in start..len {
                    if let Some(element) = o.find_by_index(k)? {
                        if element.strict_equals(&search) {
                            found = Some(k);
                            break;
                        }
                    }
                }
                found
            }
        };
        Ok(found.map_or(Value::Number(-1.0), |k| Value::Number(k as f64)))
    }

    /// `Array.prototype.lastIndexOf`
    pub(super) fn last_index_of(&self, o: &ObjectRef, len: u32, args: &[Value]) -> Result<Value> {
        if len == 0 {
            return Ok(Value::Number(-1.0));
        }
        let search = arg(args, 0);
        let n = if args.len() > 1 {
            args[1].to_integer()
        } else {
            len as f64 - 1.0
        };
        let start = if n >= 0.0 {
            n.min(len as f64 - 1.0)
        } else {
            len as f64 + n
        };
        if start < 0.0 {
            return Ok(Value::Number(-1.0));
        }
        let start = start as u32;

        let found = match self.scan_dense(o, len, (0..=start).rev(), |v| v.strict_equals(&search)) {
            Some(found) => found,
            None => {
                let mut found = None;
                for k in (0..=start).rev() {
                    if let Some(element) = o.find_by_index(k)? {
                        if element.strict_equals(&search) {
                            found = Some(k);
                            break;
                        }
                    }
                }
                found
            }
        };
        Ok(found.map_or(Value::Number(-1.0), |k| Value::Number(k as f64)))
    }

    /// `Array.prototype.includes`: SameValueZero, absent elements read as `undefined`
    pub(super) fn includes(&self, o: &ObjectRef, len: u32, args: &[Value]) -> Result<Value> {
        let search = arg(args, 0);
        let Some(start) = (len > 0).then(|| forward_start(&arg(args, 1), len)).flatten() else {
            return Ok(Value::Boolean(false));
        };

        if let Some(found) = self.scan_dense(o, len, start..len, |v| v.same_value_zero(&search)) {
            return Ok(Value::Boolean(found.is_some()));
        }
        for k in start..len {
            if o.get_by_index(k)?.same_value_zero(&search) {
                return Ok(Value::Boolean(true));
            }
        }
        Ok(Value::Boolean(false))
    }
}
