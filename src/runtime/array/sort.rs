//! `Array.prototype.sort`
//!
//! The present elements are snapshotted, sorted with a stable merge sort and
//! written back. `undefined` always sorts last and never reaches the
//! comparator; indices that were occupied but are past the sorted run are
//! deleted so absent elements end up after everything else.

use super::mutate::with_dense;
use crate::error::{messages, Error, Result};
use crate::runtime::guard::Access;
use crate::runtime::protocol::IndexedObject;
use crate::runtime::value::{ObjectRef, Value};
use crate::runtime::ArrayEngine;
use std::cmp::Ordering;
use std::rc::Rc;

/// Stable top-down merge sort with a fallible comparison.
/// The first comparison error aborts the sort and drops the partial result.
pub fn merge_sort<T, F>(mut items: Vec<T>, compare: &mut F) -> Result<Vec<T>>
where
    F: FnMut(&T, &T) -> Result<Ordering>,
{
    if items.len() <= 1 {
        return Ok(items);
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, compare)?;
    let right = merge_sort(right, compare)?;

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        // Ties take from the left run, which keeps the sort stable
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => compare(l, r)? == Ordering::Greater,
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        let next = if take_right { right.next() } else { left.next() };
        merged.extend(next);
    }
    Ok(merged)
}

impl ArrayEngine {
    /// `SortCompare` for two defined values
    fn sort_compare(&self, a: &Value, b: &Value, comparator: &Value) -> Result<Ordering> {
        if comparator.is_undefined() {
            let a = self.to_string_value(a)?;
            let b = self.to_string_value(b)?;
            return Ok(a.encode_utf16().cmp(b.encode_utf16()));
        }
        let v = comparator
            .call(&Value::Undefined, &[a.clone(), b.clone()])?
            .to_number();
        Ok(if v < 0.0 {
            Ordering::Less
        } else if v > 0.0 {
            Ordering::Greater
        } else {
            // NaN and zero alike
            Ordering::Equal
        })
    }

    /// Sort `values`, moving every `undefined` to the end
    fn sort_values(&self, values: Vec<Value>, comparator: &Value) -> Result<Vec<Value>> {
        let (defined, undefined): (Vec<Value>, Vec<Value>) =
            values.into_iter().partition(|v| !v.is_undefined());
        let mut sorted = merge_sort(defined, &mut |a: &Value, b: &Value| {
            self.sort_compare(a, b, comparator)
        })?;
        sorted.extend(undefined);
        Ok(sorted)
    }

    /// `Array.prototype.sort`
    pub(super) fn sort(&self, o: &ObjectRef, len: u32, comparator: &Value) -> Result<Value> {
        if !comparator.is_undefined() && !comparator.is_callable() {
            return Err(Error::type_error(messages::COMPARE_NOT_CALLABLE));
        }
        let this = Value::Object(Rc::clone(o));

        let (values, occupied) = match self.dense_values(o, len, Access::Write) {
            Some(values) => (values, None),
            None => {
                let mut values = Vec::new();
                let mut occupied = Vec::new();
                for k in 0..len {
                    if let Some(value) = o.find_by_index(k)? {
                        values.push(value);
                        occupied.push(k);
                    }
                }
                (values, Some(occupied))
            }
        };
        let count = values.len() as u32;
        let sorted = self.sort_values(values, comparator)?;

        // The comparator may have reshaped the array, so ask again
        if count == len && self.is_fast_with_len(o, len, Access::Write) {
            with_dense(o, |dense| dense.set_values(sorted));
            return Ok(this);
        }

        for (k, value) in sorted.into_iter().enumerate() {
            o.put_by_index(k as u32, value, true)?;
        }
        if let Some(occupied) = occupied {
            for k in occupied.into_iter().filter(|k| *k >= count) {
                o.delete_by_index(k, true)?;
            }
        }
        Ok(this)
    }
}
