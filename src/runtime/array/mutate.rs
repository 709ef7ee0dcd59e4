//! Routines that mutate `this` in place

use super::helpers::{arg, checked_length, index_value, relative_end, relative_index};
use crate::error::Result;
use crate::runtime::guard::Access;
use crate::runtime::protocol::IndexedObject;
use crate::runtime::storage::DenseArray;
use crate::runtime::value::{ObjectRef, Value};
use crate::runtime::ArrayEngine;
use std::rc::Rc;

/// Run `f` on the dense buffer of `o`; callers check eligibility first
pub(super) fn with_dense<R>(o: &ObjectRef, f: impl FnOnce(&mut DenseArray) -> R) -> Option<R> {
    let mut obj = o.borrow_mut();
    obj.array_storage_mut()
        .and_then(|storage| storage.as_dense_mut())
        .map(f)
}

/// Move element `from` to `to`, deleting `to` when `from` is absent
pub(super) fn move_element(o: &ObjectRef, from: u32, to: u32) -> Result<()> {
    match o.find_by_index(from)? {
        Some(value) => o.put_by_index(to, value, true)?,
        None => o.delete_by_index(to, true)?,
    };
    Ok(())
}

impl ArrayEngine {
    /// `Array.prototype.pop`
    pub(super) fn pop(&self, o: &ObjectRef, len: u32) -> Result<Value> {
        if len > 0 && self.is_fast_with_len(o, len, Access::Write) {
            if let Some(slot) = with_dense(o, DenseArray::pop) {
                return Ok(slot.flatten().unwrap_or(Value::Undefined));
            }
        }

        if len == 0 {
            o.set_length(0)?;
            return Ok(Value::Undefined);
        }
        let index = len - 1;
        let element = o.get_by_index(index)?;
        o.delete_by_index(index, true)?;
        o.set_length(index)?;
        Ok(element)
    }

    /// `Array.prototype.push`
    pub(super) fn push(&self, o: &ObjectRef, len: u32, items: &[Value]) -> Result<Value> {
        let new_len = checked_length(len, items.len())?;
        if self.is_fast_with_len(o, len, Access::Write)
            && with_dense(o, |dense| dense.extend_dense(items.iter().cloned())).is_some()
        {
            return Ok(index_value(new_len));
        }

        for (i, item) in items.iter().enumerate() {
            o.put_by_index(len + i as u32, item.clone(), true)?;
        }
        o.set_length(new_len)?;
        Ok(index_value(new_len))
    }

    /// `Array.prototype.reverse`
    pub(super) fn reverse(&self, o: &ObjectRef, len: u32) -> Result<Value> {
        let this = Value::Object(Rc::clone(o));
        if self.is_fast_with_len(o, len, Access::Write)
            && with_dense(o, |dense| dense.reverse_prefix(len)).is_some()
        {
            return Ok(this);
        }

        let middle = len / 2;
        for lower in 0..middle {
            let upper = len - lower - 1;
            let lower_value = o.find_by_index(lower)?;
            let upper_value = o.find_by_index(upper)?;
            match (lower_value, upper_value) {
                (Some(lower_value), Some(upper_value)) => {
                    o.put_by_index(lower, upper_value, true)?;
                    o.put_by_index(upper, lower_value, true)?;
                }
                (None, Some(upper_value)) => {
                    o.put_by_index(lower, upper_value, true)?;
                    o.delete_by_index(upper, true)?;
                }
                (Some(lower_value), None) => {
                    o.delete_by_index(lower, true)?;
                    o.put_by_index(upper, lower_value, true)?;
                }
                (None, None) => {}
            }
        }
        Ok(this)
    }

    /// `Array.prototype.shift`
    pub(super) fn shift(&self, o: &ObjectRef, len: u32) -> Result<Value> {
        if len > 0 && self.is_fast_with_len(o, len, Access::Write) {
            if let Some(slot) = with_dense(o, DenseArray::shift) {
                return Ok(slot.flatten().unwrap_or(Value::Undefined));
            }
        }

        if len == 0 {
            o.set_length(0)?;
            return Ok(Value::Undefined);
        }
        let first = o.get_by_index(0)?;
        for k in 1..len {
            move_element(o, k, k - 1)?;
        }
        o.delete_by_index(len - 1, true)?;
        o.set_length(len - 1)?;
        Ok(first)
    }

    /// `Array.prototype.unshift`
    pub(super) fn unshift(&self, o: &ObjectRef, len: u32, items: &[Value]) -> Result<Value> {
        let count = items.len() as u32;
        let new_len = checked_length(len, items.len())?;
        if count > 0
            && self.is_fast_with_len(o, len, Access::Write)
            && with_dense(o, |dense| dense.splice_slots(0, 0, items.iter().cloned())).is_some()
        {
            return Ok(index_value(new_len));
        }

        if count > 0 {
            // High to low so nothing is overwritten before it is read
            for k in (0..len).rev() {
                move_element(o, k, k + count)?;
            }
            for (j, item) in items.iter().enumerate() {
                o.put_by_index(j as u32, item.clone(), true)?;
            }
        }
        o.set_length(new_len)?;
        Ok(index_value(new_len))
    }

    /// `Array.prototype.splice`
    pub(super) fn splice(&self, o: &ObjectRef, len: u32, args: &[Value]) -> Result<Value> {
        let start = relative_index(&arg(args, 0), len);
        let delete_count = match args.len() {
            0 => 0,
            1 => len - start,
            _ => {
                let requested = args[1].to_integer().max(0.0);
                requested.min((len - start) as f64) as u32
            }
        };
        let items = args.get(2..).unwrap_or(&[]);
        let item_count = items.len() as u32;
        let new_len = checked_length(len - delete_count, items.len())?;

        let removed = self.species_create(o, delete_count)?;

        if !Rc::ptr_eq(&removed, o)
            && self.guard().is_fresh_target(&removed)
            && self.is_fast_with_len(o, len, Access::Write)
        {
            let slots = with_dense(o, |dense| {
                dense.splice_slots(start, delete_count, items.iter().cloned())
            });
            if let Some(slots) = slots {
                let values: Vec<Value> = slots.into_iter().flatten().collect();
                with_dense(&removed, |dense| dense.set_values(values));
                return Ok(Value::Object(removed));
            }
        }

        for k in 0..delete_count {
            if let Some(value) = o.find_by_index(start + k)? {
                removed.put_by_index(k, value, true)?;
            }
        }
        removed.set_length(delete_count)?;

        if item_count < delete_count {
            // Shrinking: close the gap left to right
            for k in start..(len - delete_count) {
                move_element(o, k + delete_count, k + item_count)?;
            }
            for k in (new_len..len).rev() {
                o.delete_by_index(k, true)?;
            }
        } else if item_count > delete_count {
            // Growing: open the gap right to left
            for k in (start..(len - delete_count)).rev() {
                move_element(o, k + delete_count, k + item_count)?;
            }
        }

        for (j, item) in items.iter().enumerate() {
            o.put_by_index(start + j as u32, item.clone(), true)?;
        }
        o.set_length(new_len)?;
        Ok(Value::Object(removed))
    }

    /// `Array.prototype.fill`
    pub(super) fn fill(&self, o: &ObjectRef, len: u32, args: &[Value]) -> Result<Value> {
        let value = arg(args, 0);
        let start = relative_index(&arg(args, 1), len);
        let end = relative_end(&arg(args, 2), len);
        let this = Value::Object(Rc::clone(o));
        if start >= end {
            return Ok(this);
        }

        if self.is_fast_with_len(o, len, Access::Write)
            && with_dense(o, |dense| dense.fill(start, end, &value)).is_some()
        {
            return Ok(this);
        }

        for k in start..end {
            o.put_by_index(k, value.clone(), true)?;
        }
        Ok(this)
    }

    /// `Array.prototype.copyWithin`
    pub(super) fn copy_within(&self, o: &ObjectRef, len: u32, args: &[Value]) -> Result<Value> {
        let to = relative_index(&arg(args, 0), len);
        let from = relative_index(&arg(args, 1), len);
        let end = relative_end(&arg(args, 2), len);
        let count = end.saturating_sub(from).min(len - to);
        let this = Value::Object(Rc::clone(o));
        if count == 0 {
            return Ok(this);
        }

        if self.is_fast_with_len(o, len, Access::Write)
            && with_dense(o, |dense| dense.copy_within(from, to, count)).is_some()
        {
            return Ok(this);
        }

        if from < to && to < from + count {
            // Overlapping forward move: copy from the back
            for i in (0..count).rev() {
                move_element(o, from + i, to + i)?;
            }
        } else {
            for i in 0..count {
                move_element(o, from + i, to + i)?;
            }
        }
        Ok(this)
    }
}
