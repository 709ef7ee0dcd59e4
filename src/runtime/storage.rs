//! Array element storage
//!
//! Arrays are backed either by a contiguous slot buffer ([`DenseArray`]) or, once
//! that would waste too much memory, by the owning object's property map
//! ([`ArrayStorage::Sparse`]). Conversion is one-way and is decided here, never
//! by the routines that read or write elements.

use super::value::Value;
use rustc_hash::FxHashMap as HashMap;
use tracing::debug;

/// A dense array converts to sparse once it holds more holes than this
/// and the holes make up more than half of its slots.
pub const DENSE_MAX_HOLES: u32 = 32;

/// A write or length change may open at most this many new holes past the end
/// before the array converts to sparse.
pub const DENSE_MAX_NEW_HOLES: u32 = 32;

/// Contiguous element buffer. `None` slots are holes.
#[derive(Clone, Default)]
pub struct DenseArray {
    slots: Vec<Option<Value>>,
    hole_count: u32,
}

impl DenseArray {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a hole-free buffer from values
    pub fn from_values(values: Vec<Value>) -> Self {
        Self {
            slots: values.into_iter().map(Some).collect(),
            hole_count: 0,
        }
    }

    /// Create a buffer from slots, counting the holes
    pub fn from_slots(slots: Vec<Option<Value>>) -> Self {
        let hole_count = slots.iter().filter(|slot| slot.is_none()).count() as u32;
        Self { slots, hole_count }
    }

    /// Create a buffer of `len` holes
    pub fn with_holes(len: u32) -> Self {
        let mut slots = Vec::with_capacity(len as usize);
        slots.resize_with(len as usize, || None);
        Self {
            slots,
            hole_count: len,
        }
    }

    /// Logical length
    pub fn len(&self) -> u32 {
        self.slots.len() as u32
    }

    /// Whether the buffer has no slots
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of holes below the length
    pub fn hole_count(&self) -> u32 {
        self.hole_count
    }

    /// Read-only view of the slots
    pub fn slots(&self) -> &[Option<Value>] {
        &self.slots
    }

    /// Element at `index`, `None` for holes and out-of-range indices
    pub fn get(&self, index: u32) -> Option<&Value> {
        self.slots.get(index as usize).and_then(Option::as_ref)
    }

    /// Overwrite an existing slot, filling a hole if there was one.
    /// Returns the previous value.
    pub fn replace(&mut self, index: u32, value: Value) -> Option<Value> {
        let slot = &mut self.slots[index as usize];
        let old = slot.replace(value);
        if old.is_none() {
            self.hole_count -= 1;
        }
        old
    }

    /// Turn the slot at `index` into a hole, returning what it held
    pub fn punch_hole(&mut self, index: u32) -> Option<Value> {
        let old = self.slots.get_mut(index as usize).and_then(Option::take);
        if old.is_some() {
            self.hole_count += 1;
        }
        old
    }

    /// Append values with a single reallocation
    pub fn extend_dense<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = Value>,
    {
        let values = values.into_iter();
        self.slots.reserve(values.size_hint().0);
        self.slots.extend(values.map(Some));
    }

    /// Pad the buffer with holes up to `new_len`
    fn pad_holes(&mut self, new_len: u32) {
        let added = new_len - self.len();
        self.slots.resize_with(new_len as usize, || None);
        self.hole_count += added;
    }

    /// Truncate the buffer to `new_len`, releasing the dropped values
    pub fn shrink_dense(&mut self, new_len: u32) {
        if new_len >= self.len() {
            return;
        }
        let removed_holes = self.slots[new_len as usize..]
            .iter()
            .filter(|slot| slot.is_none())
            .count() as u32;
        self.slots.truncate(new_len as usize);
        self.hole_count -= removed_holes;
    }

    /// Remove and return the last slot
    pub fn pop(&mut self) -> Option<Option<Value>> {
        let slot = self.slots.pop()?;
        if slot.is_none() {
            self.hole_count -= 1;
        }
        Some(slot)
    }

    /// Remove the first slot, moving the rest down by one
    pub fn shift(&mut self) -> Option<Option<Value>> {
        if self.slots.is_empty() {
            return None;
        }
        let slot = self.slots.remove(0);
        if slot.is_none() {
            self.hole_count -= 1;
        }
        Some(slot)
    }

    /// Replace `start..start + delete_count` with `items`, returning the removed slots
    pub fn splice_slots<I>(&mut self, start: u32, delete_count: u32, items: I) -> Vec<Option<Value>>
    where
        I: IntoIterator<Item = Value>,
    {
        let range = start as usize..(start + delete_count) as usize;
        let removed: Vec<Option<Value>> =
            self.slots.splice(range, items.into_iter().map(Some)).collect();
        self.hole_count -= removed.iter().filter(|slot| slot.is_none()).count() as u32;
        removed
    }

    /// Reverse the first `len` slots in place
    pub fn reverse_prefix(&mut self, len: u32) {
        self.slots[..len as usize].reverse();
    }

    /// Overwrite `start..end` with clones of `value`, releasing what was there
    pub fn fill(&mut self, start: u32, end: u32, value: &Value) {
        for slot in &mut self.slots[start as usize..end as usize] {
            if slot.replace(value.clone()).is_none() {
                self.hole_count -= 1;
            }
        }
    }

    /// Copy `count` slots from `from` to `to` with memmove semantics
    pub fn copy_within(&mut self, from: u32, to: u32, count: u32) {
        let (from, to, count) = (from as usize, to as usize, count as usize);
        if from < to && to < from + count {
            for i in (0..count).rev() {
                self.copy_slot(from + i, to + i);
            }
        } else {
            for i in 0..count {
                self.copy_slot(from + i, to + i);
            }
        }
    }

    fn copy_slot(&mut self, from: usize, to: usize) {
        let value = self.slots[from].clone();
        match (self.slots[to].is_none(), value.is_none()) {
            (true, false) => self.hole_count -= 1,
            (false, true) => self.hole_count += 1,
            _ => {}
        }
        self.slots[to] = value;
    }

    /// Replace the whole contents with hole-free values
    pub fn set_values(&mut self, values: Vec<Value>) {
        self.slots = values.into_iter().map(Some).collect();
        self.hole_count = 0;
    }

    /// Clone the values when the buffer is hole-free
    pub fn to_values(&self) -> Option<Vec<Value>> {
        self.slots.iter().cloned().collect()
    }
}

/// Backing of an array object
#[derive(Clone)]
pub enum ArrayStorage {
    /// Contiguous slot buffer
    Dense(DenseArray),
    /// Elements live in the owning object's property map
    Sparse { length: u32 },
}

impl Default for ArrayStorage {
    fn default() -> Self {
        ArrayStorage::Dense(DenseArray::new())
    }
}

impl ArrayStorage {
    /// Storage for a new array of `length` holes. Dense up to `prealloc_limit`.
    pub fn with_length(length: u32, prealloc_limit: u32) -> Self {
        if length <= prealloc_limit {
            ArrayStorage::Dense(DenseArray::with_holes(length))
        } else {
            ArrayStorage::Sparse { length }
        }
    }

    /// Current array length
    pub fn length(&self) -> u32 {
        match self {
            ArrayStorage::Dense(dense) => dense.len(),
            ArrayStorage::Sparse { length } => *length,
        }
    }

    /// The dense buffer, if still dense
    pub fn as_dense(&self) -> Option<&DenseArray> {
        match self {
            ArrayStorage::Dense(dense) => Some(dense),
            ArrayStorage::Sparse { .. } => None,
        }
    }

    /// The mutable dense buffer, if still dense
    pub fn as_dense_mut(&mut self) -> Option<&mut DenseArray> {
        match self {
            ArrayStorage::Dense(dense) => Some(dense),
            ArrayStorage::Sparse { .. } => None,
        }
    }

    /// Element at `index`
    pub fn get<'a>(
        &'a self,
        properties: &'a HashMap<String, Value>,
        index: u32,
    ) -> Option<&'a Value> {
        match self {
            ArrayStorage::Dense(dense) => dense.get(index),
            ArrayStorage::Sparse { length } => {
                if index < *length {
                    properties.get(&index.to_string())
                } else {
                    None
                }
            }
        }
    }

    /// Write the element at `index`, growing the length when needed.
    /// `index` must be a valid array index (below `u32::MAX`).
    pub fn put(&mut self, properties: &mut HashMap<String, Value>, index: u32, value: Value) {
        if let ArrayStorage::Dense(dense) = self {
            let len = dense.len();
            if index < len {
                dense.replace(index, value);
                return;
            }
            if index - len <= DENSE_MAX_NEW_HOLES {
                dense.pad_holes(index);
                dense.extend_dense(std::iter::once(value));
                return;
            }
            self.convert_to_sparse(properties);
        }

        if let ArrayStorage::Sparse { length } = self {
            properties.insert(index.to_string(), value);
            if index >= *length {
                *length = index + 1;
            }
        }
    }

    /// Delete the element at `index`, leaving a hole. Length is unchanged.
    pub fn delete(&mut self, properties: &mut HashMap<String, Value>, index: u32) -> Option<Value> {
        match self {
            ArrayStorage::Dense(dense) => {
                let old = dense.punch_hole(index);
                if dense.hole_count() > DENSE_MAX_HOLES && dense.hole_count() * 2 > dense.len() {
                    self.convert_to_sparse(properties);
                }
                old
            }
            ArrayStorage::Sparse { .. } => properties.remove(&index.to_string()),
        }
    }

    /// Set the length, dropping elements past it or padding with holes
    pub fn set_length(&mut self, properties: &mut HashMap<String, Value>, new_len: u32) {
        if let ArrayStorage::Dense(dense) = self {
            let len = dense.len();
            if new_len <= len {
                dense.shrink_dense(new_len);
                return;
            }
            if new_len - len <= DENSE_MAX_NEW_HOLES {
                dense.pad_holes(new_len);
                return;
            }
            self.convert_to_sparse(properties);
        }

        if let ArrayStorage::Sparse { length } = self {
            if new_len < *length {
                properties.retain(|key, _| parse_index(key).map_or(true, |index| index < new_len));
            }
            *length = new_len;
        }
    }

    /// All slots below the length, holes as `None`
    pub fn snapshot(&self, properties: &HashMap<String, Value>) -> Vec<Option<Value>> {
        match self {
            ArrayStorage::Dense(dense) => dense.slots().to_vec(),
            ArrayStorage::Sparse { length } => (0..*length)
                .map(|index| properties.get(&index.to_string()).cloned())
                .collect(),
        }
    }

    /// The first `limit` slots below the length, holes as `None`
    pub fn leading_slots(
        &self,
        properties: &HashMap<String, Value>,
        limit: u32,
    ) -> Vec<Option<Value>> {
        match self {
            ArrayStorage::Dense(dense) => {
                dense.slots().iter().take(limit as usize).cloned().collect()
            }
            ArrayStorage::Sparse { length } => (0..(*length).min(limit))
                .map(|index| properties.get(&index.to_string()).cloned())
                .collect(),
        }
    }

    fn convert_to_sparse(&mut self, properties: &mut HashMap<String, Value>) {
        let ArrayStorage::Dense(dense) = self else {
            return;
        };
        let length = dense.len();
        debug!(length, holes = dense.hole_count(), "converting dense array to sparse storage");
        for (index, slot) in std::mem::take(&mut dense.slots).into_iter().enumerate() {
            if let Some(value) = slot {
                properties.insert(index.to_string(), value);
            }
        }
        *self = ArrayStorage::Sparse { length };
    }
}

/// Parse a canonical array index key (`"0"`, `"17"`, never `"017"` or `"4294967295"`)
pub fn parse_index(key: &str) -> Option<u32> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse::<u32>().ok().filter(|index| *index != u32::MAX)
}
