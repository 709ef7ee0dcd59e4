//! `Array.prototype` routines
//!
//! Each routine is a method on [`ArrayEngine`](crate::runtime::ArrayEngine) that
//! receives `this` already boxed by `ToObject` and its length already read.
//! Routines ask the eligibility guard before touching a dense buffer directly
//! and fall back to the indexed property protocol otherwise.

mod helpers;
pub mod iterator;
mod iterate;
mod join;
mod mutate;
mod search;
pub mod sort;
mod transform;

use self::helpers::arg;
use self::iterate::{FindResult, PredicateMode};
use self::iterator::IterationKind;
use crate::error::Result;
use crate::runtime::protocol::{to_object, IndexedObject};
use crate::runtime::value::Value;
use crate::runtime::ArrayEngine;
use tracing::trace;

/// Identifier of an array routine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayMethod {
    Concat,
    Join,
    ToString,
    ToLocaleString,
    Pop,
    Push,
    Reverse,
    Shift,
    Slice,
    Sort,
    Splice,
    Unshift,
    IndexOf,
    LastIndexOf,
    Every,
    Some,
    ForEach,
    Map,
    Filter,
    Reduce,
    ReduceRight,
    Find,
    FindIndex,
    Fill,
    CopyWithin,
    Includes,
    Keys,
    Values,
    Entries,
}

impl ArrayMethod {
    /// Every routine, in `Array.prototype` order
    pub const ALL: [ArrayMethod; 29] = [
        ArrayMethod::Concat,
        ArrayMethod::Join,
        ArrayMethod::ToString,
        ArrayMethod::ToLocaleString,
        ArrayMethod::Pop,
        ArrayMethod::Push,
        ArrayMethod::Reverse,
        ArrayMethod::Shift,
        ArrayMethod::Slice,
        ArrayMethod::Sort,
        ArrayMethod::Splice,
        ArrayMethod::Unshift,
        ArrayMethod::IndexOf,
        ArrayMethod::LastIndexOf,
        ArrayMethod::Every,
        ArrayMethod::Some,
        ArrayMethod::ForEach,
        ArrayMethod::Map,
        ArrayMethod::Filter,
        ArrayMethod::Reduce,
        ArrayMethod::ReduceRight,
        ArrayMethod::Find,
        ArrayMethod::FindIndex,
        ArrayMethod::Fill,
        ArrayMethod::CopyWithin,
        ArrayMethod::Includes,
        ArrayMethod::Keys,
        ArrayMethod::Values,
        ArrayMethod::Entries,
    ];

    /// Look a routine up by its property name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|method| method.name() == name)
    }

    /// Property name of the routine
    pub fn name(self) -> &'static str {
        match self {
            ArrayMethod::Concat => "concat",
            ArrayMethod::Join => "join",
            ArrayMethod::ToString => "toString",
            ArrayMethod::ToLocaleString => "toLocaleString",
            ArrayMethod::Pop => "pop",
            ArrayMethod::Push => "push",
            ArrayMethod::Reverse => "reverse",
            ArrayMethod::Shift => "shift",
            ArrayMethod::Slice => "slice",
            ArrayMethod::Sort => "sort",
            ArrayMethod::Splice => "splice",
            ArrayMethod::Unshift => "unshift",
            ArrayMethod::IndexOf => "indexOf",
            ArrayMethod::LastIndexOf => "lastIndexOf",
            ArrayMethod::Every => "every",
            ArrayMethod::Some => "some",
            ArrayMethod::ForEach => "forEach",
            ArrayMethod::Map => "map",
            ArrayMethod::Filter => "filter",
            ArrayMethod::Reduce => "reduce",
            ArrayMethod::ReduceRight => "reduceRight",
            ArrayMethod::Find => "find",
            ArrayMethod::FindIndex => "findIndex",
            ArrayMethod::Fill => "fill",
            ArrayMethod::CopyWithin => "copyWithin",
            ArrayMethod::Includes => "includes",
            ArrayMethod::Keys => "keys",
            ArrayMethod::Values => "values",
            ArrayMethod::Entries => "entries",
        }
    }
}

impl ArrayEngine {
    /// Run a routine with `this` and the call's arguments.
    /// Engine-raised errors get a native frame naming the routine.
    pub fn call_method(&self, method: ArrayMethod, this: &Value, args: &[Value]) -> Result<Value> {
        self.dispatch(method, this, args)
            .map_err(|e| e.with_native_frame(&format!("Array.prototype.{}", method.name())))
    }

    fn dispatch(&self, method: ArrayMethod, this: &Value, args: &[Value]) -> Result<Value> {
        let o = to_object(this)?;
        let len = o.get_length()?;
        trace!(method = method.name(), len, argc = args.len(), "array routine");

        match method {
            ArrayMethod::Concat => self.concat(&o, args),
            ArrayMethod::Join => self.join(&o, len, &arg(args, 0)),
            ArrayMethod::ToString => self.to_string_object(&o),
            ArrayMethod::ToLocaleString => self.to_locale_string(&o, len),
            ArrayMethod::Pop => self.pop(&o, len),
            ArrayMethod::Push => self.push(&o, len, args),
            ArrayMethod::Reverse => self.reverse(&o, len),
            ArrayMethod::Shift => self.shift(&o, len),
            ArrayMethod::Slice => self.slice(&o, len, args),
            ArrayMethod::Sort => self.sort(&o, len, &arg(args, 0)),
            ArrayMethod::Splice => self.splice(&o, len, args),
            ArrayMethod::Unshift => self.unshift(&o, len, args),
            ArrayMethod::IndexOf => self.index_of(&o, len, args),
            ArrayMethod::LastIndexOf => self.last_index_of(&o, len, args),
            ArrayMethod::Every => self.apply_predicate(&o, len, args, PredicateMode::Every),
            ArrayMethod::Some => self.apply_predicate(&o, len, args, PredicateMode::Some),
            ArrayMethod::ForEach => self.apply_predicate(&o, len, args, PredicateMode::ForEach),
            ArrayMethod::Map => self.map(&o, len, args),
            ArrayMethod::Filter => self.filter(&o, len, args),
            ArrayMethod::Reduce => self.reduce(&o, len, args, false),
            ArrayMethod::ReduceRight => self.reduce(&o, len, args, true),
            ArrayMethod::Find => self.find(&o, len, args, FindResult::Element),
            ArrayMethod::FindIndex => self.find(&o, len, args, FindResult::Index),
            ArrayMethod::Fill => self.fill(&o, len, args),
            ArrayMethod::CopyWithin => self.copy_within(&o, len, args),
            ArrayMethod::Includes => self.includes(&o, len, args),
            ArrayMethod::Keys => Ok(iterator::create(&o, IterationKind::Keys)),
            ArrayMethod::Values => Ok(iterator::create(&o, IterationKind::Values)),
            ArrayMethod::Entries => Ok(iterator::create(&o, IterationKind::Entries)),
        }
    }
}
