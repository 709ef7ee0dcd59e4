//! Fast path eligibility
//!
//! A routine may work on a raw dense buffer only while the buffer is hole-free
//! and, for routines that write, the array is extensible. The answer is only
//! good until the next call into user code; callers ask again afterwards.

use super::value::{ObjectKind, ObjectRef};
use tracing::trace;

/// How a routine intends to use the dense buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Reads elements only
    Read,
    /// Writes, moves or removes elements
    Write,
}

/// Decides whether the dense fast path may be taken
#[derive(Debug, Clone, Copy)]
pub struct EligibilityGuard {
    enabled: bool,
}

impl EligibilityGuard {
    /// Create a guard; a disabled guard never grants the fast path
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Whether the fast path is switched on at all
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// `true` iff `obj` is dense, hole-free and (for writes) extensible
    pub fn is_fast(&self, obj: &ObjectRef, access: Access) -> bool {
        self.fast_length(obj, access).is_some()
    }

    /// Current dense length when the fast path is allowed
    pub fn fast_length(&self, obj: &ObjectRef, access: Access) -> Option<u32> {
        if !self.enabled {
            return None;
        }
        let o = obj.borrow();
        let ObjectKind::Array(storage) = &o.kind else {
            return None;
        };
        let Some(dense) = storage.as_dense() else {
            trace!(?access, "generic path: sparse storage");
            return None;
        };
        if dense.hole_count() > 0 {
            trace!(?access, holes = dense.hole_count(), "generic path: dense array has holes");
            return None;
        }
        if access == Access::Write && !o.is_extensible() {
            trace!(?access, "generic path: array is not extensible");
            return None;
        }
        trace!(?access, length = dense.len(), "dense fast path");
        Some(dense.len())
    }

    /// A freshly created result array that the routine will fill from index 0:
    /// dense and extensible, holes allowed since every slot gets overwritten.
    pub fn is_fresh_target(&self, obj: &ObjectRef) -> bool {
        if !self.enabled {
            return false;
        }
        let o = obj.borrow();
        matches!(&o.kind, ObjectKind::Array(storage) if storage.as_dense().is_some())
            && o.is_extensible()
    }
}
