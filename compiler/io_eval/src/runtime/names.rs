//! Slot names the evaluator checks on every activation.
//!
//! Interned once when the runtime is built so the hot path compares `Name`
//! handles instead of hashing strings.

use io_ir::{Name, StringInterner};

#[derive(Clone, Copy)]
pub(crate) struct KnownNames {
    pub(crate) self_: Name,
    pub(crate) call: Name,
    pub(crate) forward: Name,
}

impl KnownNames {
    pub(crate) fn new(interner: &StringInterner) -> Self {
        Self {
            self_: interner.intern("self"),
            call: interner.intern("call"),
            forward: interner.intern("forward"),
        }
    }
}
