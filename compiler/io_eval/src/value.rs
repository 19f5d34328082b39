//! The object model.
//!
//! Everything at runtime is an object: a mutable slot table, an ordered
//! list of protos to delegate to, and a [`ObjectKind`] saying what native
//! payload it carries. Objects are shared through [`Value`], a
//! reference-counted handle; two values are equal only if they are the same
//! object.
//!
//! # Lookup
//!
//! The receiver's own slots first, then each proto in order, depth-first;
//! the first hit wins. Proto graphs may contain cycles, so each object is
//! visited at most once per lookup.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use io_ir::{ChainRef, MessageRef, Name};
use io_stack::ensure_sufficient_stack;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{EvalResult, Runtime};

mod heap;

pub(crate) use heap::Heap;

/// Handle to a shared runtime object.
#[derive(Clone)]
pub struct Value(Rc<Object>);

struct Object {
    slots: RefCell<FxHashMap<Name, Value>>,
    protos: RefCell<Vec<Value>>,
    kind: ObjectKind,
}

/// Native payload of an object; decides how it behaves when activated.
pub enum ObjectKind {
    /// Slots and protos only.
    Plain,
    Nil,
    Boolean(bool),
    Number(f64),
    Str(Arc<str>),
    Block(Block),
    Native(Native),
    Call(CallRecord),
    Message(MessageRef),
}

/// A closure (`block`) or method (`method`).
pub struct Block {
    /// Last argument of the defining message; `None` for `block()`.
    pub body: Option<ChainRef>,
    /// Locals of the defining scope for a closure; `None` for a method,
    /// whose `self` is whatever it is activated on.
    pub captured_self: Option<Value>,
    pub arg_names: Vec<Name>,
    activatable: Cell<bool>,
}

impl Block {
    pub fn new(body: Option<ChainRef>, arg_names: Vec<Name>, captured_self: Option<Value>) -> Self {
        // Methods activate on lookup; closures only through `call`.
        let activatable = captured_self.is_none();
        Block {
            body,
            captured_self,
            arg_names,
            activatable: Cell::new(activatable),
        }
    }

    #[inline]
    pub fn is_activatable(&self) -> bool {
        self.activatable.get()
    }

    pub fn set_activatable(&self, activatable: bool) {
        self.activatable.set(activatable);
    }

    #[inline]
    pub fn is_method(&self) -> bool {
        self.captured_self.is_none()
    }
}

/// A built-in operation.
pub type NativeFn = fn(&Runtime, &Activation<'_>) -> EvalResult;

pub struct Native {
    pub name: &'static str,
    pub func: NativeFn,
}

/// Everything an activation sees.
pub struct Activation<'a> {
    /// The receiver the slot was found on.
    pub target: &'a Value,
    /// The sender's locals; call-site arguments are evaluated here.
    pub locals: &'a Value,
    /// The message being sent.
    pub message: &'a MessageRef,
}

/// Activation record of one block invocation, visible as `call`.
pub struct CallRecord {
    pub sender: Value,
    pub target: Value,
    pub activated: Value,
    pub message: MessageRef,
}

impl Value {
    pub fn new(kind: ObjectKind, protos: Vec<Value>) -> Self {
        Value(Rc::new(Object {
            slots: RefCell::new(FxHashMap::default()),
            protos: RefCell::new(protos),
            kind,
        }))
    }

    #[inline]
    pub fn kind(&self) -> &ObjectKind {
        &self.0.kind
    }

    /// Same object.
    #[inline]
    pub fn ptr_eq(&self, other: &Value) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    // ─── Slots ─────────────────────────────────────────────────────

    /// This object's own slot, ignoring protos.
    pub fn own_slot(&self, name: Name) -> Option<Value> {
        self.0.slots.borrow().get(&name).cloned()
    }

    pub fn set_slot(&self, name: Name, value: Value) {
        self.0.slots.borrow_mut().insert(name, value);
    }

    /// Find `name` on this object or anything it delegates to.
    pub fn lookup(&self, name: Name) -> Option<Value> {
        let mut visited = FxHashSet::default();
        self.lookup_in(name, &mut visited)
    }

    fn lookup_in(&self, name: Name, visited: &mut FxHashSet<*const Object>) -> Option<Value> {
        if !visited.insert(Rc::as_ptr(&self.0)) {
            return None;
        }
        if let Some(value) = self.own_slot(name) {
            return Some(value);
        }
        let protos = self.protos();
        protos
            .iter()
            .find_map(|proto| ensure_sufficient_stack(|| proto.lookup_in(name, visited)))
    }

    // ─── Protos ────────────────────────────────────────────────────

    /// Snapshot of the proto list.
    pub fn protos(&self) -> Vec<Value> {
        self.0.protos.borrow().clone()
    }

    pub fn append_proto(&self, proto: Value) {
        self.0.protos.borrow_mut().push(proto);
    }

    // ─── Payload ───────────────────────────────────────────────────

    pub fn as_number(&self) -> Option<f64> {
        match self.kind() {
            ObjectKind::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&Arc<str>> {
        match self.kind() {
            ObjectKind::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self.kind() {
            ObjectKind::Block(block) => Some(block),
            _ => None,
        }
    }

    pub fn as_call(&self) -> Option<&CallRecord> {
        match self.kind() {
            ObjectKind::Call(call) => Some(call),
            _ => None,
        }
    }

    pub fn as_message(&self) -> Option<&MessageRef> {
        match self.kind() {
            ObjectKind::Message(msg) => Some(msg),
            _ => None,
        }
    }

    /// Everything except `nil` and `false`.
    pub fn is_truthy(&self) -> bool {
        !matches!(self.kind(), ObjectKind::Nil | ObjectKind::Boolean(false))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            ObjectKind::Plain => write!(f, "Object({:p})", Rc::as_ptr(&self.0)),
            ObjectKind::Nil => f.write_str("nil"),
            ObjectKind::Boolean(b) => write!(f, "{b}"),
            ObjectKind::Number(n) => write!(f, "Number({n})"),
            ObjectKind::Str(s) => write!(f, "Str({s:?})"),
            ObjectKind::Block(block) if block.is_method() => f.write_str("Method"),
            ObjectKind::Block(_) => f.write_str("Block"),
            ObjectKind::Native(native) => write!(f, "Native({})", native.name),
            ObjectKind::Call(_) => f.write_str("Call"),
            ObjectKind::Message(_) => f.write_str("Message"),
        }
    }
}
