//! Cycle collection for the object graph.
//!
//! Objects are `Rc`-shared, so anything without a cycle is freed as soon
//! as its last handle drops. Cycles (a closure stored on the scope it
//! captured, an object that is its own proto) are found here by trial
//! deletion:
//!
//! 1. Count, for every tracked object, the references other tracked objects
//!    hold to it.
//! 2. An object with more strong references than that is held from outside
//!    the graph (a Rust local, the runtime's protos, the literal table) and
//!    is a root.
//! 3. Everything reachable from a root is live. The rest is garbage: its
//!    slots and protos are cleared, which breaks every cycle through it,
//!    and `Rc` frees the objects.
//!
//! Because outside handles are roots, a collection may run at any point
//! where no slot or proto table is borrowed.
//!
//! The native payload is never cleared. Its references (a block's captured
//! scope, a call record) are fixed at creation and always point to older
//! objects, so no cycle consists of them alone.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;
use tracing::debug;

use super::{Object, ObjectKind, Value};

/// Registry of every object a runtime allocated.
pub(crate) struct Heap {
    objects: RefCell<Vec<Weak<Object>>>,
    allocated: Cell<usize>,
    threshold: usize,
}

impl Heap {
    /// A heap that asks for a collection every `threshold` allocations.
    pub(crate) fn new(threshold: usize) -> Self {
        Heap {
            objects: RefCell::new(Vec::new()),
            allocated: Cell::new(0),
            threshold,
        }
    }

    pub(crate) fn track(&self, value: &Value) {
        self.objects.borrow_mut().push(Rc::downgrade(&value.0));
        self.allocated.set(self.allocated.get() + 1);
    }

    /// Enough allocations since the last collection to run another.
    pub(crate) fn is_due(&self) -> bool {
        self.allocated.get() >= self.threshold
    }

    /// Tracked objects still alive.
    pub(crate) fn live_count(&self) -> usize {
        self.objects
            .borrow()
            .iter()
            .filter(|object| object.strong_count() > 0)
            .count()
    }

    /// Free unreachable cycles; returns how many objects were cleared.
    pub(crate) fn collect(&self) -> usize {
        self.allocated.set(0);
        let live: Vec<Rc<Object>> = {
            let mut objects = self.objects.borrow_mut();
            objects.retain(|object| object.strong_count() > 0);
            objects.iter().filter_map(Weak::upgrade).collect()
        };
        let index: FxHashMap<*const Object, usize> = live
            .iter()
            .enumerate()
            .map(|(i, object)| (Rc::as_ptr(object), i))
            .collect();
        let tracked = |child: &Value| index.get(&Rc::as_ptr(&child.0)).copied();

        let mut internal = vec![0_usize; live.len()];
        for object in &live {
            for_each_edge(object, |child| {
                if let Some(i) = tracked(child) {
                    internal[i] += 1;
                }
            });
        }

        // `live` holds one reference to each object itself.
        let mut pending: Vec<usize> = (0..live.len())
            .filter(|&i| Rc::strong_count(&live[i]) > internal[i] + 1)
            .collect();
        let mut marked = vec![false; live.len()];
        for &i in &pending {
            marked[i] = true;
        }
        while let Some(i) = pending.pop() {
            for_each_edge(&live[i], |child| {
                if let Some(j) = tracked(child) {
                    if !marked[j] {
                        marked[j] = true;
                        pending.push(j);
                    }
                }
            });
        }

        // Take the tables out first and drop them once no borrow is held.
        let garbage: Vec<_> = live
            .iter()
            .zip(&marked)
            .filter(|(_, is_marked)| !**is_marked)
            .map(|(object, _)| {
                let slots = std::mem::take(&mut *object.slots.borrow_mut());
                let protos = std::mem::take(&mut *object.protos.borrow_mut());
                (slots, protos)
            })
            .collect();
        let reclaimed = garbage.len();
        drop(garbage);
        drop(live);

        self.objects
            .borrow_mut()
            .retain(|object| object.strong_count() > 0);
        debug!(reclaimed, live = self.objects.borrow().len(), "collected");
        reclaimed
    }
}

/// Every reference `object` holds to another object.
fn for_each_edge(object: &Object, mut f: impl FnMut(&Value)) {
    for value in object.slots.borrow().values() {
        f(value);
    }
    for value in object.protos.borrow().iter() {
        f(value);
    }
    match &object.kind {
        ObjectKind::Block(block) => {
            if let Some(captured) = &block.captured_self {
                f(captured);
            }
        }
        ObjectKind::Call(call) => {
            f(&call.sender);
            f(&call.target);
            f(&call.activated);
        }
        _ => {}
    }
}
