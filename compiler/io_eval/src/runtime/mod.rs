//! The runtime: process-wide objects, configuration, and the top-level
//! driver.
//!
//! A `Runtime` owns the base `Object`, the `Lobby` that top-level code runs
//! in, the singleton `nil`/`true`/`false`, the protos for each native kind,
//! and the memoized literal objects. It is built once and never torn down;
//! values are `Rc`-shared and stay on the thread that built them.

mod builder;
mod display;
mod names;

use std::cell::{Cell, RefCell};
use std::sync::Arc;

use io_ir::{ChainRef, SharedInterner, StringInterner};
use io_lexer::CharSource;
use io_parse::{parse, parse_with_options, ParseOptions};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::print_handler::{PrintHandler, SharedPrintHandler};
use crate::value::Heap;
use crate::{ControlAction, EvalError, EvalErrorKind, ObjectKind, Value};

pub use builder::{RuntimeBuilder, DEFAULT_COLLECT_THRESHOLD, DEFAULT_MAX_DEPTH};
pub(crate) use names::KnownNames;

/// Built-in objects every runtime starts with.
pub(crate) struct Protos {
    pub(crate) object: Value,
    pub(crate) lobby: Value,
    pub(crate) nil: Value,
    pub(crate) true_: Value,
    pub(crate) false_: Value,
    pub(crate) number: Value,
    pub(crate) string: Value,
    pub(crate) block: Value,
    pub(crate) call: Value,
    pub(crate) message: Value,
}

impl Protos {
    fn new(heap: &Heap) -> Self {
        let object = Value::new(ObjectKind::Plain, Vec::new());
        heap.track(&object);
        let derive = |kind| {
            let value = Value::new(kind, vec![object.clone()]);
            heap.track(&value);
            value
        };
        Protos {
            lobby: derive(ObjectKind::Plain),
            nil: derive(ObjectKind::Nil),
            true_: derive(ObjectKind::Boolean(true)),
            false_: derive(ObjectKind::Boolean(false)),
            number: derive(ObjectKind::Plain),
            string: derive(ObjectKind::Plain),
            block: derive(ObjectKind::Plain),
            call: derive(ObjectKind::Plain),
            message: derive(ObjectKind::Plain),
            object,
        }
    }
}

/// Key for memoized literal objects.
#[derive(Clone, PartialEq, Eq, Hash)]
pub(crate) enum LiteralKey {
    /// Bit pattern, so every distinct `f64` (including `-0.0`) has its own
    /// object.
    Number(u64),
    Str(Arc<str>),
}

pub struct Runtime {
    interner: SharedInterner,
    pub(crate) names: KnownNames,
    pub(crate) protos: Protos,
    pub(crate) literals: RefCell<FxHashMap<LiteralKey, Value>>,
    heap: Heap,
    depth: Cell<usize>,
    max_depth: usize,
    print: SharedPrintHandler,
    parse_options: ParseOptions,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    /// Runtime with default settings.
    pub fn new() -> Self {
        RuntimeBuilder::new().build()
    }

    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    // ─── Accessors ─────────────────────────────────────────────────

    #[inline]
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// The object top-level code runs in.
    pub fn lobby(&self) -> &Value {
        &self.protos.lobby
    }

    /// The base `Object` every other object ultimately delegates to.
    pub fn object(&self) -> &Value {
        &self.protos.object
    }

    pub fn nil(&self) -> Value {
        self.protos.nil.clone()
    }

    pub fn boolean(&self, value: bool) -> Value {
        if value {
            self.protos.true_.clone()
        } else {
            self.protos.false_.clone()
        }
    }

    pub fn print_handler(&self) -> &PrintHandler {
        &self.print
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    // ─── Object Factories ──────────────────────────────────────────

    /// A new object owned by this runtime's collector.
    pub fn alloc(&self, kind: ObjectKind, protos: Vec<Value>) -> Value {
        let value = Value::new(kind, protos);
        self.heap.track(&value);
        value
    }

    /// A fresh number object.
    pub fn number(&self, n: f64) -> Value {
        self.alloc(ObjectKind::Number(n), vec![self.protos.number.clone()])
    }

    /// A fresh string object.
    pub fn string(&self, s: impl Into<Arc<str>>) -> Value {
        self.alloc(ObjectKind::Str(s.into()), vec![self.protos.string.clone()])
    }

    /// A plain object delegating to `proto`.
    pub fn clone_of(&self, proto: &Value) -> Value {
        self.alloc(ObjectKind::Plain, vec![proto.clone()])
    }

    // ─── Collection ────────────────────────────────────────────────

    /// Free unreachable object cycles now; returns how many objects were
    /// reclaimed.
    ///
    /// Objects held by the caller stay alive, as does everything they
    /// reach.
    pub fn collect_garbage(&self) -> usize {
        self.heap.collect()
    }

    /// Objects allocated by this runtime that are still alive.
    pub fn live_objects(&self) -> usize {
        self.heap.live_count()
    }

    /// Collect if enough has been allocated since the last collection.
    pub(crate) fn collect_if_due(&self) {
        if self.heap.is_due() {
            self.heap.collect();
        }
    }

    // ─── Driver ────────────────────────────────────────────────────

    /// Evaluate `chain` with `locals` as both the first receiver and the
    /// scope for arguments.
    ///
    /// A `return` that reaches this level ends evaluation with its value.
    pub fn evaluate(&self, chain: &ChainRef, locals: &Value) -> Result<Value, EvalError> {
        self.eval_chain(chain, locals).or_else(ControlAction::into_result)
    }

    /// Parse `source` and evaluate it in the lobby.
    ///
    /// Input with no messages evaluates to `nil`.
    pub fn do_string(&self, source: &str) -> Result<Value, EvalError> {
        let chain = parse(source, &self.interner)?;
        self.run(chain.as_ref())
    }

    /// Parse from `source` using this runtime's parse options and evaluate
    /// the result in the lobby.
    pub fn do_source<S>(&self, source: S) -> Result<Value, EvalError>
    where
        S: CharSource + Send + 'static,
    {
        let chain = parse_with_options(source, &self.interner, self.parse_options)?;
        self.run(chain.as_ref())
    }

    fn run(&self, chain: Option<&ChainRef>) -> Result<Value, EvalError> {
        let Some(chain) = chain else {
            return Ok(self.nil());
        };
        debug!(messages = chain.len(), "evaluating program");
        let lobby = self.protos.lobby.clone();
        let result = self.evaluate(chain, &lobby);
        self.collect_if_due();
        result
    }

    // ─── Depth ─────────────────────────────────────────────────────

    /// Count one more nested activation, failing past the limit.
    pub(crate) fn enter_activation(&self) -> Result<DepthGuard<'_>, EvalError> {
        let depth = self.depth.get();
        if depth >= self.max_depth {
            return Err(EvalError::new(EvalErrorKind::StackOverflow {
                limit: self.max_depth,
            }));
        }
        self.depth.set(depth + 1);
        Ok(DepthGuard { depth: &self.depth })
    }
}

/// Decrements the activation depth when the activation ends, however it
/// ends.
pub(crate) struct DepthGuard<'a> {
    depth: &'a Cell<usize>,
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}
