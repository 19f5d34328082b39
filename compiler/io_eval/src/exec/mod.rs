//! Chain evaluation and message activation.
//!
//! A chain is walked left to right with a current receiver. The receiver
//! starts as `locals`; each message's result becomes the receiver of the
//! next one. A separator ends the statement: the receiver goes back to
//! `locals` and the last result is kept as the chain's result.
//!
//! An identifier is looked up on the receiver (falling back to `forward`)
//! and the slot value is activated. Activation dispatches on the object
//! kind: natives run, activatable blocks run their body, everything else
//! is its own result.

mod block;

use io_ir::{ChainRef, MessageRef, Name, Symbol};
use io_stack::ensure_sufficient_stack;
use tracing::trace;

use crate::runtime::LiteralKey;
use crate::{Activation, ControlAction, EvalError, EvalErrorKind, EvalResult, ObjectKind, Runtime, Value};

impl Runtime {
    /// Evaluate every message of `chain` in order.
    pub(crate) fn eval_chain(&self, chain: &ChainRef, locals: &Value) -> EvalResult {
        let mut receiver = locals.clone();
        let mut result = self.nil();

        for at in MessageRef::all(chain) {
            let msg = at.message();
            result = match &msg.symbol {
                Symbol::Separator(_) => {
                    receiver = locals.clone();
                    continue;
                }
                Symbol::Number(n) => self.literal(LiteralKey::Number(n.to_bits()), || self.number(*n)),
                Symbol::Str(s) => self.literal(LiteralKey::Str(s.clone()), || self.string(s.clone())),
                Symbol::Ident(name) => self
                    .send(&receiver, locals, &at, *name)
                    .map_err(|action| action.with_span_if_error(msg.span))?,
            };
            receiver = result.clone();
        }

        Ok(result)
    }

    /// Evaluate argument `index` of `at` in `locals`; `nil` if the call
    /// site supplied fewer arguments.
    pub(crate) fn eval_arg(&self, at: &MessageRef, index: usize, locals: &Value) -> EvalResult {
        match at.message().arg(index) {
            Some(arg) => ensure_sufficient_stack(|| self.eval_chain(arg, locals)),
            None => Ok(self.nil()),
        }
    }

    /// Look up `name` on `receiver` and activate what is found.
    fn send(&self, receiver: &Value, locals: &Value, at: &MessageRef, name: Name) -> EvalResult {
        trace!(slot = self.interner().lookup(name), "send");
        let slot = match receiver.lookup(name) {
            Some(slot) => slot,
            None => receiver.lookup(self.names.forward).ok_or_else(|| {
                EvalError::new(EvalErrorKind::SlotNotFound {
                    name: self.interner().lookup(name).to_string(),
                })
            })?,
        };
        self.activate(&slot, receiver, locals, at)
    }

    /// Activate `slot`, found on `target`, for the message `at` sent from
    /// `locals`.
    pub(crate) fn activate(&self, slot: &Value, target: &Value, locals: &Value, at: &MessageRef) -> EvalResult {
        match slot.kind() {
            ObjectKind::Native(native) => {
                trace!(native = native.name, "activate native");
                (native.func)(self, &Activation {
                    target,
                    locals,
                    message: at,
                })
            }
            ObjectKind::Block(block) if block.is_activatable() => {
                self.activate_block(slot, block, target, locals, at)
            }
            _ => Ok(slot.clone()),
        }
    }

    /// The memoized object for a literal, created on first use.
    fn literal(&self, key: LiteralKey, create: impl FnOnce() -> Value) -> Value {
        self.literals.borrow_mut().entry(key).or_insert_with(create).clone()
    }
}

/// `Err` for a runtime error raised by a built-in.
pub(crate) fn fail(kind: EvalErrorKind) -> EvalResult {
    Err(ControlAction::from(kind))
}
