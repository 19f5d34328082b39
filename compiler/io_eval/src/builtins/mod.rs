//! Built-in slots.
//!
//! Installed once by `RuntimeBuilder::build`:
//! - `object`: on the base `Object`, reachable from everything
//! - `block`: on the Block proto
//! - `call`: on the Call proto
//! - `message`: on the Message proto
//!
//! Every built-in is a [`NativeFn`]. Arguments arrive unevaluated as the
//! argument chains of the activating message; each built-in evaluates what
//! it needs in the sender's locals through the helpers below.

mod block;
mod call;
mod message;
mod object;

use std::sync::Arc;

use io_ir::Name;

use crate::exec::fail;
use crate::{Activation, ControlAction, EvalErrorKind, EvalResult, Native, NativeFn, ObjectKind, Runtime, Value};

pub(crate) fn install(rt: &Runtime) {
    object::install(rt);
    block::install(rt);
    call::install(rt);
    message::install(rt);
}

/// Set `name` on `target` to a native slot running `func`.
fn define(rt: &Runtime, target: &Value, name: &'static str, func: NativeFn) {
    let native = rt.alloc(ObjectKind::Native(Native { name, func }), Vec::new());
    target.set_slot(rt.interner().intern(name), native);
}

/// Name of the slot being activated, for error messages.
fn slot_name(rt: &Runtime, act: &Activation<'_>) -> String {
    act.message
        .message()
        .name()
        .map_or_else(String::new, |name| rt.interner().lookup(name).to_string())
}

/// Evaluate argument `index` in the sender; `nil` if absent.
fn arg(rt: &Runtime, act: &Activation<'_>, index: usize) -> EvalResult {
    rt.eval_arg(act.message, index, act.locals)
}

/// Evaluate argument `index` in the sender; an error if absent.
fn required_arg(rt: &Runtime, act: &Activation<'_>, index: usize) -> EvalResult {
    if act.message.message().arg(index).is_none() {
        return fail(EvalErrorKind::MissingArgument {
            slot: slot_name(rt, act),
            index,
        });
    }
    arg(rt, act, index)
}

/// Evaluate argument `index` and require a string.
fn string_arg(rt: &Runtime, act: &Activation<'_>, index: usize) -> Result<Arc<str>, ControlAction> {
    let value = required_arg(rt, act, index)?;
    match value.as_str() {
        Some(s) => Ok(Arc::clone(s)),
        None => Err(ControlAction::from(EvalErrorKind::WrongArgumentType {
            slot: slot_name(rt, act),
            index,
            expected: "a string",
        })),
    }
}

/// Evaluate argument `index`, a string, as a slot name.
fn name_arg(rt: &Runtime, act: &Activation<'_>, index: usize) -> Result<Name, ControlAction> {
    let text = string_arg(rt, act, index)?;
    Ok(rt.interner().intern(&text))
}

/// Evaluate argument `index` and require a number.
fn number_arg(rt: &Runtime, act: &Activation<'_>, index: usize) -> Result<f64, ControlAction> {
    let value = required_arg(rt, act, index)?;
    value.as_number().ok_or_else(|| {
        ControlAction::from(EvalErrorKind::WrongArgumentType {
            slot: slot_name(rt, act),
            index,
            expected: "a number",
        })
    })
}

/// The error for a built-in sent to the wrong kind of object.
fn wrong_receiver(rt: &Runtime, act: &Activation<'_>, expected: &'static str) -> ControlAction {
    ControlAction::from(EvalErrorKind::WrongReceiver {
        slot: slot_name(rt, act),
        expected,
    })
}
