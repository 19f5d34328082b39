//! Slots on the Message proto.

use io_ir::MessageRef;

use super::{define, wrong_receiver};
use crate::{Activation, ControlAction, EvalResult, ObjectKind, Runtime, Value};

pub(super) fn install(rt: &Runtime) {
    let proto = rt.protos.message.clone();
    define(rt, &proto, "name", name);
    define(rt, &proto, "argCount", arg_count);
    define(rt, &proto, "asString", as_string);
    define(rt, &proto, "next", next);
    define(rt, &proto, "previous", previous);
}

fn receiver<'a>(rt: &Runtime, act: &'a Activation<'_>) -> Result<&'a MessageRef, ControlAction> {
    act.target
        .as_message()
        .ok_or_else(|| wrong_receiver(rt, act, "a message"))
}

fn wrap(rt: &Runtime, msg: Option<MessageRef>) -> Value {
    match msg {
        Some(msg) => rt.alloc(ObjectKind::Message(msg), vec![rt.protos.message.clone()]),
        None => rt.nil(),
    }
}

/// The slot name for a send; the literal text for anything else.
fn name(rt: &Runtime, act: &Activation<'_>) -> EvalResult {
    let msg = receiver(rt, act)?.message();
    let text = match msg.name() {
        Some(name) => rt.interner().lookup(name).to_string(),
        None => msg.to_source(rt.interner()),
    };
    Ok(rt.string(text))
}

#[allow(
    clippy::cast_precision_loss,
    reason = "argument counts are far below 2^52"
)]
fn arg_count(rt: &Runtime, act: &Activation<'_>) -> EvalResult {
    let msg = receiver(rt, act)?.message();
    Ok(rt.number(msg.args.len() as f64))
}

/// The message and its arguments as source text.
fn as_string(rt: &Runtime, act: &Activation<'_>) -> EvalResult {
    let msg = receiver(rt, act)?.message();
    Ok(rt.string(msg.to_source(rt.interner())))
}

fn next(rt: &Runtime, act: &Activation<'_>) -> EvalResult {
    Ok(wrap(rt, receiver(rt, act)?.next()))
}

fn previous(rt: &Runtime, act: &Activation<'_>) -> EvalResult {
    Ok(wrap(rt, receiver(rt, act)?.previous()))
}
