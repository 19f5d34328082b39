//! Slots on the Call proto: the activation record a block body sees as
//! `call`.

use super::{define, number_arg, wrong_receiver};
use crate::exec::fail;
use crate::{Activation, CallRecord, ControlAction, EvalErrorKind, EvalResult, ObjectKind, Runtime};

pub(super) fn install(rt: &Runtime) {
    let proto = rt.protos.call.clone();
    define(rt, &proto, "sender", sender);
    define(rt, &proto, "target", target);
    define(rt, &proto, "message", message);
    define(rt, &proto, "activated", activated);
    define(rt, &proto, "argCount", arg_count);
    define(rt, &proto, "evalArgAt", eval_arg_at);
}

fn receiver<'a>(rt: &Runtime, act: &'a Activation<'_>) -> Result<&'a CallRecord, ControlAction> {
    act.target
        .as_call()
        .ok_or_else(|| wrong_receiver(rt, act, "a call"))
}

/// Locals of the code that sent the message.
fn sender(rt: &Runtime, act: &Activation<'_>) -> EvalResult {
    Ok(receiver(rt, act)?.sender.clone())
}

fn target(rt: &Runtime, act: &Activation<'_>) -> EvalResult {
    Ok(receiver(rt, act)?.target.clone())
}

/// The call-site message, as a Message object.
fn message(rt: &Runtime, act: &Activation<'_>) -> EvalResult {
    let call = receiver(rt, act)?;
    Ok(rt.alloc(
        ObjectKind::Message(call.message.clone()),
        vec![rt.protos.message.clone()],
    ))
}

/// The block being run.
fn activated(rt: &Runtime, act: &Activation<'_>) -> EvalResult {
    Ok(receiver(rt, act)?.activated.clone())
}

#[allow(
    clippy::cast_precision_loss,
    reason = "argument counts are far below 2^52"
)]
fn arg_count(rt: &Runtime, act: &Activation<'_>) -> EvalResult {
    let call = receiver(rt, act)?;
    Ok(rt.number(call.message.message().args.len() as f64))
}

/// `call evalArgAt(i)`: evaluate call-site argument `i` in the sender.
fn eval_arg_at(rt: &Runtime, act: &Activation<'_>) -> EvalResult {
    let call = receiver(rt, act)?;
    let requested = number_arg(rt, act, 0)?;
    let count = call.message.message().args.len();
    match as_index(requested).filter(|&index| index < count) {
        Some(index) => rt.eval_arg(&call.message, index, &call.sender),
        None => fail(EvalErrorKind::ArgumentOutOfRange {
            index: requested,
            count,
        }),
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::float_cmp,
    reason = "only non-negative whole numbers below usize::MAX are converted"
)]
fn as_index(n: f64) -> Option<usize> {
    (n >= 0.0 && n.trunc() == n && n < usize::MAX as f64).then(|| n as usize)
}
