//! Slots on the Block proto.

use super::{arg, define, wrong_receiver};
use crate::{Activation, Block, ControlAction, EvalResult, Runtime};

pub(super) fn install(rt: &Runtime) {
    let proto = rt.protos.block.clone();
    define(rt, &proto, "call", call);
    define(rt, &proto, "asString", as_string);
    define(rt, &proto, "argumentNames", argument_names);
    define(rt, &proto, "setIsActivatable", set_is_activatable);
}

fn receiver<'a>(rt: &Runtime, act: &'a Activation<'_>) -> Result<&'a Block, ControlAction> {
    act.target
        .as_block()
        .ok_or_else(|| wrong_receiver(rt, act, "a block"))
}

/// `b call(...)`: run the block whether or not it is activatable, with the
/// block itself as the target.
fn call(rt: &Runtime, act: &Activation<'_>) -> EvalResult {
    let block = receiver(rt, act)?;
    rt.activate_block(act.target, block, act.target, act.locals, act.message)
}

fn as_string(rt: &Runtime, act: &Activation<'_>) -> EvalResult {
    let block = receiver(rt, act)?;
    Ok(rt.string(rt.block_source(block)))
}

/// The parameter names joined by `", "`.
fn argument_names(rt: &Runtime, act: &Activation<'_>) -> EvalResult {
    let block = receiver(rt, act)?;
    let names: Vec<&str> = block
        .arg_names
        .iter()
        .map(|name| rt.interner().lookup(*name))
        .collect();
    Ok(rt.string(names.join(", ")))
}

/// `b setIsActivatable(flag)`: whether looking the block up runs it.
fn set_is_activatable(rt: &Runtime, act: &Activation<'_>) -> EvalResult {
    let block = receiver(rt, act)?;
    let flag = arg(rt, act, 0)?;
    block.set_activatable(flag.is_truthy());
    Ok(act.target.clone())
}
