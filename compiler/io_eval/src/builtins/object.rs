//! Slots on the base `Object`.

use std::sync::Arc;

use super::{arg, define, name_arg, required_arg, slot_name};
use crate::exec::fail;
use crate::{Activation, Block, ControlAction, EvalErrorKind, EvalResult, ObjectKind, Runtime, Value};

pub(super) fn install(rt: &Runtime) {
    let object = rt.object().clone();

    let singletons = [
        ("Object", rt.protos.object.clone()),
        ("Lobby", rt.protos.lobby.clone()),
        ("nil", rt.protos.nil.clone()),
        ("true", rt.protos.true_.clone()),
        ("false", rt.protos.false_.clone()),
        ("Number", rt.protos.number.clone()),
        ("String", rt.protos.string.clone()),
        ("Block", rt.protos.block.clone()),
        ("Call", rt.protos.call.clone()),
        ("Message", rt.protos.message.clone()),
    ];
    for (name, value) in singletons {
        object.set_slot(rt.interner().intern(name), value);
    }

    define(rt, &object, "block", block);
    define(rt, &object, "method", method);
    define(rt, &object, "return", return_);
    define(rt, &object, "setSlot", set_slot);
    define(rt, &object, "updateSlot", update_slot);
    define(rt, &object, "getSlot", get_slot);
    define(rt, &object, "hasSlot", has_slot);
    define(rt, &object, "clone", clone);
    define(rt, &object, "appendProto", append_proto);
    define(rt, &object, "do", do_);
    define(rt, &object, "thisMessage", this_message);
    define(rt, &object, "print", print);
    define(rt, &object, "println", println);
    define(rt, &object, "writeln", writeln);
}

// ─── Blocks ────────────────────────────────────────────────────────

/// `block(a, b, body)`: a closure over the sender's locals.
fn block(rt: &Runtime, act: &Activation<'_>) -> EvalResult {
    new_block(rt, act, Some(act.locals.clone()))
}

/// `method(a, b, body)`: like `block`, but `self` is the receiver it is
/// activated on, and it activates on lookup.
fn method(rt: &Runtime, act: &Activation<'_>) -> EvalResult {
    new_block(rt, act, None)
}

fn new_block(rt: &Runtime, act: &Activation<'_>, captured_self: Option<Value>) -> EvalResult {
    let msg = act.message.message();
    let Some((body, params)) = msg.args.split_last() else {
        let empty = Block::new(None, Vec::new(), captured_self);
        return Ok(rt.alloc(ObjectKind::Block(empty), vec![rt.protos.block.clone()]));
    };

    let mut arg_names = Vec::with_capacity(params.len());
    for (index, param) in params.iter().enumerate() {
        match param.first_name() {
            Some(name) if param.len() == 1 && param.messages()[0].args.is_empty() => {
                arg_names.push(name);
            }
            _ => {
                return fail(EvalErrorKind::WrongArgumentType {
                    slot: slot_name(rt, act),
                    index,
                    expected: "a parameter name",
                })
            }
        }
    }

    let block = Block::new(Some(Arc::clone(body)), arg_names, captured_self);
    Ok(rt.alloc(ObjectKind::Block(block), vec![rt.protos.block.clone()]))
}

/// `return(value)`: unwind to the nearest block activation.
fn return_(rt: &Runtime, act: &Activation<'_>) -> EvalResult {
    let value = arg(rt, act, 0)?;
    Err(ControlAction::Return(value))
}

// ─── Slots ─────────────────────────────────────────────────────────

/// `setSlot("name", value)`: set on the receiver; the result is `value`.
fn set_slot(rt: &Runtime, act: &Activation<'_>) -> EvalResult {
    let name = name_arg(rt, act, 0)?;
    let value = required_arg(rt, act, 1)?;
    act.target.set_slot(name, value.clone());
    Ok(value)
}

/// `updateSlot("name", value)`: like `setSlot`, but the slot must already
/// be reachable from the receiver.
fn update_slot(rt: &Runtime, act: &Activation<'_>) -> EvalResult {
    let name = name_arg(rt, act, 0)?;
    if act.target.lookup(name).is_none() {
        return fail(EvalErrorKind::SlotNotFound {
            name: rt.interner().lookup(name).to_string(),
        });
    }
    let value = required_arg(rt, act, 1)?;
    act.target.set_slot(name, value.clone());
    Ok(value)
}

/// `getSlot("name")`: the slot value without activating it, or `nil`.
fn get_slot(rt: &Runtime, act: &Activation<'_>) -> EvalResult {
    let name = name_arg(rt, act, 0)?;
    Ok(act.target.lookup(name).unwrap_or_else(|| rt.nil()))
}

fn has_slot(rt: &Runtime, act: &Activation<'_>) -> EvalResult {
    let name = name_arg(rt, act, 0)?;
    Ok(rt.boolean(act.target.lookup(name).is_some()))
}

// ─── Protos ────────────────────────────────────────────────────────

/// A new empty object delegating to the receiver.
fn clone(rt: &Runtime, act: &Activation<'_>) -> EvalResult {
    Ok(rt.clone_of(act.target))
}

fn append_proto(rt: &Runtime, act: &Activation<'_>) -> EvalResult {
    let proto = required_arg(rt, act, 0)?;
    act.target.append_proto(proto);
    Ok(act.target.clone())
}

// ─── Evaluation ────────────────────────────────────────────────────

/// `obj do(...)`: evaluate the argument with `obj` as its locals.
fn do_(rt: &Runtime, act: &Activation<'_>) -> EvalResult {
    rt.eval_arg(act.message, 0, act.target)?;
    Ok(act.target.clone())
}

/// The message currently being sent, as a Message object.
fn this_message(rt: &Runtime, act: &Activation<'_>) -> EvalResult {
    Ok(rt.alloc(
        ObjectKind::Message(act.message.clone()),
        vec![rt.protos.message.clone()],
    ))
}

// ─── Output ────────────────────────────────────────────────────────

fn print(rt: &Runtime, act: &Activation<'_>) -> EvalResult {
    rt.print_handler().print(&rt.display(act.target));
    Ok(act.target.clone())
}

fn println(rt: &Runtime, act: &Activation<'_>) -> EvalResult {
    rt.print_handler().println(&rt.display(act.target));
    Ok(act.target.clone())
}

/// `writeln(a, b, ...)`: each argument's display text, then a newline.
fn writeln(rt: &Runtime, act: &Activation<'_>) -> EvalResult {
    let mut line = String::new();
    for index in 0..act.message.message().args.len() {
        line.push_str(&rt.display(&arg(rt, act, index)?));
    }
    rt.print_handler().println(&line);
    Ok(rt.nil())
}
