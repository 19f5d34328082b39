//! Blocks, methods, and the `call` record.

use super::{error_kind, eval, runtime, show};
use crate::EvalErrorKind;
use pretty_assertions::assert_eq;

// ─── Activation ────────────────────────────────────────────────────

#[test]
fn method_activates_on_lookup() {
    let rt = runtime();
    assert_eq!(show(&rt, r#"setSlot("answer", method(42)); answer"#), "42");
}

#[test]
fn block_does_not_activate_on_lookup() {
    let rt = runtime();
    eval(&rt, r#"setSlot("b", block(42))"#);
    assert_eq!(show(&rt, "b"), "block(\n42\n)");
    assert_eq!(show(&rt, "b call"), "42");
}

#[test]
fn empty_method_returns_nil() {
    let rt = runtime();
    assert!(eval(&rt, r#"setSlot("m", method); m"#).ptr_eq(&rt.nil()));
    assert!(eval(&rt, "block call").ptr_eq(&rt.nil()));
}

#[test]
fn method_self_is_the_receiver() {
    let rt = runtime();
    eval(
        &rt,
        r#"
        setSlot("tag", "lobby")
        setSlot("obj", Object clone)
        obj setSlot("tag", "obj")
        obj setSlot("m", method(self tag))
        obj setSlot("b", block(self tag))
        "#,
    );
    assert_eq!(show(&rt, "obj m"), "obj");
    // A block keeps the locals it was created in.
    assert_eq!(show(&rt, "obj b call"), "lobby");
}

#[test]
fn block_captures_enclosing_activation() {
    let rt = runtime();
    eval(
        &rt,
        r#"
        setSlot("make", method(n, block(self n)))
        setSlot("five", make(5))
        setSlot("six", make(6))
        "#,
    );
    assert_eq!(show(&rt, "five call"), "5");
    assert_eq!(show(&rt, "six call"), "6");
}

#[test]
fn parameters_bind_in_order_with_nil_padding() {
    let rt = runtime();
    eval(&rt, r#"setSlot("second", method(a, b, b))"#);
    assert_eq!(show(&rt, r#"second("x", "y")"#), "y");
    assert!(eval(&rt, r#"second("x")"#).ptr_eq(&rt.nil()));
    // Extra arguments are ignored.
    assert_eq!(show(&rt, r#"second(1, 2, 3)"#), "2");
}

#[test]
fn arguments_evaluate_in_the_sender() {
    let rt = runtime();
    eval(
        &rt,
        r#"
        setSlot("x", "sender's x")
        setSlot("obj", Object clone)
        obj setSlot("x", "receiver's x")
        obj setSlot("id", method(v, v))
        "#,
    );
    assert_eq!(show(&rt, "obj id(x)"), "sender's x");
}

#[test]
fn arguments_evaluate_eagerly_left_to_right() {
    let rt = runtime();
    eval(
        &rt,
        r#"
        setSlot("two", method(a, b, nil))
        two(writeln("first"), writeln("second"))
        "#,
    );
    assert_eq!(rt.print_handler().output(), "first\nsecond\n");
}

#[test]
fn non_identifier_parameter_is_rejected() {
    let rt = runtime();
    assert_eq!(error_kind(&rt, "block(1, 2)"), EvalErrorKind::WrongArgumentType {
        slot: "block".to_string(),
        index: 0,
        expected: "a parameter name",
    });
    assert_eq!(
        error_kind(&rt, "method(a, b c, nil)"),
        EvalErrorKind::WrongArgumentType {
            slot: "method".to_string(),
            index: 1,
            expected: "a parameter name",
        }
    );
}

// ─── Return ────────────────────────────────────────────────────────

#[test]
fn return_skips_the_rest_of_the_body() {
    let rt = runtime();
    eval(
        &rt,
        r#"setSlot("f", method(return("early"); self setSlot("reached", true); "late"))"#,
    );
    assert_eq!(show(&rt, "f"), "early");
    assert_eq!(show(&rt, r#"hasSlot("reached")"#), "false");
}

#[test]
fn return_ends_only_the_innermost_activation() {
    let rt = runtime();
    eval(&rt, r#"setSlot("outer", method(block(return(1)) call; 2))"#);
    assert_eq!(show(&rt, "outer"), "2");
}

#[test]
fn return_without_value_is_nil() {
    let rt = runtime();
    assert!(eval(&rt, r#"setSlot("f", method(return; 1)); f"#).ptr_eq(&rt.nil()));
}

// ─── Call record ───────────────────────────────────────────────────

#[test]
fn call_sender_and_target() {
    let rt = runtime();
    eval(
        &rt,
        r#"
        setSlot("o", Object clone)
        o setSlot("who", method(call target))
        o setSlot("from", method(call sender))
        "#,
    );
    assert!(eval(&rt, "o who").ptr_eq(&eval(&rt, "o")));
    assert!(eval(&rt, "o from").ptr_eq(rt.lobby()));
}

#[test]
fn call_activated_is_the_running_block() {
    let rt = runtime();
    eval(
        &rt,
        r#"
        setSlot("o", Object clone)
        o setSlot("me", method(call activated))
        "#,
    );
    assert!(eval(&rt, "o me").ptr_eq(&eval(&rt, r#"o getSlot("me")"#)));
}

#[test]
fn block_call_target_is_the_block() {
    let rt = runtime();
    eval(&rt, r#"setSlot("b", block(call target))"#);
    assert!(eval(&rt, "b call").ptr_eq(&eval(&rt, "b")));
}

#[test]
fn call_message_and_arg_count() {
    let rt = runtime();
    eval(
        &rt,
        r#"
        setSlot("name", method(call message name))
        setSlot("count", method(call argCount))
        "#,
    );
    assert_eq!(show(&rt, "name"), "name");
    assert_eq!(show(&rt, "count(a, b c, 3)"), "3");
    assert_eq!(show(&rt, "count"), "0");
}

#[test]
fn eval_arg_at_is_lazy_and_uses_the_sender() {
    let rt = runtime();
    eval(
        &rt,
        r#"
        setSlot("y", 7)
        setSlot("second", method(call evalArgAt(1)))
        "#,
    );
    assert_eq!(show(&rt, r#"second(writeln("never"), y)"#), "7");
    assert_eq!(rt.print_handler().output(), "");
}

#[test]
fn eval_arg_at_out_of_range() {
    let rt = runtime();
    eval(&rt, r#"setSlot("at", method(i, call evalArgAt(i)))"#);
    assert_eq!(error_kind(&rt, "at(3)"), EvalErrorKind::ArgumentOutOfRange {
        index: 3.0,
        count: 1,
    });
    assert_eq!(error_kind(&rt, "at(0.5)"), EvalErrorKind::ArgumentOutOfRange {
        index: 0.5,
        count: 1,
    });
}

// ─── Block slots ───────────────────────────────────────────────────

#[test]
fn block_as_string() {
    let rt = runtime();
    assert_eq!(
        show(&rt, "block(a, b, a foo(b)) asString"),
        "block(a, b,\na foo(b)\n)"
    );
    assert_eq!(show(&rt, "method(1) asString"), "method(\n1\n)");
}

#[test]
fn argument_names_are_joined() {
    let rt = runtime();
    assert_eq!(show(&rt, "method(a, b, nil) argumentNames"), "a, b");
    assert_eq!(show(&rt, "block(nil) argumentNames"), "");
}

#[test]
fn set_is_activatable_toggles_lookup_activation() {
    let rt = runtime();
    eval(&rt, r#"setSlot("b", block(42))"#);
    eval(&rt, "b setIsActivatable(true)");
    assert_eq!(show(&rt, "b"), "42");

    eval(&rt, r#"setSlot("m", method(1)); getSlot("m") setIsActivatable(false)"#);
    assert_eq!(show(&rt, "m"), "method(\n1\n)");
}

#[test]
fn block_slots_need_a_block() {
    let rt = runtime();
    assert_eq!(
        error_kind(&rt, r#"Block asString"#),
        EvalErrorKind::WrongReceiver {
            slot: "asString".to_string(),
            expected: "a block",
        }
    );
}
