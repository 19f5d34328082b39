//! Object and Message built-ins, and output.

use super::{error_kind, eval, fails, runtime, show};
use crate::EvalErrorKind;
use pretty_assertions::assert_eq;

// ─── Slots ─────────────────────────────────────────────────────────

#[test]
fn set_slot_returns_the_value() {
    let rt = runtime();
    assert_eq!(show(&rt, r#"setSlot("x", "v")"#), "v");
    assert_eq!(show(&rt, "x"), "v");
}

#[test]
fn set_slot_needs_a_string_name() {
    let rt = runtime();
    assert_eq!(error_kind(&rt, "setSlot(1, 2)"), EvalErrorKind::WrongArgumentType {
        slot: "setSlot".to_string(),
        index: 0,
        expected: "a string",
    });
    assert_eq!(
        error_kind(&rt, r#"setSlot("x")"#),
        EvalErrorKind::MissingArgument {
            slot: "setSlot".to_string(),
            index: 1,
        }
    );
}

#[test]
fn update_slot_requires_an_existing_slot() {
    let rt = runtime();
    let err = fails(&rt, r#"updateSlot("ghost", 1)"#);
    assert_eq!(err.kind, EvalErrorKind::SlotNotFound {
        name: "ghost".to_string()
    });
    assert!(err.span.is_some());

    eval(&rt, r#"setSlot("A", Object clone); A setSlot("v", 1); setSlot("a", A clone)"#);
    eval(&rt, r#"a updateSlot("v", 2)"#);
    // Updating an inherited slot shadows it on the receiver.
    assert_eq!(show(&rt, "a v"), "2");
    assert_eq!(show(&rt, "A v"), "1");
}

#[test]
fn get_slot_does_not_activate() {
    let rt = runtime();
    eval(&rt, r#"setSlot("m", method(writeln("ran")))"#);
    assert_eq!(show(&rt, r#"getSlot("m")"#), "method(\nwriteln(\"ran\")\n)");
    assert_eq!(rt.print_handler().output(), "");
    assert!(eval(&rt, r#"getSlot("missing")"#).ptr_eq(&rt.nil()));
}

#[test]
fn has_slot_follows_protos() {
    let rt = runtime();
    eval(&rt, r#"setSlot("A", Object clone); A setSlot("v", 1); setSlot("a", A clone)"#);
    assert_eq!(show(&rt, r#"a hasSlot("v")"#), "true");
    assert_eq!(show(&rt, r#"a hasSlot("w")"#), "false");
}

// ─── Protos ────────────────────────────────────────────────────────

#[test]
fn clone_delegates_to_the_receiver() {
    let rt = runtime();
    let a = eval(&rt, r#"setSlot("A", Object clone)"#);
    let b = eval(&rt, "A clone");
    assert!(!a.ptr_eq(&b));
    let protos = b.protos();
    assert_eq!(protos.len(), 1);
    assert!(protos[0].ptr_eq(&a));
}

#[test]
fn append_proto_returns_the_receiver() {
    let rt = runtime();
    eval(
        &rt,
        r#"
        setSlot("Mixin", Object clone)
        Mixin setSlot("greet", "hello")
        setSlot("o", Object clone)
        "#,
    );
    assert!(eval(&rt, "o appendProto(Mixin)").ptr_eq(&eval(&rt, "o")));
    assert_eq!(show(&rt, "o greet"), "hello");
}

// ─── Evaluation ────────────────────────────────────────────────────

#[test]
fn do_evaluates_with_the_receiver_as_locals() {
    let rt = runtime();
    eval(&rt, r#"setSlot("o", Object clone); o do(setSlot("z", 3))"#);
    assert_eq!(show(&rt, "o z"), "3");
    assert_eq!(show(&rt, r#"hasSlot("z")"#), "false");
}

#[test]
fn this_message_exposes_the_chain() {
    let rt = runtime();
    assert_eq!(show(&rt, "thisMessage name"), "thisMessage");
    assert_eq!(show(&rt, "thisMessage next name"), "next");
    assert!(eval(&rt, "thisMessage previous").ptr_eq(&rt.nil()));
    assert_eq!(show(&rt, "thisMessage(a, b) argCount"), "2");
    assert_eq!(show(&rt, "thisMessage(a, b c) asString"), "thisMessage(a, b c)");
}

#[test]
fn message_name_of_a_literal_is_its_text() {
    let rt = runtime();
    assert_eq!(
        show(&rt, r#""text" thisMessage previous name"#),
        "\"text\""
    );
    assert_eq!(show(&rt, "2.5 thisMessage previous name"), "2.5");
}

// ─── Singletons ────────────────────────────────────────────────────

#[test]
fn singletons_are_shared() {
    let rt = runtime();
    assert!(eval(&rt, "nil").ptr_eq(&rt.nil()));
    assert!(eval(&rt, "true").ptr_eq(&rt.boolean(true)));
    assert!(eval(&rt, "Object").ptr_eq(rt.object()));
    assert!(eval(&rt, "Lobby").ptr_eq(rt.lobby()));
    assert_eq!(show(&rt, "Lobby"), "Lobby");
}

#[test]
fn literal_protos() {
    let rt = runtime();
    assert!(eval(&rt, "1").protos()[0].ptr_eq(&eval(&rt, "Number")));
    assert!(eval(&rt, "\"s\"").protos()[0].ptr_eq(&eval(&rt, "String")));
    assert!(eval(&rt, "block").protos()[0].ptr_eq(&eval(&rt, "Block")));
}

// ─── Output ────────────────────────────────────────────────────────

#[test]
fn print_and_println_write_the_receiver() {
    let rt = runtime();
    assert_eq!(show(&rt, r#""a" print"#), "a");
    eval(&rt, r#"3 println; nil println"#);
    assert_eq!(rt.print_handler().output(), "a3\nnil\n");
}

#[test]
fn writeln_concatenates_arguments() {
    let rt = runtime();
    let result = eval(&rt, r#"writeln("x = ", 1.5, " ", true)"#);
    assert!(result.ptr_eq(&rt.nil()));
    assert_eq!(rt.print_handler().output(), "x = 1.5 true\n");
}
