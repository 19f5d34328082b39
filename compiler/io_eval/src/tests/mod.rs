//! Evaluation tests, run through `do_string`.

mod block_tests;
mod builtins_tests;

use crate::{buffer_handler, EvalError, EvalErrorKind, Runtime, Value};

/// Runtime whose output goes to a buffer.
fn runtime() -> Runtime {
    Runtime::builder().print_handler(buffer_handler()).build()
}

fn eval(rt: &Runtime, source: &str) -> Value {
    rt.do_string(source)
        .unwrap_or_else(|err| panic!("{source:?} failed: {err}"))
}

/// Display text of the result.
fn show(rt: &Runtime, source: &str) -> String {
    rt.display(&eval(rt, source))
}

fn fails(rt: &Runtime, source: &str) -> EvalError {
    match rt.do_string(source) {
        Err(err) => err,
        Ok(value) => panic!("{source:?} should fail, got {value:?}"),
    }
}

fn error_kind(rt: &Runtime, source: &str) -> EvalErrorKind {
    fails(rt, source).kind
}
