//! Evaluator for the Io interpreter core.
//!
//! Runs message chains produced by `io_parse` against a prototype-based
//! object model. Every construct is a message send: identifiers are looked
//! up as slots on the current receiver and the slot value is activated.
//!
//! # Architecture
//!
//! - [`value`]: objects, slots, protos, and lookup
//! - `exec`: chain walking, activation, block invocation
//! - `builtins`: native slots on `Object`, Block, Call and Message
//! - [`Runtime`] / [`RuntimeBuilder`]: built-in objects, configuration, and
//!   the `do_string` driver
//!
//! # Control Flow
//!
//! Evaluation returns [`EvalResult`]. A `return` travels as
//! [`ControlAction::Return`] through the same `Err` channel as runtime
//! errors, so it stops the remaining siblings on the way out. The nearest
//! block activation turns it back into a value; so does the top-level
//! driver.
//!
//! # Memory
//!
//! Objects are reference counted. Cycles, such as a closure stored on the
//! scope it captured, are reclaimed by a collector that runs every
//! `collect_threshold` allocations at the end of a block activation or a
//! program, and on demand through `Runtime::collect_garbage`.
//!
//! # Threading
//!
//! Values are `Rc`-shared and not `Send`. A runtime lives on one thread;
//! only parsing can be moved off it (see `io_parse::LexMode`).

mod builtins;
mod errors;
mod exec;
mod print_handler;
mod runtime;
pub mod value;

pub use errors::{ControlAction, EvalError, EvalErrorKind, EvalResult};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, PrintHandler, SharedPrintHandler,
};
pub use runtime::{Runtime, RuntimeBuilder, DEFAULT_COLLECT_THRESHOLD, DEFAULT_MAX_DEPTH};
pub use value::{Activation, Block, CallRecord, Native, NativeFn, ObjectKind, Value};

#[cfg(test)]
mod tests;
