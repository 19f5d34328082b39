//! Runtime errors and non-local control flow.
//!
//! Every evaluation step returns [`EvalResult`]. The `Err` side carries a
//! [`ControlAction`]: either a real error or a `return` unwinding to the
//! nearest block activation. Using one channel for both lets `?` stop the
//! remaining sibling messages in either case.

use std::fmt;

use io_ir::Span;
use io_parse::ParseError;

use crate::Value;

/// Result of evaluating a message, chain, or activation.
pub type EvalResult = Result<Value, ControlAction>;

/// What went wrong at runtime.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EvalErrorKind {
    /// No slot with this name on the receiver or its protos, and no
    /// `forward` either.
    #[error("slot '{name}' not found")]
    SlotNotFound { name: String },
    /// Block activations nested deeper than the configured limit.
    #[error("maximum call depth of {limit} exceeded")]
    StackOverflow { limit: usize },
    /// A built-in was sent with too few arguments.
    #[error("'{slot}' requires argument {index}")]
    MissingArgument { slot: String, index: usize },
    /// A built-in argument evaluated to the wrong kind of object.
    #[error("'{slot}' expects {expected} for argument {index}")]
    WrongArgumentType {
        slot: String,
        index: usize,
        expected: &'static str,
    },
    /// `call evalArgAt(i)` with no argument `i` at the call site.
    #[error("argument {index} out of range for a call with {count} arguments")]
    ArgumentOutOfRange { index: f64, count: usize },
    /// A built-in was sent to the wrong kind of object.
    #[error("'{slot}' must be sent to {expected}")]
    WrongReceiver { slot: String, expected: &'static str },
    /// Source handed to `do_string` did not parse.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// A runtime error, with the span of the message that raised it when known.
#[derive(Clone, Debug, PartialEq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub span: Option<Span>,
}

impl EvalError {
    pub fn new(kind: EvalErrorKind) -> Self {
        EvalError { kind, span: None }
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Attach `span` unless the error already has one.
    #[must_use]
    pub fn with_span_if_missing(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.kind, self.span) {
            // Parse errors already say where they happened.
            (EvalErrorKind::Parse(_), _) | (_, None) => write!(f, "{}", self.kind),
            (kind, Some(span)) => write!(f, "{kind} at {span}"),
        }
    }
}

impl std::error::Error for EvalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            EvalErrorKind::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ParseError> for EvalError {
    fn from(err: ParseError) -> Self {
        let span = err.span;
        EvalError::new(EvalErrorKind::Parse(err)).with_span(span)
    }
}

/// Why evaluation of a chain stopped early.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlAction {
    /// `return(value)`: unwound to the nearest block activation, which
    /// produces `value` as its result.
    Return(Value),
    /// A runtime error, propagated to the top-level driver.
    Error(Box<EvalError>),
}

impl ControlAction {
    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, ControlAction::Error(_))
    }

    /// Attach `span` to an error that does not have one yet.
    #[must_use]
    pub fn with_span_if_error(self, span: Span) -> Self {
        match self {
            ControlAction::Error(err) => {
                ControlAction::Error(Box::new((*err).with_span_if_missing(span)))
            }
            other => other,
        }
    }

    /// Resolve at a boundary that absorbs `return`: the returned value
    /// becomes the result, errors stay errors.
    pub fn into_result(self) -> Result<Value, EvalError> {
        match self {
            ControlAction::Return(value) => Ok(value),
            ControlAction::Error(err) => Err(*err),
        }
    }
}

impl From<EvalError> for ControlAction {
    fn from(err: EvalError) -> Self {
        ControlAction::Error(Box::new(err))
    }
}

impl From<EvalErrorKind> for ControlAction {
    fn from(kind: EvalErrorKind) -> Self {
        ControlAction::from(EvalError::new(kind))
    }
}
