//! Parse error types.
//!
//! One error aborts the parse of the whole input; there is no recovery.

use io_ir::Span;
use io_lexer::LexError;

/// A parse error and where it happened.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{kind} at {span}")]
pub struct ParseError {
    pub span: Span,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        ParseError { span, kind }
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            span: err.span,
            kind: ParseErrorKind::Lex(err),
        }
    }
}

/// What went wrong while parsing.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ParseErrorKind {
    /// The token stream contained a malformed token.
    #[error("{}", .0.kind)]
    Lex(LexError),
    /// A closing bracket of the wrong family.
    #[error("expected '{expected}', got '{found}'")]
    MismatchedBracket { expected: char, found: char },
    /// A closing bracket with nothing open.
    #[error("unexpected '{found}'")]
    UnexpectedClose { found: char },
    /// End of input with a bracket still open.
    #[error("unexpected end of input, expected '{expected}'")]
    UnclosedBracket { expected: char },
    /// A comma outside any bracket.
    #[error("unexpected ',' outside brackets")]
    TopLevelComma,
    /// `f(,)`, `f(1,)` or `f(1,,2)`.
    #[error("empty argument")]
    EmptyArgument,
    /// A backslash escape the string decoder does not know.
    #[error("invalid escape sequence '{sequence}' in string literal")]
    InvalidEscape { sequence: String },
    /// A number token that does not decode.
    #[error("invalid number literal '{text}'")]
    InvalidNumber { text: String },
    /// A string token without its quotes.
    #[error("invalid string literal '{text}'")]
    InvalidString { text: String },
}

/// Closing character for an opening bracket.
pub(crate) fn closer_for(open: char) -> char {
    match open {
        '[' => ']',
        '{' => '}',
        _ => ')',
    }
}
