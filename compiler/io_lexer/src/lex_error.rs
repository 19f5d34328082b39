//! Lexer error types.

use io_ir::Span;

use crate::SourceError;

/// A lexical error and where it happened.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{kind} at {span}")]
pub struct LexError {
    pub span: Span,
    pub kind: LexErrorKind,
}

/// What went wrong while lexing.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum LexErrorKind {
    /// End of input inside a `"..."` literal.
    #[error("unexpected end of input in string literal")]
    UnterminatedString,
    /// End of input inside a `"""..."""` literal.
    #[error("unexpected end of input in triple-quoted string literal")]
    UnterminatedTriQuote,
    /// `1.` with no digit after the point.
    #[error("expected digit after '.' in number")]
    MissingFraction,
    /// `1e` or `1e+` with no exponent digits.
    #[error("expected digits in exponent")]
    EmptyExponent,
    /// `0x` with no hexadecimal digits.
    #[error("expected hexadecimal digits after '0x'")]
    EmptyHex,
    /// Hex marker after something other than a single `0`, e.g. `12x5`.
    #[error("hexadecimal literal must start with '0x', found '{prefix}x'")]
    InvalidHexPrefix { prefix: String },
    /// A character that starts no token.
    #[error("unexpected character {found:?}")]
    UnexpectedChar { found: char },
    /// The character source failed.
    #[error(transparent)]
    Read(#[from] SourceError),
}

impl LexError {
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        LexError { span, kind }
    }
}
