//! Token types.

use io_ir::Span;

use crate::LexError;

/// Lexical class of a token.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `;` or newline.
    Separator,
    /// Identifier or operator run; the two are not distinguished.
    Identifier,
    /// `(`, `[` or `{`.
    Open,
    /// `)`, `]` or `}`.
    Close,
    Comma,
    /// Decimal number, possibly with fraction and exponent.
    Number,
    /// `0x`-prefixed hexadecimal integer.
    HexNumber,
    /// `"..."` with backslash escapes still encoded.
    String,
    /// `"""..."""`, taken verbatim.
    TriQuote,
    /// Lexing failed here; `Token::error` says why. Always the last token.
    Malformed,
}

/// A lexed token.
///
/// `value` is the exact source text, delimiters included, so the parser
/// decides how to decode literals.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
    pub error: Option<LexError>,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, span: Span) -> Self {
        Token {
            kind,
            value: value.into(),
            span,
            error: None,
        }
    }

    /// Malformed token carrying `error`.
    pub fn malformed(value: impl Into<String>, error: LexError) -> Self {
        Token {
            kind: TokenKind::Malformed,
            value: value.into(),
            span: error.span,
            error: Some(error),
        }
    }

    /// The bracket character of an open or close token.
    pub fn bracket(&self) -> Option<char> {
        match self.kind {
            TokenKind::Open | TokenKind::Close => self.value.chars().next(),
            _ => None,
        }
    }
}
