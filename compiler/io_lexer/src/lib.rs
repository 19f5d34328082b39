//! Lexer for the Io interpreter core.
//!
//! Turns a character source into a stream of [`Token`]s. The lexer is a
//! hand-written state machine with no backtracking: each state consumes
//! characters and hands over to the next state, emitting at most one token
//! per transition. It knows nothing about grammar.
//!
//! Two ways to drive it:
//! - [`Lexer`] is a pull-based iterator; the parser asks for the next token
//!   on demand.
//! - [`spawn_lexer`] runs the same state machine on its own thread and hands
//!   tokens over a zero-capacity channel, so lexing and parsing interleave
//!   and the lexer stops as soon as the consumer goes away.

mod cursor;
mod lex_error;
mod lexer;
mod pipeline;
mod source;
mod token;

pub use lex_error::{LexError, LexErrorKind};
pub use lexer::Lexer;
pub use pipeline::{spawn_lexer, TokenReceiver};
pub use source::{CharSource, ReaderSource, SourceError};
pub use token::{Token, TokenKind};

/// Lex a string in full.
///
/// Stops after the first malformed token, which is included in the result.
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source.chars()).collect()
}
