//! Parser for the Io interpreter core.
//!
//! Consumes tokens from `io_lexer` and builds the message tree defined in
//! `io_ir`. There is no operator precedence and no recovery: the first
//! lexical or syntactic error aborts the parse.
//!
//! Entry points:
//! - [`parse`] for an in-memory string
//! - [`parse_source`] for any [`CharSource`] with the inline lexer
//! - [`parse_pipelined`] to lex on a producer thread while parsing
//! - [`parse_with_options`] to choose between the two at runtime
//! - [`parse_tokens`] for an already-lexed token stream

mod error;
mod literal;
mod parser;

use io_ir::{ChainRef, Span, StringInterner};
use io_lexer::{spawn_lexer, CharSource, LexError, LexErrorKind, Lexer, SourceError, Token};
use tracing::debug;

pub use error::{ParseError, ParseErrorKind};

use parser::Parser;

/// How tokens are produced for the parser.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LexMode {
    /// Pull tokens from the lexer on the parsing thread.
    #[default]
    Inline,
    /// Lex on a producer thread and hand tokens over one at a time.
    Pipelined,
}

/// Parser configuration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub lex_mode: LexMode,
}

impl ParseOptions {
    #[must_use]
    pub fn with_lex_mode(mut self, lex_mode: LexMode) -> Self {
        self.lex_mode = lex_mode;
        self
    }
}

/// Parse a complete program held in memory.
///
/// Returns `Ok(None)` for input with no messages (empty, whitespace, or
/// separators only).
pub fn parse(source: &str, interner: &StringInterner) -> Result<Option<ChainRef>, ParseError> {
    parse_tokens(Lexer::new(source.chars()), interner)
}

/// Parse from a character source with the inline lexer.
pub fn parse_source<S: CharSource>(
    source: S,
    interner: &StringInterner,
) -> Result<Option<ChainRef>, ParseError> {
    parse_tokens(Lexer::new(source), interner)
}

/// Parse from a character source, lexing on a separate thread.
///
/// The parse returns as soon as it is done, including when it fails part
/// way through the input; the lexer thread stops on its own afterwards.
pub fn parse_pipelined<S>(source: S, interner: &StringInterner) -> Result<Option<ChainRef>, ParseError>
where
    S: CharSource + Send + 'static,
{
    let tokens = spawn_lexer(source).map_err(|err| {
        ParseError::from(LexError::new(
            LexErrorKind::Read(SourceError::from(err)),
            Span::DUMMY,
        ))
    })?;
    parse_tokens(tokens, interner)
}

/// Parse from a character source the way `options` asks.
pub fn parse_with_options<S>(
    source: S,
    interner: &StringInterner,
    options: ParseOptions,
) -> Result<Option<ChainRef>, ParseError>
where
    S: CharSource + Send + 'static,
{
    debug!(lex_mode = ?options.lex_mode, "parsing");
    match options.lex_mode {
        LexMode::Inline => parse_source(source, interner),
        LexMode::Pipelined => parse_pipelined(source, interner),
    }
}

/// Parse an already-lexed token stream.
pub fn parse_tokens<I>(tokens: I, interner: &StringInterner) -> Result<Option<ChainRef>, ParseError>
where
    I: IntoIterator<Item = Token>,
{
    Parser::new(tokens.into_iter(), interner).parse_program()
}
