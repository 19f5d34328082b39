//! The lexer state machine.
//!
//! # States
//!
//! `Start` skips horizontal whitespace and dispatches on one character of
//! lookahead (two for `.`, three for `"`). Single-character tokens are
//! emitted straight from `Start`; multi-character classes hand over to
//! `Identifier`, `Operator`, `Number` or `String`, each of which emits one
//! token and returns to `Start`. A malformed token or end of input moves to
//! `Done`, after which the iterator is fused.

use io_ir::Span;
use tracing::trace;

use crate::cursor::Cursor;
use crate::{CharSource, LexError, LexErrorKind, Token, TokenKind};

/// Characters that form operator runs.
const OPERATOR_CHARS: &str = "!$%&'*+-/:<=>?@\\^|~";

/// Horizontal whitespace skipped between tokens.
const SPACE_CHARS: &str = " \r\x0c\t\x0b";

#[inline]
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

#[inline]
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.' || !c.is_ascii()
}

#[inline]
fn is_operator(c: char) -> bool {
    OPERATOR_CHARS.contains(c)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    Start,
    Identifier,
    Operator,
    Number,
    String,
    Done,
}

/// Result of running one state: the token to emit, if any, and the state
/// to run next.
struct Transition {
    emit: Option<Token>,
    next: State,
}

impl Transition {
    fn to(next: State) -> Self {
        Transition { emit: None, next }
    }

    fn emit(token: Token) -> Self {
        Transition {
            emit: Some(token),
            next: State::Start,
        }
    }

    fn fail(token: Token) -> Self {
        Transition {
            emit: Some(token),
            next: State::Done,
        }
    }
}

/// Pull-based lexer over a character source.
///
/// Yields tokens in source order. A [`TokenKind::Malformed`] token is
/// always the last one produced; a read error from the source surfaces as
/// such a token.
pub struct Lexer<S> {
    cursor: Cursor<S>,
    state: State,
}

impl<S: CharSource> Lexer<S> {
    pub fn new(source: S) -> Self {
        Lexer {
            cursor: Cursor::new(source),
            state: State::Start,
        }
    }

    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.cursor.offset())
    }

    fn run(&mut self, state: State) -> Transition {
        match state {
            State::Start => self.start(),
            State::Identifier => self.identifier(),
            State::Operator => self.operator(),
            State::Number => self.number(),
            State::String => self.string(),
            State::Done => Transition::to(State::Done),
        }
    }

    /// Token for `value` if the source is still healthy, otherwise a
    /// malformed token carrying the read error.
    fn finish(&mut self, kind: TokenKind, value: String, start: u32) -> Transition {
        let span = self.span_from(start);
        match self.cursor.take_error() {
            Some(err) => Transition::fail(Token::malformed(
                value,
                LexError::new(LexErrorKind::Read(err), span),
            )),
            None => Transition::emit(Token::new(kind, value, span)),
        }
    }

    fn error(&self, kind: LexErrorKind, value: String, start: u32) -> Transition {
        Transition::fail(Token::malformed(
            value,
            LexError::new(kind, self.span_from(start)),
        ))
    }

    // ─── Start ─────────────────────────────────────────────────────

    fn start(&mut self) -> Transition {
        while self.cursor.current().is_some_and(|c| SPACE_CHARS.contains(c)) {
            self.cursor.bump();
        }

        let start = self.cursor.offset();
        let Some(c) = self.cursor.current() else {
            return match self.cursor.take_error() {
                Some(err) => Transition::fail(Token::malformed(
                    String::new(),
                    LexError::new(LexErrorKind::Read(err), Span::point(start)),
                )),
                None => Transition::to(State::Done),
            };
        };

        let single = |lexer: &mut Self, kind| {
            lexer.cursor.bump();
            Transition::emit(Token::new(kind, c, lexer.span_from(start)))
        };

        match c {
            ';' | '\n' => single(self, TokenKind::Separator),
            '(' | '[' | '{' => single(self, TokenKind::Open),
            ')' | ']' | '}' => single(self, TokenKind::Close),
            ',' => single(self, TokenKind::Comma),
            '0'..='9' => Transition::to(State::Number),
            // `.5` is a number; `.foo` is an identifier.
            '.' if self.cursor.peek(1).is_some_and(|d| d.is_ascii_digit()) => {
                Transition::to(State::Number)
            }
            '.' => Transition::to(State::Identifier),
            '"' => Transition::to(State::String),
            c if is_ident_start(c) => Transition::to(State::Identifier),
            c if is_operator(c) => Transition::to(State::Operator),
            found => {
                self.cursor.bump();
                self.error(
                    LexErrorKind::UnexpectedChar { found },
                    found.to_string(),
                    start,
                )
            }
        }
    }

    // ─── Identifiers & Operators ───────────────────────────────────

    fn identifier(&mut self) -> Transition {
        let start = self.cursor.offset();
        let mut text = String::new();
        self.cursor.eat_while(is_ident_continue, &mut text);
        self.finish(TokenKind::Identifier, text, start)
    }

    fn operator(&mut self) -> Transition {
        let start = self.cursor.offset();
        let mut text = String::new();
        self.cursor.eat_while(is_operator, &mut text);
        self.finish(TokenKind::Identifier, text, start)
    }

    // ─── Numbers ───────────────────────────────────────────────────

    fn number(&mut self) -> Transition {
        let start = self.cursor.offset();
        let mut text = String::new();
        self.cursor.eat_while(|c| c.is_ascii_digit(), &mut text);

        if let Some(marker @ ('x' | 'X')) = self.cursor.current() {
            if text != "0" {
                self.cursor.bump();
                return self.error(
                    LexErrorKind::InvalidHexPrefix {
                        prefix: text.clone(),
                    },
                    text,
                    start,
                );
            }
            self.cursor.bump();
            text.push(marker);
            let digits_start = text.len();
            self.cursor.eat_while(|c| c.is_ascii_hexdigit(), &mut text);
            if text.len() == digits_start {
                return self.error(LexErrorKind::EmptyHex, text, start);
            }
            return self.finish(TokenKind::HexNumber, text, start);
        }

        if self.cursor.current() == Some('.') {
            self.cursor.bump();
            text.push('.');
            if !self.cursor.current().is_some_and(|c| c.is_ascii_digit()) {
                return self.error(LexErrorKind::MissingFraction, text, start);
            }
            self.cursor.eat_while(|c| c.is_ascii_digit(), &mut text);
        }

        if let Some(marker @ ('e' | 'E')) = self.cursor.current() {
            self.cursor.bump();
            text.push(marker);
            if let Some(sign @ ('+' | '-')) = self.cursor.current() {
                self.cursor.bump();
                text.push(sign);
            }
            let digits_start = text.len();
            self.cursor.eat_while(|c| c.is_ascii_digit(), &mut text);
            if text.len() == digits_start {
                return self.error(LexErrorKind::EmptyExponent, text, start);
            }
        }

        self.finish(TokenKind::Number, text, start)
    }

    // ─── Strings ───────────────────────────────────────────────────

    fn string(&mut self) -> Transition {
        if self.cursor.looking_at("\"\"\"") {
            self.triquote()
        } else {
            self.monoquote()
        }
    }

    fn monoquote(&mut self) -> Transition {
        let start = self.cursor.offset();
        let mut text = String::new();
        if let Some(open) = self.cursor.bump() {
            text.push(open);
        }
        loop {
            let Some(c) = self.cursor.bump() else {
                return self.unterminated(LexErrorKind::UnterminatedString, text, start);
            };
            text.push(c);
            match c {
                '"' => return self.finish(TokenKind::String, text, start),
                '\\' => {
                    // The escaped character never terminates the string.
                    let Some(escaped) = self.cursor.bump() else {
                        return self.unterminated(LexErrorKind::UnterminatedString, text, start);
                    };
                    text.push(escaped);
                }
                _ => {}
            }
        }
    }

    fn triquote(&mut self) -> Transition {
        let start = self.cursor.offset();
        let mut text = String::new();
        for _ in 0..3 {
            if let Some(quote) = self.cursor.bump() {
                text.push(quote);
            }
        }
        loop {
            if self.cursor.looking_at("\"\"\"") {
                for _ in 0..3 {
                    self.cursor.bump();
                }
                text.push_str("\"\"\"");
                return self.finish(TokenKind::TriQuote, text, start);
            }
            let Some(c) = self.cursor.bump() else {
                return self.unterminated(LexErrorKind::UnterminatedTriQuote, text, start);
            };
            text.push(c);
        }
    }

    /// End of input inside a literal: a read error wins over the
    /// unterminated-literal error.
    fn unterminated(&mut self, kind: LexErrorKind, text: String, start: u32) -> Transition {
        let kind = match self.cursor.take_error() {
            Some(err) => LexErrorKind::Read(err),
            None => kind,
        };
        self.error(kind, text, start)
    }
}

impl<S: CharSource> Iterator for Lexer<S> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if self.state == State::Done {
                return None;
            }
            let Transition { emit, next } = self.run(self.state);
            trace!(from = ?self.state, to = ?next, "lexer transition");
            self.state = next;
            if emit.is_some() {
                return emit;
            }
        }
    }
}
