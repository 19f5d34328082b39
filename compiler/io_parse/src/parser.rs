//! Recursive descent over the token stream.
//!
//! One level of recursion per bracket group. Each level collects the
//! messages of one chain and reports what stopped it: end of input, the
//! closing bracket, or a comma. The caller turns comma-terminated levels
//! into successive arguments.
//!
//! # Bracket attachment
//!
//! `(` directly after a bare identifier supplies that identifier's
//! arguments. Anywhere else (statement start, after a literal, after a send
//! that already has a group) it opens a new message with the empty name.
//! `[` and `{` always open a new `squareBrackets` / `curlyBrackets` send.

use std::sync::Arc;

use io_ir::{ChainRef, Message, MessageChain, Name, Separator, Span, StringInterner, Symbol};
use io_lexer::{LexError, LexErrorKind, Token, TokenKind};
use io_stack::ensure_sufficient_stack;
use tracing::trace;

use crate::error::closer_for;
use crate::literal::{decode_hex, decode_number, decode_string, decode_triquote};
use crate::{ParseError, ParseErrorKind};

/// What ended one level of the recursion.
enum Terminator {
    End,
    Close(Span),
    Comma(Span),
}

pub(crate) struct Parser<'a, I> {
    tokens: I,
    interner: &'a StringInterner,
    square_brackets: Name,
    curly_brackets: Name,
    /// End offset of the last token read; where an unexpected end of input
    /// is reported.
    last_end: u32,
}

impl<'a, I: Iterator<Item = Token>> Parser<'a, I> {
    pub(crate) fn new(tokens: I, interner: &'a StringInterner) -> Self {
        Parser {
            tokens,
            interner,
            square_brackets: interner.intern("squareBrackets"),
            curly_brackets: interner.intern("curlyBrackets"),
            last_end: 0,
        }
    }

    /// Parse the whole input. `None` if it contains no messages.
    pub(crate) fn parse_program(mut self) -> Result<Option<ChainRef>, ParseError> {
        let (_, messages) = self.parse_level(None)?;
        Ok((!messages.is_empty()).then(|| Arc::new(MessageChain::new(messages))))
    }

    fn parse_level(&mut self, open: Option<char>) -> Result<(Terminator, Vec<Message>), ParseError> {
        let mut messages: Vec<Message> = Vec::new();
        // The last message is an identifier a `(` may still attach to.
        let mut callable = false;

        loop {
            let Some(token) = self.tokens.next() else {
                return match open {
                    None => Ok((Terminator::End, messages)),
                    Some(open) => Err(ParseError::new(
                        ParseErrorKind::UnclosedBracket {
                            expected: closer_for(open),
                        },
                        Span::point(self.last_end),
                    )),
                };
            };
            self.last_end = token.span.end;
            let span = token.span;
            let was_callable = std::mem::replace(&mut callable, false);

            match token.kind {
                TokenKind::Malformed => return Err(malformed(token)),
                TokenKind::Separator => {
                    // Separators at the start of a statement carry nothing.
                    let at_statement_start = match messages.last() {
                        Some(last) => last.is_separator(),
                        None => true,
                    };
                    if at_statement_start {
                        continue;
                    }
                    let sep = token
                        .value
                        .chars()
                        .next()
                        .and_then(Separator::from_char)
                        .unwrap_or(Separator::Newline);
                    messages.push(Message::new(Symbol::Separator(sep), span));
                }
                TokenKind::Identifier => {
                    let name = self.interner.intern(&token.value);
                    messages.push(Message::ident(name, span));
                    callable = true;
                }
                TokenKind::Number => {
                    let n = decode_number(&token.value).map_err(|k| ParseError::new(k, span))?;
                    messages.push(Message::new(Symbol::Number(n), span));
                }
                TokenKind::HexNumber => {
                    let n = decode_hex(&token.value).map_err(|k| ParseError::new(k, span))?;
                    messages.push(Message::new(Symbol::Number(n), span));
                }
                TokenKind::String => {
                    let s = decode_string(&token.value).map_err(|k| ParseError::new(k, span))?;
                    messages.push(Message::new(Symbol::Str(s.into()), span));
                }
                TokenKind::TriQuote => {
                    let s = decode_triquote(&token.value).map_err(|k| ParseError::new(k, span))?;
                    messages.push(Message::new(Symbol::Str(s.into()), span));
                }
                TokenKind::Open => {
                    let bracket = token.bracket().unwrap_or('(');
                    let (args, close) = self.parse_args(bracket)?;
                    let full = span.merge(close);
                    match (bracket, messages.last_mut()) {
                        ('(', Some(target)) if was_callable => {
                            target.args = args;
                            target.span = target.span.merge(full);
                        }
                        _ => {
                            let name = match bracket {
                                '[' => self.square_brackets,
                                '{' => self.curly_brackets,
                                _ => Name::EMPTY,
                            };
                            let mut msg = Message::ident(name, full);
                            msg.args = args;
                            messages.push(msg);
                        }
                    }
                }
                TokenKind::Close => {
                    let found = token.bracket().unwrap_or(')');
                    let Some(open) = open else {
                        return Err(ParseError::new(ParseErrorKind::UnexpectedClose { found }, span));
                    };
                    let expected = closer_for(open);
                    if found != expected {
                        return Err(ParseError::new(
                            ParseErrorKind::MismatchedBracket { expected, found },
                            span,
                        ));
                    }
                    return Ok((Terminator::Close(span), messages));
                }
                TokenKind::Comma => {
                    if open.is_none() {
                        return Err(ParseError::new(ParseErrorKind::TopLevelComma, span));
                    }
                    return Ok((Terminator::Comma(span), messages));
                }
            }
        }
    }

    /// Parse the contents of a bracket group up to and including its
    /// closer. Returns the argument chains and the closer's span.
    fn parse_args(&mut self, open: char) -> Result<(Vec<ChainRef>, Span), ParseError> {
        trace!(open = %open, "parsing bracket group");
        let mut args = Vec::new();
        loop {
            let (terminator, messages) = ensure_sufficient_stack(|| self.parse_level(Some(open)))?;
            match terminator {
                Terminator::Comma(span) => {
                    if messages.is_empty() {
                        return Err(ParseError::new(ParseErrorKind::EmptyArgument, span));
                    }
                    args.push(Arc::new(MessageChain::new(messages)));
                }
                Terminator::Close(span) => {
                    if messages.is_empty() {
                        // `f()` has no arguments; `f(1,)` has an empty one.
                        if !args.is_empty() {
                            return Err(ParseError::new(ParseErrorKind::EmptyArgument, span));
                        }
                    } else {
                        args.push(Arc::new(MessageChain::new(messages)));
                    }
                    trace!(open = %open, count = args.len(), "closed bracket group");
                    return Ok((args, span));
                }
                Terminator::End => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnclosedBracket {
                            expected: closer_for(open),
                        },
                        Span::point(self.last_end),
                    ));
                }
            }
        }
    }
}

/// The error a malformed token carries.
fn malformed(token: Token) -> ParseError {
    let error = token.error.unwrap_or_else(|| {
        // Only hand-built token streams produce a malformed token without
        // an error attached.
        let found = token.value.chars().next().unwrap_or('\u{fffd}');
        LexError::new(LexErrorKind::UnexpectedChar { found }, token.span)
    });
    ParseError::from(error)
}

#[cfg(test)]
mod tests;
