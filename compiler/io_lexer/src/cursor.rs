//! Lookahead cursor over a [`CharSource`].
//!
//! The lexer needs at most three characters of lookahead (`"""` detection)
//! and never unreads. Characters are pulled from the source lazily, so a
//! consumer that stops early never causes the rest of the input to be read.
//!
//! A read error is parked behind the characters already buffered and only
//! surfaces once the cursor reaches it.

use std::collections::VecDeque;

use crate::source::{CharSource, SourceError};

pub(crate) struct Cursor<S> {
    source: S,
    lookahead: VecDeque<char>,
    /// Source reported end of input or an error; stop pulling.
    exhausted: bool,
    error: Option<SourceError>,
    /// Byte offset of the next character to be consumed.
    offset: u32,
}

impl<S: CharSource> Cursor<S> {
    pub(crate) fn new(source: S) -> Self {
        Cursor {
            source,
            lookahead: VecDeque::with_capacity(4),
            exhausted: false,
            error: None,
            offset: 0,
        }
    }

    fn fill(&mut self, count: usize) {
        while !self.exhausted && self.lookahead.len() < count {
            match self.source.next_char() {
                Ok(Some(c)) => self.lookahead.push_back(c),
                Ok(None) => self.exhausted = true,
                Err(e) => {
                    self.exhausted = true;
                    self.error = Some(e);
                }
            }
        }
    }

    /// Character `n` positions ahead, or `None` at end of input or at a
    /// read error.
    #[inline]
    pub(crate) fn peek(&mut self, n: usize) -> Option<char> {
        self.fill(n + 1);
        self.lookahead.get(n).copied()
    }

    #[inline]
    pub(crate) fn current(&mut self) -> Option<char> {
        self.peek(0)
    }

    /// True if the next `text.len()` characters equal `text`.
    pub(crate) fn looking_at(&mut self, text: &str) -> bool {
        text.chars()
            .enumerate()
            .all(|(i, expected)| self.peek(i) == Some(expected))
    }

    /// Consume and return the current character.
    pub(crate) fn bump(&mut self) -> Option<char> {
        self.fill(1);
        let c = self.lookahead.pop_front()?;
        #[allow(
            clippy::cast_possible_truncation,
            reason = "len_utf8 is at most 4"
        )]
        let width = c.len_utf8() as u32;
        self.offset = self.offset.saturating_add(width);
        Some(c)
    }

    /// Consume characters while `pred` holds, appending them to `out`.
    pub(crate) fn eat_while(&mut self, pred: impl Fn(char) -> bool, out: &mut String) {
        while let Some(c) = self.current() {
            if !pred(c) {
                break;
            }
            out.push(c);
            self.bump();
        }
    }

    /// The read error at the current position, if the cursor has reached it.
    pub(crate) fn take_error(&mut self) -> Option<SourceError> {
        if self.lookahead.is_empty() {
            self.error.take()
        } else {
            None
        }
    }

    #[inline]
    pub(crate) fn offset(&self) -> u32 {
        self.offset
    }
}
