//! Messages and message chains.
//!
//! A program is a chain of messages. Each message has a symbol and an
//! ordered list of argument chains; siblings in one chain are sent one after
//! another, each to the result of the previous one. Statement separators are
//! messages too, so a chain is also a statement list.

use std::sync::Arc;

use crate::{Name, Span};

/// Shared handle to a chain.
///
/// Argument chains are held behind `Arc` so that a block body or a call-site
/// message can be retained by the runtime after parsing.
pub type ChainRef = Arc<MessageChain>;

/// Which character ended a statement.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Separator {
    Semicolon,
    Newline,
}

impl Separator {
    pub fn as_char(self) -> char {
        match self {
            Separator::Semicolon => ';',
            Separator::Newline => '\n',
        }
    }

    /// The separator for a lexed separator character, if it is one.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            ';' => Some(Separator::Semicolon),
            '\n' => Some(Separator::Newline),
            _ => None,
        }
    }
}

/// What a message says.
///
/// Literals carry their already-decoded value so evaluation never re-parses
/// the source text.
#[derive(Clone, Debug, PartialEq)]
pub enum Symbol {
    /// An identifier or operator run, looked up as a slot name.
    Ident(Name),
    /// Decimal or hexadecimal number literal.
    Number(f64),
    /// Quoted or triple-quoted string literal, escapes resolved.
    Str(Arc<str>),
    /// End of a statement.
    Separator(Separator),
}

/// A single node of program structure.
#[derive(Clone, Debug)]
pub struct Message {
    pub symbol: Symbol,
    pub args: Vec<ChainRef>,
    pub span: Span,
}

impl Message {
    pub fn new(symbol: Symbol, span: Span) -> Self {
        Message {
            symbol,
            args: Vec::new(),
            span,
        }
    }

    /// Identifier message with no arguments.
    pub fn ident(name: Name, span: Span) -> Self {
        Self::new(Symbol::Ident(name), span)
    }

    /// The slot name this message sends, if it is an identifier.
    #[inline]
    pub fn name(&self) -> Option<Name> {
        match self.symbol {
            Symbol::Ident(name) => Some(name),
            _ => None,
        }
    }

    #[inline]
    pub fn is_separator(&self) -> bool {
        matches!(self.symbol, Symbol::Separator(_))
    }

    /// Argument chain at `index`.
    #[inline]
    pub fn arg(&self, index: usize) -> Option<&ChainRef> {
        self.args.get(index)
    }

    /// Same symbols, same arity and same nesting; spans are ignored.
    pub fn structurally_eq(&self, other: &Message) -> bool {
        self.symbol == other.symbol
            && self.args.len() == other.args.len()
            && self
                .args
                .iter()
                .zip(&other.args)
                .all(|(a, b)| a.structurally_eq(b))
    }
}

/// An ordered statement list: the top-level program, a block body, or one
/// argument expression.
///
/// Never empty when produced by the parser; an input with no messages
/// parses to no chain at all.
#[derive(Clone, Debug, Default)]
pub struct MessageChain {
    messages: Vec<Message>,
}

impl MessageChain {
    pub fn new(messages: Vec<Message>) -> Self {
        MessageChain { messages }
    }

    #[inline]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    #[inline]
    pub fn first(&self) -> Option<&Message> {
        self.messages.first()
    }

    /// Name of the first message, used for block parameter lists.
    pub fn first_name(&self) -> Option<Name> {
        self.first().and_then(Message::name)
    }

    pub fn structurally_eq(&self, other: &MessageChain) -> bool {
        self.messages.len() == other.messages.len()
            && self
                .messages
                .iter()
                .zip(&other.messages)
                .all(|(a, b)| a.structurally_eq(b))
    }

    /// Span from the first to the last message.
    pub fn span(&self) -> Span {
        match (self.messages.first(), self.messages.last()) {
            (Some(first), Some(last)) => first.span.merge(last.span),
            _ => Span::DUMMY,
        }
    }
}

/// A position inside a shared chain.
///
/// Gives the runtime a handle on one message (for `call message` or
/// `thisMessage`) together with its `next`/`previous` siblings.
#[derive(Clone, Debug)]
pub struct MessageRef {
    chain: ChainRef,
    index: usize,
}

impl MessageRef {
    /// Handle to message `index` of `chain`, or `None` if out of range.
    pub fn new(chain: ChainRef, index: usize) -> Option<Self> {
        (index < chain.len()).then_some(MessageRef { chain, index })
    }

    /// Handles to every message of `chain`, in order.
    pub fn all(chain: &ChainRef) -> impl Iterator<Item = MessageRef> + '_ {
        (0..chain.len()).map(move |index| MessageRef {
            chain: Arc::clone(chain),
            index,
        })
    }

    #[inline]
    pub fn message(&self) -> &Message {
        &self.chain.messages[self.index]
    }

    #[inline]
    pub fn chain(&self) -> &ChainRef {
        &self.chain
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn next(&self) -> Option<MessageRef> {
        Self::new(self.chain.clone(), self.index + 1)
    }

    pub fn previous(&self) -> Option<MessageRef> {
        let index = self.index.checked_sub(1)?;
        Self::new(self.chain.clone(), index)
    }

    /// True if nothing precedes this message in its statement.
    pub fn is_statement_start(&self) -> bool {
        match self.previous() {
            Some(prev) => prev.message().is_separator(),
            None => true,
        }
    }
}
