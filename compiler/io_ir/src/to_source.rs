//! Re-serialization of message chains to source text.
//!
//! The output re-parses to a structurally identical chain: same symbols,
//! same argument arity, same nesting. Formatting is canonical, not the
//! original layout: one space between sends, `, ` between arguments,
//! strings always in plain double quotes with escapes.

use std::fmt::Write;

use crate::{Message, MessageChain, Name, Separator, StringInterner, Symbol};

const SQUARE_BRACKETS: &str = "squareBrackets";
const CURLY_BRACKETS: &str = "curlyBrackets";

impl MessageChain {
    /// Render this chain as source text.
    pub fn to_source(&self, interner: &StringInterner) -> String {
        let mut out = String::new();
        self.write_source(interner, &mut out);
        out
    }

    /// Append this chain's source text to `out`.
    pub fn write_source(&self, interner: &StringInterner, out: &mut String) {
        let messages = self.messages();
        let mut after_newline = true;
        for (i, msg) in messages.iter().enumerate() {
            if !after_newline {
                out.push(' ');
            }
            let bare = msg.write_source(interner, out);
            // `f()(x)`: without the empty group the parens would attach to `f`.
            if bare && messages.get(i + 1).and_then(Message::name) == Some(Name::EMPTY) {
                out.push_str("()");
            }
            after_newline = matches!(msg.symbol, Symbol::Separator(Separator::Newline));
        }
    }
}

impl Message {
    /// Render this message and its arguments as source text.
    pub fn to_source(&self, interner: &StringInterner) -> String {
        let mut out = String::new();
        self.write_source(interner, &mut out);
        out
    }

    /// Returns true if the message was written as a bare identifier.
    fn write_source(&self, interner: &StringInterner, out: &mut String) -> bool {
        match &self.symbol {
            Symbol::Ident(name) => return self.write_send(*name, interner, out),
            Symbol::Number(n) => write_number(*n, out),
            Symbol::Str(s) => write_quoted(s, out),
            Symbol::Separator(sep) => out.push(sep.as_char()),
        }
        false
    }

    fn write_send(&self, name: Name, interner: &StringInterner, out: &mut String) -> bool {
        let text = interner.lookup(name);
        let (open, close) = match text {
            SQUARE_BRACKETS => ('[', ']'),
            CURLY_BRACKETS => ('{', '}'),
            "" => ('(', ')'),
            _ => {
                out.push_str(text);
                if self.args.is_empty() {
                    return true;
                }
                ('(', ')')
            }
        };
        out.push(open);
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            arg.write_source(interner, out);
        }
        out.push(close);
        false
    }
}

fn write_number(n: f64, out: &mut String) {
    if n.is_infinite() {
        // Out-of-range literals saturate, so any overflowing literal
        // reads back as the same infinity.
        out.push_str("1e999");
    } else {
        let _ = write!(out, "{n}");
    }
}

fn write_quoted(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_ascii_control() => {
                let _ = write!(out, "\\x{:02x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
