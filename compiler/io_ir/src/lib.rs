//! Io IR - the message tree shared by the parser and the evaluator.
//!
//! This crate contains:
//! - `Span` for byte-range source locations
//! - `Name` and `StringInterner` for interned identifiers
//! - `Symbol`, `Message` and `MessageChain`, the only syntax node kinds
//! - Re-serialization of a chain back to source text
//!
//! # Design Philosophy
//!
//! - **Messages are the only syntax**: literals, operators, brackets and
//!   statement separators are all messages in a chain.
//! - **Chains own their nodes**: a chain is a `Vec<Message>`; arguments are
//!   independently owned sub-chains behind `Arc`, so a block body or a call
//!   site can be retained by the runtime without copying the tree.
//! - **Intern identifiers**: identifier text becomes a `Name(u32)`.

mod interner;
mod message;
mod name;
mod span;
mod to_source;

pub use interner::{InternError, SharedInterner, StringInterner};
pub use message::{ChainRef, Message, MessageChain, MessageRef, Separator, Symbol};
pub use name::Name;
pub use span::Span;
