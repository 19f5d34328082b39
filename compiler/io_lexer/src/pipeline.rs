//! Lexer on a producer thread.
//!
//! The state machine runs on its own thread and hands each token over a
//! zero-capacity channel: the lexer blocks until the parser takes the
//! previous token, and the parser blocks until the next one exists. There
//! is no buffering beyond that single handoff, so tokens arrive in strict
//! source order.
//!
//! Dropping the [`TokenReceiver`] closes the channel; the lexer notices on
//! its next send and stops without reading the rest of the input. The
//! consumer never waits for the producer: a lexer blocked in a slow read
//! finishes that read on its own and then exits.

use crossbeam::channel::{self, Receiver};
use tracing::{debug, trace};

use crate::{CharSource, Lexer, Token};

/// Consumer end of a pipelined lexer.
pub struct TokenReceiver {
    tokens: Receiver<Token>,
}

/// Start lexing `source` on a new thread.
///
/// Fails only if the thread cannot be spawned.
pub fn spawn_lexer<S>(source: S) -> std::io::Result<TokenReceiver>
where
    S: CharSource + Send + 'static,
{
    let (sender, receiver) = channel::bounded(0);
    // Never joined: the thread ends on its own at end of input or on the
    // first send after the receiver is gone.
    let _detached = std::thread::Builder::new()
        .name("io-lexer".to_string())
        .spawn(move || {
            for token in Lexer::new(source) {
                if sender.send(token).is_err() {
                    trace!("token consumer hung up, lexer stopping");
                    return;
                }
            }
            trace!("lexer reached end of input");
        })?;
    debug!("spawned pipelined lexer");
    Ok(TokenReceiver { tokens: receiver })
}

impl Iterator for TokenReceiver {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.tokens.recv().ok()
    }
}
