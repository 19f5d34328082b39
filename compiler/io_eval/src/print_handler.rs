//! Where `print`, `println` and `writeln` send their text.
//!
//! - Stdout for the command-line driver (default)
//! - An in-memory buffer for tests and embedding
//! - Silent, to discard output
//!
//! Enum dispatch; the set of handlers is closed.

use std::sync::Arc;

use parking_lot::Mutex;

/// Output sink for the runtime's print slots.
pub enum PrintHandler {
    Stdout,
    Buffer(Mutex<String>),
    Silent,
}

impl PrintHandler {
    /// Write `text` followed by a newline.
    pub fn println(&self, text: &str) {
        match self {
            Self::Stdout => println!("{text}"),
            Self::Buffer(buffer) => {
                let mut buffer = buffer.lock();
                buffer.push_str(text);
                buffer.push('\n');
            }
            Self::Silent => {}
        }
    }

    /// Write `text` as is.
    pub fn print(&self, text: &str) {
        match self {
            Self::Stdout => print!("{text}"),
            Self::Buffer(buffer) => buffer.lock().push_str(text),
            Self::Silent => {}
        }
    }

    /// Everything written so far. Empty unless buffered.
    pub fn output(&self) -> String {
        match self {
            Self::Buffer(buffer) => buffer.lock().clone(),
            Self::Stdout | Self::Silent => String::new(),
        }
    }

    pub fn clear(&self) {
        if let Self::Buffer(buffer) = self {
            buffer.lock().clear();
        }
    }
}

/// Print handler shared between a runtime and whoever reads its output.
pub type SharedPrintHandler = Arc<PrintHandler>;

pub fn stdout_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Stdout)
}

pub fn buffer_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Buffer(Mutex::new(String::new())))
}

pub fn silent_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Silent)
}
