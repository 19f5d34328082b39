//! `RuntimeBuilder` for creating a [`Runtime`] with non-default settings.

use std::cell::{Cell, RefCell};

use io_ir::{SharedInterner, StringInterner};
use io_parse::ParseOptions;
use rustc_hash::FxHashMap;
use tracing::debug;

use super::{KnownNames, Protos, Runtime};
use crate::value::Heap;
use crate::builtins;
use crate::print_handler::{stdout_handler, SharedPrintHandler};

/// Deepest nesting of block activations before `StackOverflow`.
pub const DEFAULT_MAX_DEPTH: usize = 10_000;

/// Allocations between two cycle collections.
pub const DEFAULT_COLLECT_THRESHOLD: usize = 10_000;

/// Builder for [`Runtime`].
///
/// Everything is optional:
/// - `interner`: share identifiers with an existing parser (default: fresh)
/// - `max_depth`: activation depth limit (default [`DEFAULT_MAX_DEPTH`])
/// - `collect_threshold`: allocations between cycle collections (default
///   [`DEFAULT_COLLECT_THRESHOLD`])
/// - `print_handler`: where output slots write (default: stdout)
/// - `parse_options`: how `do_source` lexes (default: inline)
#[derive(Default)]
pub struct RuntimeBuilder {
    interner: Option<SharedInterner>,
    max_depth: Option<usize>,
    collect_threshold: Option<usize>,
    print_handler: Option<SharedPrintHandler>,
    parse_options: ParseOptions,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn interner(mut self, interner: SharedInterner) -> Self {
        self.interner = Some(interner);
        self
    }

    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    #[must_use]
    pub fn collect_threshold(mut self, allocations: usize) -> Self {
        self.collect_threshold = Some(allocations);
        self
    }

    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    #[must_use]
    pub fn parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Create the runtime and install the built-in slots.
    pub fn build(self) -> Runtime {
        let interner = self.interner.unwrap_or_else(StringInterner::shared);
        let max_depth = self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH);
        let heap = Heap::new(self.collect_threshold.unwrap_or(DEFAULT_COLLECT_THRESHOLD));
        let runtime = Runtime {
            names: KnownNames::new(&interner),
            interner,
            protos: Protos::new(&heap),
            heap,
            literals: RefCell::new(FxHashMap::default()),
            depth: Cell::new(0),
            max_depth,
            print: self.print_handler.unwrap_or_else(stdout_handler),
            parse_options: self.parse_options,
        };
        builtins::install(&runtime);
        debug!(max_depth, lex_mode = ?runtime.parse_options.lex_mode, "runtime ready");
        runtime
    }
}
