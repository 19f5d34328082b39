//! Command implementations.

use std::fs::File;
use std::io::BufReader;
use std::sync::Once;

use io_eval::Runtime;
use io_ir::StringInterner;
use io_lexer::{tokenize, ReaderSource};
use io_parse::{parse, LexMode, ParseOptions};
use tracing::debug;

static TRACING_INIT: Once = Once::new();

/// Install a tracing subscriber if `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

/// Options for `ioc run`.
#[derive(Debug, Default)]
pub struct RunOptions {
    /// Lex on a background thread, reading the file incrementally.
    pub pipelined: bool,
    pub max_depth: Option<usize>,
}

fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => fail_read(path, &e),
    }
}

fn fail_read(path: &str, e: &std::io::Error) -> ! {
    let msg = match e.kind() {
        std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
        std::io::ErrorKind::PermissionDenied => format!("permission denied reading '{path}'"),
        std::io::ErrorKind::InvalidData => format!("'{path}' contains invalid UTF-8 data"),
        _ => format!("error reading '{path}': {e}"),
    };
    eprintln!("{msg}");
    std::process::exit(1);
}

/// Print the token stream of a file.
pub fn lex_file(path: &str) {
    let content = read_file(path);
    let tokens = tokenize(&content);

    println!("Tokens for '{}' ({} tokens):", path, tokens.len());
    for token in &tokens {
        match &token.error {
            Some(err) => println!("  {:?} {:?} @ {} ({})", token.kind, token.value, token.span, err.kind),
            None => println!("  {:?} {:?} @ {}", token.kind, token.value, token.span),
        }
    }
}

/// Parse a file and print the message tree back as source.
pub fn parse_file(path: &str) {
    let content = read_file(path);
    let interner = StringInterner::new();
    match parse(&content, &interner) {
        Ok(Some(chain)) => println!("{}", chain.to_source(&interner)),
        Ok(None) => println!("(empty program)"),
        Err(err) => {
            eprintln!("parse error in '{path}': {err}");
            std::process::exit(1);
        }
    }
}

/// Evaluate a file; runtime and parse errors go to stderr with exit code 1.
pub fn run_file(path: &str, options: &RunOptions) {
    let mut builder = Runtime::builder();
    if let Some(depth) = options.max_depth {
        builder = builder.max_depth(depth);
    }

    if options.pipelined {
        builder = builder.parse_options(ParseOptions::default().with_lex_mode(LexMode::Pipelined));
    }
    let runtime = builder.build();
    debug!(path, max_depth = runtime.max_depth(), "running");

    let result = if options.pipelined {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => fail_read(path, &e),
        };
        runtime.do_source(ReaderSource::new(BufReader::new(file)))
    } else {
        runtime.do_string(&read_file(path))
    };
    debug!(live_objects = runtime.live_objects(), "finished");

    if let Err(err) = result {
        eprintln!("error in '{path}': {err}");
        std::process::exit(1);
    }
}
