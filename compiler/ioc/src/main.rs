//! Io interpreter CLI.

mod commands;

use commands::{init_tracing, lex_file, parse_file, run_file, RunOptions};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "lex" => {
            let Some(path) = args.get(2) else {
                eprintln!("Usage: ioc lex <file.io>");
                std::process::exit(1);
            };
            lex_file(path);
        }
        "parse" => {
            let Some(path) = args.get(2) else {
                eprintln!("Usage: ioc parse <file.io>");
                std::process::exit(1);
            };
            parse_file(path);
        }
        "run" => {
            let mut options = RunOptions::default();
            let mut file_path = None;

            for arg in args.iter().skip(2) {
                if arg == "--pipelined" || arg == "-p" {
                    options.pipelined = true;
                } else if let Some(depth) = arg.strip_prefix("--max-depth=") {
                    match depth.parse() {
                        Ok(depth) => options.max_depth = Some(depth),
                        Err(_) => {
                            eprintln!("error: invalid --max-depth value '{depth}'");
                            std::process::exit(1);
                        }
                    }
                } else if !arg.starts_with('-') && file_path.is_none() {
                    file_path = Some(arg.as_str());
                }
            }

            let Some(path) = file_path else {
                eprintln!("error: missing file path");
                eprintln!("Usage: ioc run <file.io> [--pipelined] [--max-depth=<n>]");
                std::process::exit(1);
            };

            run_file(path, &options);
        }
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Io interpreter core");
    println!();
    println!("Usage: ioc <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <file.io>     Evaluate a program");
    println!("  parse <file.io>   Print the parsed message tree as source");
    println!("  lex <file.io>     Print the token stream");
    println!("  help              Show this message");
    println!();
    println!("Run options:");
    println!("  -p, --pipelined     Lex on a separate thread while parsing");
    println!("  --max-depth=<n>     Activation depth limit");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=io_eval=trace) for diagnostics.");
}
