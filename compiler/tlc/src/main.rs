//! tinylang compiler CLI

use tlc::commands::{check_file, demangle_symbol, emit_file, lex_file, parse_file};
use tlc::{init_tracing, parse_compile_options};

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "lex" | "parse" | "check" | "emit" => {
            if args.len() < 3 {
                eprintln!("Usage: tlc {command} <file> [options]");
                std::process::exit(1);
            }
            let options = parse_compile_options(&args[3..]);
            let path = &args[2];
            match command.as_str() {
                "lex" => lex_file(path, &options),
                "parse" => parse_file(path, &options),
                "check" => check_file(path, &options),
                _ => emit_file(path, &options),
            }
        }
        "demangle" => {
            if args.len() < 3 {
                eprintln!("Usage: tlc demangle <symbol>");
                eprintln!("Example: tlc demangle _t4Demo3Run");
                std::process::exit(1);
            }
            demangle_symbol(&args[2]);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("tlc {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("tinylang compiler");
    println!();
    println!("Usage: tlc <command> [options]");
    println!();
    println!("Commands:");
    println!("  lex <file>          Tokenize and display tokens");
    println!("  parse <file>        Parse and display the declarations");
    println!("  check <file>        Check a file and report diagnostics");
    println!("  emit <file>         Print the SSA IR");
    println!("  demangle <symbol>   Decode a mangled symbol name");
    println!("  help                Show this help message");
    println!("  version             Show version information");
    println!();
    println!("Options:");
    println!("  -g, --debug-info    Record scopes and source lines in the IR");
    println!("  --error-limit=<n>   Stop reporting after n errors (default 0 = no limit)");
    println!("  --color=<mode>      Colored diagnostics: auto, always, never");
    println!();
    println!("Units starting with MODULE are modules; anything else is an");
    println!("expression such as `with a, b: a * b`.");
    println!();
    println!("Environment:");
    println!("  RUST_LOG=<filter>   Enable tracing, e.g. RUST_LOG=tl_ssa=debug");
    println!("  TLC_LOG_TREE=1      Show tracing spans as a tree");
    println!();
    println!("Examples:");
    println!("  tlc check demo.mod");
    println!("  tlc emit demo.mod -g");
    println!("  tlc emit area.calc --color=never");
    println!("  tlc demangle _t4Demo3Run");
}
