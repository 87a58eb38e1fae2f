//! The `check` command: run the front end and report diagnostics.

use super::{read_file, report};
use crate::{compile, CompileOptions, Stage};

/// Lex, parse and check a file without generating code.
pub fn check_file(path: &str, options: &CompileOptions) {
    let source = read_file(path);
    let compilation = compile(&source, options, Stage::Check);
    report(path, &source, options.color, &compilation);

    match compilation.warning_count {
        0 => println!("OK: {path}"),
        1 => println!("OK: {path} (1 warning)"),
        n => println!("OK: {path} ({n} warnings)"),
    }
}
