//! Command handlers for the `tlc` CLI.
//!
//! Each handler prints its result to stdout, diagnostics to stderr, and
//! exits with status 1 when anything went wrong.

use tl_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};

use crate::Compilation;

mod check;
mod debug;
mod demangle;
mod emit;

pub use check::check_file;
pub use debug::{lex_file, parse_file, unit_summary};
pub use demangle::demangle_symbol;
pub use emit::emit_file;

/// Read a file from disk, exiting with a user-friendly error message on failure.
pub(super) fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                std::io::ErrorKind::InvalidData => {
                    format!("'{path}' contains invalid UTF-8 data")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}

/// Stderr emitter that resolves spans against `source`.
fn emitter(path: &str, source: &str, color: ColorMode) -> TerminalEmitter<std::io::Stderr> {
    let is_tty = std::io::IsTerminal::is_terminal(&std::io::stderr());
    TerminalEmitter::stderr(color, is_tty).with_source(path, source)
}

/// Print every diagnostic of `compilation`; exit with status 1 on errors.
fn report(path: &str, source: &str, color: ColorMode, compilation: &Compilation) {
    if compilation.diagnostics.is_empty() {
        return;
    }
    let mut emitter = emitter(path, source, color);
    emitter.emit_all(&compilation.diagnostics);
    emitter.emit_summary(compilation.error_count, compilation.warning_count);
    emitter.flush();
    if compilation.has_errors() {
        std::process::exit(1);
    }
}
