//! The `emit` command: print the SSA IR of a file.

use super::{read_file, report};
use crate::{compile, CompileOptions, Stage};

pub fn emit_file(path: &str, options: &CompileOptions) {
    let source = read_file(path);
    let compilation = compile(&source, options, Stage::Emit);
    report(path, &source, options.color, &compilation);

    if let Some(module) = &compilation.module {
        print!("{module}");
    }
}
