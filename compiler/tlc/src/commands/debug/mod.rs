//! Debug commands: `lex` and `parse` for inspecting the front end.

use std::fmt::Write;

use tl_diagnostic::emitter::DiagnosticEmitter;
use tl_diagnostic::span_utils::LineOffsetTable;
use tl_diagnostic::DiagnosticQueue;
use tl_ir::{Ast, DeclId, DeclKind, StringInterner, UnitKind};
use tl_parse::ParseOutput;

use super::{emitter, read_file};
use crate::CompileOptions;

/// Lex a file and display the token stream.
pub fn lex_file(path: &str, options: &CompileOptions) {
    let source = read_file(path);
    let mut diagnostics = DiagnosticQueue::with_config(options.diagnostic_config());
    let tokens = tl_lexer::tokenize(&source, &mut diagnostics);
    let lines = LineOffsetTable::build(&source);

    println!("Tokens for '{}' ({} tokens):", path, tokens.len());
    for token in &tokens {
        let (line, col) = lines.offset_to_line_col(&source, token.span.start);
        println!("  {:?} @ {line}:{col}", token.kind);
    }

    let failed = diagnostics.has_errors().is_some();
    let (errors, warnings) = (diagnostics.error_count(), diagnostics.warning_count());
    let diagnostics = diagnostics.flush();
    if !diagnostics.is_empty() {
        let mut emitter = emitter(path, &source, options.color);
        emitter.emit_all(&diagnostics);
        emitter.emit_summary(errors, warnings);
        emitter.flush();
    }
    if failed {
        std::process::exit(1);
    }
}

/// Parse a file and display what Sema declared.
pub fn parse_file(path: &str, options: &CompileOptions) {
    let source = read_file(path);
    let mut output = tl_parse::parse(&source, options.diagnostic_config());

    println!("Parse result for '{path}':");
    print!("{}", unit_summary(&output));

    let failed = output.diagnostics.has_errors().is_some();
    let (errors, warnings) = (
        output.diagnostics.error_count(),
        output.diagnostics.warning_count(),
    );
    let diagnostics = output.diagnostics.flush();
    println!("  Diagnostics: {}", diagnostics.len());
    if !diagnostics.is_empty() {
        let mut emitter = emitter(path, &source, options.color);
        emitter.emit_all(&diagnostics);
        emitter.emit_summary(errors, warnings);
        emitter.flush();
    }
    if failed {
        std::process::exit(1);
    }
}

/// Indented outline of a parsed unit: its kind, node counts and declarations.
pub fn unit_summary(output: &ParseOutput) -> String {
    let ast = &output.ast;
    let interner = &output.interner;
    let mut out = String::new();

    let Some(unit) = &output.unit else {
        let _ = writeln!(out, "  Unit: none");
        return out;
    };
    let root = interner.lookup(ast.decl(unit.root).name);
    match &unit.kind {
        UnitKind::Module => {
            let _ = writeln!(out, "  Unit: module {root}");
        }
        UnitKind::Calc { inputs, .. } => {
            let names: Vec<_> = inputs
                .iter()
                .map(|&input| interner.lookup(ast.decl(input).name))
                .collect();
            let _ = writeln!(out, "  Unit: calc with {}", names.join(", "));
        }
    }
    let _ = writeln!(out, "  Declarations: {}", ast.decl_count());
    let _ = writeln!(out, "  Expressions: {}", ast.expr_count());
    let _ = writeln!(out, "  Statements: {}", ast.stmt_count());

    if let DeclKind::Module { decls, stmts } = &ast.decl(unit.root).kind {
        if unit.kind == UnitKind::Module {
            let _ = writeln!(out);
            let _ = writeln!(out, "Module {root} ({}):", statements(stmts.len()));
            for &decl in decls {
                outline(ast, interner, decl, 1, &mut out);
            }
        }
    }
    out
}

fn outline(ast: &Ast, interner: &StringInterner, id: DeclId, depth: usize, out: &mut String) {
    let decl = ast.decl(id);
    let indent = "  ".repeat(depth);
    let name = interner.lookup(decl.name);
    match &decl.kind {
        DeclKind::Proc {
            params,
            decls,
            stmts,
            ..
        } => {
            let _ = writeln!(
                out,
                "{indent}procedure {name} ({})",
                statements(stmts.len())
            );
            for &child in params.iter().chain(decls) {
                outline(ast, interner, child, depth + 1, out);
            }
        }
        DeclKind::Param { by_ref: true, .. } => {
            let _ = writeln!(out, "{indent}VAR parameter {name}");
        }
        _ => {
            let _ = writeln!(out, "{indent}{} {name}", decl.kind_name());
        }
    }
}

fn statements(count: usize) -> String {
    if count == 1 {
        "1 statement".to_owned()
    } else {
        format!("{count} statements")
    }
}

#[cfg(test)]
mod tests;
