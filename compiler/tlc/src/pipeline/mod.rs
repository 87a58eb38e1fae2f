//! One unit through the whole front end, without touching the terminal.

use tl_diagnostic::{internal_error, Diagnostic};
use tl_ssa::{lower_unit, verify, Module};

use crate::CompileOptions;

/// How far to take a unit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Lex, parse and check.
    Check,
    /// Also generate SSA IR.
    Emit,
}

/// Outcome of compiling one unit.
#[derive(Debug)]
pub struct Compilation {
    /// Sorted by source position.
    pub diagnostics: Vec<Diagnostic>,
    pub error_count: usize,
    pub warning_count: usize,
    /// Present only for [`Stage::Emit`] without errors.
    pub module: Option<Module>,
}

impl Compilation {
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    fn internal(&mut self, message: impl std::fmt::Display) {
        self.diagnostics.push(internal_error(message));
        self.error_count += 1;
    }
}

/// Run `source` up to `stage`.
///
/// Code generation only starts when the front end reported no errors. A
/// code generation failure becomes an internal-error diagnostic.
#[tracing::instrument(level = "debug", skip_all, fields(stage = ?stage))]
pub fn compile(source: &str, options: &CompileOptions, stage: Stage) -> Compilation {
    let mut output = tl_parse::parse(source, options.diagnostic_config());
    let guarantee = output.diagnostics.has_errors();

    let mut compilation = Compilation {
        error_count: output.diagnostics.error_count(),
        warning_count: output.diagnostics.warning_count(),
        diagnostics: output.diagnostics.flush(),
        module: None,
    };

    if stage == Stage::Check || guarantee.is_some() {
        return compilation;
    }

    let Some(unit) = output.unit.as_ref() else {
        compilation.internal("unit without errors has no root");
        return compilation;
    };

    match lower_unit(
        &output.ast,
        &output.interner,
        unit,
        source,
        options.codegen_options(),
    ) {
        Ok(module) => {
            if cfg!(debug_assertions) {
                if let Err(error) = verify(&module) {
                    compilation.internal(error);
                    return compilation;
                }
            }
            tracing::debug!(functions = module.functions.len(), "generated module");
            compilation.module = Some(module);
        }
        Err(error) => compilation.internal(error),
    }
    compilation
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
