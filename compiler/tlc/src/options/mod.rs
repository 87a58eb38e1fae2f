//! Compile options parsed from command-line flags.

use tl_diagnostic::emitter::ColorMode;
use tl_diagnostic::DiagnosticConfig;
use tl_ssa::CodegenOptions;

/// Everything the driver can be told on the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileOptions {
    /// `--debug-info` / `-g`
    pub debug_info: bool,
    /// `--error-limit=<n>`; 0 means no limit.
    pub error_limit: usize,
    /// `--color=auto|always|never`
    pub color: ColorMode,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            debug_info: false,
            error_limit: DiagnosticConfig::default().error_limit,
            color: ColorMode::Auto,
        }
    }
}

impl CompileOptions {
    pub fn diagnostic_config(&self) -> DiagnosticConfig {
        DiagnosticConfig {
            error_limit: self.error_limit,
            ..DiagnosticConfig::default()
        }
    }

    pub fn codegen_options(&self) -> CodegenOptions {
        CodegenOptions {
            debug_info: self.debug_info,
        }
    }
}

/// Parse option flags, warning about (and skipping) anything unrecognized.
pub fn parse_compile_options(args: &[String]) -> CompileOptions {
    let mut options = CompileOptions::default();

    for arg in args {
        if arg == "--debug-info" || arg == "-g" {
            options.debug_info = true;
        } else if let Some(limit) = arg.strip_prefix("--error-limit=") {
            match limit.parse() {
                Ok(limit) => options.error_limit = limit,
                Err(_) => eprintln!(
                    "warning: invalid error limit '{limit}', using {}",
                    options.error_limit
                ),
            }
        } else if let Some(mode) = arg.strip_prefix("--color=") {
            match mode.parse() {
                Ok(mode) => options.color = mode,
                Err(message) => eprintln!("warning: {message}"),
            }
        } else {
            eprintln!("warning: unknown option '{arg}'");
        }
    }

    options
}

#[cfg(test)]
mod tests;
