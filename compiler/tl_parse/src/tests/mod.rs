//! Parser tests.
//!
//! - `module`: module units, declarations and statements
//! - `calc`: expression units
//! - `recovery`: malformed input, including generated token soup

mod module;

use tl_diagnostic::{DiagnosticConfig, ErrorCode};

use crate::{parse, ParseOutput};

/// Parse with nothing filtered and return the error codes in source order.
fn parse_source(source: &str) -> (ParseOutput, Vec<ErrorCode>) {
    let mut output = parse(source, DiagnosticConfig::unlimited());
    let codes = output
        .diagnostics
        .flush()
        .into_iter()
        .map(|d| d.code)
        .collect();
    (output, codes)
}
