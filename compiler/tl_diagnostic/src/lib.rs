//! Diagnostic system for the tinylang front end.
//!
//! Every user-facing problem, lexical, syntactic or semantic, becomes a
//! [`Diagnostic`] pushed into a [`DiagnosticQueue`]. Nothing in the front end
//! aborts on a user error; the queue is inspected once after Sema and an
//! [`ErrorGuaranteed`] blocks the hand-off to codegen.
//!
//! ```text
//! lexer ─┐
//! parser ├──► DiagnosticQueue ──► flush() (sorted by line:col) ──► emitter
//! sema  ─┘
//! ```

mod diagnostic;
pub mod emitter;
mod error_code;
mod guarantee;
pub mod queue;
pub mod span_utils;

pub use diagnostic::{
    already_declared, expected_expression, internal_error, not_declared, unexpected_token,
    Diagnostic, Label, Severity,
};
pub use error_code::ErrorCode;
pub use guarantee::ErrorGuaranteed;
pub use queue::{DiagnosticConfig, DiagnosticQueue};
