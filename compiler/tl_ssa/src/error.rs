//! Code generation failures.
//!
//! Sema rejects every program that could trigger one of these, so reaching
//! any of them means an upstream invariant was broken. Lowering stops at the
//! first one.

use tl_ir::Span;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CodegenError {
    /// An error placeholder survived into a unit without errors.
    #[error("error placeholder at {}..{} reached code generation", span.start, span.end)]
    ErrorNode { span: Span },

    /// A node Sema should have typed has no type.
    #[error("untyped {what} at {}..{}", span.start, span.end)]
    Untyped { what: &'static str, span: Span },

    /// A type declaration with no IR counterpart.
    #[error("type `{name}` cannot be lowered")]
    UnsupportedType { name: String },

    /// A nested procedure uses a local of an enclosing procedure.
    #[error("`{name}` is local to an enclosing procedure and cannot be accessed from a nested one")]
    OuterLocal { name: String },

    /// The callee of a call is not a procedure.
    #[error("`{name}` is not a procedure")]
    NotCallable { name: String },

    /// A procedure without a result used as a value.
    #[error("call to `{name}` produces no value")]
    NoValue { name: String },

    /// Any other shape the lowering does not expect.
    #[error("unexpected {what}")]
    Unexpected { what: &'static str },
}
