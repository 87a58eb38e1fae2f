//! Shared data model for the tinylang front end.
//!
//! Everything downstream of the lexer speaks in these types:
//!
//! ```text
//! source ──► Token { kind, span } ──► Ast (arena of Decl / Expr / Stmt)
//!                                          │
//!                                          ▼
//!                                     SSA lowering
//! ```
//!
//! AST nodes live in [`Ast`] and refer to each other through [`DeclId`],
//! [`ExprId`] and [`StmtId`]. Back-references (a declaration's enclosing
//! declaration) are plain ids, so the tree has no ownership cycles.

/// Compile-time assertion that a type has a specific size.
///
/// Used to keep frequently copied types (spans, tokens, ids) small.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod ast;
mod interner;
mod name;
mod span;
mod token;

pub use ast::{
    Ast, BinaryOp, Decl, DeclId, DeclKind, Expr, ExprId, ExprKind, Field, Pervasive, Selector,
    SelectorKind, Stmt, StmtId, StmtKind, UnaryOp, Unit, UnitKind,
};
pub use interner::StringInterner;
pub use name::Name;
pub use span::{Span, SpanError};
pub use token::{Token, TokenKind};
