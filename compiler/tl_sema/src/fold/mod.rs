//! Compile-time evaluation of INTEGER constant expressions.

use tl_ir::{Ast, BinaryOp, DeclKind, ExprId, ExprKind, UnaryOp};
use tl_stack::ensure_sufficient_stack;

/// Evaluate a constant INTEGER expression.
///
/// Returns `None` for anything non-constant, on overflow, and on division
/// by zero. `DIV` truncates toward zero like the generated code does.
pub fn fold_integer(ast: &Ast, expr: ExprId) -> Option<i64> {
    ensure_sufficient_stack(|| fold(ast, expr))
}

fn fold(ast: &Ast, expr: ExprId) -> Option<i64> {
    match &ast.expr(expr).kind {
        ExprKind::IntLit(value) => Some(*value),
        ExprKind::ConstAccess(decl) => match ast.decl(*decl).kind {
            DeclKind::Const { value } => fold_integer(ast, value),
            _ => None,
        },
        ExprKind::Prefix { op, operand } => {
            let value = fold_integer(ast, *operand)?;
            match op {
                UnaryOp::Plus => Some(value),
                UnaryOp::Neg => value.checked_neg(),
                UnaryOp::Not => None,
            }
        }
        ExprKind::Infix { op, lhs, rhs } => {
            let (l, r) = (fold_integer(ast, *lhs)?, fold_integer(ast, *rhs)?);
            match op {
                BinaryOp::Add => l.checked_add(r),
                BinaryOp::Sub => l.checked_sub(r),
                BinaryOp::Mul => l.checked_mul(r),
                BinaryOp::Div => l.checked_div(r),
                BinaryOp::Mod => l.checked_rem(r),
                BinaryOp::Pow => u32::try_from(r).ok().and_then(|r| l.checked_pow(r)),
                _ => None,
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests;
