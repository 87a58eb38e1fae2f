use pretty_assertions::assert_eq;
use tl_ir::{Decl, Name, Span};

use super::*;

fn lit(ast: &mut Ast, value: i64) -> ExprId {
    ast.alloc_expr(ExprKind::IntLit(value), Span::DUMMY)
}

fn infix(ast: &mut Ast, op: BinaryOp, lhs: ExprId, rhs: ExprId) -> ExprId {
    ast.alloc_expr(ExprKind::Infix { op, lhs, rhs }, Span::DUMMY)
}

#[test]
fn folds_nested_arithmetic() {
    let mut ast = Ast::new();
    let (a, b, c) = (lit(&mut ast, 3), lit(&mut ast, 4), lit(&mut ast, 2));
    let product = infix(&mut ast, BinaryOp::Mul, b, c);
    let sum = infix(&mut ast, BinaryOp::Add, a, product);
    assert_eq!(fold_integer(&ast, sum), Some(11));
}

#[test]
fn folds_through_constants_and_negation() {
    let mut ast = Ast::new();
    let ten = lit(&mut ast, 10);
    let decl = ast.alloc_decl(Decl {
        name: Name::EMPTY,
        span: Span::DUMMY,
        enclosing: None,
        kind: DeclKind::Const { value: ten },
    });
    let access = ast.alloc_expr(ExprKind::ConstAccess(decl), Span::DUMMY);
    let neg = ast.alloc_expr(
        ExprKind::Prefix {
            op: UnaryOp::Neg,
            operand: access,
        },
        Span::DUMMY,
    );
    assert_eq!(fold_integer(&ast, neg), Some(-10));
}

#[test]
fn division_truncates_and_rejects_zero() {
    let mut ast = Ast::new();
    let (a, b, zero) = (lit(&mut ast, -7), lit(&mut ast, 2), lit(&mut ast, 0));
    let div = infix(&mut ast, BinaryOp::Div, a, b);
    let rem = infix(&mut ast, BinaryOp::Mod, a, b);
    let by_zero = infix(&mut ast, BinaryOp::Div, a, zero);
    assert_eq!(fold_integer(&ast, div), Some(-3));
    assert_eq!(fold_integer(&ast, rem), Some(-1));
    assert_eq!(fold_integer(&ast, by_zero), None);
}

#[test]
fn overflow_is_not_a_constant() {
    let mut ast = Ast::new();
    let (max, one) = (lit(&mut ast, i64::MAX), lit(&mut ast, 1));
    let sum = infix(&mut ast, BinaryOp::Add, max, one);
    assert_eq!(fold_integer(&ast, sum), None);
}

#[test]
fn non_integer_forms_do_not_fold() {
    let mut ast = Ast::new();
    let t = ast.alloc_expr(ExprKind::BoolLit(true), Span::DUMMY);
    let err = ast.alloc_expr(ExprKind::Error, Span::DUMMY);
    assert_eq!(fold_integer(&ast, t), None);
    assert_eq!(fold_integer(&ast, err), None);
}

#[test]
fn deep_left_chain_folds() {
    let mut ast = Ast::new();
    let mut sum = lit(&mut ast, 1);
    for _ in 0..200_000 {
        let zero = lit(&mut ast, 0);
        sum = infix(&mut ast, BinaryOp::Add, sum, zero);
    }
    assert_eq!(fold_integer(&ast, sum), Some(1));
}
