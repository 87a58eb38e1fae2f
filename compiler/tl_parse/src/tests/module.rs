use pretty_assertions::assert_eq;
use tl_diagnostic::ErrorCode;
use tl_ir::{BinaryOp, DeclId, DeclKind, ExprKind, StmtId, StmtKind, UnaryOp, UnitKind};

use super::parse_source;
use crate::ParseOutput;

fn module_body(output: &ParseOutput) -> (Vec<DeclId>, Vec<StmtId>) {
    let unit = output.unit.as_ref().unwrap();
    assert_eq!(unit.kind, UnitKind::Module);
    match &output.ast.decl(unit.root).kind {
        DeclKind::Module { decls, stmts } => (decls.clone(), stmts.clone()),
        other => panic!("root is not a module: {other:?}"),
    }
}

const DEMO: &str = "\
MODULE Demo;
CONST N = 10;
TYPE Vec = ARRAY [N] OF INTEGER;
  Pair = RECORD a, b: INTEGER END;
VAR v: Vec; p: Pair; i: INTEGER;

PROCEDURE Sum(VAR xs: Vec; n: INTEGER): INTEGER;
VAR s, k: INTEGER;
BEGIN
  s := 0; k := 0;
  WHILE k < n DO s := s + xs[k]; k := k + 1 END;
  RETURN s
END Sum;

BEGIN
  i := 0;
  IF i = 0 THEN p.a := Sum(v, N) ELSE p.b := -1 END
END Demo.
";

#[test]
fn test_full_module_parses_clean() {
    let (output, codes) = parse_source(DEMO);
    assert!(codes.is_empty(), "{codes:?}");

    let (decls, stmts) = module_body(&output);
    let names: Vec<&str> = decls
        .iter()
        .map(|&d| output.interner.lookup(output.ast.decl(d).name))
        .collect();
    assert_eq!(names, vec!["N", "Vec", "Pair", "v", "p", "i", "Sum"]);
    assert_eq!(stmts.len(), 2);

    match &output.ast.decl(decls[1]).kind {
        DeclKind::ArrayType { len, .. } => assert_eq!(*len, 10),
        other => panic!("expected array type, got {other:?}"),
    }
    match &output.ast.decl(decls[6]).kind {
        DeclKind::Proc {
            params, ret, stmts, ..
        } => {
            assert_eq!(params.len(), 2);
            assert_eq!(*ret, Some(output.universe.integer));
            assert_eq!(stmts.len(), 4);
        }
        other => panic!("expected procedure, got {other:?}"),
    }
}

#[test]
fn test_duplicate_variable_reports_once() {
    let (output, codes) = parse_source("MODULE M;\nVAR x, x: INTEGER;\nBEGIN x := 1 END M.\n");
    assert_eq!(codes, vec![ErrorCode::E2002]);
    let (decls, stmts) = module_body(&output);
    assert_eq!(decls.len(), 1);
    assert_eq!(stmts.len(), 1);
}

#[test]
fn test_unterminated_comment_reports_once() {
    let (output, codes) = parse_source("MODULE M;\nBEGIN END M.\n(* never closed");
    assert_eq!(codes, vec![ErrorCode::E0004]);
    assert!(output.unit.is_some());
}

#[test]
fn test_leading_sign_covers_additive_chain() {
    let (output, codes) = parse_source("MODULE M;\nVAR x: INTEGER;\nBEGIN x := -1 + 2 END M.");
    assert!(codes.is_empty(), "{codes:?}");
    let (_, stmts) = module_body(&output);
    let StmtKind::Assign { value, .. } = output.ast.stmt(stmts[0]).kind else {
        panic!("expected assignment");
    };
    let ExprKind::Prefix { op, operand } = output.ast.expr(value).kind else {
        panic!("expected prefix expression");
    };
    assert_eq!(op, UnaryOp::Neg);
    assert!(matches!(
        output.ast.expr(operand).kind,
        ExprKind::Infix {
            op: BinaryOp::Add,
            ..
        }
    ));
}

#[test]
fn test_relation_binds_loosest() {
    let (output, codes) = parse_source("MODULE M;\nVAR b: BOOLEAN;\nBEGIN b := 1 + 2 * 3 < 4 END M.");
    assert!(codes.is_empty(), "{codes:?}");
    let (_, stmts) = module_body(&output);
    let StmtKind::Assign { value, .. } = output.ast.stmt(stmts[0]).kind else {
        panic!("expected assignment");
    };
    let ExprKind::Infix { op, lhs, .. } = output.ast.expr(value).kind else {
        panic!("expected infix expression");
    };
    assert_eq!(op, BinaryOp::Lt);
    assert!(matches!(
        output.ast.expr(lhs).kind,
        ExprKind::Infix {
            op: BinaryOp::Add,
            ..
        }
    ));
}

#[test]
fn test_empty_sequences_and_bare_calls() {
    let src = "MODULE M;\nPROCEDURE P();\nBEGIN END P;\nBEGIN IF TRUE THEN ELSE END; P; P() END M.";
    let (output, codes) = parse_source(src);
    assert!(codes.is_empty(), "{codes:?}");

    let (_, stmts) = module_body(&output);
    assert_eq!(stmts.len(), 3);
    match &output.ast.stmt(stmts[0]).kind {
        StmtKind::If {
            then_branch,
            else_branch,
            ..
        } => {
            assert!(then_branch.is_empty());
            assert!(else_branch.is_empty());
        }
        other => panic!("expected IF, got {other:?}"),
    }
    assert!(matches!(output.ast.stmt(stmts[1]).kind, StmtKind::Call { .. }));
    assert!(matches!(output.ast.stmt(stmts[2]).kind, StmtKind::Call { .. }));
}

#[test]
fn test_qualified_designator_through_module() {
    let (output, codes) = parse_source("MODULE M;\nVAR x: INTEGER;\nBEGIN M.x := 1 END M.");
    assert!(codes.is_empty(), "{codes:?}");
    let (decls, stmts) = module_body(&output);
    let StmtKind::Assign { target, .. } = output.ast.stmt(stmts[0]).kind else {
        panic!("expected assignment");
    };
    assert!(matches!(
        &output.ast.expr(target).kind,
        ExprKind::Designator { decl, selectors } if *decl == decls[0] && selectors.is_empty()
    ));
}

#[test]
fn test_selectors_chain_in_order() {
    let src = "\
MODULE M;
TYPE R = RECORD n: INTEGER END;
  P = POINTER TO R;
  A = ARRAY [3] OF P;
VAR a: A;
BEGIN a[1]^.n := 2 END M.";
    let (output, codes) = parse_source(src);
    assert!(codes.is_empty(), "{codes:?}");
    let (_, stmts) = module_body(&output);
    let StmtKind::Assign { target, .. } = output.ast.stmt(stmts[0]).kind else {
        panic!("expected assignment");
    };
    let ExprKind::Designator { selectors, .. } = &output.ast.expr(target).kind else {
        panic!("expected designator");
    };
    let kinds: Vec<&str> = selectors
        .iter()
        .map(|s| match s.kind {
            tl_ir::SelectorKind::Index(_) => "index",
            tl_ir::SelectorKind::Field { .. } => "field",
            tl_ir::SelectorKind::Deref => "deref",
        })
        .collect();
    assert_eq!(kinds, vec!["index", "deref", "field"]);
}

#[test]
fn test_end_name_mismatch() {
    let (output, codes) = parse_source("MODULE M;\nBEGIN END N.");
    assert_eq!(codes, vec![ErrorCode::E2013]);
    assert!(output.unit.is_some());
}

#[test]
fn test_import_is_accepted_with_warning() {
    let output = crate::parse(
        "MODULE M;\nFROM Lib IMPORT a, b;\nIMPORT c;\nBEGIN END M.",
        tl_diagnostic::DiagnosticConfig::unlimited(),
    );
    assert!(output.diagnostics.has_errors().is_none());
    assert_eq!(output.diagnostics.warning_count(), 2);
    assert!(output.unit.is_some());
}
