//! Statement actions. Each one appends the new statement to the list the
//! parser is building.

use tl_diagnostic::{Diagnostic, ErrorCode};
use tl_ir::{DeclKind, ExprId, Span, StmtId, StmtKind};

use crate::{QualIdent, Sema};

impl Sema<'_> {
    pub fn act_on_assignment(
        &mut self,
        stmts: &mut Vec<StmtId>,
        span: Span,
        target: ExprId,
        value: ExprId,
    ) {
        let (target_ty, _, target_span) = self.expr_info(target);
        let (value_ty, _, value_span) = self.expr_info(value);

        if !self.is_variable_designator(target) {
            self.report(
                Diagnostic::error(ErrorCode::E2010)
                    .with_message("left side of `:=` is not a variable")
                    .with_label(target_span, "cannot assign to this"),
            );
        } else if let (Some(t), Some(v)) = (target_ty, value_ty) {
            if !self.ast.same_type(t, v) {
                let (expected, found) = (self.type_name(Some(t)), self.type_name(Some(v)));
                self.report(
                    Diagnostic::error(ErrorCode::E2001)
                        .with_message(format!(
                            "type mismatch in assignment: expected {expected}, found {found}"
                        ))
                        .with_label(value_span, format!("expected {expected}"))
                        .with_secondary_label(target_span, format!("this has type {expected}")),
                );
            }
        }

        stmts.push(self.ast.alloc_stmt(StmtKind::Assign { target, value }, span));
    }

    /// A procedure call used as a statement. Any return value is discarded.
    pub fn act_on_proc_call(
        &mut self,
        stmts: &mut Vec<StmtId>,
        span: Span,
        callee: QualIdent,
        args: Vec<ExprId>,
    ) {
        if let Some(proc) = self.check_call(callee, &args) {
            stmts.push(self.ast.alloc_stmt(StmtKind::Call { proc, args }, span));
        }
    }

    pub fn act_on_if_statement(
        &mut self,
        stmts: &mut Vec<StmtId>,
        span: Span,
        cond: ExprId,
        then_branch: Vec<StmtId>,
        else_branch: Vec<StmtId>,
    ) {
        self.check_condition(cond, "IF");
        stmts.push(self.ast.alloc_stmt(
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            },
            span,
        ));
    }

    pub fn act_on_while_statement(
        &mut self,
        stmts: &mut Vec<StmtId>,
        span: Span,
        cond: ExprId,
        body: Vec<StmtId>,
    ) {
        self.check_condition(cond, "WHILE");
        stmts.push(self.ast.alloc_stmt(StmtKind::While { cond, body }, span));
    }

    /// `RETURN [expr]`, checked against the innermost procedure's result.
    /// A module body has no result.
    pub fn act_on_return_statement(
        &mut self,
        stmts: &mut Vec<StmtId>,
        span: Span,
        value: Option<ExprId>,
    ) {
        let ret = self
            .scopes
            .current_owner()
            .and_then(|owner| match self.ast.decl(owner).kind {
                DeclKind::Proc { ret, .. } => ret,
                _ => None,
            });

        match (ret, value) {
            (None, Some(value)) => {
                let value_span = self.ast.expr(value).span;
                self.report(
                    Diagnostic::error(ErrorCode::E2012)
                        .with_message("RETURN with a value outside a function procedure")
                        .with_label(value_span, "no result expected"),
                );
            }
            (Some(ret), None) => {
                let expected = self.type_name(Some(ret));
                self.report(
                    Diagnostic::error(ErrorCode::E2012)
                        .with_message(format!("RETURN needs a value of type {expected}"))
                        .with_label(span, "missing value"),
                );
            }
            (Some(ret), Some(value)) => {
                let (value_ty, _, value_span) = self.expr_info(value);
                if let Some(value_ty) = value_ty {
                    if !self.ast.same_type(ret, value_ty) {
                        let expected = self.type_name(Some(ret));
                        let found = self.type_name(Some(value_ty));
                        self.report(
                            Diagnostic::error(ErrorCode::E2012)
                                .with_message(format!(
                                    "RETURN type mismatch: expected {expected}, found {found}"
                                ))
                                .with_label(value_span, format!("expected {expected}")),
                        );
                    }
                }
            }
            (None, None) => {}
        }

        stmts.push(self.ast.alloc_stmt(StmtKind::Return(value), span));
    }

    fn check_condition(&mut self, cond: ExprId, keyword: &str) {
        let (ty, _, span) = self.expr_info(cond);
        let Some(ty) = ty else {
            return;
        };
        if self.is_boolean(ty) {
            return;
        }
        let found = self.type_name(Some(ty));
        self.report(
            Diagnostic::error(ErrorCode::E2011)
                .with_message(format!("{keyword} condition must be BOOLEAN, found {found}"))
                .with_label(span, "expected BOOLEAN"),
        );
    }
}
