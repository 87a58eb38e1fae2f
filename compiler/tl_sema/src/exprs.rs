//! Expression actions and operator typing.

use smallvec::SmallVec;
use tl_diagnostic::{Diagnostic, ErrorCode};
use tl_ir::{
    BinaryOp, DeclId, DeclKind, ExprId, ExprKind, Selector, SelectorKind, Span, UnaryOp,
};

use crate::{Ident, QualIdent, Sema};

impl Sema<'_> {
    /// Placeholder for an expression the parser could not build.
    pub fn act_on_error_expression(&mut self, span: Span) -> ExprId {
        self.ast.alloc_expr(ExprKind::Error, span)
    }

    pub fn act_on_integer_literal(&mut self, span: Span, text: &str) -> ExprId {
        // The lexer already reported malformed literals.
        let value = tl_lexer::integer_value(text).unwrap_or(0);
        let id = self.ast.alloc_expr(ExprKind::IntLit(value), span);
        self.ast.annotate_expr(id, Some(self.universe.integer), true);
        id
    }

    /// Any infix operator: relations, adding and multiplying operators.
    pub fn act_on_infix(&mut self, lhs: ExprId, rhs: ExprId, op: BinaryOp, op_span: Span) -> ExprId {
        let (lhs_ty, lhs_const, lhs_span) = self.expr_info(lhs);
        let (rhs_ty, rhs_const, rhs_span) = self.expr_info(rhs);
        let span = lhs_span.merge(rhs_span);
        let id = self.ast.alloc_expr(ExprKind::Infix { op, lhs, rhs }, span);

        let ty = match (lhs_ty, rhs_ty) {
            (Some(l), Some(r)) => self.infix_type(op, op_span, l, r),
            _ => None,
        };
        self.ast
            .annotate_expr(id, ty, ty.is_some() && lhs_const && rhs_const);
        id
    }

    fn infix_type(&mut self, op: BinaryOp, op_span: Span, l: DeclId, r: DeclId) -> Option<DeclId> {
        let universe = self.universe;
        if op.is_arithmetic() {
            if self.is_integer(l) && self.is_integer(r) {
                return Some(universe.integer);
            }
            return self.operand_mismatch(op, op_span, "INTEGER", l, r);
        }
        if op.is_logical() {
            if self.is_boolean(l) && self.is_boolean(r) {
                return Some(universe.boolean);
            }
            return self.operand_mismatch(op, op_span, "BOOLEAN", l, r);
        }

        // Relations
        let comparable = if matches!(op, BinaryOp::Eq | BinaryOp::Ne) {
            self.ast.pervasive(l).is_some() || self.is_pointer(l)
        } else {
            self.ast.pervasive(l).is_some()
        };
        if comparable && self.ast.same_type(l, r) {
            return Some(universe.boolean);
        }
        let (left, right) = (self.type_name(Some(l)), self.type_name(Some(r)));
        self.report(
            Diagnostic::error(ErrorCode::E2001)
                .with_message(format!(
                    "cannot compare {left} with {right} using `{op}`"
                ))
                .with_label(op_span, "incompatible operands"),
        );
        None
    }

    fn operand_mismatch(
        &mut self,
        op: BinaryOp,
        op_span: Span,
        expected: &str,
        l: DeclId,
        r: DeclId,
    ) -> Option<DeclId> {
        let (left, right) = (self.type_name(Some(l)), self.type_name(Some(r)));
        self.report(
            Diagnostic::error(ErrorCode::E2001)
                .with_message(format!(
                    "operator `{op}` needs {expected} operands, found {left} and {right}"
                ))
                .with_label(op_span, format!("expects {expected}")),
        );
        None
    }

    pub fn act_on_prefix_expression(&mut self, operand: ExprId, op: UnaryOp, op_span: Span) -> ExprId {
        let (operand_ty, operand_const, operand_span) = self.expr_info(operand);
        let id = self
            .ast
            .alloc_expr(ExprKind::Prefix { op, operand }, op_span.merge(operand_span));

        let ty = operand_ty.and_then(|ty| {
            let (ok, expected) = match op {
                UnaryOp::Plus | UnaryOp::Neg => (self.is_integer(ty), "INTEGER"),
                UnaryOp::Not => (self.is_boolean(ty), "BOOLEAN"),
            };
            if ok {
                return Some(ty);
            }
            let found = self.type_name(Some(ty));
            self.report(
                Diagnostic::error(ErrorCode::E2001)
                    .with_message(format!(
                        "operator `{op}` needs an {expected} operand, found {found}"
                    ))
                    .with_label(op_span, format!("expects {expected}")),
            );
            None
        });
        self.ast.annotate_expr(id, ty, ty.is_some() && operand_const);
        id
    }

    /// A name used as a value: variable, parameter or constant.
    pub fn act_on_designator(&mut self, name: QualIdent) -> ExprId {
        let Some(decl) = name.decl else {
            return self.act_on_error_expression(name.span);
        };

        match &self.ast.decl(decl).kind {
            DeclKind::Var { ty } | DeclKind::Param { ty, .. } => {
                let ty = *ty;
                let id = self.ast.alloc_expr(
                    ExprKind::Designator {
                        decl,
                        selectors: SmallVec::new(),
                    },
                    name.span,
                );
                self.ast.annotate_expr(id, ty, false);
                id
            }
            DeclKind::Const { value } => {
                let ty = self.ast.expr(*value).ty;
                let id = self.ast.alloc_expr(ExprKind::ConstAccess(decl), name.span);
                self.ast.annotate_expr(id, ty, true);
                id
            }
            _ => {
                let what = self.ast.decl(decl).kind_name();
                let text = self.name_of(decl);
                self.report(
                    Diagnostic::error(ErrorCode::E2014)
                        .with_message(format!("`{text}` is a {what}, not a value"))
                        .with_label(name.span, "expected a variable or constant"),
                );
                self.act_on_error_expression(name.span)
            }
        }
    }

    /// Append a selector to a designator and narrow its type.
    fn push_selector(&mut self, desig: ExprId, kind: SelectorKind, span: Span, ty: Option<DeclId>) {
        let expr = self.ast.expr_mut(desig);
        expr.span = expr.span.merge(span);
        expr.ty = ty;
        if let ExprKind::Designator { selectors, .. } = &mut expr.kind {
            selectors.push(Selector { kind, span, ty });
        }
    }

    /// Current type of `desig` if it can take another selector.
    ///
    /// Constants and error placeholders take none; a selector on a constant
    /// is reported.
    fn selector_base(&mut self, desig: ExprId, span: Span) -> Option<DeclId> {
        let expr = self.ast.expr(desig);
        match expr.kind {
            ExprKind::Designator { .. } => expr.ty.and_then(|ty| self.ast.resolve_type(ty)),
            ExprKind::Error => None,
            _ => {
                self.report(
                    Diagnostic::error(ErrorCode::E2007)
                        .with_message("selectors apply only to variables")
                        .with_label(span, "not allowed here"),
                );
                self.ast.expr_mut(desig).ty = None;
                None
            }
        }
    }

    fn invalid_selector(&mut self, desig: ExprId, span: Span, message: String, label: &str) {
        self.report(
            Diagnostic::error(ErrorCode::E2007)
                .with_message(message)
                .with_label(span, label.to_string()),
        );
        let expr = self.ast.expr_mut(desig);
        expr.ty = None;
        expr.span = expr.span.merge(span);
    }

    /// `[index]`: needs an array and an INTEGER index.
    pub fn act_on_index_selector(&mut self, desig: ExprId, span: Span, index: ExprId) {
        let Some(base) = self.selector_base(desig, span) else {
            return;
        };
        let index_ty = self.ast.expr(index).ty;

        let DeclKind::ArrayType { elem, .. } = self.ast.decl(base).kind else {
            let found = self.type_name(Some(base));
            self.invalid_selector(
                desig,
                span,
                format!("cannot index into a value of type {found}"),
                "not an array",
            );
            return;
        };

        if let Some(index_ty) = index_ty {
            if !self.is_integer(index_ty) {
                let found = self.type_name(Some(index_ty));
                let index_span = self.ast.expr(index).span;
                self.report(
                    Diagnostic::error(ErrorCode::E2001)
                        .with_message(format!("array index must be an INTEGER, found {found}"))
                        .with_label(index_span, "expected INTEGER"),
                );
            }
        }
        self.push_selector(desig, SelectorKind::Index(index), span, elem);
    }

    /// `.field`: needs a record with that field.
    pub fn act_on_field_selector(&mut self, desig: ExprId, field: Ident) {
        let Some(base) = self.selector_base(desig, field.span) else {
            return;
        };
        let field_name = self.interner.lookup(field.name);

        let DeclKind::RecordType { fields } = &self.ast.decl(base).kind else {
            let found = self.type_name(Some(base));
            self.invalid_selector(
                desig,
                field.span,
                format!("no field `{field_name}` on a value of type {found}"),
                "not a record",
            );
            return;
        };

        match fields.iter().position(|f| f.name == field.name) {
            Some(position) => {
                let ty = fields[position].ty;
                let index = u32::try_from(position).unwrap_or(u32::MAX);
                self.push_selector(
                    desig,
                    SelectorKind::Field {
                        name: field.name,
                        index,
                    },
                    field.span,
                    ty,
                );
            }
            None => {
                let record = self.type_name(Some(base));
                self.invalid_selector(
                    desig,
                    field.span,
                    format!("record {record} has no field `{field_name}`"),
                    "unknown field",
                );
            }
        }
    }

    /// `^`: needs a pointer.
    pub fn act_on_dereference_selector(&mut self, desig: ExprId, span: Span) {
        let Some(base) = self.selector_base(desig, span) else {
            return;
        };
        match self.ast.decl(base).kind {
            DeclKind::PointerType { pointee } => {
                self.push_selector(desig, SelectorKind::Deref, span, pointee);
            }
            _ => {
                let found = self.type_name(Some(base));
                self.invalid_selector(
                    desig,
                    span,
                    format!("cannot dereference a value of type {found}"),
                    "not a pointer",
                );
            }
        }
    }

    /// `f(args)` in an expression: the procedure must return a value.
    pub fn act_on_function_call(&mut self, callee: QualIdent, args: Vec<ExprId>, span: Span) -> ExprId {
        let Some(proc) = self.check_call(callee, &args) else {
            return self.act_on_error_expression(span);
        };
        let DeclKind::Proc { ret, .. } = self.ast.decl(proc).kind else {
            return self.act_on_error_expression(span);
        };
        if ret.is_none() {
            let name = self.name_of(proc);
            self.report(
                Diagnostic::error(ErrorCode::E2008)
                    .with_message(format!("procedure `{name}` does not return a value"))
                    .with_label(callee.span, "used in an expression"),
            );
            return self.act_on_error_expression(span);
        }
        let id = self.ast.alloc_expr(ExprKind::Call { proc, args }, span);
        self.ast.annotate_expr(id, ret, false);
        id
    }

    /// Shared by call statements and function calls: the callee must be a
    /// procedure and the arguments must match its parameters.
    pub(crate) fn check_call(&mut self, callee: QualIdent, args: &[ExprId]) -> Option<DeclId> {
        let decl = callee.decl?;
        let DeclKind::Proc { params, .. } = &self.ast.decl(decl).kind else {
            let name = self.name_of(decl);
            let what = self.ast.decl(decl).kind_name();
            self.report(
                Diagnostic::error(ErrorCode::E2008)
                    .with_message(format!("`{name}` is a {what}, not a procedure"))
                    .with_label(callee.span, "cannot be called"),
            );
            return None;
        };
        let params = params.clone();

        if params.len() != args.len() {
            let name = self.name_of(decl);
            self.report(
                Diagnostic::error(ErrorCode::E2009)
                    .with_message(format!(
                        "procedure `{name}` takes {} argument(s) but {} were supplied",
                        params.len(),
                        args.len()
                    ))
                    .with_label(callee.span, "wrong number of arguments"),
            );
            return Some(decl);
        }

        for (&param, &arg) in params.iter().zip(args) {
            let (param_ty, by_ref) = match self.ast.decl(param).kind {
                DeclKind::Param { ty, by_ref } => (ty, by_ref),
                _ => continue,
            };
            let (arg_ty, _, arg_span) = self.expr_info(arg);

            if by_ref && !self.is_variable_designator(arg) {
                let param_name = self.name_of(param);
                self.report(
                    Diagnostic::error(ErrorCode::E2010)
                        .with_message(format!(
                            "argument for VAR parameter `{param_name}` must be a variable"
                        ))
                        .with_label(arg_span, "not a variable"),
                );
                continue;
            }
            if let (Some(p), Some(a)) = (param_ty, arg_ty) {
                if !self.ast.same_type(p, a) {
                    let (expected, found) = (self.type_name(Some(p)), self.type_name(Some(a)));
                    self.report(
                        Diagnostic::error(ErrorCode::E2001)
                            .with_message(format!(
                                "incompatible argument: expected {expected}, found {found}"
                            ))
                            .with_label(arg_span, format!("expected {expected}")),
                    );
                }
            }
        }
        Some(decl)
    }

    /// A designator whose root names a storage location. Error placeholders
    /// count, so they don't cascade.
    pub(crate) fn is_variable_designator(&self, expr: ExprId) -> bool {
        match self.ast.expr(expr).kind {
            ExprKind::Designator { decl, .. } => self.ast.decl(decl).is_variable(),
            ExprKind::Error => true,
            _ => false,
        }
    }

    fn is_pointer(&self, ty: DeclId) -> bool {
        self.ast
            .resolve_type(ty)
            .is_some_and(|ty| matches!(self.ast.decl(ty).kind, DeclKind::PointerType { .. }))
    }

    pub(crate) fn expr_info(&self, expr: ExprId) -> (Option<DeclId>, bool, Span) {
        let expr = self.ast.expr(expr);
        (expr.ty, expr.is_const, expr.span)
    }
}
