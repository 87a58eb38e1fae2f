//! Declaration actions.

use tl_diagnostic::{Diagnostic, ErrorCode};
use tl_ir::{DeclId, DeclKind, ExprId, Field, StmtId, Unit, UnitKind};

use crate::{Ident, QualIdent, Sema};

impl Sema<'_> {
    /// `MODULE name;` The module is visible in the universe so that
    /// qualified names can start with it.
    pub fn act_on_module_declaration(&mut self, ident: Ident) -> DeclId {
        let kind = DeclKind::Module {
            decls: Vec::new(),
            stmts: Vec::new(),
        };
        match self.declare(ident, kind.clone()) {
            Some(id) => id,
            // Shadowing a pervasive name still yields a module to hang the body on.
            None => self.ast.alloc_decl(tl_ir::Decl {
                name: ident.name,
                span: ident.span,
                enclosing: None,
                kind,
            }),
        }
    }

    /// `END name.` closes the module body.
    pub fn act_on_module_end(
        &mut self,
        module: DeclId,
        end: Ident,
        decls: Vec<DeclId>,
        stmts: Vec<StmtId>,
    ) {
        self.check_end_name(module, end);
        self.ast.decl_mut(module).kind = DeclKind::Module { decls, stmts };
    }

    /// Imports are accepted and ignored: there is no separate compilation.
    pub fn act_on_import(&mut self, from: Option<Ident>, ids: &[Ident]) {
        let Some(first) = ids.first() else {
            return;
        };
        let span = from.map_or(first.span, |f| f.span.merge(first.span));
        let what = match from {
            Some(module) => format!("import from `{}`", self.interner.lookup(module.name)),
            None => "import".to_string(),
        };
        self.report(
            Diagnostic::warning(ErrorCode::W2001)
                .with_message(format!("{what} ignored"))
                .with_label(span, "no other modules are available")
                .with_note("separate compilation is not supported"),
        );
    }

    pub fn act_on_constant_declaration(
        &mut self,
        decls: &mut Vec<DeclId>,
        ident: Ident,
        value: ExprId,
    ) {
        let expr = self.ast.expr(value);
        if expr.ty.is_some() && !expr.is_const {
            let span = expr.span;
            self.report(
                Diagnostic::error(ErrorCode::E2005)
                    .with_message("expression is not constant")
                    .with_label(span, "constant initializer must be constant"),
            );
        }
        if let Some(id) = self.declare(ident, DeclKind::Const { value }) {
            decls.push(id);
        }
    }

    /// Check that a name used in type position denotes a type.
    fn expect_type(&mut self, ty: QualIdent) -> Option<DeclId> {
        let decl = ty.decl?;
        if self.ast.decl(decl).is_type() {
            return Some(decl);
        }
        let name = self.name_of(decl);
        let kind = self.ast.decl(decl).kind_name();
        self.report(
            Diagnostic::error(ErrorCode::E2004)
                .with_message(format!("`{name}` is not a type"))
                .with_label(ty.span, format!("this is a {kind}")),
        );
        None
    }

    pub fn act_on_alias_type_declaration(
        &mut self,
        decls: &mut Vec<DeclId>,
        ident: Ident,
        target: QualIdent,
    ) {
        let target = self.expect_type(target);
        if let Some(id) = self.declare(ident, DeclKind::AliasType { target }) {
            decls.push(id);
        }
    }

    pub fn act_on_pointer_type_declaration(
        &mut self,
        decls: &mut Vec<DeclId>,
        ident: Ident,
        pointee: QualIdent,
    ) {
        let pointee = self.expect_type(pointee);
        if let Some(id) = self.declare(ident, DeclKind::PointerType { pointee }) {
            decls.push(id);
        }
    }

    /// `ARRAY [len] OF elem`. The bound is folded here.
    pub fn act_on_array_type_declaration(
        &mut self,
        decls: &mut Vec<DeclId>,
        ident: Ident,
        len_expr: ExprId,
        elem: QualIdent,
    ) {
        let elem = self.expect_type(elem);
        let len = self.array_bound(len_expr);
        if let Some(id) = self.declare(
            ident,
            DeclKind::ArrayType {
                len_expr,
                len,
                elem,
            },
        ) {
            decls.push(id);
        }
    }

    fn array_bound(&mut self, len_expr: ExprId) -> u64 {
        let expr = self.ast.expr(len_expr);
        let span = expr.span;
        let Some(ty) = expr.ty else {
            return 0;
        };
        let invalid = |message: String| {
            Diagnostic::error(ErrorCode::E2006)
                .with_message(message)
                .with_label(span, "array bound")
        };

        if !self.is_integer(ty) {
            let found = self.type_name(Some(ty));
            self.report(invalid(format!(
                "array bound must be an INTEGER, found {found}"
            )));
            return 0;
        }
        if !expr.is_const {
            self.report(
                Diagnostic::error(ErrorCode::E2005)
                    .with_message("expression is not constant")
                    .with_label(span, "array bound must be constant"),
            );
            return 0;
        }
        match crate::fold_integer(&self.ast, len_expr) {
            Some(len) if len >= 0 => len.unsigned_abs(),
            Some(len) => {
                self.report(invalid(format!("array bound {len} is negative")));
                0
            }
            None => {
                self.report(invalid(
                    "array bound cannot be evaluated (overflow or division by zero)".to_string(),
                ));
                0
            }
        }
    }

    /// One `a, b: T` line of a record. Field names must be unique within
    /// the record.
    pub fn act_on_field_declaration(
        &mut self,
        fields: &mut Vec<Field>,
        ids: &[Ident],
        ty: QualIdent,
    ) {
        let ty = self.expect_type(ty);
        for ident in ids {
            if let Some(previous) = fields.iter().find(|f| f.name == ident.name) {
                let previous_span = previous.span;
                let name = self.interner.lookup(ident.name);
                self.report(tl_diagnostic::already_declared(ident.span, name, previous_span));
                continue;
            }
            fields.push(Field {
                name: ident.name,
                span: ident.span,
                ty,
            });
        }
    }

    pub fn act_on_record_type_declaration(
        &mut self,
        decls: &mut Vec<DeclId>,
        ident: Ident,
        fields: Vec<Field>,
    ) {
        if let Some(id) = self.declare(ident, DeclKind::RecordType { fields }) {
            decls.push(id);
        }
    }

    pub fn act_on_variable_declaration(
        &mut self,
        decls: &mut Vec<DeclId>,
        ids: &[Ident],
        ty: QualIdent,
    ) {
        let ty = self.expect_type(ty);
        for &ident in ids {
            if let Some(id) = self.declare(ident, DeclKind::Var { ty }) {
                decls.push(id);
            }
        }
    }

    /// `PROCEDURE name`: declared before its parameters so it can recurse.
    pub fn act_on_procedure_declaration(&mut self, ident: Ident) -> DeclId {
        let kind = DeclKind::Proc {
            params: Vec::new(),
            ret: None,
            decls: Vec::new(),
            stmts: Vec::new(),
        };
        match self.declare(ident, kind.clone()) {
            Some(id) => id,
            None => self.ast.alloc_decl(tl_ir::Decl {
                name: ident.name,
                span: ident.span,
                enclosing: self.scopes.current_owner(),
                kind,
            }),
        }
    }

    /// Parameters go into the procedure's own scope.
    pub fn act_on_formal_parameter_declaration(
        &mut self,
        params: &mut Vec<DeclId>,
        ids: &[Ident],
        ty: QualIdent,
        by_ref: bool,
    ) {
        let ty = self.expect_type(ty);
        for &ident in ids {
            if let Some(id) = self.declare(ident, DeclKind::Param { ty, by_ref }) {
                params.push(id);
            }
        }
    }

    pub fn act_on_procedure_heading(
        &mut self,
        proc: DeclId,
        params: Vec<DeclId>,
        ret: Option<QualIdent>,
    ) {
        let ret = ret.and_then(|ret| self.expect_type(ret));
        if let DeclKind::Proc {
            params: slot_params,
            ret: slot_ret,
            ..
        } = &mut self.ast.decl_mut(proc).kind
        {
            *slot_params = params;
            *slot_ret = ret;
        }
    }

    /// `END name` closes the procedure body.
    pub fn act_on_procedure_end(
        &mut self,
        proc: DeclId,
        end: Ident,
        decls: Vec<DeclId>,
        stmts: Vec<StmtId>,
    ) {
        self.check_end_name(proc, end);
        if let DeclKind::Proc {
            decls: slot_decls,
            stmts: slot_stmts,
            ..
        } = &mut self.ast.decl_mut(proc).kind
        {
            *slot_decls = decls;
            *slot_stmts = stmts;
        }
    }

    fn check_end_name(&mut self, decl: DeclId, end: Ident) {
        let expected = self.ast.decl(decl).name;
        if end.name == expected {
            return;
        }
        let kind = self.ast.decl(decl).kind_name();
        let decl_span = self.ast.decl(decl).span;
        let expected = self.interner.lookup(expected);
        let found = self.interner.lookup(end.name);
        self.report(
            Diagnostic::error(ErrorCode::E2013)
                .with_message(format!(
                    "{kind} identifier does not match: expected `{expected}`, found `{found}`"
                ))
                .with_label(end.span, format!("expected `{expected}`"))
                .with_secondary_label(decl_span, format!("{kind} declared here")),
        );
    }

    /// Resolve one part of a qualified identifier.
    ///
    /// With `prev == None` the name is looked up through the scope stack.
    /// Otherwise `prev` is a module and the name is looked up among its
    /// declarations.
    pub fn act_on_qualident_part(&mut self, prev: Option<DeclId>, ident: Ident) -> Option<DeclId> {
        let found = match prev {
            None => self.scopes.lookup(ident.name),
            Some(module) => self
                .scopes
                .lookup_in(module, ident.name)
                .or_else(|| self.module_member(module, ident)),
        };
        if found.is_none() {
            let name = self.interner.lookup(ident.name);
            self.report(tl_diagnostic::not_declared(ident.span, name));
        }
        found
    }

    fn module_member(&self, module: DeclId, ident: Ident) -> Option<DeclId> {
        match &self.ast.decl(module).kind {
            DeclKind::Module { decls, .. } => decls
                .iter()
                .copied()
                .find(|&d| self.ast.decl(d).name == ident.name),
            _ => None,
        }
    }

    // Expression units

    /// Root of an expression unit. It owns the `with` variables.
    pub fn act_on_calc_unit(&mut self, span: tl_ir::Span) -> DeclId {
        let name = self.interner.intern("calc");
        self.ast.alloc_decl(tl_ir::Decl {
            name,
            span,
            enclosing: None,
            kind: DeclKind::Module {
                decls: Vec::new(),
                stmts: Vec::new(),
            },
        })
    }

    /// `with a, b:`; every input is an INTEGER variable.
    pub fn act_on_calc_inputs(&mut self, ids: &[Ident]) -> Vec<DeclId> {
        let integer = Some(self.universe.integer);
        ids.iter()
            .filter_map(|&ident| self.declare(ident, DeclKind::Var { ty: integer }))
            .collect()
    }

    pub fn act_on_calc_end(&mut self, root: DeclId, inputs: Vec<DeclId>, result: ExprId) -> Unit {
        if let DeclKind::Module { decls, .. } = &mut self.ast.decl_mut(root).kind {
            decls.clone_from(&inputs);
        }
        Unit {
            root,
            kind: UnitKind::Calc { inputs, result },
        }
    }
}
