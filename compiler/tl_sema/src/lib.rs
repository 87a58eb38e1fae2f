//! Semantic actions for the tinylang front end.
//!
//! There is no separate checking pass. The parser calls an `act_on_*` method
//! as soon as it has recognized a construct, and [`Sema`] allocates the AST
//! node, resolves names against the scope stack, assigns types, and reports
//! problems into the unit's [`DiagnosticQueue`].
//!
//! Errors never stop traversal. A failed expression keeps `ty: None`; checks
//! that involve such a placeholder are skipped so one mistake gives one
//! diagnostic.

mod decls;
mod exprs;
mod fold;
mod scope;
mod stmts;

use tl_diagnostic::{Diagnostic, DiagnosticConfig, DiagnosticQueue};
use tl_ir::{
    Ast, Decl, DeclId, DeclKind, ExprKind, Name, Pervasive, Span, StringInterner, Unit,
};

pub use fold::fold_integer;
pub use scope::ScopeStack;

/// An identifier occurrence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Ident {
    pub name: Name,
    pub span: Span,
}

/// A resolved (possibly qualified) name. `decl` is `None` after an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct QualIdent {
    pub decl: Option<DeclId>,
    pub span: Span,
}

/// Declarations every unit can see.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Universe {
    pub integer: DeclId,
    pub boolean: DeclId,
    pub true_const: DeclId,
    pub false_const: DeclId,
}

/// What Sema hands back once the parser is done.
pub struct SemaOutput {
    pub ast: Ast,
    pub interner: StringInterner,
    pub diagnostics: DiagnosticQueue,
    pub universe: Universe,
}

/// Semantic state of one compilation unit.
pub struct Sema<'src> {
    source: &'src str,
    ast: Ast,
    interner: StringInterner,
    scopes: ScopeStack,
    diags: DiagnosticQueue,
    universe: Universe,
}

impl<'src> Sema<'src> {
    /// Open the universe scope for a unit over `source`.
    pub fn new(source: &'src str, config: DiagnosticConfig) -> Self {
        let mut ast = Ast::new();
        let interner = StringInterner::new();
        let mut scopes = ScopeStack::new();
        scopes.push(None);

        let mut declare = |ast: &mut Ast, name: &str, kind: DeclKind| {
            let name = interner.intern(name);
            let id = ast.alloc_decl(Decl {
                name,
                span: Span::DUMMY,
                enclosing: None,
                kind,
            });
            let _ = scopes.insert(name, id);
            id
        };

        let integer = declare(&mut ast, "INTEGER", DeclKind::PervasiveType(Pervasive::Integer));
        let boolean = declare(&mut ast, "BOOLEAN", DeclKind::PervasiveType(Pervasive::Boolean));

        let mut bool_const = |ast: &mut Ast, name: &str, value: bool| {
            let lit = ast.alloc_expr(ExprKind::BoolLit(value), Span::DUMMY);
            ast.annotate_expr(lit, Some(boolean), true);
            declare(ast, name, DeclKind::Const { value: lit })
        };
        let true_const = bool_const(&mut ast, "TRUE", true);
        let false_const = bool_const(&mut ast, "FALSE", false);

        Sema {
            source,
            ast,
            interner,
            scopes,
            diags: DiagnosticQueue::with_config(config),
            universe: Universe {
                integer,
                boolean,
                true_const,
                false_const,
            },
        }
    }

    pub fn intern(&self, text: &str) -> Name {
        self.interner.intern(text)
    }

    /// The parser and lexer report syntax errors through this.
    pub fn diagnostics_mut(&mut self) -> &mut DiagnosticQueue {
        &mut self.diags
    }

    pub fn is_module(&self, decl: DeclId) -> bool {
        matches!(self.ast.decl(decl).kind, DeclKind::Module { .. })
    }

    /// Open the scope of a module or procedure body.
    pub fn enter_scope(&mut self, owner: DeclId) {
        tracing::debug!(owner = self.name_of(owner), "enter scope");
        self.scopes.push(Some(owner));
    }

    pub fn leave_scope(&mut self) {
        tracing::debug!(depth = self.scopes.depth(), "leave scope");
        self.scopes.pop();
    }

    pub fn finish(self) -> SemaOutput {
        SemaOutput {
            ast: self.ast,
            interner: self.interner,
            diagnostics: self.diags,
            universe: self.universe,
        }
    }

    /// Wrap a finished root into a [`Unit`].
    pub fn module_unit(&self, root: DeclId) -> Unit {
        Unit {
            root,
            kind: tl_ir::UnitKind::Module,
        }
    }

    fn report(&mut self, diag: Diagnostic) {
        self.diags.add_with_source(diag, self.source);
    }

    fn name_of(&self, decl: DeclId) -> &'static str {
        self.interner.lookup(self.ast.decl(decl).name)
    }

    /// Printable name of a type, or `<error>` for the placeholder.
    fn type_name(&self, ty: Option<DeclId>) -> &'static str {
        ty.map_or("<error>", |ty| self.name_of(ty))
    }

    /// Allocate a declaration enclosed by the innermost scope owner and
    /// insert it into that scope, reporting a collision.
    ///
    /// Returns `None` for a duplicate; the node still exists in the arena.
    fn declare(&mut self, ident: Ident, kind: DeclKind) -> Option<DeclId> {
        let id = self.ast.alloc_decl(Decl {
            name: ident.name,
            span: ident.span,
            enclosing: self.scopes.current_owner(),
            kind,
        });
        match self.scopes.insert(ident.name, id) {
            Ok(()) => {
                tracing::trace!(name = self.interner.lookup(ident.name), ?id, "declared");
                Some(id)
            }
            Err(previous) => {
                let previous_span = self.ast.decl(previous).span;
                let name = self.interner.lookup(ident.name);
                self.report(tl_diagnostic::already_declared(ident.span, name, previous_span));
                None
            }
        }
    }

    fn is_integer(&self, ty: DeclId) -> bool {
        self.ast.pervasive(ty) == Some(Pervasive::Integer)
    }

    fn is_boolean(&self, ty: DeclId) -> bool {
        self.ast.pervasive(ty) == Some(Pervasive::Boolean)
    }
}
