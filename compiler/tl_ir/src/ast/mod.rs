//! Arena-allocated syntax tree.
//!
//! Declarations, expressions and statements are stored in flat vectors inside
//! [`Ast`] and addressed by dense ids. The enclosing-declaration back link is a
//! plain [`DeclId`], which keeps the tree acyclic from the borrow checker's
//! point of view while still letting codegen walk outward for name mangling.
//!
//! Sema fills in `Expr::ty` and `Expr::is_const` while the parser builds the
//! tree; after parsing nothing is mutated.

mod operators;

use smallvec::SmallVec;

use crate::{Name, Span};

pub use operators::{BinaryOp, UnaryOp};

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

arena_id!(
    /// Index of a [`Decl`] in the [`Ast`].
    DeclId
);
arena_id!(
    /// Index of an [`Expr`] in the [`Ast`].
    ExprId
);
arena_id!(
    /// Index of a [`Stmt`] in the [`Ast`].
    StmtId
);

// Declarations

/// Built-in types of the universe scope.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Pervasive {
    Integer,
    Boolean,
}

/// A named record field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: Name,
    pub span: Span,
    /// `None` when the field's type failed to resolve.
    pub ty: Option<DeclId>,
}

/// Declaration payload.
///
/// Type references are `Option<DeclId>`: `None` is the error placeholder Sema
/// leaves behind after reporting an unresolved or non-type name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeclKind {
    Module {
        decls: Vec<DeclId>,
        stmts: Vec<StmtId>,
    },
    Const {
        value: ExprId,
    },
    Var {
        ty: Option<DeclId>,
    },
    Param {
        ty: Option<DeclId>,
        /// `VAR` parameter (passed by reference).
        by_ref: bool,
    },
    Proc {
        params: Vec<DeclId>,
        ret: Option<DeclId>,
        decls: Vec<DeclId>,
        stmts: Vec<StmtId>,
    },
    AliasType {
        target: Option<DeclId>,
    },
    ArrayType {
        len_expr: ExprId,
        /// Folded element count.
        len: u64,
        elem: Option<DeclId>,
    },
    PervasiveType(Pervasive),
    PointerType {
        pointee: Option<DeclId>,
    },
    RecordType {
        fields: Vec<Field>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decl {
    pub name: Name,
    pub span: Span,
    /// `None` only for universe declarations and the unit's root module.
    pub enclosing: Option<DeclId>,
    pub kind: DeclKind,
}

impl Decl {
    pub fn is_type(&self) -> bool {
        matches!(
            self.kind,
            DeclKind::AliasType { .. }
                | DeclKind::ArrayType { .. }
                | DeclKind::PervasiveType(_)
                | DeclKind::PointerType { .. }
                | DeclKind::RecordType { .. }
        )
    }

    /// Whether the declaration names a storage location.
    pub fn is_variable(&self) -> bool {
        matches!(self.kind, DeclKind::Var { .. } | DeclKind::Param { .. })
    }

    /// Declared type of a variable or parameter.
    pub fn value_type(&self) -> Option<DeclId> {
        match self.kind {
            DeclKind::Var { ty } | DeclKind::Param { ty, .. } => ty,
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            DeclKind::Module { .. } => "module",
            DeclKind::Const { .. } => "constant",
            DeclKind::Var { .. } => "variable",
            DeclKind::Param { .. } => "parameter",
            DeclKind::Proc { .. } => "procedure",
            DeclKind::AliasType { .. }
            | DeclKind::ArrayType { .. }
            | DeclKind::PervasiveType(_)
            | DeclKind::PointerType { .. }
            | DeclKind::RecordType { .. } => "type",
        }
    }
}

// Expressions

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectorKind {
    /// `[expr]`
    Index(ExprId),
    /// `.name`, resolved to the field's position in the record.
    Field { name: Name, index: u32 },
    /// `^`
    Deref,
}

/// One postfix step of a designator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    pub kind: SelectorKind,
    pub span: Span,
    /// Type of the designator after applying this selector.
    pub ty: Option<DeclId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExprKind {
    Infix {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    Prefix {
        op: UnaryOp,
        operand: ExprId,
    },
    IntLit(i64),
    BoolLit(bool),
    Designator {
        decl: DeclId,
        selectors: SmallVec<[Selector; 2]>,
    },
    ConstAccess(DeclId),
    Call {
        proc: DeclId,
        args: Vec<ExprId>,
    },
    /// Placeholder left after a reported error.
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    /// Resolved type; `None` is the error placeholder.
    pub ty: Option<DeclId>,
    pub is_const: bool,
}

// Statements

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StmtKind {
    Assign {
        /// Always a designator expression.
        target: ExprId,
        value: ExprId,
    },
    Call {
        proc: DeclId,
        args: Vec<ExprId>,
    },
    If {
        cond: ExprId,
        then_branch: Vec<StmtId>,
        else_branch: Vec<StmtId>,
    },
    While {
        cond: ExprId,
        body: Vec<StmtId>,
    },
    Return(Option<ExprId>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

// Units

/// Which grammar produced the unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnitKind {
    /// `MODULE name; ... END name.`
    Module,
    /// `with a, b: expr`
    Calc {
        inputs: Vec<DeclId>,
        result: ExprId,
    },
}

/// Root of one compilation unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unit {
    /// Always a [`DeclKind::Module`] declaration.
    pub root: DeclId,
    pub kind: UnitKind,
}

// Arena

/// Owner of every node in a compilation unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ast {
    decls: Vec<Decl>,
    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "node counts are bounded by source length, which fits u32"
    )]
    pub fn alloc_decl(&mut self, decl: Decl) -> DeclId {
        let id = DeclId::new(self.decls.len() as u32);
        self.decls.push(decl);
        id
    }

    /// Allocate an expression with no type yet.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "node counts are bounded by source length, which fits u32"
    )]
    pub fn alloc_expr(&mut self, kind: ExprKind, span: Span) -> ExprId {
        let id = ExprId::new(self.exprs.len() as u32);
        self.exprs.push(Expr {
            kind,
            span,
            ty: None,
            is_const: false,
        });
        id
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "node counts are bounded by source length, which fits u32"
    )]
    pub fn alloc_stmt(&mut self, kind: StmtKind, span: Span) -> StmtId {
        let id = StmtId::new(self.stmts.len() as u32);
        self.stmts.push(Stmt { kind, span });
        id
    }

    #[inline]
    pub fn decl(&self, id: DeclId) -> &Decl {
        &self.decls[id.index()]
    }

    #[inline]
    pub fn decl_mut(&mut self, id: DeclId) -> &mut Decl {
        &mut self.decls[id.index()]
    }

    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn expr_mut(&mut self, id: ExprId) -> &mut Expr {
        &mut self.exprs[id.index()]
    }

    #[inline]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    /// Record Sema's verdict for an expression.
    pub fn annotate_expr(&mut self, id: ExprId, ty: Option<DeclId>, is_const: bool) {
        let expr = &mut self.exprs[id.index()];
        expr.ty = ty;
        expr.is_const = is_const;
    }

    pub fn decl_count(&self) -> usize {
        self.decls.len()
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }

    /// Follow alias chains to the underlying type declaration.
    ///
    /// Returns `None` if the chain hits an error placeholder or loops.
    pub fn resolve_type(&self, ty: DeclId) -> Option<DeclId> {
        let mut current = ty;
        for _ in 0..=self.decls.len() {
            match self.decl(current).kind {
                DeclKind::AliasType { target } => current = target?,
                _ => return Some(current),
            }
        }
        None
    }

    /// Pervasive kind of `ty`, looking through aliases.
    pub fn pervasive(&self, ty: DeclId) -> Option<Pervasive> {
        match self.decl(self.resolve_type(ty)?).kind {
            DeclKind::PervasiveType(p) => Some(p),
            _ => None,
        }
    }

    /// Structural identity after alias resolution.
    pub fn same_type(&self, a: DeclId, b: DeclId) -> bool {
        match (self.resolve_type(a), self.resolve_type(b)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// `decl` and its enclosing declarations, outermost first.
    pub fn enclosing_chain(&self, decl: DeclId) -> Vec<DeclId> {
        let mut chain = vec![decl];
        let mut current = self.decl(decl).enclosing;
        while let Some(id) = current {
            chain.push(id);
            current = self.decl(id).enclosing;
        }
        chain.reverse();
        chain
    }
}
