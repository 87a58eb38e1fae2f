//! Expressions, designators and calls.

use smallvec::SmallVec;
use tl_ir::{
    BinaryOp, DeclId, DeclKind, ExprId, ExprKind, Selector, SelectorKind, StmtId, StmtKind,
    UnaryOp,
};
use tl_sema::fold_integer;
use tl_stack::ensure_sufficient_stack;

use crate::builder::Var;
use crate::ir::{BinOp, CmpPred, IrType, TbaaTag, ValueId};
use crate::CodegenError;

use super::{FnLower, Storage};

/// A designator after its selectors are applied.
#[derive(Clone, Debug)]
pub(super) enum Place {
    /// A scalar the builder tracks in SSA form.
    Ssa { decl: DeclId, ty: IrType },
    Memory {
        addr: ValueId,
        ty: IrType,
        tbaa: Option<TbaaTag>,
    },
}

/// Instruction selection for a binary operator other than `^`.
enum Lowered {
    Arith(BinOp),
    /// Division with a zero-divisor guard.
    Checked(BinOp),
    Compare(CmpPred),
}

impl Lowered {
    fn of(op: BinaryOp) -> Option<Self> {
        Some(match op {
            BinaryOp::Add => Self::Arith(BinOp::Add),
            BinaryOp::Sub => Self::Arith(BinOp::Sub),
            BinaryOp::Mul => Self::Arith(BinOp::Mul),
            BinaryOp::And => Self::Arith(BinOp::And),
            BinaryOp::Or => Self::Arith(BinOp::Or),
            BinaryOp::Div => Self::Checked(BinOp::SDiv),
            BinaryOp::Mod => Self::Checked(BinOp::SRem),
            BinaryOp::Eq => Self::Compare(CmpPred::Eq),
            BinaryOp::Ne => Self::Compare(CmpPred::Ne),
            BinaryOp::Lt => Self::Compare(CmpPred::Slt),
            BinaryOp::Le => Self::Compare(CmpPred::Sle),
            BinaryOp::Gt => Self::Compare(CmpPred::Sgt),
            BinaryOp::Ge => Self::Compare(CmpPred::Sge),
            BinaryOp::Pow => return None,
        })
    }
}

impl FnLower<'_, '_> {
    pub(super) fn expr(&mut self, id: ExprId) -> Result<ValueId, CodegenError> {
        ensure_sufficient_stack(|| self.expr_inner(id))
    }

    fn expr_inner(&mut self, id: ExprId) -> Result<ValueId, CodegenError> {
        let ast = self.cx.ast;
        let expr = ast.expr(id);
        match &expr.kind {
            ExprKind::IntLit(value) => Ok(self.b.const_int(IrType::I64, *value)),
            ExprKind::BoolLit(value) => Ok(self.b.const_bool(*value)),
            ExprKind::ConstAccess(decl) => self.constant(*decl),
            ExprKind::Prefix { op, operand } => {
                let value = self.expr(*operand)?;
                Ok(match op {
                    UnaryOp::Plus => value,
                    UnaryOp::Neg => self.b.neg(value),
                    UnaryOp::Not => self.b.not(value),
                })
            }
            ExprKind::Infix { op, lhs, rhs } => self.infix(*op, *lhs, *rhs),
            ExprKind::Designator { decl, selectors } => {
                let place = self.place(*decl, selectors)?;
                Ok(self.load_place(place))
            }
            ExprKind::Call { proc, args } => {
                self.call(*proc, args)?.ok_or_else(|| CodegenError::NoValue {
                    name: self.cx.name(*proc).to_owned(),
                })
            }
            ExprKind::Error => Err(CodegenError::ErrorNode { span: expr.span }),
        }
    }

    fn constant(&mut self, decl: DeclId) -> Result<ValueId, CodegenError> {
        let DeclKind::Const { value } = self.cx.ast.decl(decl).kind else {
            return Err(CodegenError::Unexpected {
                what: "constant access to a non-constant",
            });
        };
        match fold_integer(self.cx.ast, value) {
            Some(folded) => Ok(self.b.const_int(IrType::I64, folded)),
            None => self.expr(value),
        }
    }

    fn infix(&mut self, op: BinaryOp, lhs: ExprId, rhs: ExprId) -> Result<ValueId, CodegenError> {
        let l = self.expr(lhs)?;
        let Some(lowered) = Lowered::of(op) else {
            return self.power(l, rhs);
        };
        let r = self.expr(rhs)?;
        match lowered {
            Lowered::Arith(op) => Ok(self.b.binary(op, l, r)),
            Lowered::Checked(op) => self.checked_division(op, l, r),
            Lowered::Compare(pred) => Ok(self.b.cmp(pred, l, r)),
        }
    }

    // Designators

    /// Resolve `decl` and its selectors to a place.
    ///
    /// Index and field selectors accumulate into a single `elemaddr` rooted
    /// at the last address; a `^` flushes the chain, loads the pointer and
    /// starts a new one.
    ///
    /// Alongside the address, the walk tracks the source type and, while
    /// inside nested record fields, the outermost record and the byte
    /// offset reached in it. Those give the access tag of the final place.
    pub(super) fn place(
        &mut self,
        decl: DeclId,
        selectors: &[Selector],
    ) -> Result<Place, CodegenError> {
        let mut rest = selectors.iter();
        let mut source_ty = self.cx.ast.decl(decl).value_type();
        let (mut addr, mut ty) = match self.storage_of(decl)? {
            Storage::Ssa(ty) if selectors.is_empty() => return Ok(Place::Ssa { decl, ty }),
            Storage::Ssa(ty) => {
                // Only a pointer in SSA form can carry selectors, and the
                // first one must dereference it.
                let first = rest.next().ok_or(CodegenError::Unexpected {
                    what: "empty selector list",
                })?;
                if first.kind != SelectorKind::Deref {
                    return Err(CodegenError::Unexpected {
                        what: "selector on a scalar",
                    });
                }
                let current = self.b.current_block();
                let pointer = self.b.read_variable(current, Var::Decl(decl), &ty);
                source_ty = first.ty;
                (pointer, self.selector_type(first)?)
            }
            Storage::Memory { addr, ty } => (addr, ty),
            Storage::Global { symbol, ty } => (self.b.symbol(&symbol), ty),
        };

        let mut chain_ty = ty.clone();
        let mut path: SmallVec<[ValueId; 4]> = SmallVec::new();
        let mut record: Option<(DeclId, u64)> = None;
        for selector in rest {
            let selected = self.selector_type(selector)?;
            match &selector.kind {
                SelectorKind::Index(index) => {
                    if path.is_empty() {
                        path.push(self.b.const_int(IrType::I64, 0));
                    }
                    let index = self.expr(*index)?;
                    path.push(index);
                    record = None;
                }
                SelectorKind::Field { index, .. } => {
                    if path.is_empty() {
                        path.push(self.b.const_int(IrType::I64, 0));
                    }
                    path.push(self.b.const_int(IrType::I32, i64::from(*index)));
                    if let Some(outer) = source_ty {
                        let offsets = self.cx.field_offsets(outer)?;
                        let field = usize::try_from(*index)
                            .ok()
                            .and_then(|i| offsets.get(i).copied())
                            .unwrap_or(0);
                        let (base, start) = record.unwrap_or((outer, 0));
                        record = Some((base, start + field));
                    }
                }
                SelectorKind::Deref => {
                    addr = self.flush_path(chain_ty, addr, &mut path);
                    let tbaa = self.tag(record.take(), source_ty)?;
                    addr = self.b.load(IrType::Ptr, addr, tbaa);
                    chain_ty = selected.clone();
                }
            }
            source_ty = selector.ty;
            ty = selected;
        }
        let addr = self.flush_path(chain_ty, addr, &mut path);
        let tbaa = self.tag(record, source_ty)?;
        Ok(Place::Memory { addr, ty, tbaa })
    }

    fn tag(
        &mut self,
        record: Option<(DeclId, u64)>,
        access: Option<DeclId>,
    ) -> Result<Option<TbaaTag>, CodegenError> {
        match access {
            Some(access) => self.cx.access_tag(record, access),
            None => Ok(None),
        }
    }

    fn flush_path(
        &mut self,
        base_ty: IrType,
        base: ValueId,
        path: &mut SmallVec<[ValueId; 4]>,
    ) -> ValueId {
        if path.is_empty() {
            base
        } else {
            self.b.element_addr(base_ty, base, std::mem::take(path))
        }
    }

    fn selector_type(&mut self, selector: &Selector) -> Result<IrType, CodegenError> {
        let ty = selector.ty.ok_or(CodegenError::Untyped {
            what: "selector",
            span: selector.span,
        })?;
        self.cx.ir_type(ty)
    }

    pub(super) fn load_place(&mut self, place: Place) -> ValueId {
        match place {
            Place::Ssa { decl, ty } => {
                let current = self.b.current_block();
                self.b.read_variable(current, Var::Decl(decl), &ty)
            }
            Place::Memory { addr, ty, tbaa } => self.b.load(ty, addr, tbaa),
        }
    }

    pub(super) fn store_place(&mut self, place: Place, value: ValueId) {
        match place {
            Place::Ssa { decl, .. } => {
                let current = self.b.current_block();
                self.b.write_variable(current, Var::Decl(decl), value);
            }
            Place::Memory { addr, tbaa, .. } => self.b.store(value, addr, tbaa),
        }
    }

    // Calls

    /// Emit a call. `VAR` arguments pass the designator's address; other
    /// aggregates pass the address of a fresh copy.
    pub(super) fn call(
        &mut self,
        proc: DeclId,
        args: &[ExprId],
    ) -> Result<Option<ValueId>, CodegenError> {
        let ast = self.cx.ast;
        let DeclKind::Proc { params, ret, .. } = &ast.decl(proc).kind else {
            return Err(CodegenError::NotCallable {
                name: self.cx.name(proc).to_owned(),
            });
        };

        let mut values = Vec::with_capacity(args.len());
        for (&param, &arg) in params.iter().zip(args) {
            let ty = self.cx.value_type(param)?;
            let by_ref = matches!(ast.decl(param).kind, DeclKind::Param { by_ref: true, .. });
            let value = if by_ref {
                self.address_of(arg)?
            } else if ty.is_aggregate() {
                let value = self.expr(arg)?;
                let copy = self.b.alloca(ty);
                self.b.store(value, copy, None);
                copy
            } else {
                self.expr(arg)?
            };
            values.push(value);
        }

        let ret = match ret {
            Some(ty) => self.cx.ir_type(*ty)?,
            None => IrType::Void,
        };
        let callee = self.cx.mangle(proc);
        Ok(self.b.call(&callee, values, ret))
    }

    fn address_of(&mut self, arg: ExprId) -> Result<ValueId, CodegenError> {
        let ast = self.cx.ast;
        let ExprKind::Designator { decl, selectors } = &ast.expr(arg).kind else {
            return Err(CodegenError::Unexpected {
                what: "VAR argument that is not a designator",
            });
        };
        match self.place(*decl, selectors)? {
            Place::Memory { addr, .. } => Ok(addr),
            Place::Ssa { .. } => Err(CodegenError::Unexpected {
                what: "VAR argument without an address",
            }),
        }
    }

    // Address-taken scan

    /// Record every scalar passed directly to a `VAR` parameter in `stmts`.
    /// Those need a stack slot instead of an SSA value.
    pub(super) fn mark_address_taken(&mut self, stmts: &[StmtId]) {
        let ast = self.cx.ast;
        for &stmt in stmts {
            match &ast.stmt(stmt).kind {
                StmtKind::Assign { target, value } => {
                    self.scan_expr(*target);
                    self.scan_expr(*value);
                }
                StmtKind::Call { proc, args } => self.scan_call(*proc, args),
                StmtKind::If {
                    cond,
                    then_branch,
                    else_branch,
                } => {
                    self.scan_expr(*cond);
                    self.mark_address_taken(then_branch);
                    self.mark_address_taken(else_branch);
                }
                StmtKind::While { cond, body } => {
                    self.scan_expr(*cond);
                    self.mark_address_taken(body);
                }
                StmtKind::Return(value) => {
                    if let Some(value) = value {
                        self.scan_expr(*value);
                    }
                }
            }
        }
    }

    fn scan_expr(&mut self, id: ExprId) {
        let ast = self.cx.ast;
        match &ast.expr(id).kind {
            ExprKind::Infix { lhs, rhs, .. } => {
                ensure_sufficient_stack(|| self.scan_expr(*lhs));
                ensure_sufficient_stack(|| self.scan_expr(*rhs));
            }
            ExprKind::Prefix { operand, .. } => {
                ensure_sufficient_stack(|| self.scan_expr(*operand));
            }
            ExprKind::Designator { selectors, .. } => {
                for selector in selectors {
                    if let SelectorKind::Index(index) = selector.kind {
                        ensure_sufficient_stack(|| self.scan_expr(index));
                    }
                }
            }
            ExprKind::Call { proc, args } => self.scan_call(*proc, args),
            ExprKind::IntLit(_)
            | ExprKind::BoolLit(_)
            | ExprKind::ConstAccess(_)
            | ExprKind::Error => {}
        }
    }

    fn scan_call(&mut self, proc: DeclId, args: &[ExprId]) {
        let ast = self.cx.ast;
        let DeclKind::Proc { params, .. } = &ast.decl(proc).kind else {
            return;
        };
        for (&param, &arg) in params.iter().zip(args) {
            let by_ref = matches!(ast.decl(param).kind, DeclKind::Param { by_ref: true, .. });
            match &ast.expr(arg).kind {
                ExprKind::Designator { decl, selectors }
                    if by_ref
                        && !selectors
                            .first()
                            .is_some_and(|s| s.kind == SelectorKind::Deref) =>
                {
                    self.address_taken.insert(*decl);
                }
                _ => {}
            }
            self.scan_expr(arg);
        }
    }
}
