//! Function builder.
//!
//! Follows the "position at a block, emit, terminate" pattern of LLVM's
//! `IRBuilder`. On top of that, [`FunctionBuilder`] carries the per-block
//! definition tables and sealed flags of the on-the-fly SSA construction
//! (see `ssa.rs`), so lowering never needs a dominator tree.
//!
//! Terminators record predecessor edges as they are emitted. Adding an edge
//! into a block that is already sealed is a lowering bug.

mod ssa;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::ir::{
    BinOp, Block, BlockId, CmpPred, DebugScope, Function, InstKind, Instr, IrType, Param, Phi,
    PhiId, TbaaTag, Terminator, ValueData, ValueId, ValueKind,
};

pub use self::ssa::Var;

// ── Block state ─────────────────────────────────────────────────────

/// In-progress basic block.
struct BlockBuilder {
    id: BlockId,
    label: &'static str,
    phis: Vec<PhiId>,
    body: Vec<Instr>,
    terminator: Option<Terminator>,
    preds: SmallVec<[BlockId; 2]>,
    /// Current definition of each variable at the end of this block.
    defs: FxHashMap<Var, ValueId>,
    /// Phis created before the block was sealed, still without operands.
    incomplete: Vec<(Var, PhiId)>,
    sealed: bool,
}

impl BlockBuilder {
    fn new(id: BlockId, label: &'static str) -> Self {
        Self {
            id,
            label,
            phis: Vec::new(),
            body: Vec::new(),
            terminator: None,
            preds: SmallVec::new(),
            defs: FxHashMap::default(),
            incomplete: Vec::new(),
            sealed: false,
        }
    }
}

/// A phi while the function is being built.
struct PhiState {
    block: BlockId,
    dst: ValueId,
    ty: IrType,
    operands: Vec<(ValueId, BlockId)>,
    /// Phis that have this phi as an operand.
    users: Vec<PhiId>,
    removed: bool,
}

// ── FunctionBuilder ─────────────────────────────────────────────────

/// Builder for one IR function.
///
/// Consumed by [`finish`](FunctionBuilder::finish), which seals leftovers,
/// patches unterminated blocks and rewrites uses of removed phis.
pub struct FunctionBuilder {
    name: String,
    ret: IrType,
    params: Vec<Param>,
    blocks: Vec<BlockBuilder>,
    current: BlockId,
    values: Vec<ValueData>,
    consts: FxHashMap<(IrType, i64), ValueId>,
    symbols: FxHashMap<String, ValueId>,
    phis: Vec<PhiState>,
    /// Removed phi → the value that replaced it.
    forward: FxHashMap<ValueId, ValueId>,
    next_temp: u32,
    /// Entry-block instructions that are stack slots; new slots go after them.
    entry_allocas: usize,
    personality: Option<String>,
    line: Option<u32>,
    debug: Option<DebugScope>,
}

impl FunctionBuilder {
    /// Create a builder with a sealed entry block already allocated.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "parameter counts never exceed u32"
    )]
    pub fn new(name: impl Into<String>, params: &[IrType], ret: IrType) -> Self {
        let mut entry = BlockBuilder::new(BlockId::new(0), "entry");
        // Nothing ever branches back to the entry block.
        entry.sealed = true;
        let mut builder = Self {
            name: name.into(),
            ret,
            params: Vec::with_capacity(params.len()),
            blocks: vec![entry],
            current: BlockId::new(0),
            values: Vec::new(),
            consts: FxHashMap::default(),
            symbols: FxHashMap::default(),
            phis: Vec::new(),
            forward: FxHashMap::default(),
            next_temp: 0,
            entry_allocas: 0,
            personality: None,
            line: None,
            debug: None,
        };
        for (i, ty) in params.iter().enumerate() {
            let value = builder.new_value(ValueKind::Param(i as u32), ty.clone());
            builder.params.push(Param {
                value,
                ty: ty.clone(),
            });
        }
        builder
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ret_type(&self) -> &IrType {
        &self.ret
    }

    pub fn param(&self, index: usize) -> ValueId {
        self.params[index].value
    }

    pub fn set_personality(&mut self, symbol: &str) {
        self.personality = Some(symbol.to_owned());
    }

    pub fn set_debug_scope(&mut self, scope: DebugScope) {
        self.debug = Some(scope);
    }

    /// Source line attached to instructions emitted from now on.
    pub fn set_line(&mut self, line: Option<u32>) {
        self.line = line;
    }

    pub fn line(&self) -> Option<u32> {
        self.line
    }

    // Block management

    #[expect(
        clippy::cast_possible_truncation,
        reason = "block indices never exceed u32"
    )]
    pub fn new_block(&mut self, label: &'static str) -> BlockId {
        let id = BlockId::new(self.blocks.len() as u32);
        self.blocks.push(BlockBuilder::new(id, label));
        id
    }

    pub fn position_at(&mut self, block: BlockId) {
        debug_assert!(
            block.index() < self.blocks.len(),
            "BlockId {} out of bounds (have {} blocks)",
            block.raw(),
            self.blocks.len(),
        );
        self.current = block;
    }

    #[inline]
    pub fn current_block(&self) -> BlockId {
        self.current
    }

    #[inline]
    pub fn entry_block(&self) -> BlockId {
        BlockId::new(0)
    }

    #[inline]
    pub fn is_terminated(&self) -> bool {
        self.blocks[self.current.index()].terminator.is_some()
    }

    /// No phis, no instructions, no terminator.
    pub fn is_empty(&self, block: BlockId) -> bool {
        let bb = &self.blocks[block.index()];
        bb.phis.is_empty() && bb.body.is_empty() && bb.terminator.is_none()
    }

    pub fn predecessors(&self, block: BlockId) -> &[BlockId] {
        &self.blocks[block.index()].preds
    }

    // Values

    #[expect(
        clippy::cast_possible_truncation,
        reason = "value counts never exceed u32"
    )]
    fn new_value(&mut self, kind: ValueKind, ty: IrType) -> ValueId {
        let id = ValueId::new(self.values.len() as u32);
        self.values.push(ValueData { kind, ty });
        id
    }

    pub fn value_type(&self, value: ValueId) -> &IrType {
        &self.values[value.index()].ty
    }

    /// Constant payload of `value` after phi forwarding.
    pub fn const_value(&self, value: ValueId) -> Option<i64> {
        match self.values[self.resolve(value).index()].kind {
            ValueKind::Const(c) => Some(c),
            _ => None,
        }
    }

    /// Interned constant; equal requests give the same value.
    pub fn const_int(&mut self, ty: IrType, value: i64) -> ValueId {
        if let Some(&id) = self.consts.get(&(ty.clone(), value)) {
            return id;
        }
        let id = self.new_value(ValueKind::Const(value), ty.clone());
        self.consts.insert((ty, value), id);
        id
    }

    pub fn const_bool(&mut self, value: bool) -> ValueId {
        self.const_int(IrType::I1, i64::from(value))
    }

    pub fn null_ptr(&mut self) -> ValueId {
        self.const_int(IrType::Ptr, 0)
    }

    /// Zero of `ty`, or `None` for `void`.
    pub fn zero(&mut self, ty: &IrType) -> Option<ValueId> {
        match ty {
            IrType::Void => None,
            other => Some(self.const_int(other.clone(), 0)),
        }
    }

    pub fn undef(&mut self, ty: IrType) -> ValueId {
        self.new_value(ValueKind::Undef, ty)
    }

    /// Address of a named global or external symbol.
    pub fn symbol(&mut self, name: &str) -> ValueId {
        if let Some(&id) = self.symbols.get(name) {
            return id;
        }
        let id = self.new_value(ValueKind::Symbol(name.to_owned()), IrType::Ptr);
        self.symbols.insert(name.to_owned(), id);
        id
    }

    // Instruction emission

    fn push(&mut self, dst: Option<ValueId>, kind: InstKind) {
        let line = self.line;
        let block = &mut self.blocks[self.current.index()];
        debug_assert!(
            block.terminator.is_none(),
            "emitting into terminated block {}",
            self.current.raw()
        );
        tracing::trace!(block = self.current.raw(), ?kind, "emit");
        block.body.push(Instr { dst, kind, line });
    }

    fn emit(&mut self, ty: IrType, kind: InstKind) -> ValueId {
        let dst = self.new_value(ValueKind::Inst, ty);
        self.push(Some(dst), kind);
        dst
    }

    pub fn binary(&mut self, op: BinOp, lhs: ValueId, rhs: ValueId) -> ValueId {
        let ty = self.value_type(lhs).clone();
        self.emit(ty, InstKind::Binary { op, lhs, rhs })
    }

    pub fn cmp(&mut self, pred: CmpPred, lhs: ValueId, rhs: ValueId) -> ValueId {
        self.emit(IrType::I1, InstKind::Cmp { pred, lhs, rhs })
    }

    pub fn neg(&mut self, operand: ValueId) -> ValueId {
        let ty = self.value_type(operand).clone();
        self.emit(ty, InstKind::Neg(operand))
    }

    pub fn not(&mut self, operand: ValueId) -> ValueId {
        self.emit(IrType::I1, InstKind::Not(operand))
    }

    /// Stack slot in the entry block, whatever the current block is.
    pub fn alloca(&mut self, ty: IrType) -> ValueId {
        let dst = self.new_value(ValueKind::Inst, IrType::Ptr);
        let entry = &mut self.blocks[0];
        entry.body.insert(
            self.entry_allocas,
            Instr {
                dst: Some(dst),
                kind: InstKind::Alloca(ty),
                line: None,
            },
        );
        self.entry_allocas += 1;
        dst
    }

    pub fn load(&mut self, ty: IrType, addr: ValueId, tbaa: Option<TbaaTag>) -> ValueId {
        self.emit(ty.clone(), InstKind::Load { ty, addr, tbaa })
    }

    pub fn store(&mut self, value: ValueId, addr: ValueId, tbaa: Option<TbaaTag>) {
        self.push(None, InstKind::Store { value, addr, tbaa });
    }

    pub fn element_addr(
        &mut self,
        base_ty: IrType,
        base: ValueId,
        indices: SmallVec<[ValueId; 4]>,
    ) -> ValueId {
        self.emit(
            IrType::Ptr,
            InstKind::ElementAddr {
                base_ty,
                base,
                indices,
            },
        )
    }

    /// Direct call. Returns the result unless `ret` is `void`.
    pub fn call(&mut self, callee: &str, args: Vec<ValueId>, ret: IrType) -> Option<ValueId> {
        let kind = InstKind::Call {
            callee: callee.to_owned(),
            args,
            ret: ret.clone(),
        };
        if ret == IrType::Void {
            self.push(None, kind);
            None
        } else {
            Some(self.emit(ret, kind))
        }
    }

    /// Landing pad catching `catch`. Returns `(token, selector)`.
    pub fn landing_pad(&mut self, catch: ValueId) -> (ValueId, ValueId) {
        let token = self.new_value(ValueKind::Inst, IrType::Ptr);
        let selector = self.new_value(ValueKind::Inst, IrType::I32);
        self.push(Some(token), InstKind::LandingPad { selector, catch });
        (token, selector)
    }

    // Terminators

    fn terminate(&mut self, term: Terminator) {
        let from = self.current;
        for succ in term.successors() {
            let target = &mut self.blocks[succ.index()];
            debug_assert!(
                !target.sealed,
                "edge {} -> {} into sealed block",
                from.raw(),
                succ.raw()
            );
            target.preds.push(from);
        }
        let block = &mut self.blocks[from.index()];
        debug_assert!(
            block.terminator.is_none(),
            "block {} already terminated",
            from.raw()
        );
        block.terminator = Some(term);
    }

    pub fn terminate_return(&mut self, value: Option<ValueId>) {
        self.terminate(Terminator::Return(value));
    }

    pub fn terminate_jump(&mut self, target: BlockId) {
        self.terminate(Terminator::Jump(target));
    }

    pub fn terminate_branch(&mut self, cond: ValueId, then_block: BlockId, else_block: BlockId) {
        self.terminate(Terminator::Branch {
            cond,
            then_block,
            else_block,
        });
    }

    /// Call that may raise; `normal` and `unwind` both become successors.
    pub fn terminate_invoke(
        &mut self,
        callee: &str,
        args: Vec<ValueId>,
        normal: BlockId,
        unwind: BlockId,
    ) {
        self.terminate(Terminator::Invoke {
            callee: callee.to_owned(),
            args,
            normal,
            unwind,
        });
    }

    pub fn terminate_resume(&mut self, token: ValueId) {
        self.terminate(Terminator::Resume(token));
    }

    pub fn terminate_unreachable(&mut self) {
        self.terminate(Terminator::Unreachable);
    }

    // Finalization

    /// Consume the builder and produce the finished [`Function`].
    ///
    /// Blocks still unsealed are sealed and unterminated blocks get
    /// `Unreachable`, both with a warning. Every use of a removed phi is
    /// rewritten to its replacement.
    pub fn finish(mut self) -> Function {
        for index in 0..self.blocks.len() {
            if !self.blocks[index].sealed {
                let id = self.blocks[index].id;
                tracing::warn!(block = id.raw(), "unsealed block at finish, sealing");
                self.seal_block(id);
            }
        }

        let mut blocks = Vec::with_capacity(self.blocks.len());
        for bb in std::mem::take(&mut self.blocks) {
            let mut terminator = bb.terminator.unwrap_or_else(|| {
                tracing::warn!(
                    function = %self.name,
                    block = bb.id.raw(),
                    "unterminated block, adding Unreachable"
                );
                Terminator::Unreachable
            });
            terminator.for_each_operand_mut(|v| *v = self.resolve(*v));

            let mut body = bb.body;
            for instr in &mut body {
                instr.for_each_operand_mut(|v| *v = self.resolve(*v));
            }

            let phis = bb
                .phis
                .iter()
                .filter(|&&id| !self.phis[id.index()].removed)
                .map(|&id| {
                    let state = &self.phis[id.index()];
                    Phi {
                        id,
                        dst: state.dst,
                        ty: state.ty.clone(),
                        incoming: state
                            .operands
                            .iter()
                            .map(|&(v, pred)| (self.resolve(v), pred))
                            .collect(),
                    }
                })
                .collect();

            blocks.push(Block {
                id: bb.id,
                label: bb.label,
                phis,
                body,
                terminator,
            });
        }

        Function {
            name: self.name,
            params: self.params,
            ret: self.ret,
            blocks,
            values: self.values,
            personality: self.personality,
            debug: self.debug,
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
