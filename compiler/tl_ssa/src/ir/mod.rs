//! SSA intermediate representation.
//!
//! The shape follows LLVM IR closely enough that a backend can translate it
//! one instruction at a time:
//!
//! - **[`Module`]** owns functions, globals and the external symbols the
//!   backend has to provide.
//! - **[`Function`]** is a list of [`Block`]s; block 0 is the entry. It also
//!   owns the value table every [`ValueId`] indexes into.
//! - **[`Block`]** holds its phis, a straight-line body of [`Instr`]s and
//!   exactly one [`Terminator`].
//! - **[`TbaaNode`]** entries form the module's type-based alias analysis
//!   table; loads and stores of typed memory carry a [`TbaaTag`] into it.
//!
//! The text rendering (see [`Module`]'s `Display`) is the hand-off format.

mod print;

use smallvec::SmallVec;

// ── ID newtypes ─────────────────────────────────────────────────────

macro_rules! ir_id {
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

ir_id!(
    /// Basic block within one [`Function`]. Block 0 is the entry.
    BlockId
);
ir_id!(
    /// Value within one [`Function`]: a constant, parameter, instruction
    /// result, phi, `undef` or symbol address.
    ValueId
);
ir_id!(
    /// Phi node within one [`Function`], live or removed.
    PhiId
);
ir_id!(
    /// Entry of [`Module::tbaa`].
    TbaaNodeId
);

// ── Types ───────────────────────────────────────────────────────────

/// Lowered type.
///
/// `I8` and `I32` only appear at the runtime boundary: string bytes, `main`'s
/// status, the fault payload and the landing-pad selector.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum IrType {
    Void,
    I1,
    I8,
    I32,
    I64,
    Ptr,
    Array { len: u64, elem: Box<IrType> },
    Record(Vec<IrType>),
}

impl IrType {
    /// Arrays and records live in memory and are handled by address.
    pub fn is_aggregate(&self) -> bool {
        matches!(self, IrType::Array { .. } | IrType::Record(_))
    }
}

// ── Values ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValueKind {
    /// Integer constant; `i1` uses 0 and 1, `ptr` uses 0 for null.
    Const(i64),
    /// The n-th function parameter.
    Param(u32),
    /// Result of the instruction whose `dst` (or landing-pad selector) it is.
    Inst,
    Phi(PhiId),
    Undef,
    /// Address of a global, string constant or external symbol.
    Symbol(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueData {
    pub kind: ValueKind,
    pub ty: IrType,
}

// ── Instructions ────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    SDiv,
    SRem,
    And,
    Or,
}

impl BinOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            BinOp::Add => "add",
            BinOp::Sub => "sub",
            BinOp::Mul => "mul",
            BinOp::SDiv => "sdiv",
            BinOp::SRem => "srem",
            BinOp::And => "and",
            BinOp::Or => "or",
        }
    }
}

/// Signed integer comparison predicate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CmpPred {
    Eq,
    Ne,
    Slt,
    Sle,
    Sgt,
    Sge,
}

impl CmpPred {
    pub const fn as_str(self) -> &'static str {
        match self {
            CmpPred::Eq => "eq",
            CmpPred::Ne => "ne",
            CmpPred::Slt => "slt",
            CmpPred::Sle => "sle",
            CmpPred::Sgt => "sgt",
            CmpPred::Sge => "sge",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InstKind {
    Binary {
        op: BinOp,
        lhs: ValueId,
        rhs: ValueId,
    },
    Cmp {
        pred: CmpPred,
        lhs: ValueId,
        rhs: ValueId,
    },
    Neg(ValueId),
    Not(ValueId),
    /// Stack slot; always placed in the entry block.
    Alloca(IrType),
    Load {
        ty: IrType,
        addr: ValueId,
        tbaa: Option<TbaaTag>,
    },
    Store {
        value: ValueId,
        addr: ValueId,
        tbaa: Option<TbaaTag>,
    },
    /// Address of an element inside `base`, which points at a `base_ty`.
    /// The first index steps over `base` itself and is normally 0.
    ElementAddr {
        base_ty: IrType,
        base: ValueId,
        indices: SmallVec<[ValueId; 4]>,
    },
    Call {
        callee: String,
        args: Vec<ValueId>,
        ret: IrType,
    },
    /// Entry of an unwind destination. `dst` is the raised token, `selector`
    /// the matched type selector. Catches values tagged `catch`.
    LandingPad {
        selector: ValueId,
        catch: ValueId,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instr {
    pub dst: Option<ValueId>,
    pub kind: InstKind,
    /// Source line, recorded only when debug info is on.
    pub line: Option<u32>,
}

impl Instr {
    /// Values this instruction reads.
    pub fn operands(&self) -> SmallVec<[ValueId; 4]> {
        let mut out = SmallVec::new();
        match &self.kind {
            InstKind::Binary { lhs, rhs, .. } | InstKind::Cmp { lhs, rhs, .. } => {
                out.push(*lhs);
                out.push(*rhs);
            }
            InstKind::Neg(v) | InstKind::Not(v) => out.push(*v),
            InstKind::Alloca(_) => {}
            InstKind::Load { addr, .. } => out.push(*addr),
            InstKind::Store { value, addr, .. } => {
                out.push(*value);
                out.push(*addr);
            }
            InstKind::ElementAddr { base, indices, .. } => {
                out.push(*base);
                out.extend(indices.iter().copied());
            }
            InstKind::Call { args, .. } => out.extend(args.iter().copied()),
            InstKind::LandingPad { catch, .. } => out.push(*catch),
        }
        out
    }

    pub(crate) fn for_each_operand_mut(&mut self, mut f: impl FnMut(&mut ValueId)) {
        match &mut self.kind {
            InstKind::Binary { lhs, rhs, .. } | InstKind::Cmp { lhs, rhs, .. } => {
                f(lhs);
                f(rhs);
            }
            InstKind::Neg(v) | InstKind::Not(v) => f(v),
            InstKind::Alloca(_) => {}
            InstKind::Load { addr, .. } => f(addr),
            InstKind::Store { value, addr, .. } => {
                f(value);
                f(addr);
            }
            InstKind::ElementAddr { base, indices, .. } => {
                f(base);
                indices.iter_mut().for_each(f);
            }
            InstKind::Call { args, .. } => args.iter_mut().for_each(f),
            InstKind::LandingPad { catch, .. } => f(catch),
        }
    }
}

// ── Terminators ─────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Terminator {
    Return(Option<ValueId>),
    Jump(BlockId),
    Branch {
        cond: ValueId,
        then_block: BlockId,
        else_block: BlockId,
    },
    /// Call that may unwind. Control continues at `normal` when the callee
    /// returns and at `unwind` when it raises.
    Invoke {
        callee: String,
        args: Vec<ValueId>,
        normal: BlockId,
        unwind: BlockId,
    },
    /// Continue unwinding with the given token.
    Resume(ValueId),
    Unreachable,
}

impl Terminator {
    pub fn successors(&self) -> SmallVec<[BlockId; 2]> {
        match self {
            Terminator::Jump(target) => smallvec::smallvec![*target],
            Terminator::Branch {
                then_block,
                else_block,
                ..
            } => smallvec::smallvec![*then_block, *else_block],
            Terminator::Invoke { normal, unwind, .. } => smallvec::smallvec![*normal, *unwind],
            Terminator::Return(_) | Terminator::Resume(_) | Terminator::Unreachable => {
                SmallVec::new()
            }
        }
    }

    pub fn operands(&self) -> SmallVec<[ValueId; 4]> {
        match self {
            Terminator::Return(Some(v)) | Terminator::Resume(v) => smallvec::smallvec![*v],
            Terminator::Branch { cond, .. } => smallvec::smallvec![*cond],
            Terminator::Invoke { args, .. } => args.iter().copied().collect(),
            Terminator::Return(None) | Terminator::Jump(_) | Terminator::Unreachable => {
                SmallVec::new()
            }
        }
    }

    pub(crate) fn for_each_operand_mut(&mut self, mut f: impl FnMut(&mut ValueId)) {
        match self {
            Terminator::Return(Some(v)) | Terminator::Resume(v) => f(v),
            Terminator::Branch { cond, .. } => f(cond),
            Terminator::Invoke { args, .. } => args.iter_mut().for_each(f),
            Terminator::Return(None) | Terminator::Jump(_) | Terminator::Unreachable => {}
        }
    }
}

// ── Blocks and functions ────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Phi {
    pub id: PhiId,
    pub dst: ValueId,
    pub ty: IrType,
    /// One `(value, predecessor)` pair per incoming edge.
    pub incoming: Vec<(ValueId, BlockId)>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub id: BlockId,
    /// Printed prefix, e.g. `while.cond`.
    pub label: &'static str,
    pub phis: Vec<Phi>,
    pub body: Vec<Instr>,
    pub terminator: Terminator,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Param {
    pub value: ValueId,
    pub ty: IrType,
}

/// Source-level identity of a function, recorded when debug info is on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DebugScope {
    pub name: String,
    pub line: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub params: Vec<Param>,
    pub ret: IrType,
    pub blocks: Vec<Block>,
    pub values: Vec<ValueData>,
    /// Set once the function has a fault path.
    pub personality: Option<String>,
    pub debug: Option<DebugScope>,
}

impl Function {
    #[inline]
    pub fn value(&self, id: ValueId) -> &ValueData {
        &self.values[id.index()]
    }

    #[inline]
    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.index()]
    }

    /// Constant payload of `id`, if it is a constant.
    pub fn const_value(&self, id: ValueId) -> Option<i64> {
        match self.value(id).kind {
            ValueKind::Const(c) => Some(c),
            _ => None,
        }
    }

    /// Predecessor lists indexed by block, in edge order.
    pub fn predecessors(&self) -> Vec<Vec<BlockId>> {
        let mut preds = vec![Vec::new(); self.blocks.len()];
        for block in &self.blocks {
            for succ in block.terminator.successors() {
                preds[succ.index()].push(block.id);
            }
        }
        preds
    }

    pub fn phi_count(&self) -> usize {
        self.blocks.iter().map(|b| b.phis.len()).sum()
    }

    /// Every instruction in block order.
    pub fn instructions(&self) -> impl Iterator<Item = &Instr> {
        self.blocks.iter().flat_map(|b| b.body.iter())
    }
}

// ── Alias analysis ──────────────────────────────────────────────────

/// Node of the type-based alias analysis table.
///
/// Scalars hang off the root; two accesses may alias only if one access
/// type is an ancestor of the other. Record types are struct-path nodes:
/// the node of each field together with its byte offset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TbaaNode {
    Root { name: String },
    Scalar { name: String, parent: TbaaNodeId },
    Struct { name: String, fields: Vec<(TbaaNodeId, u64)> },
}

/// Access tag of a load or store.
///
/// `base` is the type of the outermost object the access goes through,
/// `access` the scalar type read or written, `offset` the byte offset of
/// the access inside `base`. A plain scalar access has `base == access`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TbaaTag {
    pub base: TbaaNodeId,
    pub access: TbaaNodeId,
    pub offset: u64,
}

impl TbaaTag {
    pub const fn scalar(node: TbaaNodeId) -> Self {
        TbaaTag {
            base: node,
            access: node,
            offset: 0,
        }
    }
}

// ── Module ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GlobalInit {
    /// Zero-initialized storage.
    Zero,
    /// NUL-terminated string constant.
    Str(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Global {
    pub name: String,
    pub ty: IrType,
    pub init: GlobalInit,
    pub constant: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExternalKind {
    Function {
        ret: IrType,
        params: Vec<IrType>,
        variadic: bool,
    },
    /// A data symbol such as a type tag.
    Data,
}

/// A symbol the backend or runtime provides.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct External {
    pub name: String,
    pub kind: ExternalKind,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Module {
    pub name: String,
    pub globals: Vec<Global>,
    pub externals: Vec<External>,
    pub functions: Vec<Function>,
    /// Alias analysis table; [`TbaaNodeId`]s index into it.
    pub tbaa: Vec<TbaaNode>,
}

impl Module {
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn global(&self, name: &str) -> Option<&Global> {
        self.globals.iter().find(|g| g.name == name)
    }

    pub fn external(&self, name: &str) -> Option<&External> {
        self.externals.iter().find(|e| e.name == name)
    }

    pub fn tbaa_node(&self, id: TbaaNodeId) -> Option<&TbaaNode> {
        self.tbaa.get(id.index())
    }
}
