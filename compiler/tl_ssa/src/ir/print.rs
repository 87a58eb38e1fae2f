//! Text rendering of the IR.

use std::fmt;

use super::{
    Block, BlockId, ExternalKind, Function, GlobalInit, InstKind, Instr, IrType, Module,
    TbaaNode, TbaaTag, Terminator, ValueId, ValueKind,
};

impl fmt::Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrType::Void => f.write_str("void"),
            IrType::I1 => f.write_str("i1"),
            IrType::I8 => f.write_str("i8"),
            IrType::I32 => f.write_str("i32"),
            IrType::I64 => f.write_str("i64"),
            IrType::Ptr => f.write_str("ptr"),
            IrType::Array { len, elem } => write!(f, "[{len} x {elem}]"),
            IrType::Record(fields) => {
                f.write_str("{ ")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{field}")?;
                }
                f.write_str(" }")
            }
        }
    }
}

/// A value as an operand, without its type.
struct Operand<'a>(&'a Function, ValueId);

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.value(self.1);
        match (&data.kind, &data.ty) {
            (ValueKind::Const(c), IrType::I1) => f.write_str(if *c == 0 { "false" } else { "true" }),
            (ValueKind::Const(_), IrType::Ptr) => f.write_str("null"),
            (ValueKind::Const(c), _) => write!(f, "{c}"),
            (ValueKind::Undef, _) => f.write_str("undef"),
            (ValueKind::Symbol(name), _) => write!(f, "@{name}"),
            (ValueKind::Param(_) | ValueKind::Inst | ValueKind::Phi(_), _) => {
                write!(f, "%{}", self.1.raw())
            }
        }
    }
}

/// A value as an operand, prefixed by its type.
struct Typed<'a>(&'a Function, ValueId);

impl fmt::Display for Typed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0.value(self.1).ty, Operand(self.0, self.1))
    }
}

struct Label<'a>(&'a Function, BlockId);

impl fmt::Display for Label<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_block_name(f, self.0.block(self.1))
    }
}

fn write_block_name(f: &mut fmt::Formatter<'_>, block: &Block) -> fmt::Result {
    if block.id.raw() == 0 {
        f.write_str(block.label)
    } else {
        write!(f, "{}.{}", block.label, block.id.raw())
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, func: &Function, args: &[ValueId]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", Typed(func, *arg))?;
    }
    Ok(())
}

fn write_instr(f: &mut fmt::Formatter<'_>, func: &Function, instr: &Instr) -> fmt::Result {
    f.write_str("  ")?;
    if let Some(dst) = instr.dst {
        write!(f, "%{}", dst.raw())?;
        if let InstKind::LandingPad { selector, .. } = instr.kind {
            write!(f, ", %{}", selector.raw())?;
        }
        f.write_str(" = ")?;
    }
    match &instr.kind {
        InstKind::Binary { op, lhs, rhs } => write!(
            f,
            "{} {}, {}",
            op.as_str(),
            Typed(func, *lhs),
            Operand(func, *rhs)
        )?,
        InstKind::Cmp { pred, lhs, rhs } => write!(
            f,
            "icmp {} {}, {}",
            pred.as_str(),
            Typed(func, *lhs),
            Operand(func, *rhs)
        )?,
        InstKind::Neg(v) => write!(f, "neg {}", Typed(func, *v))?,
        InstKind::Not(v) => write!(f, "not {}", Typed(func, *v))?,
        InstKind::Alloca(ty) => write!(f, "alloca {ty}")?,
        InstKind::Load { ty, addr, tbaa } => {
            write!(f, "load {ty}, {}", Typed(func, *addr))?;
            write_tbaa(f, *tbaa)?;
        }
        InstKind::Store { value, addr, tbaa } => {
            write!(f, "store {}, {}", Typed(func, *value), Typed(func, *addr))?;
            write_tbaa(f, *tbaa)?;
        }
        InstKind::ElementAddr {
            base_ty,
            base,
            indices,
        } => {
            write!(f, "elemaddr {base_ty}, {}", Typed(func, *base))?;
            for index in indices {
                write!(f, ", {}", Typed(func, *index))?;
            }
        }
        InstKind::Call { callee, args, ret } => {
            write!(f, "call {ret} @{callee}(")?;
            write_args(f, func, args)?;
            f.write_str(")")?;
        }
        InstKind::LandingPad { catch, .. } => {
            write!(f, "landingpad {{ ptr, i32 }} catch {}", Typed(func, *catch))?;
        }
    }
    if let Some(line) = instr.line {
        write!(f, ", !line {line}")?;
    }
    writeln!(f)
}

fn write_tbaa(f: &mut fmt::Formatter<'_>, tag: Option<TbaaTag>) -> fmt::Result {
    match tag {
        Some(tag) => write!(
            f,
            ", !tbaa !{{!{}, !{}, i64 {}}}",
            tag.base.raw(),
            tag.access.raw(),
            tag.offset
        ),
        None => Ok(()),
    }
}

impl fmt::Display for TbaaNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TbaaNode::Root { name } => write!(f, "!{{!\"{name}\"}}"),
            TbaaNode::Scalar { name, parent } => {
                write!(f, "!{{!\"{name}\", !{}, i64 0}}", parent.raw())
            }
            TbaaNode::Struct { name, fields } => {
                write!(f, "!{{!\"{name}\"")?;
                for (node, offset) in fields {
                    write!(f, ", !{}, i64 {offset}", node.raw())?;
                }
                f.write_str("}")
            }
        }
    }
}

fn write_terminator(f: &mut fmt::Formatter<'_>, func: &Function, term: &Terminator) -> fmt::Result {
    f.write_str("  ")?;
    match term {
        Terminator::Return(None) => f.write_str("ret void")?,
        Terminator::Return(Some(v)) => write!(f, "ret {}", Typed(func, *v))?,
        Terminator::Jump(target) => write!(f, "br label %{}", Label(func, *target))?,
        Terminator::Branch {
            cond,
            then_block,
            else_block,
        } => write!(
            f,
            "br {}, label %{}, label %{}",
            Typed(func, *cond),
            Label(func, *then_block),
            Label(func, *else_block)
        )?,
        Terminator::Invoke {
            callee,
            args,
            normal,
            unwind,
        } => {
            write!(f, "invoke void @{callee}(")?;
            write_args(f, func, args)?;
            write!(
                f,
                ") to label %{} unwind label %{}",
                Label(func, *normal),
                Label(func, *unwind)
            )?;
        }
        Terminator::Resume(v) => write!(f, "resume {}", Typed(func, *v))?,
        Terminator::Unreachable => f.write_str("unreachable")?,
    }
    writeln!(f)
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scope) = &self.debug {
            writeln!(f, "; scope {} at line {}", scope.name, scope.line)?;
        }
        write!(f, "define {} @{}(", self.ret, self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} %{}", param.ty, param.value.raw())?;
        }
        f.write_str(")")?;
        if let Some(personality) = &self.personality {
            write!(f, " personality @{personality}")?;
        }
        writeln!(f, " {{")?;

        let preds = self.predecessors();
        for block in &self.blocks {
            write_block_name(f, block)?;
            f.write_str(":")?;
            let block_preds = &preds[block.id.index()];
            if !block_preds.is_empty() {
                f.write_str("  ; preds = ")?;
                for (i, pred) in block_preds.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "%{}", Label(self, *pred))?;
                }
            }
            writeln!(f)?;

            for phi in &block.phis {
                write!(f, "  %{} = phi {}", phi.dst.raw(), phi.ty)?;
                for (i, (value, pred)) in phi.incoming.iter().enumerate() {
                    f.write_str(if i == 0 { " " } else { ", " })?;
                    write!(f, "[ {}, %{} ]", Operand(self, *value), Label(self, *pred))?;
                }
                writeln!(f)?;
            }
            for instr in &block.body {
                write_instr(f, self, instr)?;
            }
            write_terminator(f, self, &block.terminator)?;
        }
        writeln!(f, "}}")
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "; module {}", self.name)?;

        if !self.externals.is_empty() {
            writeln!(f)?;
        }
        for external in &self.externals {
            match &external.kind {
                ExternalKind::Function {
                    ret,
                    params,
                    variadic,
                } => {
                    write!(f, "declare {ret} @{}(", external.name)?;
                    for (i, param) in params.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{param}")?;
                    }
                    if *variadic {
                        f.write_str(if params.is_empty() { "..." } else { ", ..." })?;
                    }
                    writeln!(f, ")")?;
                }
                ExternalKind::Data => writeln!(f, "@{} = external constant ptr", external.name)?,
            }
        }

        if !self.globals.is_empty() {
            writeln!(f)?;
        }
        for global in &self.globals {
            let linkage = if global.constant {
                "private constant"
            } else {
                "global"
            };
            match &global.init {
                GlobalInit::Zero => {
                    writeln!(f, "@{} = {linkage} {} zeroinitializer", global.name, global.ty)?;
                }
                GlobalInit::Str(text) => writeln!(
                    f,
                    "@{} = {linkage} {} c\"{}\\00\"",
                    global.name,
                    global.ty,
                    text.escape_default()
                )?,
            }
        }

        for function in &self.functions {
            writeln!(f)?;
            write!(f, "{function}")?;
        }

        if !self.tbaa.is_empty() {
            writeln!(f)?;
        }
        for (i, node) in self.tbaa.iter().enumerate() {
            writeln!(f, "!{i} = {node}")?;
        }
        Ok(())
    }
}
