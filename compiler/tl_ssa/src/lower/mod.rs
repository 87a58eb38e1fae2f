//! AST → SSA IR lowering.
//!
//! # Architecture
//!
//! - [`UnitCtx`] owns everything shared by the functions of one unit: the
//!   type-conversion cache, the mangled-name cache, the alias analysis
//!   table (`tbaa`), the line table and the [`Module`] being filled.
//! - [`FnLower`] walks one procedure body (or the module body, or the
//!   expression of an expression unit) and drives a [`FunctionBuilder`].
//!   Expressions are in `exprs.rs`, statements in `stmts.rs`, the division
//!   fault path in `fault.rs`, exponents in `power.rs`.
//!
//! A module unit becomes one function per procedure plus one for the
//! module's own statements; module variables become globals. An expression
//! unit becomes `main`.

mod calc;
mod exprs;
mod fault;
mod power;
mod stmts;
mod tbaa;
mod types;

use rustc_hash::{FxHashMap, FxHashSet};
use tl_diagnostic::span_utils::LineOffsetTable;
use tl_ir::{Ast, DeclId, DeclKind, Span, StringInterner, Unit, UnitKind};

use crate::builder::{FunctionBuilder, Var};
use crate::ir::{
    BlockId, DebugScope, External, ExternalKind, Function, Global, GlobalInit, IrType, Module,
    ValueId,
};
use crate::mangle::Mangler;
use crate::CodegenError;

use self::fault::FaultPath;
use self::tbaa::TbaaTable;
use self::types::TypeCache;

/// Code generation switches.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CodegenOptions {
    /// Record debug scopes and per-statement source lines.
    pub debug_info: bool,
}

/// Lower a checked unit to an IR module.
///
/// The unit must come from a parse that reported no errors.
#[tracing::instrument(level = "debug", skip_all)]
pub fn lower_unit(
    ast: &Ast,
    interner: &StringInterner,
    unit: &Unit,
    source: &str,
    options: CodegenOptions,
) -> Result<Module, CodegenError> {
    let mut cx = UnitCtx {
        ast,
        interner,
        unit,
        lines: options.debug_info.then(|| LineOffsetTable::build(source)),
        types: TypeCache::default(),
        tbaa: TbaaTable::default(),
        mangler: Mangler::new(),
        module: Module {
            name: interner.lookup(ast.decl(unit.root).name).to_owned(),
            ..Module::default()
        },
        declared: FxHashSet::default(),
        strings: FxHashMap::default(),
    };

    match &unit.kind {
        UnitKind::Module => lower_module(&mut cx)?,
        UnitKind::Calc { inputs, result } => {
            let main = calc::lower_calc(&mut cx, inputs, *result)?;
            cx.module.functions.push(main);
        }
    }

    cx.module.tbaa = std::mem::take(&mut cx.tbaa).into_nodes();
    tracing::debug!(
        functions = cx.module.functions.len(),
        globals = cx.module.globals.len(),
        tbaa_nodes = cx.module.tbaa.len(),
        "lowered unit"
    );
    Ok(cx.module)
}

fn lower_module(cx: &mut UnitCtx<'_>) -> Result<(), CodegenError> {
    let ast = cx.ast;
    let root = cx.unit.root;
    let DeclKind::Module { decls, stmts } = &ast.decl(root).kind else {
        return Err(CodegenError::Unexpected {
            what: "unit root that is not a module",
        });
    };

    for &decl in decls {
        if let DeclKind::Var { .. } = ast.decl(decl).kind {
            let ty = cx.value_type(decl)?;
            let name = cx.mangle(decl);
            cx.module.globals.push(Global {
                name,
                ty,
                init: GlobalInit::Zero,
                constant: false,
            });
        }
    }

    let mut procs = Vec::new();
    collect_procedures(ast, decls, &mut procs);
    for proc in procs {
        let function = lower_procedure(cx, proc)?;
        cx.module.functions.push(function);
    }

    let name = cx.mangle(root);
    let mut f = FnLower::new(cx, FunctionBuilder::new(name, &[], IrType::Void), root);
    f.set_debug_scope(root);
    f.mark_address_taken(stmts);
    f.stmts(stmts)?;
    let body = f.finish()?;
    cx.module.functions.push(body);
    Ok(())
}

/// Procedures declared in `decls`, nested ones included, in source order.
fn collect_procedures(ast: &Ast, decls: &[DeclId], out: &mut Vec<DeclId>) {
    for &decl in decls {
        if let DeclKind::Proc { decls: inner, .. } = &ast.decl(decl).kind {
            out.push(decl);
            collect_procedures(ast, inner, out);
        }
    }
}

#[tracing::instrument(level = "debug", skip(cx))]
fn lower_procedure(cx: &mut UnitCtx<'_>, proc: DeclId) -> Result<Function, CodegenError> {
    let ast = cx.ast;
    let DeclKind::Proc {
        params,
        ret,
        decls,
        stmts,
    } = &ast.decl(proc).kind
    else {
        return Err(CodegenError::Unexpected {
            what: "procedure declaration",
        });
    };

    // `VAR` and aggregate parameters are passed by address.
    let mut param_types = Vec::with_capacity(params.len());
    let mut bindings = Vec::with_capacity(params.len());
    for &param in params {
        let ty = cx.value_type(param)?;
        let by_ref = matches!(ast.decl(param).kind, DeclKind::Param { by_ref: true, .. });
        let by_address = by_ref || ty.is_aggregate();
        param_types.push(if by_address { IrType::Ptr } else { ty.clone() });
        bindings.push((param, ty, by_address));
    }
    let ret = match ret {
        Some(ty) => cx.ir_type(*ty)?,
        None => IrType::Void,
    };

    let name = cx.mangle(proc);
    let mut f = FnLower::new(cx, FunctionBuilder::new(name, &param_types, ret), proc);
    f.set_debug_scope(proc);
    f.mark_address_taken(stmts);

    for (i, (param, ty, by_address)) in bindings.into_iter().enumerate() {
        let value = f.b.param(i);
        if by_address {
            f.storage.insert(param, Storage::Memory { addr: value, ty });
        } else {
            f.bind_scalar(param, ty, value)?;
        }
    }
    for &decl in decls {
        if let DeclKind::Var { .. } = ast.decl(decl).kind {
            f.declare_local(decl)?;
        }
    }

    f.stmts(stmts)?;
    f.finish()
}

// ── Unit context ────────────────────────────────────────────────────

/// State shared by every function of one unit.
pub(crate) struct UnitCtx<'a> {
    ast: &'a Ast,
    interner: &'a StringInterner,
    unit: &'a Unit,
    /// Present only when debug info is on.
    lines: Option<LineOffsetTable>,
    types: TypeCache,
    tbaa: TbaaTable,
    mangler: Mangler,
    module: Module,
    declared: FxHashSet<String>,
    /// String constant text → global name.
    strings: FxHashMap<String, String>,
}

impl<'a> UnitCtx<'a> {
    fn name(&self, decl: DeclId) -> &'a str {
        self.interner.lookup(self.ast.decl(decl).name)
    }

    fn mangle(&mut self, decl: DeclId) -> String {
        self.mangler.mangle(self.ast, self.interner, decl).to_owned()
    }

    fn ir_type(&mut self, ty: DeclId) -> Result<IrType, CodegenError> {
        self.types.lower(self.ast, self.interner, ty)
    }

    /// Lowered type of a variable or parameter.
    fn value_type(&mut self, decl: DeclId) -> Result<IrType, CodegenError> {
        let ty = self
            .ast
            .decl(decl)
            .value_type()
            .ok_or(CodegenError::Untyped {
                what: "declaration",
                span: self.ast.decl(decl).span,
            })?;
        self.ir_type(ty)
    }

    fn line_of(&self, span: Span) -> Option<u32> {
        self.lines.as_ref().map(|t| t.line_from_offset(span.start))
    }

    /// Declare an external function once.
    fn declare_function(&mut self, name: &str, ret: IrType, params: Vec<IrType>, variadic: bool) {
        if self.declared.insert(name.to_owned()) {
            self.module.externals.push(External {
                name: name.to_owned(),
                kind: ExternalKind::Function {
                    ret,
                    params,
                    variadic,
                },
            });
        }
    }

    fn declare_data(&mut self, name: &str) {
        if self.declared.insert(name.to_owned()) {
            self.module.externals.push(External {
                name: name.to_owned(),
                kind: ExternalKind::Data,
            });
        }
    }

    /// Global holding `text` as a NUL-terminated constant; one per text.
    fn string_constant(&mut self, text: &str) -> String {
        if let Some(name) = self.strings.get(text) {
            return name.clone();
        }
        let name = format!(".str.{}", self.strings.len());
        self.module.globals.push(Global {
            name: name.clone(),
            ty: IrType::Array {
                len: text.len() as u64 + 1,
                elem: Box::new(IrType::I8),
            },
            init: GlobalInit::Str(text.to_owned()),
            constant: true,
        });
        self.strings.insert(text.to_owned(), name.clone());
        name
    }
}

// ── Function lowering ───────────────────────────────────────────────

/// Where a variable lives inside the function being lowered.
#[derive(Clone, Debug)]
enum Storage {
    /// SSA value tracked by the builder under `Var::Decl`.
    Ssa(IrType),
    /// Memory at a fixed address: a stack slot, a by-address parameter.
    Memory { addr: ValueId, ty: IrType },
    /// Module variable.
    Global { symbol: String, ty: IrType },
}

/// Lowers one function body.
pub(crate) struct FnLower<'u, 'a> {
    cx: &'u mut UnitCtx<'a>,
    b: FunctionBuilder,
    /// Procedure or module whose body this is.
    owner: DeclId,
    storage: FxHashMap<DeclId, Storage>,
    /// Scalars passed to a `VAR` parameter somewhere in the body.
    address_taken: FxHashSet<DeclId>,
    fault: Option<FaultPath>,
    /// Join block of the last IF or WHILE. It stays unsealed until the next
    /// statement is known, so a WHILE right after it can use it as header.
    open_join: Option<BlockId>,
}

impl<'u, 'a> FnLower<'u, 'a> {
    fn new(cx: &'u mut UnitCtx<'a>, b: FunctionBuilder, owner: DeclId) -> Self {
        Self {
            cx,
            b,
            owner,
            storage: FxHashMap::default(),
            address_taken: FxHashSet::default(),
            fault: None,
            open_join: None,
        }
    }

    fn set_debug_scope(&mut self, decl: DeclId) {
        let span = self.cx.ast.decl(decl).span;
        if let Some(line) = self.cx.line_of(span) {
            self.b.set_debug_scope(DebugScope {
                name: self.cx.name(decl).to_owned(),
                line,
            });
        }
    }

    /// Bind a scalar to its initial value. Address-taken scalars get a
    /// stack slot instead of living in SSA.
    fn bind_scalar(
        &mut self,
        decl: DeclId,
        ty: IrType,
        value: ValueId,
    ) -> Result<(), CodegenError> {
        if self.address_taken.contains(&decl) {
            let addr = self.b.alloca(ty.clone());
            let tbaa = match self.cx.ast.decl(decl).value_type() {
                Some(decl_ty) => self.cx.access_tag(None, decl_ty)?,
                None => None,
            };
            self.b.store(value, addr, tbaa);
            self.storage.insert(decl, Storage::Memory { addr, ty });
        } else {
            let entry = self.b.entry_block();
            self.b.write_variable(entry, Var::Decl(decl), value);
            self.storage.insert(decl, Storage::Ssa(ty));
        }
        Ok(())
    }

    /// Local variable without an initial value.
    fn declare_local(&mut self, decl: DeclId) -> Result<(), CodegenError> {
        let ty = self.cx.value_type(decl)?;
        if ty.is_aggregate() || self.address_taken.contains(&decl) {
            let addr = self.b.alloca(ty.clone());
            self.storage.insert(decl, Storage::Memory { addr, ty });
        } else {
            self.storage.insert(decl, Storage::Ssa(ty));
        }
        Ok(())
    }

    fn storage_of(&mut self, decl: DeclId) -> Result<Storage, CodegenError> {
        if let Some(storage) = self.storage.get(&decl) {
            return Ok(storage.clone());
        }
        let d = self.cx.ast.decl(decl);
        let is_module_var = matches!(d.kind, DeclKind::Var { .. })
            && self.cx.unit.kind == UnitKind::Module
            && d.enclosing == Some(self.cx.unit.root);
        if !is_module_var {
            return Err(CodegenError::OuterLocal {
                name: self.cx.name(decl).to_owned(),
            });
        }
        let storage = Storage::Global {
            symbol: self.cx.mangle(decl),
            ty: self.cx.value_type(decl)?,
        };
        self.storage.insert(decl, storage.clone());
        Ok(storage)
    }

    /// Close the body and produce the function.
    fn finish(mut self) -> Result<Function, CodegenError> {
        self.seal_open_join();
        if !self.b.is_terminated() {
            if *self.b.ret_type() == IrType::Void {
                self.b.terminate_return(None);
            } else {
                // Falling off the end of a function procedure.
                self.b.terminate_unreachable();
            }
        }
        if let Some(fault) = self.fault.take() {
            fault.seal(&mut self.b);
        }
        tracing::debug!(
            function = self.b.name(),
            owner = self.owner.raw(),
            "finished function"
        );
        Ok(self.b.finish())
    }
}
