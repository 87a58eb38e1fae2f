//! Type declaration → [`IrType`].

use rustc_hash::FxHashMap;
use tl_ir::{Ast, DeclId, DeclKind, Pervasive, StringInterner};
use tl_stack::ensure_sufficient_stack;

use crate::ir::IrType;
use crate::CodegenError;

/// Memoized type conversion for one unit.
#[derive(Default)]
pub(super) struct TypeCache {
    cache: FxHashMap<DeclId, IrType>,
}

impl TypeCache {
    /// `INTEGER` is `i64`, `BOOLEAN` is `i1`, pointers are opaque `ptr`.
    /// Aliases lower to their target.
    pub(super) fn lower(
        &mut self,
        ast: &Ast,
        interner: &StringInterner,
        ty: DeclId,
    ) -> Result<IrType, CodegenError> {
        if let Some(lowered) = self.cache.get(&ty) {
            return Ok(lowered.clone());
        }
        let unsupported = || CodegenError::UnsupportedType {
            name: interner.lookup(ast.decl(ty).name).to_owned(),
        };
        let lowered = match &ast.decl(ty).kind {
            DeclKind::PervasiveType(Pervasive::Integer) => IrType::I64,
            DeclKind::PervasiveType(Pervasive::Boolean) => IrType::I1,
            DeclKind::PointerType { .. } => IrType::Ptr,
            DeclKind::AliasType { target } => {
                let target = target.ok_or_else(unsupported)?;
                ensure_sufficient_stack(|| self.lower(ast, interner, target))?
            }
            DeclKind::ArrayType { len, elem, .. } => {
                let elem = elem.ok_or_else(unsupported)?;
                IrType::Array {
                    len: *len,
                    elem: Box::new(ensure_sufficient_stack(|| {
                        self.lower(ast, interner, elem)
                    })?),
                }
            }
            DeclKind::RecordType { fields } => {
                let mut lowered = Vec::with_capacity(fields.len());
                for field in fields {
                    let field_ty = field.ty.ok_or_else(unsupported)?;
                    lowered.push(ensure_sufficient_stack(|| {
                        self.lower(ast, interner, field_ty)
                    })?);
                }
                IrType::Record(lowered)
            }
            _ => return Err(unsupported()),
        };
        self.cache.insert(ty, lowered.clone());
        Ok(lowered)
    }
}
