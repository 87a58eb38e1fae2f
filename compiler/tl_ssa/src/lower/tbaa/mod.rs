//! Type-based alias analysis tags.
//!
//! Every unit builds one node table, keyed by type declaration:
//!
//! - a single root;
//! - one scalar node per pervasive type, under the root;
//! - one shared `any pointer` scalar node for all pointer types;
//! - a struct-path node per record type, listing each field's node at its
//!   byte offset.
//!
//! Aliases share the node of their target and arrays use their element's
//! node. Loads and stores of scalar memory carry a tag; aggregate copies
//! and runtime-boundary stores do not.

use rustc_hash::FxHashMap;
use tl_ir::{DeclId, DeclKind};
use tl_stack::ensure_sufficient_stack;

use crate::ir::{IrType, TbaaNode, TbaaNodeId, TbaaTag};
use crate::CodegenError;

use super::UnitCtx;

const ROOT_NAME: &str = "Simple tinylang TBAA";
const POINTER_NAME: &str = "any pointer";

/// Node table of one unit.
#[derive(Default)]
pub(super) struct TbaaTable {
    nodes: Vec<TbaaNode>,
    root: Option<TbaaNodeId>,
    any_pointer: Option<TbaaNodeId>,
    /// `None` for declarations that are not types.
    cache: FxHashMap<DeclId, Option<TbaaNodeId>>,
}

impl TbaaTable {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "a unit never has 2^32 type nodes"
    )]
    fn push(&mut self, node: TbaaNode) -> TbaaNodeId {
        let id = TbaaNodeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    fn root(&mut self) -> TbaaNodeId {
        if let Some(root) = self.root {
            return root;
        }
        let root = self.push(TbaaNode::Root {
            name: ROOT_NAME.to_owned(),
        });
        self.root = Some(root);
        root
    }

    fn scalar(&mut self, name: String) -> TbaaNodeId {
        let parent = self.root();
        self.push(TbaaNode::Scalar { name, parent })
    }

    fn any_pointer(&mut self) -> TbaaNodeId {
        if let Some(node) = self.any_pointer {
            return node;
        }
        let node = self.scalar(POINTER_NAME.to_owned());
        self.any_pointer = Some(node);
        node
    }

    pub(super) fn into_nodes(self) -> Vec<TbaaNode> {
        self.nodes
    }
}

impl UnitCtx<'_> {
    /// Node of type `ty`, created on first use.
    pub(super) fn tbaa_node(&mut self, ty: DeclId) -> Result<Option<TbaaNodeId>, CodegenError> {
        if let Some(&node) = self.tbaa.cache.get(&ty) {
            return Ok(node);
        }
        let ast = self.ast;
        let node = match &ast.decl(ty).kind {
            DeclKind::PervasiveType(_) => {
                let name = self.name(ty).to_owned();
                Some(self.tbaa.scalar(name))
            }
            DeclKind::PointerType { .. } => Some(self.tbaa.any_pointer()),
            DeclKind::AliasType {
                target: Some(target),
            } => ensure_sufficient_stack(|| self.tbaa_node(*target))?,
            DeclKind::ArrayType {
                elem: Some(elem), ..
            } => ensure_sufficient_stack(|| self.tbaa_node(*elem))?,
            DeclKind::RecordType { fields } => {
                let offsets = self.field_offsets(ty)?;
                let mut members = Vec::with_capacity(fields.len());
                for (field, offset) in fields.iter().zip(offsets) {
                    let Some(field_ty) = field.ty else { continue };
                    if let Some(node) = ensure_sufficient_stack(|| self.tbaa_node(field_ty))? {
                        members.push((node, offset));
                    }
                }
                let name = self.mangle(ty);
                Some(self.tbaa.push(TbaaNode::Struct {
                    name,
                    fields: members,
                }))
            }
            _ => None,
        };
        self.tbaa.cache.insert(ty, node);
        Ok(node)
    }

    /// Byte offset of every field of record type `ty`.
    pub(super) fn field_offsets(&mut self, ty: DeclId) -> Result<Vec<u64>, CodegenError> {
        match self.ir_type(ty)? {
            IrType::Record(fields) => Ok(record_offsets(&fields)),
            _ => Err(CodegenError::Unexpected {
                what: "field selector on a non-record type",
            }),
        }
    }

    /// Tag for a scalar access of type `access`, optionally at `offset`
    /// inside a record of type `base`. Aggregate accesses get no tag.
    pub(super) fn access_tag(
        &mut self,
        base: Option<(DeclId, u64)>,
        access: DeclId,
    ) -> Result<Option<TbaaTag>, CodegenError> {
        if self.ir_type(access)?.is_aggregate() {
            return Ok(None);
        }
        let Some(access) = self.tbaa_node(access)? else {
            return Ok(None);
        };
        let Some((base, offset)) = base else {
            return Ok(Some(TbaaTag::scalar(access)));
        };
        Ok(self
            .tbaa_node(base)?
            .map(|base| TbaaTag {
                base,
                access,
                offset,
            }))
    }
}

/// Size and alignment in bytes, with natural alignment for every scalar.
fn size_align(ty: &IrType) -> (u64, u64) {
    match ty {
        IrType::Void => (0, 1),
        IrType::I1 | IrType::I8 => (1, 1),
        IrType::I32 => (4, 4),
        IrType::I64 | IrType::Ptr => (8, 8),
        IrType::Array { len, elem } => {
            let (size, align) = size_align(elem);
            (size * len, align)
        }
        IrType::Record(fields) => {
            let mut size: u64 = 0;
            let mut align = 1;
            for field in fields {
                let (field_size, field_align) = size_align(field);
                size = size.next_multiple_of(field_align) + field_size;
                align = align.max(field_align);
            }
            (size.next_multiple_of(align), align)
        }
    }
}

fn record_offsets(fields: &[IrType]) -> Vec<u64> {
    let mut offset: u64 = 0;
    fields
        .iter()
        .map(|field| {
            let (size, align) = size_align(field);
            let start = offset.next_multiple_of(align);
            offset = start + size;
            start
        })
        .collect()
}

#[cfg(test)]
mod tests;
