//! Structural checks on finished functions.
//!
//! Used by tests and by the driver in debug builds. Checks that successors
//! exist, that every phi has exactly one operand per predecessor edge, that
//! no removed phi is still referenced, that every use in a reachable
//! block is dominated by its definition, and that alias tags point into
//! the module's node table.

use rustc_hash::FxHashMap;

use crate::ir::{
    BlockId, Function, InstKind, Module, TbaaNode, TbaaNodeId, TbaaTag, ValueId, ValueKind,
};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error("{function}: block {block} branches to missing block {target}")]
    MissingSuccessor {
        function: String,
        block: u32,
        target: u32,
    },
    #[error("{function}: phi %{phi} in block {block} has operands for {found:?}, predecessors are {expected:?}")]
    PhiOperands {
        function: String,
        block: u32,
        phi: u32,
        expected: Vec<u32>,
        found: Vec<u32>,
    },
    #[error("{function}: block {block} uses removed phi %{value}")]
    RemovedPhi {
        function: String,
        block: u32,
        value: u32,
    },
    #[error("{function}: use of %{value} in block {block} is not dominated by its definition")]
    NotDominated {
        function: String,
        block: u32,
        value: u32,
    },
    #[error("{owner}: alias tag refers to missing node !{node}")]
    MissingTbaaNode { owner: String, node: u32 },
}

/// Verify every function of `module`.
pub fn verify(module: &Module) -> Result<(), VerifyError> {
    verify_tbaa(module)?;
    module.functions.iter().try_for_each(verify_function)
}

/// Struct nodes and access tags may only name nodes of the table.
fn verify_tbaa(module: &Module) -> Result<(), VerifyError> {
    let check = |owner: &str, node: TbaaNodeId| {
        if module.tbaa_node(node).is_some() {
            Ok(())
        } else {
            Err(VerifyError::MissingTbaaNode {
                owner: owner.to_owned(),
                node: node.raw(),
            })
        }
    };

    for node in &module.tbaa {
        match node {
            TbaaNode::Root { .. } => {}
            TbaaNode::Scalar { name, parent } => check(name, *parent)?,
            TbaaNode::Struct { name, fields } => {
                for &(field, _) in fields {
                    check(name, field)?;
                }
            }
        }
    }

    for func in &module.functions {
        for instr in func.instructions() {
            let (InstKind::Load {
                tbaa: Some(TbaaTag { base, access, .. }),
                ..
            }
            | InstKind::Store {
                tbaa: Some(TbaaTag { base, access, .. }),
                ..
            }) = instr.kind
            else {
                continue;
            };
            check(&func.name, base)?;
            check(&func.name, access)?;
        }
    }
    Ok(())
}

/// Where a value becomes available.
#[derive(Copy, Clone)]
enum DefSite {
    /// Constants, parameters, symbols and `undef`.
    Everywhere,
    /// Phi at the top of a block.
    BlockStart(BlockId),
    /// The n-th instruction of a block.
    Instr(BlockId, usize),
}

pub fn verify_function(func: &Function) -> Result<(), VerifyError> {
    let name = || func.name.clone();

    for block in &func.blocks {
        for target in block.terminator.successors() {
            if target.index() >= func.blocks.len() {
                return Err(VerifyError::MissingSuccessor {
                    function: name(),
                    block: block.id.raw(),
                    target: target.raw(),
                });
            }
        }
    }

    let preds = func.predecessors();
    let mut sites: FxHashMap<ValueId, DefSite> = FxHashMap::default();
    for block in &func.blocks {
        let mut expected: Vec<u32> = preds[block.id.index()].iter().map(|b| b.raw()).collect();
        expected.sort_unstable();
        for phi in &block.phis {
            let mut found: Vec<u32> = phi.incoming.iter().map(|(_, b)| b.raw()).collect();
            found.sort_unstable();
            if found != expected {
                return Err(VerifyError::PhiOperands {
                    function: name(),
                    block: block.id.raw(),
                    phi: phi.dst.raw(),
                    expected,
                    found,
                });
            }
            sites.insert(phi.dst, DefSite::BlockStart(block.id));
        }
        for (index, instr) in block.body.iter().enumerate() {
            if let Some(dst) = instr.dst {
                sites.insert(dst, DefSite::Instr(block.id, index));
            }
            if let InstKind::LandingPad { selector, .. } = instr.kind {
                sites.insert(selector, DefSite::Instr(block.id, index));
            }
        }
    }

    let site_of = |value: ValueId, block: BlockId| -> Result<DefSite, VerifyError> {
        match func.value(value).kind {
            ValueKind::Phi(_) => sites.get(&value).copied().ok_or(VerifyError::RemovedPhi {
                function: name(),
                block: block.raw(),
                value: value.raw(),
            }),
            ValueKind::Inst => Ok(sites.get(&value).copied().unwrap_or(DefSite::Everywhere)),
            _ => Ok(DefSite::Everywhere),
        }
    };

    let dominators = Dominators::compute(func, &preds);
    let check = |value: ValueId, block: BlockId, position: usize| -> Result<(), VerifyError> {
        let site = site_of(value, block)?;
        if !dominators.is_reachable(block) {
            return Ok(());
        }
        let ok = match site {
            DefSite::Everywhere => true,
            DefSite::BlockStart(def) => dominators.dominates(def, block),
            DefSite::Instr(def, index) if def == block => index < position,
            DefSite::Instr(def, _) => dominators.dominates(def, block),
        };
        if ok {
            Ok(())
        } else {
            Err(VerifyError::NotDominated {
                function: name(),
                block: block.raw(),
                value: value.raw(),
            })
        }
    };

    for block in &func.blocks {
        for phi in &block.phis {
            // A phi operand is used at the end of its predecessor.
            for &(value, pred) in &phi.incoming {
                check(value, pred, usize::MAX)?;
            }
        }
        for (index, instr) in block.body.iter().enumerate() {
            for value in instr.operands() {
                check(value, block.id, index)?;
            }
        }
        for value in block.terminator.operands() {
            check(value, block.id, usize::MAX)?;
        }
    }
    Ok(())
}

/// Dominator sets by iterative data flow. Functions here are small, so the
/// quadratic representation is fine.
struct Dominators {
    /// `sets[b][d]`: `d` dominates `b`.
    sets: Vec<Vec<bool>>,
    reachable: Vec<bool>,
}

impl Dominators {
    fn compute(func: &Function, preds: &[Vec<BlockId>]) -> Self {
        let n = func.blocks.len();
        let mut reachable = vec![false; n];
        let mut stack = vec![BlockId::new(0)];
        while let Some(block) = stack.pop() {
            if std::mem::replace(&mut reachable[block.index()], true) {
                continue;
            }
            stack.extend(func.block(block).terminator.successors());
        }

        let mut sets = vec![vec![true; n]; n];
        sets[0] = vec![false; n];
        sets[0][0] = true;
        let mut changed = true;
        while changed {
            changed = false;
            for b in 1..n {
                if !reachable[b] {
                    continue;
                }
                let mut next = vec![true; n];
                for pred in preds[b].iter().filter(|p| reachable[p.index()]) {
                    for (d, slot) in next.iter_mut().enumerate() {
                        *slot &= sets[pred.index()][d];
                    }
                }
                next[b] = true;
                if next != sets[b] {
                    sets[b] = next;
                    changed = true;
                }
            }
        }
        Self { sets, reachable }
    }

    fn is_reachable(&self, block: BlockId) -> bool {
        self.reachable[block.index()]
    }

    fn dominates(&self, def: BlockId, block: BlockId) -> bool {
        self.sets[block.index()][def.index()]
    }
}

#[cfg(test)]
mod tests;
