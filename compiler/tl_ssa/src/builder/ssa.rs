//! On-the-fly SSA construction (Braun et al., "Simple and Efficient
//! Construction of Static Single Assignment Form", CC 2013).
//!
//! Each block keeps a table from variable to its current value. Reading a
//! variable that a block does not define walks to the predecessors, creating
//! phis only where control flow actually merges. Blocks whose predecessors
//! are not all known yet (loop headers) get operand-less "incomplete" phis
//! that are filled in by [`seal_block`](FunctionBuilder::seal_block).
//!
//! A phi whose operands are all the same value (ignoring itself) is removed
//! and replaced by that value. Replacement is recorded in a forwarding table
//! and applied to every use in `finish`; reads resolve through it directly.

use tl_ir::DeclId;
use tl_stack::ensure_sufficient_stack;

use super::{FunctionBuilder, PhiState};
use crate::ir::{BlockId, IrType, PhiId, ValueId, ValueKind};

/// Something that has a current SSA value per block.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Var {
    /// A source variable, parameter or stack-slot address.
    Decl(DeclId),
    /// A compiler temporary such as a loop counter.
    Temp(u32),
}

impl FunctionBuilder {
    /// A temporary distinct from every other variable in this function.
    pub fn fresh_temp(&mut self) -> Var {
        let var = Var::Temp(self.next_temp);
        self.next_temp += 1;
        var
    }

    pub fn is_sealed(&self, block: BlockId) -> bool {
        self.blocks[block.index()].sealed
    }

    /// Follow phi replacements to the live value.
    pub(crate) fn resolve(&self, mut value: ValueId) -> ValueId {
        while let Some(&next) = self.forward.get(&value) {
            value = next;
        }
        value
    }

    /// Record `value` as the current definition of `var` in `block`.
    pub fn write_variable(&mut self, block: BlockId, var: Var, value: ValueId) {
        self.blocks[block.index()].defs.insert(var, value);
    }

    /// Current value of `var` at the end of `block`; `ty` types any phi or
    /// `undef` this has to create.
    pub fn read_variable(&mut self, block: BlockId, var: Var, ty: &IrType) -> ValueId {
        if let Some(&value) = self.blocks[block.index()].defs.get(&var) {
            return self.resolve(value);
        }
        ensure_sufficient_stack(|| self.read_variable_recursive(block, var, ty))
    }

    fn read_variable_recursive(&mut self, block: BlockId, var: Var, ty: &IrType) -> ValueId {
        let bb = &self.blocks[block.index()];
        let value = if !bb.sealed {
            let phi = self.new_phi(block, ty.clone());
            self.blocks[block.index()].incomplete.push((var, phi));
            self.phis[phi.index()].dst
        } else if bb.preds.len() == 1 {
            let pred = bb.preds[0];
            self.read_variable(pred, var, ty)
        } else if bb.preds.is_empty() {
            // Read before any write on every path.
            self.undef(ty.clone())
        } else {
            let phi = self.new_phi(block, ty.clone());
            let dst = self.phis[phi.index()].dst;
            // Written first so cycles through this block terminate here.
            self.write_variable(block, var, dst);
            self.add_phi_operands(var, phi)
        };
        self.write_variable(block, var, value);
        value
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "phi counts never exceed u32"
    )]
    fn new_phi(&mut self, block: BlockId, ty: IrType) -> PhiId {
        let id = PhiId::new(self.phis.len() as u32);
        let dst = self.new_value(ValueKind::Phi(id), ty.clone());
        self.phis.push(PhiState {
            block,
            dst,
            ty,
            operands: Vec::new(),
            users: Vec::new(),
            removed: false,
        });
        self.blocks[block.index()].phis.push(id);
        tracing::trace!(block = block.raw(), phi = id.raw(), "new phi");
        id
    }

    fn add_phi_operands(&mut self, var: Var, phi: PhiId) -> ValueId {
        let block = self.phis[phi.index()].block;
        let ty = self.phis[phi.index()].ty.clone();
        let preds = self.blocks[block.index()].preds.clone();
        for pred in preds {
            let value = self.read_variable(pred, var, &ty);
            if let ValueKind::Phi(used) = self.values[value.index()].kind {
                self.phis[used.index()].users.push(phi);
            }
            self.phis[phi.index()].operands.push((value, pred));
        }
        self.try_remove_trivial_phi(phi)
    }

    /// Replace `phi` by its single distinct operand, if it has one.
    ///
    /// Returns the value that now stands for `phi`.
    fn try_remove_trivial_phi(&mut self, phi: PhiId) -> ValueId {
        let state = &self.phis[phi.index()];
        let dst = state.dst;
        if state.removed {
            return self.resolve(dst);
        }
        // Still being filled, or waiting for its block to be sealed.
        if state.operands.len() < self.blocks[state.block.index()].preds.len() {
            return dst;
        }

        let mut same = None;
        for &(operand, _) in &state.operands {
            let operand = self.resolve(operand);
            if Some(operand) == same || operand == dst {
                continue;
            }
            if same.is_some() {
                return dst;
            }
            same = Some(operand);
        }

        let same = match same {
            Some(value) => value,
            // Unreachable block or a variable never written before the loop.
            None => {
                let ty = self.phis[phi.index()].ty.clone();
                self.undef(ty)
            }
        };

        let users: Vec<PhiId> = std::mem::take(&mut self.phis[phi.index()].users)
            .into_iter()
            .filter(|&user| user != phi)
            .collect();
        self.phis[phi.index()].removed = true;
        self.forward.insert(dst, same);
        if let ValueKind::Phi(target) = self.values[same.index()].kind {
            self.phis[target.index()].users.extend(users.iter().copied());
        }
        tracing::debug!(
            phi = phi.raw(),
            replaced_by = same.raw(),
            users = users.len(),
            "removed trivial phi"
        );

        for user in users {
            if !self.phis[user.index()].removed {
                self.try_remove_trivial_phi(user);
            }
        }
        same
    }

    /// Mark `block` sealed and complete its incomplete phis.
    ///
    /// Only valid once every predecessor edge into `block` exists.
    pub fn seal_block(&mut self, block: BlockId) {
        let bb = &mut self.blocks[block.index()];
        debug_assert!(!bb.sealed, "block {} sealed twice", block.raw());
        bb.sealed = true;
        let incomplete = std::mem::take(&mut bb.incomplete);
        tracing::debug!(
            block = block.raw(),
            preds = bb.preds.len(),
            incomplete = incomplete.len(),
            "sealed block"
        );
        for (var, phi) in incomplete {
            self.add_phi_operands(var, phi);
        }
    }
}
