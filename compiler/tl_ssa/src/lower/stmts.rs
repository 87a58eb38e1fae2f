//! Statements and structured control flow.
//!
//! Blocks are sealed as soon as their last predecessor edge exists: branch
//! targets right after the branch, a loop header once the back edge from
//! the body is in. The join block of an IF or WHILE waits for the next
//! statement: a WHILE takes it over as its header while it is still empty.

use tl_ir::{ExprId, ExprKind, StmtId, StmtKind};

use crate::ir::BlockId;
use crate::CodegenError;

use super::FnLower;

impl FnLower<'_, '_> {
    pub(super) fn stmts(&mut self, stmts: &[StmtId]) -> Result<(), CodegenError> {
        stmts.iter().try_for_each(|&stmt| self.stmt(stmt))?;
        self.seal_open_join();
        Ok(())
    }

    pub(super) fn seal_open_join(&mut self) {
        if let Some(join) = self.open_join.take() {
            self.b.seal_block(join);
        }
    }

    /// Continue in `join` without sealing it yet.
    fn open_join_at(&mut self, join: BlockId) {
        self.b.position_at(join);
        self.open_join = Some(join);
    }

    fn stmt(&mut self, id: StmtId) -> Result<(), CodegenError> {
        let ast = self.cx.ast;
        let stmt = ast.stmt(id);
        if !matches!(stmt.kind, StmtKind::While { .. }) {
            self.seal_open_join();
        }
        if self.b.is_terminated() {
            // Statements after a RETURN: nothing branches here.
            let dead = self.b.new_block("dead");
            self.b.seal_block(dead);
            self.b.position_at(dead);
        }
        self.b.set_line(self.cx.line_of(stmt.span));

        match &stmt.kind {
            StmtKind::Assign { target, value } => {
                let value = self.expr(*value)?;
                let ExprKind::Designator { decl, selectors } = &ast.expr(*target).kind else {
                    return Err(CodegenError::Unexpected {
                        what: "assignment target that is not a designator",
                    });
                };
                let place = self.place(*decl, selectors)?;
                self.store_place(place, value);
            }
            StmtKind::Call { proc, args } => {
                self.call(*proc, args)?;
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => self.if_stmt(*cond, then_branch, else_branch)?,
            StmtKind::While { cond, body } => self.while_stmt(*cond, body)?,
            StmtKind::Return(value) => {
                let value = value.map(|value| self.expr(value)).transpose()?;
                self.b.terminate_return(value);
            }
        }
        Ok(())
    }

    fn if_stmt(
        &mut self,
        cond: ExprId,
        then_branch: &[StmtId],
        else_branch: &[StmtId],
    ) -> Result<(), CodegenError> {
        let cond = self.expr(cond)?;
        let then_block = self.b.new_block("if.then");
        let else_block = (!else_branch.is_empty()).then(|| self.b.new_block("if.else"));
        let after = self.b.new_block("if.end");

        self.b
            .terminate_branch(cond, then_block, else_block.unwrap_or(after));
        self.b.seal_block(then_block);

        self.b.position_at(then_block);
        self.stmts(then_branch)?;
        if !self.b.is_terminated() {
            self.b.terminate_jump(after);
        }

        if let Some(else_block) = else_block {
            self.b.seal_block(else_block);
            self.b.position_at(else_block);
            self.stmts(else_branch)?;
            if !self.b.is_terminated() {
                self.b.terminate_jump(after);
            }
        }

        self.open_join_at(after);
        Ok(())
    }

    fn while_stmt(&mut self, cond: ExprId, body: &[StmtId]) -> Result<(), CodegenError> {
        // An empty join block becomes the header; the back edge is still
        // missing, so it stays unsealed until the body is lowered.
        let current = self.b.current_block();
        let header = match self.open_join.take() {
            Some(join) if join == current && self.b.is_empty(join) => join,
            join => {
                if let Some(join) = join {
                    self.b.seal_block(join);
                }
                let header = self.b.new_block("while.cond");
                self.b.terminate_jump(header);
                header
            }
        };
        debug_assert!(!self.b.is_sealed(header));

        self.b.position_at(header);
        let cond = self.expr(cond)?;
        let body_block = self.b.new_block("while.body");
        let exit = self.b.new_block("while.end");
        self.b.terminate_branch(cond, body_block, exit);
        self.b.seal_block(body_block);

        self.b.position_at(body_block);
        self.stmts(body)?;
        if !self.b.is_terminated() {
            self.b.terminate_jump(header);
        }
        self.b.seal_block(header);

        self.open_join_at(exit);
        Ok(())
    }
}
