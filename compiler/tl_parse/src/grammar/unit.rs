//! Module units.

use tl_ir::{DeclId, StmtId, TokenKind, Unit};

use crate::recovery::{
    synchronize, TokenSet, BLOCK_SYNC, DECLARATION_START, IDENT_LIST_SYNC, IMPORT_SYNC,
    UNIT_SYNC,
};
use crate::{PResult, Parser};
use tl_sema::Ident;

const IMPORT_START: TokenSet = TokenSet::new()
    .with(TokenKind::KwFrom)
    .with(TokenKind::KwImport);

impl Parser<'_> {
    /// `MODULE name ; { import } block name .`
    ///
    /// A unit with a root is returned even when it contains errors; the
    /// diagnostics decide whether it goes further.
    pub(crate) fn module_unit(&mut self) -> Option<Unit> {
        let mut root = None;
        if self.module_unit_inner(&mut root).is_err() {
            synchronize(self, UNIT_SYNC);
        }
        root.map(|root| self.sema.module_unit(root))
    }

    fn module_unit_inner(&mut self, root: &mut Option<DeclId>) -> PResult<()> {
        self.consume(TokenKind::KwModule)?;
        let name = self.ident()?;
        let module = self.sema.act_on_module_declaration(name);
        *root = Some(module);

        self.with_scope(module, |p| {
            p.consume(TokenKind::Semi)?;
            while p.at_any(IMPORT_START) {
                p.import()?;
            }
            let (decls, stmts) = p.block()?;
            let end = p.ident()?;
            p.sema.act_on_module_end(module, end, decls, stmts);
            p.consume(TokenKind::Period)?;
            p.expect(TokenKind::Eof).map(drop)
        })
    }

    /// `[ FROM name ] IMPORT identList ;`
    fn import(&mut self) -> PResult<()> {
        let result = self.import_inner();
        self.recover(result, IMPORT_SYNC)
    }

    fn import_inner(&mut self) -> PResult<()> {
        let mut from = None;
        if self.check(TokenKind::KwFrom) {
            self.advance();
            from = Some(self.ident()?);
        }
        self.consume(TokenKind::KwImport)?;
        let ids = self.ident_list()?;
        self.consume(TokenKind::Semi)?;
        self.sema.act_on_import(from, &ids);
        Ok(())
    }

    /// `{ declaration } [ BEGIN statementSequence ] END`
    pub(crate) fn block(&mut self) -> PResult<(Vec<DeclId>, Vec<StmtId>)> {
        let mut decls = Vec::new();
        let mut stmts = Vec::new();
        let result = self.block_inner(&mut decls, &mut stmts);
        self.recover(result, BLOCK_SYNC)?;
        Ok((decls, stmts))
    }

    fn block_inner(&mut self, decls: &mut Vec<DeclId>, stmts: &mut Vec<StmtId>) -> PResult<()> {
        while self.at_any(DECLARATION_START) {
            self.declaration(decls)?;
        }
        if self.check(TokenKind::KwBegin) {
            self.advance();
            *stmts = self.statement_sequence()?;
        }
        self.consume(TokenKind::KwEnd)
    }

    /// `ident { , ident }`
    pub(crate) fn ident_list(&mut self) -> PResult<Vec<Ident>> {
        let mut ids = Vec::new();
        let result = self.ident_list_inner(&mut ids);
        self.recover(result, IDENT_LIST_SYNC)?;
        Ok(ids)
    }

    fn ident_list_inner(&mut self, ids: &mut Vec<Ident>) -> PResult<()> {
        ids.push(self.ident()?);
        while self.check(TokenKind::Comma) {
            self.advance();
            ids.push(self.ident()?);
        }
        Ok(())
    }
}
