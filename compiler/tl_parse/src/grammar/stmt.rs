//! Statements.

use tl_ir::{StmtId, TokenKind};
use tl_stack::ensure_sufficient_stack;

use crate::recovery::{
    DESIGNATOR_CONTINUATION, EXPRESSION_START, STATEMENT_SEQUENCE_SYNC, STATEMENT_START,
    STATEMENT_SYNC,
};
use crate::{PResult, Parser};

impl Parser<'_> {
    /// `statement { ; statement }`
    pub(crate) fn statement_sequence(&mut self) -> PResult<Vec<StmtId>> {
        let mut stmts = Vec::new();
        let result = self.statement_sequence_inner(&mut stmts);
        self.recover(result, STATEMENT_SEQUENCE_SYNC)?;
        Ok(stmts)
    }

    fn statement_sequence_inner(&mut self, stmts: &mut Vec<StmtId>) -> PResult<()> {
        self.statement(stmts)?;
        while self.check(TokenKind::Semi) {
            self.advance();
            self.statement(stmts)?;
        }
        Ok(())
    }

    fn statement(&mut self, stmts: &mut Vec<StmtId>) -> PResult<()> {
        let result = self.statement_inner(stmts);
        self.recover(result, STATEMENT_SYNC)
    }

    fn statement_inner(&mut self, stmts: &mut Vec<StmtId>) -> PResult<()> {
        match self.current_kind() {
            TokenKind::Ident => self.assignment_or_call(stmts),
            TokenKind::KwIf => ensure_sufficient_stack(|| self.if_statement(stmts)),
            TokenKind::KwWhile => ensure_sufficient_stack(|| self.while_statement(stmts)),
            TokenKind::KwReturn => self.return_statement(stmts),
            // Empty statement.
            _ if self.at_any(STATEMENT_SYNC) => Ok(()),
            _ => Err(self.unexpected(STATEMENT_START)),
        }
    }

    /// `qualident ( selectors := expression | [ ( [ expList ] ) ] )`
    fn assignment_or_call(&mut self, stmts: &mut Vec<StmtId>) -> PResult<()> {
        let start = self.current_span().start;
        let name = self.qualident()?;

        if self.check(TokenKind::LParen) {
            let args = self.call_arguments()?;
            let span = self.span_from(start);
            self.sema.act_on_proc_call(stmts, span, name, args);
        } else if self.at_any(DESIGNATOR_CONTINUATION) {
            let target = self.sema.act_on_designator(name);
            self.selectors(target)?;
            self.consume(TokenKind::ColonEqual)?;
            let value = self.expression()?;
            let span = self.span_from(start);
            self.sema.act_on_assignment(stmts, span, target, value);
        } else {
            let span = self.span_from(start);
            self.sema.act_on_proc_call(stmts, span, name, Vec::new());
        }
        Ok(())
    }

    /// `IF expression THEN statementSequence [ ELSE statementSequence ] END`
    fn if_statement(&mut self, stmts: &mut Vec<StmtId>) -> PResult<()> {
        let start = self.current_span().start;
        self.consume(TokenKind::KwIf)?;
        let cond = self.expression()?;
        self.consume(TokenKind::KwThen)?;
        let then_branch = self.statement_sequence()?;
        let else_branch = if self.check(TokenKind::KwElse) {
            self.advance();
            self.statement_sequence()?
        } else {
            Vec::new()
        };
        self.consume(TokenKind::KwEnd)?;
        let span = self.span_from(start);
        self.sema
            .act_on_if_statement(stmts, span, cond, then_branch, else_branch);
        Ok(())
    }

    /// `WHILE expression DO statementSequence END`
    fn while_statement(&mut self, stmts: &mut Vec<StmtId>) -> PResult<()> {
        let start = self.current_span().start;
        self.consume(TokenKind::KwWhile)?;
        let cond = self.expression()?;
        self.consume(TokenKind::KwDo)?;
        let body = self.statement_sequence()?;
        self.consume(TokenKind::KwEnd)?;
        let span = self.span_from(start);
        self.sema.act_on_while_statement(stmts, span, cond, body);
        Ok(())
    }

    /// `RETURN [ expression ]`
    fn return_statement(&mut self, stmts: &mut Vec<StmtId>) -> PResult<()> {
        let start = self.current_span().start;
        self.consume(TokenKind::KwReturn)?;
        let value = if self.at_any(EXPRESSION_START) {
            Some(self.expression()?)
        } else {
            None
        };
        let span = self.span_from(start);
        self.sema.act_on_return_statement(stmts, span, value);
        Ok(())
    }
}
