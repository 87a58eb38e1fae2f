//! Expression units: `[ with a, b: ] expr`.

use tl_diagnostic::expected_expression;
use tl_ir::{BinaryOp, DeclId, ExprId, TokenKind, Unit};
use tl_sema::QualIdent;
use tl_stack::ensure_sufficient_stack;

use crate::recovery::{synchronize, CALC_FACTOR_FOLLOW, UNIT_SYNC};
use crate::{Failed, PResult, Parser};

impl Parser<'_> {
    /// The whole unit. A broken `with` clause, or running out of input in
    /// the middle of the expression, leaves no unit.
    pub(crate) fn calc_unit(&mut self) -> Option<Unit> {
        let root = self.sema.act_on_calc_unit(self.current_span());
        match self.with_scope(root, Self::calc_body) {
            Ok((inputs, result)) => {
                if !self.is_at_end() {
                    self.unexpected(UNIT_SYNC);
                    synchronize(self, UNIT_SYNC);
                }
                Some(self.sema.act_on_calc_end(root, inputs, result))
            }
            Err(Failed) => {
                synchronize(self, UNIT_SYNC);
                None
            }
        }
    }

    fn calc_body(&mut self) -> PResult<(Vec<DeclId>, ExprId)> {
        let mut inputs = Vec::new();
        if self.check(TokenKind::KwWith) {
            self.advance();
            let mut ids = vec![self.ident()?];
            while self.check(TokenKind::Comma) {
                self.advance();
                ids.push(self.ident()?);
            }
            self.consume(TokenKind::Colon)?;
            inputs = self.sema.act_on_calc_inputs(&ids);
        }
        let result = self.calc_expr()?;
        Ok((inputs, result))
    }

    /// `term { ( + | - ) term }`
    fn calc_expr(&mut self) -> PResult<ExprId> {
        let mut lhs = self.calc_term()?;
        loop {
            let op = match self.current_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            let op_span = self.current_span();
            self.advance();
            let rhs = self.calc_term()?;
            lhs = self.sema.act_on_infix(lhs, rhs, op, op_span);
        }
    }

    /// `factor { ( * | / | % | ^ ) factor }`, where `^` takes the rest of the
    /// term as its right operand.
    fn calc_term(&mut self) -> PResult<ExprId> {
        let mut lhs = self.calc_factor()?;
        loop {
            let op = match self.current_kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                TokenKind::Caret => BinaryOp::Pow,
                _ => return Ok(lhs),
            };
            let op_span = self.current_span();
            self.advance();
            let rhs = if op == BinaryOp::Pow {
                ensure_sufficient_stack(|| self.calc_term())?
            } else {
                self.calc_factor()?
            };
            lhs = self.sema.act_on_infix(lhs, rhs, op, op_span);
        }
    }

    /// `integer | ident | ( expr )`
    fn calc_factor(&mut self) -> PResult<ExprId> {
        let start = self.current_span().start;
        let result = self.calc_factor_inner();
        let parsed = result.is_ok();
        let expr = self.recover_expr(result, CALC_FACTOR_FOLLOW, start)?;
        if parsed && !self.at_any(CALC_FACTOR_FOLLOW) {
            self.unexpected(CALC_FACTOR_FOLLOW);
            synchronize(self, CALC_FACTOR_FOLLOW);
        }
        Ok(expr)
    }

    fn calc_factor_inner(&mut self) -> PResult<ExprId> {
        match self.current_kind() {
            TokenKind::IntegerLiteral => {
                let span = self.current_span();
                let source = self.source;
                let text = &source[span.to_range()];
                self.advance();
                Ok(self.sema.act_on_integer_literal(span, text))
            }
            TokenKind::Ident => {
                let id = self.ident()?;
                let decl = self.sema.act_on_qualident_part(None, id);
                Ok(self.sema.act_on_designator(QualIdent {
                    decl,
                    span: id.span,
                }))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = ensure_sufficient_stack(|| self.calc_expr())?;
                self.consume(TokenKind::RParen)?;
                Ok(inner)
            }
            _ => {
                let found = self.found_text();
                let span = self.current_span();
                self.report(expected_expression(span, found));
                Err(Failed)
            }
        }
    }
}
