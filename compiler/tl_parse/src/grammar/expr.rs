//! Expressions, designators and qualified identifiers.
//!
//! Precedence, loosest first: relations, adding operators, multiplying
//! operators, `NOT`, factors. A leading sign applies to the whole additive
//! chain of a simple expression.

use tl_diagnostic::expected_expression;
use tl_ir::{BinaryOp, DeclId, ExprId, TokenKind, UnaryOp};
use tl_sema::QualIdent;
use tl_stack::ensure_sufficient_stack;

use crate::recovery::{
    EXPRESSION_START, EXPRESSION_SYNC, FACTOR_SYNC, LIST_SYNC, QUALIDENT_SYNC, SELECTORS_SYNC,
    SIMPLE_EXPRESSION_SYNC, TERM_SYNC,
};
use crate::{Failed, PResult, Parser};

fn relation(kind: TokenKind) -> Option<BinaryOp> {
    Some(match kind {
        TokenKind::Equal => BinaryOp::Eq,
        TokenKind::Hash => BinaryOp::Ne,
        TokenKind::Less => BinaryOp::Lt,
        TokenKind::LessEqual => BinaryOp::Le,
        TokenKind::Greater => BinaryOp::Gt,
        TokenKind::GreaterEqual => BinaryOp::Ge,
        _ => return None,
    })
}

fn add_operator(kind: TokenKind) -> Option<BinaryOp> {
    Some(match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::KwOr => BinaryOp::Or,
        _ => return None,
    })
}

fn mul_operator(kind: TokenKind) -> Option<BinaryOp> {
    Some(match kind {
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash | TokenKind::KwDiv => BinaryOp::Div,
        TokenKind::KwMod => BinaryOp::Mod,
        TokenKind::KwAnd => BinaryOp::And,
        _ => return None,
    })
}

impl Parser<'_> {
    /// `simpleExpression [ relation simpleExpression ]`
    pub(crate) fn expression(&mut self) -> PResult<ExprId> {
        let start = self.current_span().start;
        let result = self.expression_inner();
        self.recover_expr(result, EXPRESSION_SYNC, start)
    }

    fn expression_inner(&mut self) -> PResult<ExprId> {
        let lhs = self.simple_expression()?;
        let Some(op) = relation(self.current_kind()) else {
            return Ok(lhs);
        };
        let op_span = self.current_span();
        self.advance();
        let rhs = self.simple_expression()?;
        Ok(self.sema.act_on_infix(lhs, rhs, op, op_span))
    }

    /// `[ + | - ] term { addOperator term }`
    fn simple_expression(&mut self) -> PResult<ExprId> {
        let start = self.current_span().start;
        let result = self.simple_expression_inner();
        self.recover_expr(result, SIMPLE_EXPRESSION_SYNC, start)
    }

    fn simple_expression_inner(&mut self) -> PResult<ExprId> {
        let sign = match self.current_kind() {
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Minus => Some(UnaryOp::Neg),
            _ => None,
        }
        .map(|op| {
            let span = self.current_span();
            self.advance();
            (op, span)
        });

        let mut lhs = self.term()?;
        while let Some(op) = add_operator(self.current_kind()) {
            let op_span = self.current_span();
            self.advance();
            let rhs = self.term()?;
            lhs = self.sema.act_on_infix(lhs, rhs, op, op_span);
        }

        Ok(match sign {
            Some((op, span)) => self.sema.act_on_prefix_expression(lhs, op, span),
            None => lhs,
        })
    }

    /// `factor { mulOperator factor }`
    fn term(&mut self) -> PResult<ExprId> {
        let start = self.current_span().start;
        let result = self.term_inner();
        self.recover_expr(result, TERM_SYNC, start)
    }

    fn term_inner(&mut self) -> PResult<ExprId> {
        let mut lhs = self.factor()?;
        while let Some(op) = mul_operator(self.current_kind()) {
            let op_span = self.current_span();
            self.advance();
            let rhs = self.factor()?;
            lhs = self.sema.act_on_infix(lhs, rhs, op, op_span);
        }
        Ok(lhs)
    }

    /// `integer | ( expression ) | NOT factor | qualident ( ( [ expList ] ) | selectors )`
    fn factor(&mut self) -> PResult<ExprId> {
        let start = self.current_span().start;
        let result = self.factor_inner();
        self.recover_expr(result, FACTOR_SYNC, start)
    }

    fn factor_inner(&mut self) -> PResult<ExprId> {
        match self.current_kind() {
            TokenKind::IntegerLiteral => {
                let span = self.current_span();
                let source = self.source;
                let text = &source[span.to_range()];
                self.advance();
                Ok(self.sema.act_on_integer_literal(span, text))
            }
            TokenKind::Ident => {
                let start = self.current_span().start;
                let name = self.qualident()?;
                if self.check(TokenKind::LParen) {
                    let args = self.call_arguments()?;
                    let span = self.span_from(start);
                    Ok(self.sema.act_on_function_call(name, args, span))
                } else {
                    let desig = self.sema.act_on_designator(name);
                    self.selectors(desig)?;
                    Ok(desig)
                }
            }
            TokenKind::LParen => {
                self.advance();
                let inner = ensure_sufficient_stack(|| self.expression())?;
                self.consume(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::KwNot => {
                let op_span = self.current_span();
                self.advance();
                let operand = ensure_sufficient_stack(|| self.factor())?;
                Ok(self
                    .sema
                    .act_on_prefix_expression(operand, UnaryOp::Not, op_span))
            }
            _ => {
                let found = self.found_text();
                let span = self.current_span();
                self.report(expected_expression(span, found));
                Err(Failed)
            }
        }
    }

    /// `{ ^ | [ expression ] | . ident }` applied to `desig`.
    pub(crate) fn selectors(&mut self, desig: ExprId) -> PResult<()> {
        let result = self.selectors_inner(desig);
        self.recover(result, SELECTORS_SYNC)
    }

    fn selectors_inner(&mut self, desig: ExprId) -> PResult<()> {
        loop {
            match self.current_kind() {
                TokenKind::Caret => {
                    let span = self.current_span();
                    self.sema.act_on_dereference_selector(desig, span);
                    self.advance();
                }
                TokenKind::LBracket => {
                    let open = self.current_span();
                    self.advance();
                    let index = self.expression()?;
                    let close = self.expect(TokenKind::RBracket)?;
                    self.sema
                        .act_on_index_selector(desig, open.merge(close.span), index);
                    self.advance();
                }
                TokenKind::Period => {
                    self.advance();
                    let field = self.ident()?;
                    self.sema.act_on_field_selector(desig, field);
                }
                _ => return Ok(()),
            }
        }
    }

    /// `ident { . ident }`, continuing through module names only.
    pub(crate) fn qualident(&mut self) -> PResult<QualIdent> {
        let start = self.current_span().start;
        let mut decl = None;
        let result = self.qualident_inner(&mut decl);
        self.recover(result, QUALIDENT_SYNC)?;
        Ok(QualIdent {
            decl,
            span: self.span_from(start),
        })
    }

    fn qualident_inner(&mut self, decl: &mut Option<DeclId>) -> PResult<()> {
        let first = self.ident()?;
        *decl = self.sema.act_on_qualident_part(None, first);
        while self.check(TokenKind::Period) && decl.is_some_and(|d| self.sema.is_module(d)) {
            self.advance();
            let part = self.ident()?;
            *decl = self.sema.act_on_qualident_part(*decl, part);
        }
        Ok(())
    }

    /// `( [ expList ] )`
    pub(crate) fn call_arguments(&mut self) -> PResult<Vec<ExprId>> {
        self.consume(TokenKind::LParen)?;
        let args = if self.at_any(EXPRESSION_START) {
            self.exp_list()?
        } else {
            Vec::new()
        };
        self.consume(TokenKind::RParen)?;
        Ok(args)
    }

    /// `expression { , expression }`
    fn exp_list(&mut self) -> PResult<Vec<ExprId>> {
        let mut exprs = Vec::new();
        let result = self.exp_list_inner(&mut exprs);
        self.recover(result, LIST_SYNC)?;
        Ok(exprs)
    }

    fn exp_list_inner(&mut self, exprs: &mut Vec<ExprId>) -> PResult<()> {
        exprs.push(self.expression()?);
        while self.check(TokenKind::Comma) {
            self.advance();
            exprs.push(self.expression()?);
        }
        Ok(())
    }
}
