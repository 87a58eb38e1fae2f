//! Recursive descent parser for the tinylang front end.
//!
//! One token of lookahead, pulled lazily from the lexer. Semantic actions run
//! inline: every recognized construct is handed to [`Sema`] at once, so the
//! parser itself never builds AST nodes.
//!
//! A unit starting with `MODULE` is a module; anything else is an expression
//! unit (`with a, b: a * b`).
//!
//! # Failure handling
//!
//! Productions return [`PResult`]. `Err(Failed)` means "a syntax error was
//! reported and this production must resynchronize". Each production catches
//! that in [`Parser::recover`], skips to its synchronization set, and returns
//! `Ok` so the caller continues. Only end of input turns recovery itself into
//! `Err`, which then unwinds every open production.

mod grammar;
mod recovery;

pub use recovery::TokenSet;

use tl_diagnostic::{unexpected_token, Diagnostic, DiagnosticConfig, DiagnosticQueue};
use tl_ir::{Ast, DeclId, ExprId, Span, StringInterner, Token, TokenKind, Unit};
use tl_lexer::Lexer;
use tl_sema::{Ident, Sema, Universe};

/// Marker for a reported syntax error the current production must recover
/// from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Failed;

pub(crate) type PResult<T> = Result<T, Failed>;

/// Everything produced for one compilation unit.
pub struct ParseOutput {
    pub ast: Ast,
    /// `None` when the unit is too broken to have a root.
    pub unit: Option<Unit>,
    pub interner: StringInterner,
    pub diagnostics: DiagnosticQueue,
    pub universe: Universe,
}

/// Parser state.
pub struct Parser<'src> {
    source: &'src str,
    lexer: Lexer<'src>,
    tok: Token,
    /// End offset of the last consumed token.
    prev_end: u32,
    sema: Sema<'src>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, config: DiagnosticConfig) -> Self {
        let mut lexer = Lexer::new(source);
        let mut sema = Sema::new(source, config);
        let tok = lexer.next_token(sema.diagnostics_mut());
        Parser {
            source,
            lexer,
            tok,
            prev_end: 0,
            sema,
        }
    }

    /// Parse the whole unit and hand back the annotated tree.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn parse(mut self) -> ParseOutput {
        let unit = if self.check(TokenKind::KwModule) {
            self.module_unit()
        } else {
            self.calc_unit()
        };
        let output = self.sema.finish();
        tracing::debug!(
            errors = output.diagnostics.error_count(),
            decls = output.ast.decl_count(),
            exprs = output.ast.expr_count(),
            "parsed"
        );
        ParseOutput {
            ast: output.ast,
            unit,
            interner: output.interner,
            diagnostics: output.diagnostics,
            universe: output.universe,
        }
    }

    // Token access

    #[inline]
    fn current_kind(&self) -> TokenKind {
        self.tok.kind
    }

    #[inline]
    fn current_span(&self) -> Span {
        self.tok.span
    }

    #[inline]
    fn is_at_end(&self) -> bool {
        self.tok.kind == TokenKind::Eof
    }

    #[inline]
    fn check(&self, kind: TokenKind) -> bool {
        self.tok.kind == kind
    }

    #[inline]
    fn at_any(&self, set: TokenSet) -> bool {
        set.contains(self.tok.kind)
    }

    fn advance(&mut self) {
        if self.is_at_end() {
            return;
        }
        self.prev_end = self.tok.span.end;
        self.tok = self.lexer.next_token(self.sema.diagnostics_mut());
    }

    /// Span from `start` to the end of the last consumed token.
    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.prev_end.max(start))
    }

    /// Source text of the current token, for messages.
    fn found_text(&self) -> &'src str {
        match self.tok.kind {
            TokenKind::Eof => "end of input",
            _ => &self.source[self.tok.span.to_range()],
        }
    }

    // Reporting

    fn report(&mut self, diag: Diagnostic) {
        self.sema.diagnostics_mut().add_with_source(diag, self.source);
    }

    /// Report the current token as unexpected.
    fn unexpected(&mut self, expected: TokenSet) -> Failed {
        let found = self.found_text();
        let span = self.current_span();
        self.report(unexpected_token(span, &expected.format_expected(), found));
        Failed
    }

    /// Check for `kind` without consuming it.
    fn expect(&mut self, kind: TokenKind) -> PResult<Token> {
        if self.check(kind) {
            Ok(self.tok)
        } else {
            Err(self.unexpected(TokenSet::single(kind)))
        }
    }

    /// Check for `kind` and step past it.
    fn consume(&mut self, kind: TokenKind) -> PResult<()> {
        self.expect(kind)?;
        self.advance();
        Ok(())
    }

    fn ident(&mut self) -> PResult<Ident> {
        let tok = self.expect(TokenKind::Ident)?;
        let name = self.sema.intern(&self.source[tok.span.to_range()]);
        self.advance();
        Ok(Ident {
            name,
            span: tok.span,
        })
    }

    // Recovery

    /// Resynchronize after a failed production.
    fn recover(&mut self, result: PResult<()>, sync: TokenSet) -> PResult<()> {
        match result {
            Ok(()) => Ok(()),
            Err(Failed) if recovery::synchronize(self, sync) => Ok(()),
            Err(Failed) => Err(Failed),
        }
    }

    /// Like [`Parser::recover`] for expressions: a recovered expression is an
    /// error placeholder covering the skipped text.
    fn recover_expr(&mut self, result: PResult<ExprId>, sync: TokenSet, start: u32) -> PResult<ExprId> {
        match result {
            Ok(expr) => Ok(expr),
            Err(Failed) if recovery::synchronize(self, sync) => {
                let span = self.span_from(start);
                Ok(self.sema.act_on_error_expression(span))
            }
            Err(Failed) => Err(Failed),
        }
    }

    /// Run `f` inside the scope of `owner`; the scope is closed on every path.
    fn with_scope<T>(&mut self, owner: DeclId, f: impl FnOnce(&mut Self) -> T) -> T {
        self.sema.enter_scope(owner);
        let result = f(self);
        self.sema.leave_scope();
        result
    }
}

/// Parse `source` as one compilation unit.
pub fn parse(source: &str, config: DiagnosticConfig) -> ParseOutput {
    Parser::new(source, config).parse()
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
