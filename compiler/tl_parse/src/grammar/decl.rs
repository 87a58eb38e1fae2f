//! Declarations.

use tl_ir::{DeclId, Field, TokenKind};
use tl_sema::QualIdent;

use crate::recovery::{
    DECLARATION_START, DECLARATION_SYNC, DECL_ITEM_SYNC, FIELD_LIST_SYNC, FIELD_SYNC,
    FORMAL_PARAMETER_SYNC, LIST_SYNC, TYPE_START,
};
use crate::{PResult, Parser, TokenSet};

impl Parser<'_> {
    /// One `CONST`, `TYPE` or `VAR` section, or one procedure.
    pub(crate) fn declaration(&mut self, decls: &mut Vec<DeclId>) -> PResult<()> {
        let result = self.declaration_inner(decls);
        self.recover(result, DECLARATION_SYNC)
    }

    fn declaration_inner(&mut self, decls: &mut Vec<DeclId>) -> PResult<()> {
        let item: fn(&mut Self, &mut Vec<DeclId>) -> PResult<()> = match self.current_kind() {
            TokenKind::KwConst => Self::constant_declaration,
            TokenKind::KwType => Self::type_declaration,
            TokenKind::KwVar => Self::variable_declaration,
            TokenKind::KwProcedure => {
                self.procedure_declaration(decls)?;
                return self.consume(TokenKind::Semi);
            }
            _ => return Err(self.unexpected(DECLARATION_START)),
        };

        self.advance();
        while self.check(TokenKind::Ident) {
            item(self, decls)?;
            self.consume(TokenKind::Semi)?;
        }
        Ok(())
    }

    /// `name = expression`
    fn constant_declaration(&mut self, decls: &mut Vec<DeclId>) -> PResult<()> {
        let result = self.constant_declaration_inner(decls);
        self.recover(result, DECL_ITEM_SYNC)
    }

    fn constant_declaration_inner(&mut self, decls: &mut Vec<DeclId>) -> PResult<()> {
        let name = self.ident()?;
        self.consume(TokenKind::Equal)?;
        let value = self.expression()?;
        self.sema.act_on_constant_declaration(decls, name, value);
        Ok(())
    }

    /// `name = ( qualident | POINTER TO qualident | ARRAY [e] OF qualident | RECORD ... END )`
    fn type_declaration(&mut self, decls: &mut Vec<DeclId>) -> PResult<()> {
        let result = self.type_declaration_inner(decls);
        self.recover(result, DECL_ITEM_SYNC)
    }

    fn type_declaration_inner(&mut self, decls: &mut Vec<DeclId>) -> PResult<()> {
        let name = self.ident()?;
        self.consume(TokenKind::Equal)?;

        match self.current_kind() {
            TokenKind::Ident => {
                let target = self.qualident()?;
                self.sema.act_on_alias_type_declaration(decls, name, target);
            }
            TokenKind::KwPointer => {
                self.advance();
                self.consume(TokenKind::KwTo)?;
                let pointee = self.qualident()?;
                self.sema.act_on_pointer_type_declaration(decls, name, pointee);
            }
            TokenKind::KwArray => {
                self.advance();
                self.consume(TokenKind::LBracket)?;
                let len = self.expression()?;
                self.consume(TokenKind::RBracket)?;
                self.consume(TokenKind::KwOf)?;
                let elem = self.qualident()?;
                self.sema.act_on_array_type_declaration(decls, name, len, elem);
            }
            TokenKind::KwRecord => {
                self.advance();
                let fields = self.field_list()?;
                self.consume(TokenKind::KwEnd)?;
                self.sema.act_on_record_type_declaration(decls, name, fields);
            }
            _ => return Err(self.unexpected(TYPE_START)),
        }
        Ok(())
    }

    /// `field { ; field }`
    fn field_list(&mut self) -> PResult<Vec<Field>> {
        let mut fields = Vec::new();
        let result = self.field_list_inner(&mut fields);
        self.recover(result, FIELD_LIST_SYNC)?;
        Ok(fields)
    }

    fn field_list_inner(&mut self, fields: &mut Vec<Field>) -> PResult<()> {
        self.field(fields)?;
        while self.check(TokenKind::Semi) {
            self.advance();
            self.field(fields)?;
        }
        Ok(())
    }

    /// `[ identList : qualident ]`
    fn field(&mut self, fields: &mut Vec<Field>) -> PResult<()> {
        if self.at_any(FIELD_SYNC) {
            return Ok(());
        }
        let result = self.field_inner(fields);
        self.recover(result, FIELD_SYNC)
    }

    fn field_inner(&mut self, fields: &mut Vec<Field>) -> PResult<()> {
        let ids = self.ident_list()?;
        self.consume(TokenKind::Colon)?;
        let ty = self.qualident()?;
        self.sema.act_on_field_declaration(fields, &ids, ty);
        Ok(())
    }

    /// `identList : qualident`
    fn variable_declaration(&mut self, decls: &mut Vec<DeclId>) -> PResult<()> {
        let result = self.variable_declaration_inner(decls);
        self.recover(result, DECL_ITEM_SYNC)
    }

    fn variable_declaration_inner(&mut self, decls: &mut Vec<DeclId>) -> PResult<()> {
        let ids = self.ident_list()?;
        self.consume(TokenKind::Colon)?;
        let ty = self.qualident()?;
        self.sema.act_on_variable_declaration(decls, &ids, ty);
        Ok(())
    }

    /// `PROCEDURE name [ formalParameters ] ; block name`
    fn procedure_declaration(&mut self, decls: &mut Vec<DeclId>) -> PResult<()> {
        let result = self.procedure_declaration_inner(decls);
        self.recover(result, DECL_ITEM_SYNC)
    }

    fn procedure_declaration_inner(&mut self, decls: &mut Vec<DeclId>) -> PResult<()> {
        self.consume(TokenKind::KwProcedure)?;
        let name = self.ident()?;
        let proc = self.sema.act_on_procedure_declaration(name);

        self.with_scope(proc, |p| {
            let mut params = Vec::new();
            let mut ret = None;
            if p.check(TokenKind::LParen) {
                p.formal_parameters(&mut params, &mut ret)?;
            }
            p.sema.act_on_procedure_heading(proc, params, ret);
            p.consume(TokenKind::Semi)?;

            let (body_decls, stmts) = p.block()?;
            let end = p.ident()?;
            p.sema.act_on_procedure_end(proc, end, body_decls, stmts);
            Ok(())
        })?;

        decls.push(proc);
        Ok(())
    }

    /// `( [ formalParameterList ] ) [ : qualident ]`
    fn formal_parameters(
        &mut self,
        params: &mut Vec<DeclId>,
        ret: &mut Option<QualIdent>,
    ) -> PResult<()> {
        let result = self.formal_parameters_inner(params, ret);
        self.recover(result, DECL_ITEM_SYNC)
    }

    fn formal_parameters_inner(
        &mut self,
        params: &mut Vec<DeclId>,
        ret: &mut Option<QualIdent>,
    ) -> PResult<()> {
        const PARAMETER_START: TokenSet = TokenSet::new()
            .with(TokenKind::KwVar)
            .with(TokenKind::Ident);

        self.consume(TokenKind::LParen)?;
        if self.at_any(PARAMETER_START) {
            self.formal_parameter_list(params)?;
        }
        self.consume(TokenKind::RParen)?;
        if self.check(TokenKind::Colon) {
            self.advance();
            *ret = Some(self.qualident()?);
        }
        Ok(())
    }

    fn formal_parameter_list(&mut self, params: &mut Vec<DeclId>) -> PResult<()> {
        let result = self.formal_parameter_list_inner(params);
        self.recover(result, LIST_SYNC)
    }

    fn formal_parameter_list_inner(&mut self, params: &mut Vec<DeclId>) -> PResult<()> {
        self.formal_parameter(params)?;
        while self.check(TokenKind::Semi) {
            self.advance();
            self.formal_parameter(params)?;
        }
        Ok(())
    }

    /// `[ VAR ] identList : qualident`
    fn formal_parameter(&mut self, params: &mut Vec<DeclId>) -> PResult<()> {
        let result = self.formal_parameter_inner(params);
        self.recover(result, FORMAL_PARAMETER_SYNC)
    }

    fn formal_parameter_inner(&mut self, params: &mut Vec<DeclId>) -> PResult<()> {
        let by_ref = self.check(TokenKind::KwVar);
        if by_ref {
            self.advance();
        }
        let ids = self.ident_list()?;
        self.consume(TokenKind::Colon)?;
        let ty = self.qualident()?;
        self.sema
            .act_on_formal_parameter_declaration(params, &ids, ty, by_ref);
        Ok(())
    }
}
