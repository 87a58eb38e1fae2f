//! Error recovery for the parser.
//!
//! Every production owns a synchronization set: the tokens that may
//! legitimately follow it. After a syntax error the production skips tokens
//! until one of its set shows up, then lets its caller carry on. Only running
//! into end of input propagates the failure outward.

use tl_ir::TokenKind;

use crate::Parser;

const _: () = assert!(
    TokenKind::ALL.len() <= 128,
    "TokenSet uses a u128 bitset; all discriminant indices must be < 128"
);

/// A set of token kinds with O(1) membership.
///
/// Bit `i` stands for the kind whose discriminant index is `i`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TokenSet(u128);

impl TokenSet {
    #[inline]
    pub const fn new() -> Self {
        Self(0)
    }

    #[inline]
    pub const fn single(kind: TokenKind) -> Self {
        Self(1u128 << kind.discriminant_index())
    }

    /// Builder form for const contexts.
    #[inline]
    #[must_use]
    pub const fn with(self, kind: TokenKind) -> Self {
        Self(self.0 | (1u128 << kind.discriminant_index()))
    }

    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    pub const fn contains(&self, kind: TokenKind) -> bool {
        (self.0 & (1u128 << kind.discriminant_index())) != 0
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn count(&self) -> u32 {
        self.0.count_ones()
    }

    /// Discriminant indices in ascending order.
    pub fn iter_indices(&self) -> TokenSetIter {
        TokenSetIter { bits: self.0 }
    }

    /// Members as a readable list for diagnostics: "`;`", "`)` or `,`",
    /// "`a`, `b`, or `c`".
    pub fn format_expected(&self) -> String {
        let names: Vec<&'static str> = self
            .iter_indices()
            .filter_map(TokenKind::from_discriminant_index)
            .map(TokenKind::spelling)
            .collect();

        match names.as_slice() {
            [] => "nothing".to_string(),
            [single] => format!("`{single}`"),
            [first, second] => format!("`{first}` or `{second}`"),
            [rest @ .., last] => {
                let rest = rest
                    .iter()
                    .map(|n| format!("`{n}`"))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{rest}, or `{last}`")
            }
        }
    }
}

pub struct TokenSetIter {
    bits: u128,
}

impl Iterator for TokenSetIter {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.bits == 0 {
            return None;
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "u128::trailing_zeros() is at most 127"
        )]
        let index = self.bits.trailing_zeros() as u8;
        self.bits &= self.bits - 1;
        Some(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.bits.count_ones() as usize;
        (count, Some(count))
    }
}

impl ExactSizeIterator for TokenSetIter {}

// Synchronization sets, one per production.

pub(crate) const UNIT_SYNC: TokenSet = TokenSet::single(TokenKind::Eof);

pub(crate) const IMPORT_SYNC: TokenSet = TokenSet::new()
    .with(TokenKind::KwBegin)
    .with(TokenKind::KwConst)
    .with(TokenKind::KwEnd)
    .with(TokenKind::KwFrom)
    .with(TokenKind::KwImport)
    .with(TokenKind::KwProcedure)
    .with(TokenKind::KwType)
    .with(TokenKind::KwVar);

/// A block is followed by the name after its `END`.
pub(crate) const BLOCK_SYNC: TokenSet = TokenSet::single(TokenKind::Ident);

pub(crate) const DECLARATION_SYNC: TokenSet = TokenSet::new()
    .with(TokenKind::KwBegin)
    .with(TokenKind::KwConst)
    .with(TokenKind::KwEnd)
    .with(TokenKind::KwProcedure)
    .with(TokenKind::KwType)
    .with(TokenKind::KwVar);

/// Constant, type, variable and procedure declarations, and formal
/// parameter sections.
pub(crate) const DECL_ITEM_SYNC: TokenSet = TokenSet::single(TokenKind::Semi);

pub(crate) const FIELD_LIST_SYNC: TokenSet = TokenSet::single(TokenKind::KwEnd);

pub(crate) const FIELD_SYNC: TokenSet = TokenSet::new()
    .with(TokenKind::Semi)
    .with(TokenKind::KwEnd);

/// Formal parameter lists and expression lists.
pub(crate) const LIST_SYNC: TokenSet = TokenSet::single(TokenKind::RParen);

pub(crate) const FORMAL_PARAMETER_SYNC: TokenSet = TokenSet::new()
    .with(TokenKind::RParen)
    .with(TokenKind::Semi);

pub(crate) const STATEMENT_SEQUENCE_SYNC: TokenSet = TokenSet::new()
    .with(TokenKind::KwElse)
    .with(TokenKind::KwEnd);

pub(crate) const STATEMENT_SYNC: TokenSet = STATEMENT_SEQUENCE_SYNC.with(TokenKind::Semi);

pub(crate) const EXPRESSION_SYNC: TokenSet = TokenSet::new()
    .with(TokenKind::RParen)
    .with(TokenKind::Comma)
    .with(TokenKind::Semi)
    .with(TokenKind::KwDo)
    .with(TokenKind::KwElse)
    .with(TokenKind::KwEnd)
    .with(TokenKind::KwThen)
    .with(TokenKind::RBracket);

pub(crate) const RELATIONS: TokenSet = TokenSet::new()
    .with(TokenKind::Equal)
    .with(TokenKind::Hash)
    .with(TokenKind::Less)
    .with(TokenKind::LessEqual)
    .with(TokenKind::Greater)
    .with(TokenKind::GreaterEqual);

pub(crate) const ADD_OPERATORS: TokenSet = TokenSet::new()
    .with(TokenKind::Plus)
    .with(TokenKind::Minus)
    .with(TokenKind::KwOr);

pub(crate) const MUL_OPERATORS: TokenSet = TokenSet::new()
    .with(TokenKind::Star)
    .with(TokenKind::Slash)
    .with(TokenKind::KwAnd)
    .with(TokenKind::KwDiv)
    .with(TokenKind::KwMod);

pub(crate) const SIMPLE_EXPRESSION_SYNC: TokenSet = EXPRESSION_SYNC.union(RELATIONS);

pub(crate) const TERM_SYNC: TokenSet = SIMPLE_EXPRESSION_SYNC.union(ADD_OPERATORS);

pub(crate) const FACTOR_SYNC: TokenSet = TERM_SYNC.union(MUL_OPERATORS);

pub(crate) const SELECTORS_SYNC: TokenSet = FACTOR_SYNC.with(TokenKind::ColonEqual);

pub(crate) const QUALIDENT_SYNC: TokenSet = SELECTORS_SYNC
    .with(TokenKind::LParen)
    .with(TokenKind::LBracket)
    .with(TokenKind::Caret);

pub(crate) const IDENT_LIST_SYNC: TokenSet = TokenSet::new()
    .with(TokenKind::Colon)
    .with(TokenKind::Semi);

// Start sets used to pick a production.

pub(crate) const EXPRESSION_START: TokenSet = TokenSet::new()
    .with(TokenKind::LParen)
    .with(TokenKind::Plus)
    .with(TokenKind::Minus)
    .with(TokenKind::KwNot)
    .with(TokenKind::Ident)
    .with(TokenKind::IntegerLiteral);

pub(crate) const STATEMENT_START: TokenSet = TokenSet::new()
    .with(TokenKind::Ident)
    .with(TokenKind::KwIf)
    .with(TokenKind::KwWhile)
    .with(TokenKind::KwReturn);

pub(crate) const DECLARATION_START: TokenSet = TokenSet::new()
    .with(TokenKind::KwConst)
    .with(TokenKind::KwProcedure)
    .with(TokenKind::KwType)
    .with(TokenKind::KwVar);

pub(crate) const TYPE_START: TokenSet = TokenSet::new()
    .with(TokenKind::Ident)
    .with(TokenKind::KwArray)
    .with(TokenKind::KwPointer)
    .with(TokenKind::KwRecord);

/// Tokens after an identifier that make it an assignment target.
pub(crate) const DESIGNATOR_CONTINUATION: TokenSet = TokenSet::new()
    .with(TokenKind::ColonEqual)
    .with(TokenKind::Period)
    .with(TokenKind::LBracket)
    .with(TokenKind::Caret);

/// What may follow a factor of an expression unit.
pub(crate) const CALC_FACTOR_FOLLOW: TokenSet = TokenSet::new()
    .with(TokenKind::RParen)
    .with(TokenKind::Star)
    .with(TokenKind::Plus)
    .with(TokenKind::Minus)
    .with(TokenKind::Slash)
    .with(TokenKind::Percent)
    .with(TokenKind::Caret)
    .with(TokenKind::Eof);

/// Skip tokens until one in `recovery` or end of input.
///
/// Returns `true` if a recovery token was found, `false` at end of input.
pub(crate) fn synchronize(parser: &mut Parser<'_>, recovery: TokenSet) -> bool {
    let mut skipped = 0usize;
    while !parser.is_at_end() {
        if recovery.contains(parser.current_kind()) {
            tracing::trace!(skipped, "synchronized");
            return true;
        }
        parser.advance();
        skipped += 1;
    }
    tracing::trace!(skipped, "recovery reached end of input");
    false
}

#[cfg(test)]
mod tests;
