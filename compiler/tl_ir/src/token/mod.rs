//! Token kinds and tokens.
//!
//! Tokens are produced one at a time by the lexer and consumed immediately by
//! the parser; they carry no payload beyond their span. Identifier and
//! literal text is recovered by slicing the source with [`Token::span`].

use std::fmt;

use crate::Span;

/// Every kind of token the lexer can produce.
///
/// The discriminant doubles as the bit index in the parser's `TokenSet`,
/// so the enum must stay below 128 variants.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TokenKind {
    // Specials
    Eof,
    Unknown,

    // Literals
    Ident,
    IntegerLiteral,
    StringLiteral,

    // Punctuation
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Colon,
    ColonEqual,
    Comma,
    Period,
    Semi,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Caret,
    Equal,
    Hash,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,

    // Keywords
    KwAnd,
    KwArray,
    KwBegin,
    KwConst,
    KwDiv,
    KwDo,
    KwElse,
    KwEnd,
    KwFrom,
    KwIf,
    KwImport,
    KwMod,
    KwModule,
    KwNot,
    KwOf,
    KwOr,
    KwPointer,
    KwProcedure,
    KwRecord,
    KwReturn,
    KwThen,
    KwTo,
    KwType,
    KwVar,
    KwWhile,
    KwWith,
}

impl TokenKind {
    /// All kinds in discriminant order.
    pub const ALL: [TokenKind; 52] = [
        TokenKind::Eof,
        TokenKind::Unknown,
        TokenKind::Ident,
        TokenKind::IntegerLiteral,
        TokenKind::StringLiteral,
        TokenKind::Plus,
        TokenKind::Minus,
        TokenKind::Star,
        TokenKind::Slash,
        TokenKind::Percent,
        TokenKind::Colon,
        TokenKind::ColonEqual,
        TokenKind::Comma,
        TokenKind::Period,
        TokenKind::Semi,
        TokenKind::LParen,
        TokenKind::RParen,
        TokenKind::LBracket,
        TokenKind::RBracket,
        TokenKind::Caret,
        TokenKind::Equal,
        TokenKind::Hash,
        TokenKind::Less,
        TokenKind::LessEqual,
        TokenKind::Greater,
        TokenKind::GreaterEqual,
        TokenKind::KwAnd,
        TokenKind::KwArray,
        TokenKind::KwBegin,
        TokenKind::KwConst,
        TokenKind::KwDiv,
        TokenKind::KwDo,
        TokenKind::KwElse,
        TokenKind::KwEnd,
        TokenKind::KwFrom,
        TokenKind::KwIf,
        TokenKind::KwImport,
        TokenKind::KwMod,
        TokenKind::KwModule,
        TokenKind::KwNot,
        TokenKind::KwOf,
        TokenKind::KwOr,
        TokenKind::KwPointer,
        TokenKind::KwProcedure,
        TokenKind::KwRecord,
        TokenKind::KwReturn,
        TokenKind::KwThen,
        TokenKind::KwTo,
        TokenKind::KwType,
        TokenKind::KwVar,
        TokenKind::KwWhile,
        TokenKind::KwWith,
    ];

    /// Bit index used by token sets.
    #[inline]
    pub const fn discriminant_index(self) -> u8 {
        self as u8
    }

    /// Inverse of [`discriminant_index`](Self::discriminant_index).
    pub fn from_discriminant_index(index: u8) -> Option<TokenKind> {
        Self::ALL.get(usize::from(index)).copied()
    }

    /// Source spelling for punctuation and keywords, or a description for
    /// the token classes that have no fixed spelling.
    pub const fn spelling(self) -> &'static str {
        match self {
            TokenKind::Eof => "end of input",
            TokenKind::Unknown => "unknown character",
            TokenKind::Ident => "identifier",
            TokenKind::IntegerLiteral => "integer literal",
            TokenKind::StringLiteral => "string literal",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Colon => ":",
            TokenKind::ColonEqual => ":=",
            TokenKind::Comma => ",",
            TokenKind::Period => ".",
            TokenKind::Semi => ";",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Caret => "^",
            TokenKind::Equal => "=",
            TokenKind::Hash => "#",
            TokenKind::Less => "<",
            TokenKind::LessEqual => "<=",
            TokenKind::Greater => ">",
            TokenKind::GreaterEqual => ">=",
            TokenKind::KwAnd => "AND",
            TokenKind::KwArray => "ARRAY",
            TokenKind::KwBegin => "BEGIN",
            TokenKind::KwConst => "CONST",
            TokenKind::KwDiv => "DIV",
            TokenKind::KwDo => "DO",
            TokenKind::KwElse => "ELSE",
            TokenKind::KwEnd => "END",
            TokenKind::KwFrom => "FROM",
            TokenKind::KwIf => "IF",
            TokenKind::KwImport => "IMPORT",
            TokenKind::KwMod => "MOD",
            TokenKind::KwModule => "MODULE",
            TokenKind::KwNot => "NOT",
            TokenKind::KwOf => "OF",
            TokenKind::KwOr => "OR",
            TokenKind::KwPointer => "POINTER",
            TokenKind::KwProcedure => "PROCEDURE",
            TokenKind::KwRecord => "RECORD",
            TokenKind::KwReturn => "RETURN",
            TokenKind::KwThen => "THEN",
            TokenKind::KwTo => "TO",
            TokenKind::KwType => "TYPE",
            TokenKind::KwVar => "VAR",
            TokenKind::KwWhile => "WHILE",
            TokenKind::KwWith => "with",
        }
    }

    pub const fn is_keyword(self) -> bool {
        (self as u8) >= (TokenKind::KwAnd as u8)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spelling())
    }
}

/// A classified slice of the source.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }

    #[inline]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Whether the token is any of `kinds`.
    #[inline]
    pub fn is_one_of(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind)
    }

    /// Source text of this token.
    #[inline]
    pub fn text<'src>(&self, source: &'src str) -> &'src str {
        source.get(self.span.to_range()).unwrap_or("")
    }
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::Token;
    crate::static_assert_size!(Token, 12);
}

#[cfg(test)]
mod tests;
