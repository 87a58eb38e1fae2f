//! Static keyword table.
//!
//! Keywords are matched case-sensitively. Module units use the uppercase
//! reserved words; expression units add the single lowercase `with`.
//! Lookup buckets on length first, so most identifiers are rejected without
//! a string comparison.

use tl_ir::TokenKind;

/// Every keyword spelling with its token kind.
pub const KEYWORDS: &[(&str, TokenKind)] = &[
    ("AND", TokenKind::KwAnd),
    ("ARRAY", TokenKind::KwArray),
    ("BEGIN", TokenKind::KwBegin),
    ("CONST", TokenKind::KwConst),
    ("DIV", TokenKind::KwDiv),
    ("DO", TokenKind::KwDo),
    ("ELSE", TokenKind::KwElse),
    ("END", TokenKind::KwEnd),
    ("FROM", TokenKind::KwFrom),
    ("IF", TokenKind::KwIf),
    ("IMPORT", TokenKind::KwImport),
    ("MOD", TokenKind::KwMod),
    ("MODULE", TokenKind::KwModule),
    ("NOT", TokenKind::KwNot),
    ("OF", TokenKind::KwOf),
    ("OR", TokenKind::KwOr),
    ("POINTER", TokenKind::KwPointer),
    ("PROCEDURE", TokenKind::KwProcedure),
    ("RECORD", TokenKind::KwRecord),
    ("RETURN", TokenKind::KwReturn),
    ("THEN", TokenKind::KwThen),
    ("TO", TokenKind::KwTo),
    ("TYPE", TokenKind::KwType),
    ("VAR", TokenKind::KwVar),
    ("WHILE", TokenKind::KwWhile),
    ("with", TokenKind::KwWith),
];

/// Look up a keyword by its exact spelling.
///
/// Returns `None` for ordinary identifiers.
#[inline]
pub fn lookup(text: &str) -> Option<TokenKind> {
    match text.len() {
        2 => match text {
            "DO" => Some(TokenKind::KwDo),
            "IF" => Some(TokenKind::KwIf),
            "OF" => Some(TokenKind::KwOf),
            "OR" => Some(TokenKind::KwOr),
            "TO" => Some(TokenKind::KwTo),
            _ => None,
        },
        3 => match text {
            "AND" => Some(TokenKind::KwAnd),
            "DIV" => Some(TokenKind::KwDiv),
            "END" => Some(TokenKind::KwEnd),
            "MOD" => Some(TokenKind::KwMod),
            "NOT" => Some(TokenKind::KwNot),
            "VAR" => Some(TokenKind::KwVar),
            _ => None,
        },
        4 => match text {
            "ELSE" => Some(TokenKind::KwElse),
            "FROM" => Some(TokenKind::KwFrom),
            "THEN" => Some(TokenKind::KwThen),
            "TYPE" => Some(TokenKind::KwType),
            "with" => Some(TokenKind::KwWith),
            _ => None,
        },
        5 => match text {
            "ARRAY" => Some(TokenKind::KwArray),
            "BEGIN" => Some(TokenKind::KwBegin),
            "CONST" => Some(TokenKind::KwConst),
            "WHILE" => Some(TokenKind::KwWhile),
            _ => None,
        },
        6 => match text {
            "IMPORT" => Some(TokenKind::KwImport),
            "MODULE" => Some(TokenKind::KwModule),
            "RECORD" => Some(TokenKind::KwRecord),
            "RETURN" => Some(TokenKind::KwReturn),
            _ => None,
        },
        7 => match text {
            "POINTER" => Some(TokenKind::KwPointer),
            _ => None,
        },
        9 => match text {
            "PROCEDURE" => Some(TokenKind::KwProcedure),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests;
