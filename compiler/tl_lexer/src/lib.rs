//! Lexer for the tinylang front end.
//!
//! The lexer is lazy: [`Lexer::next_token`] skips whitespace and comments,
//! classifies exactly one token, and returns it. The parser pulls tokens one
//! at a time and keeps only its current lookahead.
//!
//! Lexical errors never stop the stream. Each one is reported into the
//! [`DiagnosticQueue`] and a best-effort token is still produced:
//!
//! | input                         | token produced     | diagnostic |
//! |-------------------------------|--------------------|------------|
//! | `"abc` + newline              | `StringLiteral`    | E0001      |
//! | stray byte such as `$`        | `Unknown`          | E0002      |
//! | `12AB` (no trailing `H`)      | `IntegerLiteral`   | E0003      |
//! | `(* ...` to end of input      | (skipped) then EOF | E0004      |
//! | literal beyond `i64::MAX`     | `IntegerLiteral`   | E0005      |

mod cursor;
pub mod keywords;

use tl_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode};
use tl_ir::{Span, Token, TokenKind};

use cursor::Cursor;

#[inline]
fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0B' | b'\x0C')
}

#[inline]
fn is_ident_head(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphabetic()
}

#[inline]
fn is_ident_body(b: u8) -> bool {
    is_ident_head(b) || b.is_ascii_digit()
}

/// Hex digits are the decimal digits plus uppercase `A`-`F`.
#[inline]
fn is_hex_digit(b: u8) -> bool {
    b.is_ascii_digit() || (b'A'..=b'F').contains(&b)
}

/// Numeric value of an integer literal's text.
///
/// Decimal unless the text ends in `H`. Returns `None` for malformed or
/// out-of-range text.
pub fn integer_value(text: &str) -> Option<i64> {
    match text.strip_suffix('H') {
        Some(hex) => i64::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

/// Lazy tokenizer over one source buffer.
pub struct Lexer<'src> {
    source: &'src str,
    cursor: Cursor<'src>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Lexer {
            source,
            cursor: Cursor::new(source),
        }
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Produce the next token, reporting lexical errors into `diags`.
    ///
    /// After the end of input every call returns `Eof`.
    pub fn next_token(&mut self, diags: &mut DiagnosticQueue) -> Token {
        loop {
            self.cursor.eat_while(is_whitespace);
            if self.cursor.is_eof() {
                let end = self.cursor.pos();
                return Token::new(TokenKind::Eof, Span::point(end));
            }
            if self.cursor.current() == b'(' && self.cursor.peek() == b'*' {
                self.block_comment(diags);
                continue;
            }
            let token = self.scan(diags);
            tracing::trace!(kind = ?token.kind, span = ?token.span, "token");
            return token;
        }
    }

    fn scan(&mut self, diags: &mut DiagnosticQueue) -> Token {
        let start = self.cursor.pos();
        let b = self.cursor.current();

        if is_ident_head(b) {
            return self.identifier(start);
        }
        if b.is_ascii_digit() {
            return self.number(start, diags);
        }
        if b == b'"' || b == b'\'' {
            return self.string(start, diags);
        }

        let (kind, len) = match (b, self.cursor.peek()) {
            (b':', b'=') => (TokenKind::ColonEqual, 2),
            (b'<', b'=') => (TokenKind::LessEqual, 2),
            (b'>', b'=') => (TokenKind::GreaterEqual, 2),
            (b':', _) => (TokenKind::Colon, 1),
            (b'<', _) => (TokenKind::Less, 1),
            (b'>', _) => (TokenKind::Greater, 1),
            (b'+', _) => (TokenKind::Plus, 1),
            (b'-', _) => (TokenKind::Minus, 1),
            (b'*', _) => (TokenKind::Star, 1),
            (b'/', _) => (TokenKind::Slash, 1),
            (b'%', _) => (TokenKind::Percent, 1),
            (b',', _) => (TokenKind::Comma, 1),
            (b'.', _) => (TokenKind::Period, 1),
            (b';', _) => (TokenKind::Semi, 1),
            (b'(', _) => (TokenKind::LParen, 1),
            (b')', _) => (TokenKind::RParen, 1),
            (b'[', _) => (TokenKind::LBracket, 1),
            (b']', _) => (TokenKind::RBracket, 1),
            (b'^', _) => (TokenKind::Caret, 1),
            (b'=', _) => (TokenKind::Equal, 1),
            (b'#', _) => (TokenKind::Hash, 1),
            _ => return self.unknown(start, diags),
        };
        self.cursor.advance_n(len);
        Token::new(kind, Span::new(start, start + len))
    }

    fn identifier(&mut self, start: u32) -> Token {
        self.cursor.advance();
        self.cursor.eat_while(is_ident_body);
        let span = Span::new(start, self.cursor.pos());
        let kind = keywords::lookup(&self.source[span.to_range()]).unwrap_or(TokenKind::Ident);
        Token::new(kind, span)
    }

    /// Decimal digits, or a hex-digit run closed by `H`.
    fn number(&mut self, start: u32, diags: &mut DiagnosticQueue) -> Token {
        self.cursor.advance();
        let mut saw_hex_letter = false;
        while !self.cursor.is_eof() && is_hex_digit(self.cursor.current()) {
            if !self.cursor.current().is_ascii_digit() {
                saw_hex_letter = true;
            }
            self.cursor.advance();
        }

        let is_hex = self.cursor.current() == b'H' && !self.cursor.is_eof();
        if is_hex {
            self.cursor.advance();
        }
        let span = Span::new(start, self.cursor.pos());

        if saw_hex_letter && !is_hex {
            diags.add_with_source(
                Diagnostic::error(ErrorCode::E0003)
                    .with_message("hex digit in decimal literal")
                    .with_label(span, "decimal literal contains a hex digit")
                    .with_suggestion("append `H` to write a hexadecimal literal"),
                self.source,
            );
        } else if integer_value(&self.source[span.to_range()]).is_none() {
            diags.add_with_source(
                Diagnostic::error(ErrorCode::E0005)
                    .with_message("integer literal is too large")
                    .with_label(span, "does not fit in 64 bits"),
                self.source,
            );
        }
        Token::new(TokenKind::IntegerLiteral, span)
    }

    /// A string runs to the matching quote and may not cross a line break.
    fn string(&mut self, start: u32, diags: &mut DiagnosticQueue) -> Token {
        let quote = self.cursor.current();
        self.cursor.advance();
        let body_start = self.cursor.pos() as usize;

        match memchr::memchr3(quote, b'\n', b'\r', self.cursor.rest()) {
            Some(offset) if self.cursor.rest()[offset] == quote => {
                self.cursor.jump_to(body_start + offset + 1);
                Token::new(TokenKind::StringLiteral, Span::new(start, self.cursor.pos()))
            }
            found => {
                let end = found.map_or(self.source.len(), |offset| body_start + offset);
                self.cursor.jump_to(end);
                let span = Span::new(start, self.cursor.pos());
                diags.add_with_source(
                    Diagnostic::error(ErrorCode::E0001)
                        .with_message("unterminated string literal")
                        .with_label(span, "string starts here and is never closed"),
                    self.source,
                );
                Token::new(TokenKind::StringLiteral, span)
            }
        }
    }

    /// Skip a `(* ... *)` comment, honouring nesting.
    fn block_comment(&mut self, diags: &mut DiagnosticQueue) {
        let start = self.cursor.pos();
        self.cursor.advance_n(2);
        let mut depth = 1u32;

        while depth > 0 {
            let Some(offset) = memchr::memchr2(b'(', b'*', self.cursor.rest()) else {
                self.cursor.jump_to(self.source.len());
                break;
            };
            self.cursor.advance_n(u32::try_from(offset).unwrap_or(u32::MAX));
            match (self.cursor.current(), self.cursor.peek()) {
                (b'(', b'*') => {
                    depth += 1;
                    self.cursor.advance_n(2);
                }
                (b'*', b')') => {
                    depth -= 1;
                    self.cursor.advance_n(2);
                }
                _ => self.cursor.advance(),
            }
        }

        if depth > 0 {
            diags.add_with_source(
                Diagnostic::error(ErrorCode::E0004)
                    .with_message("unterminated block comment")
                    .with_label(Span::new(start, start + 2), "comment starts here")
                    .with_note(format!("{depth} comment level(s) still open at end of input")),
                self.source,
            );
        } else {
            tracing::trace!(start, end = self.cursor.pos(), "comment skipped");
        }
    }

    fn unknown(&mut self, start: u32, diags: &mut DiagnosticQueue) -> Token {
        self.cursor.advance_char();
        let span = Span::new(start, self.cursor.pos());
        let text = &self.source[span.to_range()];
        diags.add_with_source(
            Diagnostic::error(ErrorCode::E0002)
                .with_message(format!("unknown character `{}`", text.escape_debug()))
                .with_label(span, "not valid here"),
            self.source,
        );
        Token::new(TokenKind::Unknown, span)
    }
}

/// Lex all of `source`, ending with the `Eof` token.
pub fn tokenize(source: &str, diags: &mut DiagnosticQueue) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token(diags);
        tokens.push(token);
        if token.kind == TokenKind::Eof {
            return tokens;
        }
    }
}

#[cfg(test)]
mod tests;
