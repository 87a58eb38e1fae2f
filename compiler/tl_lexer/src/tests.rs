use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tl_diagnostic::DiagnosticConfig;

fn lex(source: &str) -> (Vec<TokenKind>, Vec<ErrorCode>) {
    let mut diags = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
    let kinds = tokenize(source, &mut diags)
        .into_iter()
        .map(|t| t.kind)
        .collect();
    let codes = diags.flush().into_iter().map(|d| d.code).collect();
    (kinds, codes)
}

fn texts(source: &str) -> Vec<String> {
    let mut diags = DiagnosticQueue::new();
    tokenize(source, &mut diags)
        .into_iter()
        .map(|t| t.text(source).to_string())
        .collect()
}

#[test]
fn module_header() {
    let (kinds, codes) = lex("MODULE Gcd;");
    assert_eq!(
        kinds,
        vec![
            TokenKind::KwModule,
            TokenKind::Ident,
            TokenKind::Semi,
            TokenKind::Eof
        ]
    );
    assert!(codes.is_empty());
}

#[test]
fn two_char_punctuation() {
    let (kinds, _) = lex(":= : <= < >= > ( )");
    assert_eq!(
        kinds,
        vec![
            TokenKind::ColonEqual,
            TokenKind::Colon,
            TokenKind::LessEqual,
            TokenKind::Less,
            TokenKind::GreaterEqual,
            TokenKind::Greater,
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn expression_unit_tokens() {
    let (kinds, codes) = lex("with a, b: a ^ 2 % b");
    assert_eq!(
        kinds,
        vec![
            TokenKind::KwWith,
            TokenKind::Ident,
            TokenKind::Comma,
            TokenKind::Ident,
            TokenKind::Colon,
            TokenKind::Ident,
            TokenKind::Caret,
            TokenKind::IntegerLiteral,
            TokenKind::Percent,
            TokenKind::Ident,
            TokenKind::Eof,
        ]
    );
    assert!(codes.is_empty());
}

#[test]
fn identifiers_take_digits_and_underscores() {
    assert_eq!(texts("a_1 _b2 x"), vec!["a_1", "_b2", "x", ""]);
}

#[test]
fn hex_literal_with_marker() {
    let (kinds, codes) = lex("0FFH 12H 42");
    assert_eq!(
        kinds,
        vec![
            TokenKind::IntegerLiteral,
            TokenKind::IntegerLiteral,
            TokenKind::IntegerLiteral,
            TokenKind::Eof,
        ]
    );
    assert!(codes.is_empty());
    assert_eq!(integer_value("0FFH"), Some(255));
    assert_eq!(integer_value("12H"), Some(18));
    assert_eq!(integer_value("42"), Some(42));
}

#[test]
fn hex_digit_without_marker_is_reported_and_lexing_continues() {
    let (kinds, codes) = lex("12AB ; x");
    assert_eq!(
        kinds,
        vec![
            TokenKind::IntegerLiteral,
            TokenKind::Semi,
            TokenKind::Ident,
            TokenKind::Eof,
        ]
    );
    assert_eq!(codes, vec![ErrorCode::E0003]);
    assert_eq!(texts("12AB x")[0], "12AB");
}

#[test]
fn lowercase_letters_end_a_number() {
    let (kinds, codes) = lex("12ab");
    assert_eq!(
        kinds,
        vec![TokenKind::IntegerLiteral, TokenKind::Ident, TokenKind::Eof]
    );
    assert!(codes.is_empty());
}

#[test]
fn oversized_literal_is_reported() {
    let (_, codes) = lex("99999999999999999999");
    assert_eq!(codes, vec![ErrorCode::E0005]);
}

#[test]
fn strings_with_either_quote() {
    assert_eq!(texts(r#""a'b" 'c"d'"#), vec![r#""a'b""#, r#"'c"d'"#, ""]);
}

#[test]
fn unterminated_string_stops_at_newline() {
    let (kinds, codes) = lex("\"abc\nx");
    assert_eq!(
        kinds,
        vec![TokenKind::StringLiteral, TokenKind::Ident, TokenKind::Eof]
    );
    assert_eq!(codes, vec![ErrorCode::E0001]);
}

#[test]
fn unterminated_string_at_end_of_input() {
    let (kinds, codes) = lex("'abc");
    assert_eq!(kinds, vec![TokenKind::StringLiteral, TokenKind::Eof]);
    assert_eq!(codes, vec![ErrorCode::E0001]);
}

#[test]
fn nested_comments_are_skipped() {
    let (kinds, codes) = lex("a (* one (* two *) still one *) b");
    assert_eq!(
        kinds,
        vec![TokenKind::Ident, TokenKind::Ident, TokenKind::Eof]
    );
    assert!(codes.is_empty());
}

#[test]
fn comment_closing_at_end_of_input_is_fine() {
    let (kinds, codes) = lex("x (* done *)");
    assert_eq!(kinds, vec![TokenKind::Ident, TokenKind::Eof]);
    assert!(codes.is_empty());
}

#[test]
fn unterminated_block_comment_reports_once_and_yields_eof() {
    let source = "MODULE M; (* never (* closed *)";
    let mut diags = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
    let tokens = tokenize(source, &mut diags);
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::KwModule,
            TokenKind::Ident,
            TokenKind::Semi,
            TokenKind::Eof
        ]
    );
    let flushed = diags.flush();
    assert_eq!(flushed.len(), 1);
    assert_eq!(flushed[0].code, ErrorCode::E0004);
    assert_eq!(flushed[0].primary_span(), Some(Span::new(10, 12)));
}

#[test]
fn unknown_character_is_reported_and_skipped() {
    let (kinds, codes) = lex("a $ b");
    assert_eq!(
        kinds,
        vec![
            TokenKind::Ident,
            TokenKind::Unknown,
            TokenKind::Ident,
            TokenKind::Eof
        ]
    );
    assert_eq!(codes, vec![ErrorCode::E0002]);
}

#[test]
fn non_ascii_is_one_unknown_token() {
    let source = "é";
    let mut diags = DiagnosticQueue::new();
    let tokens = tokenize(source, &mut diags);
    assert_eq!(tokens[0].kind, TokenKind::Unknown);
    assert_eq!(tokens[0].span, Span::new(0, 2));
}

#[test]
fn eof_repeats() {
    let mut diags = DiagnosticQueue::new();
    let mut lexer = Lexer::new("  ");
    assert_eq!(lexer.next_token(&mut diags).kind, TokenKind::Eof);
    assert_eq!(lexer.next_token(&mut diags).kind, TokenKind::Eof);
}

proptest! {
    #[test]
    fn lexing_always_terminates_with_ordered_spans(source in "\\PC{0,64}") {
        let mut diags = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
        let tokens = tokenize(&source, &mut diags);
        prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
        prop_assert!(tokens.len() <= source.len() + 1);
        for pair in tokens.windows(2) {
            prop_assert!(pair[0].span.end <= pair[1].span.start);
        }
        for token in &tokens {
            prop_assert!(source.get(token.span.to_range()).is_some());
        }
    }
}
