use super::*;
use pretty_assertions::assert_eq;

#[test]
fn all_table_matches_discriminants() {
    for (i, kind) in TokenKind::ALL.iter().enumerate() {
        assert_eq!(usize::from(kind.discriminant_index()), i, "{kind:?}");
    }
}

#[test]
fn discriminants_fit_token_set() {
    assert!(TokenKind::ALL.len() <= 128);
    assert_eq!(TokenKind::from_discriminant_index(200), None);
}

#[test]
fn keyword_classification() {
    assert!(TokenKind::KwModule.is_keyword());
    assert!(TokenKind::KwWith.is_keyword());
    assert!(!TokenKind::GreaterEqual.is_keyword());
    assert!(!TokenKind::Ident.is_keyword());
}

#[test]
fn token_text_slices_source() {
    let src = "VAR count";
    let tok = Token::new(TokenKind::Ident, Span::new(4, 9));
    assert_eq!(tok.text(src), "count");
    assert!(tok.is(TokenKind::Ident));
    assert!(tok.is_one_of(&[TokenKind::Semi, TokenKind::Ident]));
}

#[test]
fn spelling_of_punctuation() {
    assert_eq!(TokenKind::ColonEqual.to_string(), ":=");
    assert_eq!(TokenKind::Hash.spelling(), "#");
}
