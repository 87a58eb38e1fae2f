use super::*;
use pretty_assertions::assert_eq;

#[test]
fn table_and_lookup_agree() {
    for &(spelling, kind) in KEYWORDS {
        assert_eq!(lookup(spelling), Some(kind), "{spelling}");
        assert_eq!(kind.spelling(), spelling);
    }
}

#[test]
fn every_keyword_kind_is_in_table() {
    let keyword_kinds = TokenKind::ALL.iter().filter(|k| k.is_keyword()).count();
    assert_eq!(keyword_kinds, KEYWORDS.len());
}

#[test]
fn keywords_are_case_sensitive() {
    assert_eq!(lookup("begin"), None);
    assert_eq!(lookup("Begin"), None);
    assert_eq!(lookup("WITH"), None);
    assert_eq!(lookup("with"), Some(TokenKind::KwWith));
}

#[test]
fn identifiers_are_not_keywords() {
    assert_eq!(lookup("x"), None);
    assert_eq!(lookup("ENDE"), None);
    assert_eq!(lookup("PROCEDURES"), None);
    assert_eq!(lookup(""), None);
}
