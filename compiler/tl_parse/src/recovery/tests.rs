use super::*;
use pretty_assertions::assert_eq;
use tl_diagnostic::DiagnosticConfig;

#[test]
fn test_token_set_empty() {
    let set = TokenSet::new();
    assert!(set.is_empty());
    assert_eq!(set.count(), 0);
    assert!(!set.contains(TokenKind::Semi));
}

#[test]
fn test_token_set_with_and_union() {
    let a = TokenSet::new().with(TokenKind::Semi).with(TokenKind::KwEnd);
    let b = TokenSet::single(TokenKind::KwEnd).with(TokenKind::KwElse);

    let union = a.union(b);
    assert_eq!(union.count(), 3);
    assert!(union.contains(TokenKind::Semi));
    assert!(union.contains(TokenKind::KwElse));
    assert!(!union.contains(TokenKind::KwThen));
}

#[test]
fn test_token_set_covers_every_kind() {
    let mut all = TokenSet::new();
    for kind in TokenKind::ALL {
        all = all.with(kind);
    }
    assert_eq!(all.count() as usize, TokenKind::ALL.len());
    for kind in TokenKind::ALL {
        assert!(all.contains(kind), "{kind:?} missing");
    }
}

#[test]
fn test_iter_indices_ascending() {
    let set = TokenSet::new()
        .with(TokenKind::KwWhile)
        .with(TokenKind::Ident)
        .with(TokenKind::Semi);
    let kinds: Vec<TokenKind> = set
        .iter_indices()
        .filter_map(TokenKind::from_discriminant_index)
        .collect();
    assert_eq!(kinds, vec![TokenKind::Ident, TokenKind::Semi, TokenKind::KwWhile]);
    assert_eq!(set.iter_indices().len(), 3);
}

#[test]
fn test_format_expected() {
    assert_eq!(TokenSet::new().format_expected(), "nothing");
    assert_eq!(TokenSet::single(TokenKind::Semi).format_expected(), "`;`");
    assert_eq!(
        TokenSet::new()
            .with(TokenKind::Comma)
            .with(TokenKind::RParen)
            .format_expected(),
        "`,` or `)`"
    );
    assert_eq!(
        TokenSet::new()
            .with(TokenKind::Comma)
            .with(TokenKind::Semi)
            .with(TokenKind::KwEnd)
            .format_expected(),
        "`,`, `;`, or `END`"
    );
}

#[test]
fn test_expression_follow_sets_nest() {
    for set in [SIMPLE_EXPRESSION_SYNC, TERM_SYNC, FACTOR_SYNC, SELECTORS_SYNC, QUALIDENT_SYNC] {
        assert_eq!(set.union(EXPRESSION_SYNC), set);
    }
    assert!(SIMPLE_EXPRESSION_SYNC.contains(TokenKind::LessEqual));
    assert!(TERM_SYNC.contains(TokenKind::KwOr));
    assert!(FACTOR_SYNC.contains(TokenKind::KwMod));
    assert!(SELECTORS_SYNC.contains(TokenKind::ColonEqual));
    assert!(QUALIDENT_SYNC.contains(TokenKind::LBracket));
    assert!(!EXPRESSION_SYNC.contains(TokenKind::Plus));
}

#[test]
fn test_statement_sync_allows_empty_statement() {
    // An empty statement ends at `;`, ELSE or END.
    for kind in [TokenKind::Semi, TokenKind::KwElse, TokenKind::KwEnd] {
        assert!(STATEMENT_SYNC.contains(kind));
        assert!(!STATEMENT_START.contains(kind));
    }
}

#[test]
fn test_synchronize_stops_at_member() {
    let mut parser = Parser::new("a b ; c", DiagnosticConfig::unlimited());
    assert!(synchronize(&mut parser, TokenSet::single(TokenKind::Semi)));
    assert_eq!(parser.current_kind(), TokenKind::Semi);
    // Already at a member: nothing is skipped.
    assert!(synchronize(&mut parser, TokenSet::single(TokenKind::Semi)));
    assert_eq!(parser.current_span().start, 4);
}

#[test]
fn test_synchronize_reports_end_of_input() {
    let mut parser = Parser::new("a b c", DiagnosticConfig::unlimited());
    assert!(!synchronize(&mut parser, TokenSet::single(TokenKind::KwEnd)));
    assert!(parser.is_at_end());
    // Eof in the set does not count as found.
    assert!(!synchronize(&mut parser, UNIT_SYNC));
}
