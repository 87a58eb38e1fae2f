use super::*;
use pretty_assertions::assert_eq;

#[test]
fn phase_ranges() {
    assert!(ErrorCode::E0004.is_lexer_error());
    assert!(ErrorCode::E1001.is_parser_error());
    assert!(!ErrorCode::E1001.is_semantic_error());
    assert!(ErrorCode::E2002.is_semantic_error());
    assert!(ErrorCode::E9001.is_internal_error());
    assert!(ErrorCode::W2001.is_warning());
    assert!(!ErrorCode::W2001.is_semantic_error());
}

#[test]
fn all_codes_are_unique_and_parse_back() {
    for (i, code) in ErrorCode::ALL.iter().enumerate() {
        assert_eq!(code.as_str().parse::<ErrorCode>(), Ok(*code));
        for other in &ErrorCode::ALL[i + 1..] {
            assert_ne!(code.as_str(), other.as_str());
        }
    }
}

#[test]
fn parse_is_case_insensitive() {
    assert_eq!("e2003".parse::<ErrorCode>(), Ok(ErrorCode::E2003));
    assert_eq!("E7777".parse::<ErrorCode>(), Err(()));
}

#[test]
fn display_matches_as_str() {
    assert_eq!(ErrorCode::E0003.to_string(), "E0003");
}
