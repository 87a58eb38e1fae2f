use super::*;

/// Depth of a string of nested parentheses, computed recursively.
fn paren_depth(bytes: &[u8]) -> usize {
    ensure_sufficient_stack(|| match bytes {
        [b'(', inner @ .., b')'] => 1 + paren_depth(inner),
        _ => 0,
    })
}

#[test]
fn shallow_nesting() {
    assert_eq!(paren_depth(b"((()))"), 3);
    assert_eq!(paren_depth(b"x"), 0);
}

#[test]
fn deep_nesting_does_not_overflow() {
    let depth = 50_000;
    let mut src = "(".repeat(depth);
    src.push_str(&")".repeat(depth));
    assert_eq!(paren_depth(src.as_bytes()), depth);
}

#[test]
fn passes_through_results() {
    let r: Result<u8, &str> = ensure_sufficient_stack(|| Err("bad"));
    assert_eq!(r, Err("bad"));
}
