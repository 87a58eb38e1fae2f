use super::*;
use pretty_assertions::assert_eq;

#[test]
fn reads_zero_past_end() {
    let mut cursor = Cursor::new("ab");
    assert_eq!(cursor.current(), b'a');
    assert_eq!(cursor.peek(), b'b');
    cursor.advance_n(2);
    assert!(cursor.is_eof());
    assert_eq!(cursor.current(), 0);
    assert_eq!(cursor.peek(), 0);
}

#[test]
fn interior_nul_is_not_eof() {
    let cursor = Cursor::new("\0x");
    assert_eq!(cursor.current(), 0);
    assert!(!cursor.is_eof());
}

#[test]
fn advance_char_skips_multibyte() {
    let mut cursor = Cursor::new("äb");
    cursor.advance_char();
    assert_eq!(cursor.pos(), 2);
    assert_eq!(cursor.current(), b'b');
}

#[test]
fn eat_while_stops_at_end() {
    let mut cursor = Cursor::new("123");
    cursor.eat_while(|b| b.is_ascii_digit());
    assert!(cursor.is_eof());
    assert_eq!(cursor.pos(), 3);
}

#[test]
fn jump_to_clamps() {
    let mut cursor = Cursor::new("abc");
    cursor.jump_to(10);
    assert_eq!(cursor.pos(), 3);
    assert_eq!(cursor.rest(), b"");
}
