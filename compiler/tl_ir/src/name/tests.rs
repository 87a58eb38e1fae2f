use super::*;
use pretty_assertions::assert_eq;

#[test]
fn raw_round_trips() {
    let n = Name::from_raw(42);
    assert_eq!(n.raw(), 42);
    assert_eq!(n.index(), 42);
}

#[test]
fn default_is_empty() {
    assert_eq!(Name::default(), Name::EMPTY);
}

#[test]
fn debug_shows_raw_index() {
    assert_eq!(format!("{:?}", Name::from_raw(3)), "Name(3)");
}
