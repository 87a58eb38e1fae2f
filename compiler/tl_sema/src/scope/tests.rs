use super::*;
use pretty_assertions::assert_eq;

fn name(n: u32) -> Name {
    Name::from_raw(n)
}

#[test]
fn insert_and_lookup() {
    let mut scopes = ScopeStack::new();
    scopes.push(None);
    assert_eq!(scopes.insert(name(1), DeclId::new(0)), Ok(()));
    assert_eq!(scopes.lookup(name(1)), Some(DeclId::new(0)));
    assert_eq!(scopes.lookup(name(2)), None);
}

#[test]
fn duplicate_in_same_frame_returns_previous() {
    let mut scopes = ScopeStack::new();
    scopes.push(None);
    scopes.insert(name(1), DeclId::new(0)).ok();
    assert_eq!(scopes.insert(name(1), DeclId::new(5)), Err(DeclId::new(0)));
    assert_eq!(scopes.lookup(name(1)), Some(DeclId::new(0)));
}

#[test]
fn inner_frame_shadows_and_pop_restores() {
    let mut scopes = ScopeStack::new();
    scopes.push(None);
    scopes.insert(name(1), DeclId::new(0)).ok();
    scopes.push(Some(DeclId::new(7)));
    assert_eq!(scopes.insert(name(1), DeclId::new(1)), Ok(()));
    assert_eq!(scopes.lookup(name(1)), Some(DeclId::new(1)));
    assert_eq!(scopes.current_owner(), Some(DeclId::new(7)));
    scopes.pop();
    assert_eq!(scopes.lookup(name(1)), Some(DeclId::new(0)));
    assert_eq!(scopes.current_owner(), None);
}

#[test]
fn names_vanish_when_their_frame_closes() {
    let mut scopes = ScopeStack::new();
    scopes.push(None);
    scopes.push(Some(DeclId::new(3)));
    scopes.insert(name(9), DeclId::new(4)).ok();
    assert_eq!(scopes.lookup_in(DeclId::new(3), name(9)), Some(DeclId::new(4)));
    scopes.pop();
    assert_eq!(scopes.lookup(name(9)), None);
    assert_eq!(scopes.lookup_in(DeclId::new(3), name(9)), None);
    assert_eq!(scopes.depth(), 1);
}
