//! Lexical scope stack.
//!
//! One frame per open module or procedure, plus the universe frame at the
//! bottom. A name is declared at most once per frame; lookups walk outward.

use rustc_hash::FxHashMap;
use tl_ir::{DeclId, Name};

#[derive(Debug, Default)]
struct Scope {
    /// Declaration whose body this frame covers; `None` for the universe.
    owner: Option<DeclId>,
    names: FxHashMap<Name, DeclId>,
}

#[derive(Debug, Default)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, owner: Option<DeclId>) {
        self.scopes.push(Scope {
            owner,
            names: FxHashMap::default(),
        });
    }

    pub fn pop(&mut self) {
        debug_assert!(!self.scopes.is_empty(), "scope stack underflow");
        self.scopes.pop();
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Declare `name` in the innermost frame.
    ///
    /// On a collision the existing declaration is returned and nothing changes.
    pub fn insert(&mut self, name: Name, decl: DeclId) -> Result<(), DeclId> {
        let Some(scope) = self.scopes.last_mut() else {
            return Ok(());
        };
        match scope.names.get(&name) {
            Some(&previous) => Err(previous),
            None => {
                scope.names.insert(name, decl);
                Ok(())
            }
        }
    }

    /// Innermost declaration of `name`.
    pub fn lookup(&self, name: Name) -> Option<DeclId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.names.get(&name).copied())
    }

    /// Declaration of `name` in the frame owned by `owner`, if that frame is open.
    pub fn lookup_in(&self, owner: DeclId, name: Name) -> Option<DeclId> {
        self.scopes
            .iter()
            .rev()
            .find(|scope| scope.owner == Some(owner))
            .and_then(|scope| scope.names.get(&name).copied())
    }

    /// Owner of the innermost frame.
    pub fn current_owner(&self) -> Option<DeclId> {
        self.scopes.last().and_then(|scope| scope.owner)
    }
}

#[cfg(test)]
mod tests;
