//! Symbol mangling.
//!
//! Every procedure and module variable is emitted under a name that encodes
//! its enclosing-declaration chain, so equal names in different scopes never
//! collide:
//!
//! ```text
//! _t<len><name><len><name>...
//! ```
//!
//! Fragments run outermost first. Procedure `P` in module `M` is `_t1M1P`;
//! variable `x` of that module is `_t1M1x`. Identifiers never start with a
//! digit, so the length prefixes parse unambiguously.
//!
//! | Declaration            | Mangled name    |
//! |------------------------|-----------------|
//! | module `Demo`          | `_t4Demo`       |
//! | `Demo.Sum`             | `_t4Demo3Sum`   |
//! | `Demo.Outer.Inner`     | `_t4Demo5Outer5Inner` |

use std::fmt::Write;

use rustc_hash::FxHashMap;
use tl_ir::{Ast, DeclId, StringInterner};

/// Prefix of every mangled symbol.
pub const MANGLE_PREFIX: &str = "_t";

/// Mangled-name cache for one unit.
#[derive(Debug, Default)]
pub struct Mangler {
    cache: FxHashMap<DeclId, String>,
}

impl Mangler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mangled name of `decl`, computed once per declaration.
    pub fn mangle(&mut self, ast: &Ast, interner: &StringInterner, decl: DeclId) -> &str {
        self.cache.entry(decl).or_insert_with(|| {
            mangle_path(
                ast.enclosing_chain(decl)
                    .into_iter()
                    .map(|id| interner.lookup(ast.decl(id).name)),
            )
        })
    }
}

/// Mangle an explicit path, outermost segment first.
pub fn mangle_path<'a>(segments: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = String::from(MANGLE_PREFIX);
    for segment in segments {
        // Writing to a String cannot fail.
        let _ = write!(out, "{}{segment}", segment.len());
    }
    out
}

/// Recover the dotted path of a mangled symbol.
///
/// Returns `None` unless the whole input is the prefix followed by one or
/// more well-formed fragments.
///
/// ```text
/// demangle("_t1M1P") == Some("M.P")
/// demangle("_t9M")   == None
/// ```
pub fn demangle(symbol: &str) -> Option<String> {
    let mut rest = symbol.strip_prefix(MANGLE_PREFIX)?;
    let mut segments = Vec::new();
    while !rest.is_empty() {
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 || rest.starts_with('0') {
            return None;
        }
        let len: usize = rest[..digits].parse().ok()?;
        rest = &rest[digits..];
        let segment = rest.get(..len)?;
        if !is_identifier(segment) {
            return None;
        }
        segments.push(segment);
        rest = &rest[len..];
    }
    if segments.is_empty() {
        return None;
    }
    Some(segments.join("."))
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
