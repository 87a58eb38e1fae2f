//! The `demangle` command: decode mangled tinylang symbol names.

/// Print the dotted path of `symbol`, e.g. `_t4Demo3Run` as `Demo.Run`.
///
/// Anything that is not a well-formed tinylang symbol is printed as-is.
pub fn demangle_symbol(symbol: &str) {
    match tl_ssa::demangle(symbol) {
        Some(demangled) => println!("{demangled}"),
        None => println!("{symbol}"),
    }
}
