use pretty_assertions::assert_eq;
use tl_diagnostic::DiagnosticConfig;
use tl_ir::DeclKind;

use super::*;

#[test]
fn test_mangle_path() {
    assert_eq!(mangle_path(["M", "P"]), "_t1M1P");
    assert_eq!(mangle_path(["Demo", "Sum"]), "_t4Demo3Sum");
    assert_eq!(mangle_path(std::iter::empty()), "_t");
}

#[test]
fn test_mangle_walks_enclosing_chain() {
    let output = tl_parse::parse(
        "MODULE Demo;\nVAR x: INTEGER;\nPROCEDURE Outer;\nPROCEDURE Inner;\nBEGIN END Inner;\nBEGIN END Outer;\nBEGIN END Demo.",
        DiagnosticConfig::unlimited(),
    );
    let unit = output.unit.as_ref().unwrap();
    let DeclKind::Module { decls, .. } = &output.ast.decl(unit.root).kind else {
        panic!("root is not a module");
    };
    let DeclKind::Proc { decls: inner, .. } = &output.ast.decl(decls[1]).kind else {
        panic!("expected procedure");
    };

    let mut mangler = Mangler::new();
    let (ast, interner) = (&output.ast, &output.interner);
    assert_eq!(mangler.mangle(ast, interner, unit.root), "_t4Demo");
    assert_eq!(mangler.mangle(ast, interner, decls[0]), "_t4Demo1x");
    assert_eq!(mangler.mangle(ast, interner, decls[1]), "_t4Demo5Outer");
    assert_eq!(
        mangler.mangle(ast, interner, inner[0]),
        "_t4Demo5Outer5Inner"
    );
    // Cached value is stable.
    assert_eq!(mangler.mangle(ast, interner, decls[1]), "_t4Demo5Outer");
}

#[test]
fn test_demangle_round_trips() {
    for path in [vec!["M"], vec!["M", "P"], vec!["Demo", "Outer", "Inner_2"]] {
        let mangled = mangle_path(path.iter().copied());
        assert_eq!(demangle(&mangled), Some(path.join(".")));
    }
}

#[test]
fn test_demangle_long_fragment() {
    let name = "a".repeat(12);
    assert_eq!(demangle(&format!("_t12{name}")), Some(name));
}

#[test]
fn test_demangle_rejects_malformed() {
    for symbol in [
        "", "_t", "main", "_tM", "_t0", "_t01M", "_t2M", "_t1M1", "_t19abc", "_t11", "_t1M!",
    ] {
        assert_eq!(demangle(symbol), None, "{symbol:?}");
    }
}
