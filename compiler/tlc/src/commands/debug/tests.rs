use pretty_assertions::assert_eq;
use tl_diagnostic::DiagnosticConfig;

use super::unit_summary;

fn summary(source: &str) -> String {
    unit_summary(&tl_parse::parse(source, DiagnosticConfig::unlimited()))
}

/// The outline after the node counts.
fn outline(summary: &str) -> Vec<&str> {
    summary
        .lines()
        .skip_while(|line| !line.starts_with("Module"))
        .collect()
}

#[test]
fn test_module_outline() {
    let text = summary(
        "MODULE Demo;\n\
         CONST n = 3;\n\
         VAR total: INTEGER;\n\
         PROCEDURE Add(VAR acc: INTEGER; x: INTEGER);\n\
         VAR tmp: INTEGER;\n\
         BEGIN tmp := acc + x; acc := tmp END Add;\n\
         BEGIN Add(total, n) END Demo.",
    );
    assert!(text.starts_with("  Unit: module Demo\n"));
    assert_eq!(
        outline(&text),
        vec![
            "Module Demo (1 statement):",
            "  constant n",
            "  variable total",
            "  procedure Add (2 statements)",
            "    VAR parameter acc",
            "    parameter x",
            "    variable tmp",
        ]
    );
}

#[test]
fn test_calc_unit_lists_inputs() {
    let text = summary("with width, height: width * height");
    assert!(text.starts_with("  Unit: calc with width, height\n"));
    assert_eq!(outline(&text), Vec::<&str>::new());
}

#[test]
fn test_broken_unit_has_no_root() {
    assert_eq!(summary("with a b: a"), "  Unit: none\n");
}
