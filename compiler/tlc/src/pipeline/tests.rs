use pretty_assertions::assert_eq;
use tl_diagnostic::ErrorCode;

use super::*;

fn emit(source: &str) -> Compilation {
    compile(source, &CompileOptions::default(), Stage::Emit)
}

#[test]
fn test_calc_unit_emits_main() {
    let compilation = emit("with a, b: a * (b + 2)");
    assert!(!compilation.has_errors());
    assert_eq!(compilation.diagnostics, Vec::new());

    let module = compilation.module.unwrap();
    assert_eq!(module.name, "calc");
    assert!(module.function("main").is_some());
    let text = module.to_string();
    assert!(text.contains("call void @calc_write(i64"));
    assert!(!text.contains("; scope"));
}

#[test]
fn test_check_stage_stops_before_codegen() {
    let compilation = compile("with a: a", &CompileOptions::default(), Stage::Check);
    assert!(!compilation.has_errors());
    assert!(compilation.module.is_none());
}

#[test]
fn test_syntax_error_blocks_codegen() {
    let compilation = emit("with a b: a");
    assert_eq!(compilation.error_count, 1);
    assert_eq!(compilation.diagnostics[0].code, ErrorCode::E1001);
    assert!(compilation.module.is_none());
}

#[test]
fn test_warnings_do_not_block_codegen() {
    let compilation = emit("MODULE M;\nIMPORT Lib;\nVAR x: INTEGER;\nBEGIN x := 1 END M.");
    assert_eq!(compilation.error_count, 0);
    assert_eq!(compilation.warning_count, 1);
    assert_eq!(compilation.diagnostics.len(), 1);
    assert!(compilation.module.unwrap().function("_t1M").is_some());
}

#[test]
fn test_debug_info_flag_reaches_codegen() {
    let options = CompileOptions {
        debug_info: true,
        ..CompileOptions::default()
    };
    let compilation = compile(
        "MODULE M;\nVAR x: INTEGER;\nBEGIN\n  x := 1\nEND M.",
        &options,
        Stage::Emit,
    );
    let text = compilation.module.unwrap().to_string();
    assert!(text.contains("; scope M at line 1"));
    assert!(text.contains("!line 4"));
}

#[test]
fn test_codegen_failure_is_an_internal_error() {
    let source = "MODULE M;\n\
                  PROCEDURE Outer;\n\
                  VAR x: INTEGER;\n\
                  PROCEDURE Inner;\n\
                  BEGIN x := 1 END Inner;\n\
                  BEGIN END Outer;\n\
                  BEGIN END M.";
    let compilation = emit(source);
    assert_eq!(compilation.error_count, 1);
    assert_eq!(compilation.diagnostics[0].code, ErrorCode::E9001);
    assert!(compilation.diagnostics[0].message.contains("`x`"));
    assert!(compilation.module.is_none());
}

#[test]
fn test_every_duplicate_is_reported_by_default() {
    let names = vec!["a"; 13].join(", ");
    let source = format!("MODULE M;\nVAR {names}: INTEGER;\nBEGIN END M.");
    let compilation = compile(&source, &CompileOptions::default(), Stage::Check);
    assert_eq!(compilation.error_count, 12);
    assert_eq!(compilation.diagnostics.len(), 12);
    assert!(compilation
        .diagnostics
        .iter()
        .all(|d| d.code == ErrorCode::E2002));
}

#[test]
fn test_syntax_errors_on_one_line_are_all_reported() {
    let one_line = emit("MODULE M;\nVAR a: INTEGER;\nBEGIN a := (1 + 2; a := ) END M.");
    let two_lines = emit("MODULE M;\nVAR a: INTEGER;\nBEGIN a := (1 + 2;\na := ) END M.");
    assert_eq!(one_line.error_count, 2);
    assert_eq!(one_line.error_count, two_lines.error_count);
    assert!(one_line.diagnostics.iter().all(|d| d.code.is_parser_error()));
}
