use super::*;
use crate::ErrorCode;
use pretty_assertions::assert_eq;
use tl_ir::Span;

fn sample_diagnostic() -> Diagnostic {
    Diagnostic::error(ErrorCode::E2001)
        .with_message("incompatible types: expected INTEGER, found BOOLEAN")
        .with_label(Span::new(21, 25), "expected INTEGER")
        .with_secondary_label(Span::new(10, 11), "declared here")
        .with_note("operands of `+` must be INTEGER")
        .with_suggestion("compare with `#` to get a BOOLEAN")
}

fn render(mode: ColorMode, source: Option<&str>, diag: &Diagnostic) -> String {
    let mut output = Vec::new();
    {
        let mut emitter = TerminalEmitter::with_color_mode(&mut output, mode, false);
        if let Some(text) = source {
            emitter = emitter.with_source("m.mod", text);
        }
        emitter.emit(diag);
        emitter.flush();
    }
    String::from_utf8(output).unwrap()
}

#[test]
fn no_color_without_source() {
    let text = render(ColorMode::Never, None, &sample_diagnostic());
    assert!(text.starts_with("error[E2001]: incompatible types"));
    assert!(text.contains("--> 21..25: expected INTEGER"));
    assert!(text.contains("note:"));
    assert!(text.contains("help:"));
    assert!(!text.contains("\x1b["));
}

#[test]
fn always_uses_ansi() {
    let text = render(ColorMode::Always, None, &sample_diagnostic());
    assert!(text.contains("\x1b["));
    assert!(text.contains("E2001"));
}

#[test]
fn source_gives_line_col_and_caret() {
    let source = "MODULE M;\nVAR x: INTEGER;\nBEGIN x := TRUE END M.\n";
    let diag = Diagnostic::error(ErrorCode::E2001)
        .with_message("incompatible types")
        .with_label(Span::new(37, 41), "expected INTEGER");
    let text = render(ColorMode::Never, Some(source), &diag);
    assert!(text.contains("--> m.mod:3:12: expected INTEGER"));
    assert!(text.contains("       | BEGIN x := TRUE END M."));
    assert!(text.contains("       |            ^^^^"));
}

#[test]
fn summary_counts() {
    let mut output = Vec::new();
    let mut emitter = TerminalEmitter::with_color_mode(&mut output, ColorMode::Never, false);
    emitter.emit_summary(2, 1);
    emitter.emit_summary(0, 1);
    emitter.emit_summary(0, 0);
    drop(emitter);
    let text = String::from_utf8(output).unwrap();
    assert_eq!(
        text,
        "error: aborting due to 2 previous errors; 1 warning emitted\nwarning: 1 warning emitted\n"
    );
}

#[test]
fn color_mode_parsing() {
    assert_eq!("never".parse::<ColorMode>(), Ok(ColorMode::Never));
    assert!("sometimes".parse::<ColorMode>().is_err());
    assert!(ColorMode::Auto.should_use_colors(true));
    assert!(!ColorMode::Auto.should_use_colors(false));
}
