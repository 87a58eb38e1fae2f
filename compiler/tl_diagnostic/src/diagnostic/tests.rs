use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_diagnostic_builder() {
    let diag = Diagnostic::error(ErrorCode::E1001)
        .with_message("test error")
        .with_label(Span::new(0, 5), "here")
        .with_note("some context")
        .with_suggestion("try this");

    assert_eq!(diag.code, ErrorCode::E1001);
    assert_eq!(diag.message, "test error");
    assert!(diag.is_error());
    assert_eq!(diag.labels.len(), 1);
    assert!(diag.labels[0].is_primary);
    assert_eq!(diag.notes.len(), 1);
    assert_eq!(diag.suggestions.len(), 1);
}

#[test]
fn test_already_declared_points_at_both_declarations() {
    let diag = already_declared(Span::new(20, 21), "x", Span::new(4, 5));
    assert_eq!(diag.code, ErrorCode::E2002);
    assert_eq!(diag.primary_span(), Some(Span::new(20, 21)));
    assert_eq!(diag.labels.len(), 2);
    assert!(!diag.labels[1].is_primary);
    assert!(diag.message.contains("`x`"));
}

#[test]
fn test_not_declared() {
    let diag = not_declared(Span::new(3, 6), "foo");
    assert_eq!(diag.code, ErrorCode::E2003);
    assert_eq!(diag.message, "`foo` is not declared");
}

#[test]
fn test_warning_is_not_error() {
    let diag = Diagnostic::warning(ErrorCode::W2001).with_message("ignored");
    assert!(!diag.is_error());
    assert_eq!(diag.primary_span(), None);
}

#[test]
fn test_diagnostic_display_format() {
    let diag = Diagnostic::error(ErrorCode::E2001)
        .with_message("test error")
        .with_label(Span::new(0, 5), "primary")
        .with_secondary_label(Span::new(10, 15), "secondary")
        .with_note("a note")
        .with_suggestion("a suggestion");

    let output = diag.to_string();
    assert!(output.contains("error [E2001]: test error"));
    assert!(output.contains("--> 0..5: primary"));
    assert!(output.contains("secondary"));
    assert!(output.contains("= note: a note"));
    assert!(output.contains("= help: a suggestion"));
}

#[test]
fn test_internal_error_code() {
    let diag = internal_error("unsupported selector");
    assert_eq!(diag.code, ErrorCode::E9001);
    assert!(diag.code.is_internal_error());
}
