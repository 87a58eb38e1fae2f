use super::*;
use pretty_assertions::assert_eq;

fn err(code: ErrorCode, msg: &str, start: u32) -> Diagnostic {
    Diagnostic::error(code)
        .with_message(msg)
        .with_label(Span::new(start, start + 1), "here")
}

#[test]
fn flush_sorts_by_line_then_column() {
    let source = "aaa\nbbb\nccc\n";
    let mut queue = DiagnosticQueue::new();
    queue.add_with_source(err(ErrorCode::E2003, "third", 9), source);
    queue.add_with_source(err(ErrorCode::E2003, "first", 1), source);
    queue.add_with_source(err(ErrorCode::E2003, "second", 5), source);

    let messages: Vec<_> = queue.flush().into_iter().map(|d| d.message).collect();
    assert_eq!(messages, vec!["first", "second", "third"]);
    assert_eq!(queue.error_count(), 0);
}

#[test]
fn distinct_syntax_errors_on_one_line_are_kept() {
    let source = "x y z\nw\n";
    let mut queue = DiagnosticQueue::new();
    assert!(queue.add_with_source(err(ErrorCode::E1001, "a", 0), source));
    assert!(queue.add_with_source(err(ErrorCode::E1001, "b", 2), source));
    assert!(queue.add_with_source(err(ErrorCode::E1001, "c", 6), source));
    assert_eq!(queue.error_count(), 3);
}

#[test]
fn repeated_syntax_error_at_one_span_is_dropped() {
    let source = "x y z";
    let mut queue = DiagnosticQueue::new();
    assert!(queue.add_with_source(err(ErrorCode::E1001, "expected `;`", 2), source));
    assert!(!queue.add_with_source(err(ErrorCode::E1001, "expected `;`", 2), source));
    assert!(queue.add_with_source(err(ErrorCode::E1002, "expected `;`", 2), source));
    assert_eq!(queue.error_count(), 2);
}

#[test]
fn default_config_has_no_error_limit() {
    let mut queue = DiagnosticQueue::new();
    for at in 0..25 {
        queue.add(err(ErrorCode::E2002, "`x` is already declared", at), 1, at + 1);
    }
    assert!(!queue.limit_reached());
    assert_eq!(queue.error_count(), 25);
    assert!(queue.flush().iter().all(|d| d.code == ErrorCode::E2002));
}

#[test]
fn semantic_errors_on_one_line_are_kept_when_distinct() {
    let source = "VAR x, x, y, y: INTEGER;";
    let mut queue = DiagnosticQueue::new();
    assert!(queue.add_with_source(err(ErrorCode::E2002, "`x` is already declared", 7), source));
    assert!(queue.add_with_source(err(ErrorCode::E2002, "`y` is already declared", 13), source));
    assert_eq!(queue.error_count(), 2);
}

#[test]
fn identical_error_at_same_position_is_dropped() {
    let source = "abc";
    let mut queue = DiagnosticQueue::new();
    assert!(queue.add_with_source(err(ErrorCode::E2001, "type mismatch", 1), source));
    assert!(!queue.add_with_source(err(ErrorCode::E2001, "type mismatch", 1), source));
}

#[test]
fn follow_on_errors_are_filtered() {
    let mut queue = DiagnosticQueue::new();
    assert!(!queue.add(err(ErrorCode::E2001, "operand has type <error>", 0), 1, 1));
    assert_eq!(queue.error_count(), 0);

    let mut unfiltered = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
    assert!(unfiltered.add(err(ErrorCode::E2001, "operand has type <error>", 0), 1, 1));
}

#[test]
fn error_limit_stops_and_notes_once() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
        error_limit: 2,
        ..DiagnosticConfig::default()
    });
    for line in 1..=5 {
        queue.add(err(ErrorCode::E2003, "missing", 0), line, 1);
    }
    assert!(queue.limit_reached());
    assert_eq!(queue.error_count(), 2);

    let flushed = queue.flush();
    assert_eq!(flushed.len(), 3);
    assert_eq!(flushed[2].code, ErrorCode::E9002);
}

#[test]
fn warnings_do_not_count_as_errors() {
    let mut queue = DiagnosticQueue::new();
    queue.add(
        Diagnostic::warning(ErrorCode::W2001).with_message("import ignored"),
        1,
        1,
    );
    assert_eq!(queue.error_count(), 0);
    assert_eq!(queue.warning_count(), 1);
    assert!(queue.has_errors().is_none());
}

#[test]
fn counted_error_yields_guarantee() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.has_errors().is_none());
    queue.add_with_source(err(ErrorCode::E2003, "gone", 0), "x");
    assert!(queue.has_errors().is_some());
    assert_eq!(queue.peek().count(), 1);
}

#[test]
fn spanless_diagnostic_goes_to_line_one() {
    let mut queue = DiagnosticQueue::new();
    queue.add_with_source(err(ErrorCode::E2003, "later", 4), "ab\ncd");
    queue.add_with_source(Diagnostic::error(ErrorCode::E9001).with_message("ice"), "ab\ncd");
    let flushed = queue.flush();
    assert_eq!(flushed[0].code, ErrorCode::E9001);
}
