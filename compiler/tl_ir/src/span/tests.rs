use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_span_basic() {
    let span = Span::new(10, 20);
    assert_eq!(span.len(), 10);
    assert!(!span.is_empty());
    assert!(span.contains(15));
    assert!(!span.contains(20));
}

#[test]
fn test_span_merge() {
    let merged = Span::new(10, 20).merge(Span::new(15, 30));
    assert_eq!(merged, Span::new(10, 30));
}

#[test]
fn test_span_point_is_empty() {
    let p = Span::point(7);
    assert!(p.is_empty());
    assert_eq!(p.to_range(), 7..7);
}

#[test]
fn test_span_try_from_range() {
    assert_eq!(Span::try_from_range(50..100), Ok(Span::new(50, 100)));
    let large = u32::MAX as usize + 1;
    assert_eq!(
        Span::try_from_range(large..large),
        Err(SpanError::StartTooLarge(large))
    );
    assert_eq!(
        Span::try_from_range(0..large),
        Err(SpanError::EndTooLarge(large))
    );
}

#[test]
fn test_span_debug_format() {
    assert_eq!(format!("{:?}", Span::new(3, 9)), "3..9");
}
