use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_compile_error_display_includes_offset() {
    let err = duplicate_case(5.0).with_span(Span::new(12, 13));
    assert_eq!(err.to_string(), "duplicate case value 5 (at offset 12)");
}

#[test]
fn test_compile_error_notes() {
    let err = duplicate_case(5.0)
        .with_span(Span::new(12, 13))
        .with_related("first used here", Span::new(4, 5))
        .with_note("case values must be distinct");
    assert_eq!(err.notes.len(), 2);
    assert_eq!(err.notes[0].span, Some(Span::new(4, 5)));
    assert_eq!(err.notes[1].span, None);
}

#[test]
fn test_eval_error_without_span() {
    assert_eq!(timeout().to_string(), "calculations exceeded time limit");
}

#[test]
fn test_categories() {
    assert_eq!(timeout().category(), ErrorCategory::Timeout);
    assert_eq!(
        iteration_limit(256).category(),
        ErrorCategory::IterationLimit
    );
    assert_eq!(no_value().category(), ErrorCategory::Evaluation);

    assert!(timeout().is_timeout());
    assert!(timeout().is_resource_exhausted());
    assert!(iteration_limit(3).is_resource_exhausted());
    assert!(!iteration_limit(3).is_timeout());
    assert!(!constant_reassignment("pi").is_resource_exhausted());
}

#[test]
fn test_function_failed_message() {
    let err = function_failed("sqrt", "negative input").with_span(Span::new(0, 4));
    assert_eq!(
        err.to_string(),
        "function `sqrt` failed: negative input (at offset 0)"
    );
}

#[test]
fn test_expression_error_is_transparent() {
    let err: ExpressionError = uninitialized_variable("q").with_span(Span::new(3, 4)).into();
    assert_eq!(err.to_string(), "variable `q` is not initialized (at offset 3)");

    let err: ExpressionError = case_label_not_constant().into();
    assert!(matches!(err, ExpressionError::Compile(_)));
}
