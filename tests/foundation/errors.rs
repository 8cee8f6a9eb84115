//! Integration tests for error types
//!
//! Tests error kinds, messages, and path/operation context.

use focus_foundation::{Error, ErrorContext, ErrorKind, Type};

#[test]
fn messages_name_the_culprit() {
    let err = Error::unknown_property("Person", "bogus");
    assert_eq!(err.to_string(), "\"Person\" has no property \"bogus\"");

    let err = Error::schema_resolution("owner", "Company");
    assert!(err.to_string().contains("owner"));
    assert!(err.to_string().contains("Company"));

    let err = Error::store_reference("company");
    assert!(err.to_string().contains("company"));
}

#[test]
fn type_mismatch_message() {
    let err = Error::type_mismatch("age", Type::Number, Type::String);
    assert!(matches!(
        err.kind,
        ErrorKind::TypeMismatch {
            expected: Type::Number,
            actual: Type::String,
            ..
        }
    ));
    assert_eq!(
        err.to_string(),
        "type mismatch on \"age\": expected number, got string"
    );
}

#[test]
fn within_builds_path_from_the_leaf_out() {
    let err = Error::unknown_property("Address", "town")
        .within("0")
        .within("places")
        .within("person")
        .during("set");

    assert_eq!(err.path().as_deref(), Some("person.places.0"));
    let ctx = err.context.unwrap();
    assert_eq!(ctx.operation, Some("set"));
    assert_eq!(ctx.to_string(), "in set at person.places.0");
}

#[test]
fn no_path_without_segments() {
    let err = Error::read_only("name").during("set");
    assert_eq!(err.path(), None);
    assert!(matches!(err.kind, ErrorKind::ReadOnlyField { .. }));
}

#[test]
fn context_builders() {
    let ctx = ErrorContext::new()
        .with_segment("b")
        .with_parent("a")
        .with_segment("c");
    assert_eq!(ctx.dotted_path(), "a.b.c");

    let err = Error::new(ErrorKind::DuplicateEntry("person".into())).with_context(ctx);
    assert_eq!(err.path().as_deref(), Some("a.b.c"));
}
