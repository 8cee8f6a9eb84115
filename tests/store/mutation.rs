//! Integration tests for the set/clear protocol
//!
//! Tests partial application, array replacement, both set policies, and the
//! errors `set` reports.

use focus_foundation::{ErrorKind, Value};
use focus_store::{SetPolicy, StoreOptions, ToFlatValues};

use crate::common::{ada, store, store_with};

// =============================================================================
// Set
// =============================================================================

#[test]
fn set_through_the_root() {
    let store = store();
    store.set(&Value::map([("person", ada())])).unwrap();

    let person = store.node("person").unwrap();
    assert_eq!(
        person.field("name").unwrap().value(),
        Some(Value::from("Ada Lovelace"))
    );
    assert_eq!(
        person.node("address").unwrap().field("city").unwrap().value(),
        Some(Value::from("London"))
    );
    assert_eq!(person.list("pets").unwrap().len(), 1);
}

#[test]
fn absent_keys_are_left_untouched() {
    let store = store();
    let person = store.node("person").unwrap();
    person.set(&ada()).unwrap();
    person.set(&Value::map([("age", Value::Int(37))])).unwrap();

    assert_eq!(person.field("age").unwrap().value(), Some(Value::Int(37)));
    assert_eq!(
        person.field("name").unwrap().value(),
        Some(Value::from("Ada Lovelace"))
    );
    assert_eq!(person.list("pets").unwrap().len(), 1);
}

#[test]
fn nested_set_merges_into_branch() {
    let store = store();
    let person = store.node("person").unwrap();
    person.set(&ada()).unwrap();
    person
        .set(&Value::map([(
            "address",
            Value::map([("street", Value::from("St James's Square"))]),
        )]))
        .unwrap();

    let address = person.node("address").unwrap();
    assert_eq!(address.field("city").unwrap().value(), Some(Value::from("London")));
    assert_eq!(
        address.field("street").unwrap().value(),
        Some(Value::from("St James's Square"))
    );
}

#[test]
fn null_leaf_is_a_defined_value() {
    let store = store();
    let person = store.node("person").unwrap();
    person.set(&Value::map([("email", Value::Null)])).unwrap();
    assert_eq!(person.field("email").unwrap().value(), Some(Value::Null));
}

#[test]
fn root_set_with_null_clears_everything() {
    let store = store();
    store.set(&Value::map([("person", ada())])).unwrap();
    store.set(&Value::Null).unwrap();
    assert_eq!(
        store.node("person").unwrap().to_flat_values(),
        Value::map([
            ("address", Value::empty_map()),
            ("pets", Value::list(Vec::new())),
        ])
    );
}

// =============================================================================
// Arrays
// =============================================================================

#[test]
fn array_set_replaces_contents() {
    let store = store();
    let people = store.list("people").unwrap();

    people.set(&Value::list([ada(), ada(), ada()])).unwrap();
    let before = people.get(0).unwrap();
    people
        .set(&Value::list([Value::map([("name", Value::from("Grace"))])]))
        .unwrap();

    assert_eq!(people.len(), 1);
    assert!(!people.get(0).unwrap().ptr_eq(&before));
    assert_eq!(
        people.get(0).unwrap().field("name").unwrap().value(),
        Some(Value::from("Grace"))
    );
    assert_eq!(before.field("name").unwrap().value(), Some(Value::from("Ada Lovelace")));
}

#[test]
fn array_push_appends() {
    let store = store();
    let pets = store.node("person").unwrap().list("pets").unwrap();
    pets.push(&Value::map([("name", Value::from("Rex"))])).unwrap();
    let tom = pets.push(&Value::map([("name", Value::from("Tom"))])).unwrap();

    assert_eq!(pets.len(), 2);
    assert!(pets.get(1).unwrap().ptr_eq(&tom));
    let names: Vec<_> = pets
        .iter()
        .map(|pet| pet.field("name").unwrap().value().unwrap().to_string())
        .collect();
    assert_eq!(names, ["Rex", "Tom"]);
}

#[test]
fn array_rejects_non_list() {
    let store = store();
    let err = store
        .list("people")
        .unwrap()
        .set(&Value::map([("name", Value::from("x"))]))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ShapeMismatch { .. }));
}

// =============================================================================
// Errors and Policies
// =============================================================================

#[test]
fn unknown_root_entry() {
    let store = store();
    let err = store
        .set(&Value::map([("company", Value::empty_map())]))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::StoreReference { ref entry } if entry == "company"));
}

#[test]
fn unknown_property_names_entity_and_key() {
    let store = store();
    let err = store
        .node("person")
        .unwrap()
        .set(&Value::map([("nickname", Value::from("A"))]))
        .unwrap_err();
    assert_eq!(err.to_string(), "\"Person\" has no property \"nickname\"");
}

#[test]
fn atomic_policy_rolls_nothing_forward() {
    let store = store();
    assert_eq!(store.options().set_policy, SetPolicy::Atomic);

    let err = store
        .set(&Value::map([
            ("people", Value::list([ada()])),
            ("person", Value::map([("age", Value::Int(1)), ("zzz", Value::Null)])),
        ]))
        .unwrap_err();

    assert_eq!(err.path().as_deref(), Some("person"));
    assert!(store.list("people").unwrap().is_empty());
    assert_eq!(store.node("person").unwrap().field("age").unwrap().value(), None);
    assert_eq!(store.runtime().revision(), 0);
}

#[test]
fn partial_policy_keeps_earlier_writes() {
    let store = store_with(StoreOptions::partial());
    let err = store
        .set(&Value::map([
            ("people", Value::list([ada()])),
            ("person", Value::map([("age", Value::Int(1)), ("zzz", Value::Null)])),
        ]))
        .unwrap_err();

    assert!(matches!(err.kind, ErrorKind::UnknownProperty { .. }));
    assert_eq!(store.list("people").unwrap().len(), 1);
    assert_eq!(
        store.node("person").unwrap().field("age").unwrap().value(),
        Some(Value::Int(1))
    );
}

#[test]
fn type_checks_can_be_disabled() {
    let strict = store();
    let err = strict
        .node("person")
        .unwrap()
        .set(&Value::map([("age", Value::from("thirty"))]))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::TypeMismatch { .. }));
    assert_eq!(err.path().as_deref(), Some("age"));

    let lenient = store_with(StoreOptions::lenient());
    let person = lenient.node("person").unwrap();
    person.set(&Value::map([("age", Value::from("thirty"))])).unwrap();
    assert_eq!(person.field("age").unwrap().value(), Some(Value::from("thirty")));
}

#[test]
fn scalar_into_branch_is_a_shape_error() {
    let store = store();
    let person = store.node("person").unwrap();
    let err = person.set(&Value::map([("address", Value::from("London"))])).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ShapeMismatch { .. }));
    assert!(person.node("address").is_some());
}

// =============================================================================
// Clear
// =============================================================================

#[test]
fn clear_keeps_structure() {
    let store = store();
    let person = store.node("person").unwrap();
    person.set(&ada()).unwrap();
    person.clear();

    assert_eq!(person.field("name").unwrap().value(), None);
    assert!(person.node("address").is_some());
    assert_eq!(person.node("address").unwrap().field("city").unwrap().value(), None);
    assert!(person.list("pets").unwrap().is_empty());
    assert_eq!(person.field_names().count(), 5);
}

#[test]
fn clear_on_array() {
    let store = store();
    let people = store.list("people").unwrap();
    people.set(&Value::list([ada(), ada()])).unwrap();
    people.clear();
    assert!(people.is_empty());
}
