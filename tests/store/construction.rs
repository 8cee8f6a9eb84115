//! Integration tests for store construction
//!
//! Tests eager schema validation, entry resolution, and the shape of the
//! materialized graph.

use focus_foundation::{ErrorKind, Type, Value};
use focus_store::{
    Domain, Entity, EntryShape, FieldDescriptor, FieldNode, StoreConfig, make_entity_store,
};

use crate::common::{config, entities, store};

// =============================================================================
// Graph Shape
// =============================================================================

#[test]
fn entries_follow_config() {
    let store = store();
    let names: Vec<_> = store.entry_names().collect();
    assert_eq!(names, ["person", "people"]);

    let shapes: Vec<_> = config().entries().iter().map(|e| e.shape).collect();
    assert_eq!(shapes, [EntryShape::Object, EntryShape::List]);
}

#[test]
fn branch_has_one_slot_per_field() {
    let store = store();
    let person = store.node("person").unwrap();

    let names: Vec<_> = person.field_names().collect();
    assert_eq!(names, ["name", "age", "email", "address", "pets"]);
    assert_eq!(person.entity().name.as_ref(), "Person");

    assert!(matches!(person.get("name"), Some(FieldNode::Value(_))));
    assert!(matches!(person.get("address"), Some(FieldNode::Object { .. })));
    assert!(matches!(person.get("pets"), Some(FieldNode::List { .. })));
    assert!(person.get("bogus").is_none());
}

#[test]
fn nested_branches_are_built_eagerly() {
    let store = store();
    let address = store.node("person").unwrap().node("address").unwrap();
    assert_eq!(address.entity().name.as_ref(), "Address");
    assert_eq!(address.field("city").unwrap().value(), None);
}

#[test]
fn arrays_start_empty_and_know_their_entity() {
    let store = store();
    let people = store.list("people").unwrap();
    assert!(people.is_empty());
    assert_eq!(people.entity().name.as_ref(), "Person");

    let pets = store.node("person").unwrap().list("pets").unwrap();
    assert_eq!(pets.entity().name.as_ref(), "Pet");
    assert_eq!(pets.name(), "pets");
}

#[test]
fn field_descriptor_is_shared_with_schema() {
    let store = store();
    let name = store.node("person").unwrap().field("name").unwrap();
    let schema_field = store.schema().get("Person").unwrap().field("name").unwrap();

    assert!(std::sync::Arc::ptr_eq(name.descriptor(), schema_field));
    assert_eq!(name.descriptor().label(), "Full name");
    assert!(name.descriptor().is_required);
    assert!(!name.is_edit());
}

#[test]
fn stores_are_independent() {
    let a = store();
    let b = store();
    let name = a.node("person").unwrap().field("name").unwrap();
    name.set_value(Value::from("Ada")).unwrap();
    assert_eq!(b.node("person").unwrap().field("name").unwrap().value(), None);
}

// =============================================================================
// Schema Errors
// =============================================================================

#[test]
fn unknown_entry_entity_fails_construction() {
    let config = StoreConfig::new().object_of("company", "Company");
    let err = make_entity_store(&config, entities()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::SchemaResolution { .. }));
    assert!(err.to_string().contains("company"));
}

#[test]
fn unknown_nested_entity_fails_construction() {
    let entities = [Entity::new("Order").with_field(FieldDescriptor::list("lines", "OrderLine"))];
    let err = make_entity_store(&StoreConfig::new().object("Order"), entities).unwrap_err();
    match err.kind {
        ErrorKind::MissingDependency { entity, dependency } => {
            assert_eq!(entity, "Order");
            assert_eq!(dependency, "OrderLine");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn recursive_object_nesting_is_rejected() {
    let entities = [
        Entity::new("A").with_field(FieldDescriptor::object("b", "B")),
        Entity::new("B").with_field(FieldDescriptor::object("a", "A")),
    ];
    let err = make_entity_store(&StoreConfig::new().object("A"), entities).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::RecursiveEntity { .. }));
}

#[test]
fn recursive_list_nesting_is_allowed() {
    let entities = [Entity::new("Node")
        .with_field(FieldDescriptor::scalar("label", Domain::new("DO", Type::String)))
        .with_field(FieldDescriptor::list("children", "Node"))];
    let store = make_entity_store(&StoreConfig::new().object("Node"), entities).unwrap();

    let root = store.node("Node").unwrap();
    root.set(&Value::map([(
        "children",
        Value::list([Value::map([(
            "children",
            Value::list([Value::empty_map()]),
        )])]),
    )]))
    .unwrap();

    let child = root.list("children").unwrap().get(0).unwrap();
    assert_eq!(child.list("children").unwrap().len(), 1);
}

#[test]
fn duplicate_entities_and_fields_are_rejected() {
    let dup_entity = [Entity::new("A"), Entity::new("A")];
    let err = make_entity_store(&StoreConfig::new(), dup_entity).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateEntity(_)));

    let dup_field = [Entity::new("A")
        .with_field(FieldDescriptor::scalar("x", Domain::default()))
        .with_field(FieldDescriptor::scalar("x", Domain::default()))];
    let err = make_entity_store(&StoreConfig::new(), dup_field).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateField { .. }));
}

#[test]
fn empty_config_builds_empty_store() {
    let store = make_entity_store(&StoreConfig::new(), entities()).unwrap();
    assert_eq!(store.entry_names().count(), 0);
    assert_eq!(store.to_flat_values(), Value::empty_map());
}
