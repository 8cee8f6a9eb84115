//! Integration tests for reference lists
//!
//! Tests lazy loading, reload notification, and label lookup for store fields.

use std::cell::RefCell;
use std::rc::Rc;

use focus_foundation::{Error, ErrorKind, Result, Value};
use focus_store::{ReferenceDefinition, make_reference_store};

use crate::common::store;

fn species(code: &str, label: &str) -> Value {
    Value::map([("code", Value::from(code)), ("label", Value::from(label))])
}

#[test]
fn label_of_a_store_field_value() {
    let store = store();
    let refs = make_reference_store(
        |_: &str| -> Result<Vec<Value>> {
            Ok(vec![species("dog", "Dog"), species("cat", "Cat")])
        },
        [("species", ReferenceDefinition::default())],
        store.runtime(),
    )
    .unwrap();

    let person = store.node("person").unwrap();
    person
        .set(&Value::map([(
            "pets",
            Value::list([Value::map([("species", Value::from("cat"))])]),
        )]))
        .unwrap();

    let pet = person.list("pets").unwrap().get(0).unwrap();
    let code = pet.field("species").unwrap().value().unwrap();
    assert_eq!(refs.label_for("species", &code).unwrap().as_deref(), Some("Cat"));
}

#[test]
fn reload_is_reported_to_listeners() {
    let generation = Rc::new(RefCell::new(vec![species("a", "A")]));
    let source = generation.clone();
    let store = store();
    let refs = make_reference_store(
        move |_: &str| -> Result<Vec<Value>> { Ok(source.borrow().clone()) },
        [("letters", ReferenceDefinition::default())],
        store.runtime(),
    )
    .unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let _sub = store.subscribe(move |batch| sink.borrow_mut().push(batch.clone()));

    assert_eq!(refs.get("letters").unwrap().len(), 1);
    generation.borrow_mut().push(species("b", "B"));
    assert_eq!(refs.get("letters").unwrap().len(), 1);
    assert_eq!(refs.reload("letters").unwrap().len(), 2);

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert!(seen[1].touches("letters"));
}

#[test]
fn loader_failure_keeps_cached_list() {
    let failing = Rc::new(RefCell::new(false));
    let flag = failing.clone();
    let refs = make_reference_store(
        move |name: &str| -> Result<Vec<Value>> {
            if *flag.borrow() {
                Err(Error::reference_load(name, "service unavailable"))
            } else {
                Ok(vec![species("x", "X")])
            }
        },
        [("codes", ReferenceDefinition::default())],
        store().runtime(),
    )
    .unwrap();

    refs.get("codes").unwrap();
    *failing.borrow_mut() = true;
    let err = refs.reload("codes").unwrap_err();

    assert!(matches!(err.kind, ErrorKind::ReferenceLoad { .. }));
    assert_eq!(err.path().as_deref(), Some("codes"));
    assert_eq!(refs.get("codes").unwrap().len(), 1);
}
