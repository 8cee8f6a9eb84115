//! Integration tests for change notification
//!
//! Tests that store writes reach listeners as one batch per operation.

use std::cell::RefCell;
use std::rc::Rc;

use focus_foundation::Value;
use focus_store::{ChangeBatch, ChangeKind, EntityStore, Subscription};

use crate::common::{ada, store};

fn record(store: &EntityStore) -> (Rc<RefCell<Vec<ChangeBatch>>>, Subscription) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let sub = store.subscribe(move |batch| sink.borrow_mut().push(batch.clone()));
    (seen, sub)
}

#[test]
fn one_batch_per_set() {
    let store = store();
    let (seen, _sub) = record(&store);

    store.set(&Value::map([("person", ada())])).unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].touches("name"));
    assert!(seen[0].touches("city"));
    assert!(seen[0].touches("pets"));
}

#[test]
fn listener_never_sees_partial_state() {
    let store = Rc::new(store());
    let observed = Rc::new(RefCell::new(Vec::new()));
    let (view, sink) = (store.clone(), observed.clone());
    let _sub = store.subscribe(move |_| {
        let person = view.node("person").unwrap();
        sink.borrow_mut().push((
            person.field("name").unwrap().value(),
            person.field("age").unwrap().value(),
        ));
    });

    store
        .node("person")
        .unwrap()
        .set(&Value::map([("age", Value::Int(36)), ("name", Value::from("Ada"))]))
        .unwrap();

    assert_eq!(
        *observed.borrow(),
        [(Some(Value::from("Ada")), Some(Value::Int(36)))]
    );
}

#[test]
fn unchanged_writes_are_silent() {
    let store = store();
    let person = store.node("person").unwrap();
    person.set(&Value::map([("age", Value::Int(36))])).unwrap();
    let (seen, _sub) = record(&store);

    person.set(&Value::map([("age", Value::Int(36))])).unwrap();
    person.clear();
    person.clear();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].changes.len(), 1);
}

#[test]
fn array_replacement_is_reported() {
    let store = store();
    let (seen, _sub) = record(&store);

    let people = store.list("people").unwrap();
    people
        .set(&Value::list([Value::empty_map(), Value::empty_map()]))
        .unwrap();

    let seen = seen.borrow();
    let change = &seen[0].changes[0];
    assert_eq!(change.field.as_ref(), "people");
    assert_eq!(change.entity.as_deref(), Some("Person"));
    assert_eq!(change.kind, ChangeKind::Replace { len: 2 });
}

#[test]
fn failed_atomic_set_notifies_nobody() {
    let store = store();
    let (seen, _sub) = record(&store);
    let result = store.set(&Value::map([("person", Value::map([("bogus", Value::Null)]))]));
    assert!(result.is_err());
    assert!(seen.borrow().is_empty());
}

#[test]
fn dropping_subscription_stops_notifications() {
    let store = store();
    let (seen, sub) = record(&store);
    drop(sub);
    store.set(&Value::map([("person", ada())])).unwrap();
    assert!(seen.borrow().is_empty());
    assert_eq!(store.runtime().listener_count(), 0);
}

#[test]
fn outer_transaction_groups_several_sets() {
    let store = store();
    let (seen, _sub) = record(&store);

    store.runtime().transaction(|| {
        store
            .node("person")
            .unwrap()
            .set(&Value::map([("name", Value::from("Ada"))]))
            .unwrap();
        store.list("people").unwrap().push(&ada()).unwrap();
    });

    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(store.runtime().revision(), 1);
}
