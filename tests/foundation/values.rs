//! Integration tests for Value types
//!
//! Tests Value variants, type tags, equality, display, and conversions.

use focus_foundation::{Type, Value};
use std::collections::HashSet;
use std::sync::Arc;

// =============================================================================
// Value Construction
// =============================================================================

#[test]
fn value_null() {
    let v = Value::Null;
    assert!(v.is_null());
    assert_eq!(v.value_type(), Type::Null);
    assert_eq!(v.shape_name(), "null");
}

#[test]
fn value_scalars() {
    assert_eq!(Value::from(true).as_bool(), Some(true));
    assert_eq!(Value::from(42_i64).as_int(), Some(42));
    assert_eq!(Value::from(7_i32).as_int(), Some(7));
    assert_eq!(Value::from(2.5).as_number(), Some(2.5));
    assert_eq!(Value::from("Ada").as_str(), Some("Ada"));
    assert_eq!(Value::from(String::from("Ada")), Value::from(Arc::<str>::from("Ada")));
}

#[test]
fn int_reads_as_number() {
    assert_eq!(Value::Int(3).as_number(), Some(3.0));
    assert_eq!(Value::Int(3).value_type(), Type::Number);
    assert_eq!(Value::Float(3.0).value_type(), Type::Number);
}

#[test]
fn value_list_from_vec() {
    let v = Value::from(vec![1_i64, 2, 3]);
    let list = v.as_list().unwrap();
    assert_eq!(list.len(), 3);
    assert_eq!(list.get(1), Some(&Value::Int(2)));
    assert!(v.is_structured());
    assert_eq!(v.value_type(), Type::Object);
}

#[test]
fn value_map_is_ordered_by_key() {
    let v = Value::map([("b", Value::Int(2)), ("a", Value::Int(1)), ("c", Value::Int(3))]);
    let keys: Vec<_> = v.as_map().unwrap().keys().map(|k| k.to_string()).collect();
    assert_eq!(keys, ["a", "b", "c"]);
    assert_eq!(v.get("b"), Some(&Value::Int(2)));
    assert_eq!(v.get("z"), None);
    assert_eq!(v.shape_name(), "map");
}

#[test]
fn get_on_non_map_is_none() {
    assert_eq!(Value::from("x").get("x"), None);
    assert_eq!(Value::list([Value::Null]).get("0"), None);
}

// =============================================================================
// Equality and Hashing
// =============================================================================

#[test]
fn float_equality_is_bitwise() {
    assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
    assert_ne!(Value::Float(0.0), Value::Float(-0.0));
    assert_ne!(Value::Int(1), Value::Float(1.0));
}

#[test]
fn values_hash_consistently() {
    let mut set = HashSet::new();
    set.insert(Value::map([("a", Value::Int(1))]));
    set.insert(Value::map([("a", Value::Int(1))]));
    set.insert(Value::list([Value::from("x")]));
    assert_eq!(set.len(), 2);
}

#[test]
fn mixed_numeric_ordering() {
    assert!(Value::Int(1) < Value::Float(1.5));
    assert!(Value::Float(0.5) < Value::Int(1));
    assert_eq!(Value::from("a").partial_cmp(&Value::Int(1)), None);
}

// =============================================================================
// Display
// =============================================================================

#[test]
fn display_nested() {
    let v = Value::map([
        ("name", Value::from("Ada")),
        ("tags", Value::list([Value::from("x"), Value::Null])),
    ]);
    assert_eq!(v.to_string(), "{name: Ada, tags: [x, null]}");
}

// =============================================================================
// Type Tags
// =============================================================================

#[test]
fn every_type_accepts_null() {
    for ty in [Type::Boolean, Type::Number, Type::String, Type::Object, Type::Any] {
        assert!(ty.accepts(Type::Null), "{ty} should accept null");
    }
}

#[test]
fn scalar_types_reject_others() {
    assert!(Type::String.accepts(Value::from("x").value_type()));
    assert!(!Type::String.accepts(Value::Int(1).value_type()));
    assert!(!Type::Number.accepts(Value::empty_map().value_type()));
    assert!(Type::Object.accepts(Value::empty_map().value_type()));
    assert!(Type::Any.accepts(Value::from(false).value_type()));
}
