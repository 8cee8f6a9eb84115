//! Integration tests for persistent collections
//!
//! Tests LtVec and LtMap structural sharing and immutability.

use focus_foundation::{LtMap, LtVec, Value};
use std::sync::Arc;

// =============================================================================
// LtVec
// =============================================================================

#[test]
fn vector_push_back_leaves_original() {
    let v: LtVec<Value> = LtVec::new();
    let v2 = v.push_back(Value::Int(1)).push_back(Value::Int(2));

    assert!(v.is_empty());
    assert_eq!(v2.len(), 2);
    assert_eq!(v2.get(0), Some(&Value::Int(1)));
    assert_eq!(v2.get(1), Some(&Value::Int(2)));
}

#[test]
fn vector_collects_and_iterates() {
    let v: LtVec<i64> = (1..=4).collect();
    let doubled: Vec<_> = v.iter().map(|n| n * 2).collect();
    assert_eq!(doubled, [2, 4, 6, 8]);

    let owned: Vec<_> = v.into_iter().collect();
    assert_eq!(owned, [1, 2, 3, 4]);
}

// =============================================================================
// LtMap
// =============================================================================

#[test]
fn map_insert_is_persistent() {
    let m: LtMap<Arc<str>, Value> = LtMap::new();
    let m2 = m.insert(Arc::from("a"), Value::Int(1));
    let m3 = m2.insert(Arc::from("a"), Value::Int(2));

    assert!(m.is_empty());
    assert_eq!(m2.get("a"), Some(&Value::Int(1)));
    assert_eq!(m3.get("a"), Some(&Value::Int(2)));
    assert_eq!(m3.len(), 1);
}

#[test]
fn map_remove() {
    let m: LtMap<Arc<str>, Value> = [(Arc::from("a"), Value::Int(1)), (Arc::from("b"), Value::Int(2))]
        .into_iter()
        .collect();
    let m2 = m.remove("a");

    assert!(m.contains_key("a"));
    assert!(!m2.contains_key("a"));
    assert_eq!(m2.len(), 1);
}

#[test]
fn map_union_prefers_other() {
    let base: LtMap<&str, i64> = [("a", 1), ("b", 2)].into_iter().collect();
    let over: LtMap<&str, i64> = [("b", 20), ("c", 30)].into_iter().collect();
    let merged = base.union(&over);

    let pairs: Vec<_> = merged.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(pairs, [("a", 1), ("b", 20), ("c", 30)]);
}

#[test]
fn map_equality_ignores_insertion_order() {
    let a: LtMap<&str, i64> = [("x", 1), ("y", 2)].into_iter().collect();
    let b: LtMap<&str, i64> = [("y", 2), ("x", 1)].into_iter().collect();
    assert_eq!(a, b);
}
