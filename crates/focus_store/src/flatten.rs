//! Projection of the store graph back to plain data.

use focus_foundation::{LtMap, Value};

use crate::field::EntityField;
use crate::node::{EntityArray, FieldNode, StoreEntry, StoreNode};
use crate::store::EntityStore;

/// Converts a node of the store graph to plain data.
///
/// Branches become maps with unset fields omitted, arrays become lists, and
/// scalar fields pass their value through.
pub trait ToFlatValues {
    /// Returns the plain-data projection.
    fn to_flat_values(&self) -> Value;
}

/// Free-function form of [`ToFlatValues::to_flat_values`].
pub fn to_flat_values(node: &impl ToFlatValues) -> Value {
    node.to_flat_values()
}

impl ToFlatValues for StoreNode {
    fn to_flat_values(&self) -> Value {
        let mut map = LtMap::new();
        for slot in self.fields() {
            let value = match slot {
                FieldNode::Value(field) => field.value(),
                FieldNode::Object { node, .. } => Some(node.to_flat_values()),
                FieldNode::List { array, .. } => Some(array.to_flat_values()),
            };
            if let Some(value) = value {
                map = map.insert(slot.descriptor().name.clone(), value);
            }
        }
        Value::Map(map)
    }
}

impl ToFlatValues for EntityArray {
    fn to_flat_values(&self) -> Value {
        Value::list(self.iter().map(|node| node.to_flat_values()))
    }
}

impl ToFlatValues for StoreEntry {
    fn to_flat_values(&self) -> Value {
        match self {
            Self::Node(node) => node.to_flat_values(),
            Self::List(array) => array.to_flat_values(),
        }
    }
}

impl ToFlatValues for EntityStore {
    fn to_flat_values(&self) -> Value {
        Value::map(
            self.entries()
                .map(|(name, entry)| (name.clone(), entry.to_flat_values())),
        )
    }
}

/// Unset fields flatten to `Value::Null` when asked for directly.
impl ToFlatValues for EntityField {
    fn to_flat_values(&self) -> Value {
        self.value().unwrap_or(Value::Null)
    }
}
