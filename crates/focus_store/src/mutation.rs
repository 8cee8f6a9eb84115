//! The `set` / `clear` protocol over the store graph.
//!
//! Every entry point runs inside one runtime transaction, so listeners see a
//! whole `set` as a single batch. Under [`SetPolicy::Atomic`] the input is
//! checked against the schema before anything is written.

use std::sync::Arc;

use focus_foundation::{Error, Result, Value};

use crate::field::EntityField;
use crate::node::{EntityArray, FieldNode, StoreContext, StoreEntry, StoreNode};
use crate::options::SetPolicy;
use crate::schema::{Entity, FieldDescriptor, FieldType};

pub(crate) fn set_node(node: &StoreNode, value: &Value) -> Result<()> {
    tracing::trace!(entity = %node.entity().name, shape = value.shape_name(), "set node");
    let ctx = node.ctx();
    ctx.runtime
        .transaction(|| {
            if ctx.options.set_policy == SetPolicy::Atomic {
                check_entity(ctx, node.entity(), value)?;
            }
            write_node(node, value)
        })
        .map_err(|e| e.during("set"))
}

pub(crate) fn set_array(array: &EntityArray, value: &Value) -> Result<()> {
    tracing::trace!(array = array.name(), shape = value.shape_name(), "set array");
    let ctx = array.ctx();
    ctx.runtime
        .transaction(|| {
            if ctx.options.set_policy == SetPolicy::Atomic {
                check_array(ctx, array.entity(), array.name(), value)?;
            }
            write_array(array, value)
        })
        .map_err(|e| e.during("set"))
}

pub(crate) fn set_entries(
    ctx: &StoreContext,
    entries: &[(Arc<str>, StoreEntry)],
    value: &Value,
) -> Result<()> {
    let find = |name: &str| {
        entries
            .iter()
            .find(|(entry, _)| &**entry == name)
            .map(|(_, entry)| entry)
            .ok_or_else(|| Error::store_reference(name))
    };

    ctx.runtime
        .transaction(|| {
            let map = match value {
                Value::Null => {
                    clear_entries(entries);
                    return Ok(());
                }
                Value::Map(map) => map,
                other => return Err(Error::shape_mismatch("store", "map", other.shape_name())),
            };

            if ctx.options.set_policy == SetPolicy::Atomic {
                for (name, value) in map.iter() {
                    let checked = match find(&**name)? {
                        StoreEntry::Node(node) => check_entity(ctx, node.entity(), value),
                        StoreEntry::List(array) => check_array(ctx, array.entity(), name, value),
                    };
                    checked.map_err(|e| e.within(&**name))?;
                }
            }

            for (name, value) in map.iter() {
                let written = match find(&**name)? {
                    StoreEntry::Node(node) => write_node(node, value),
                    StoreEntry::List(array) => write_array(array, value),
                };
                written.map_err(|e| e.within(&**name))?;
            }
            Ok(())
        })
        .map_err(|e| e.during("set"))
}

/// Appends one element. Unlike `set`, a push is all-or-nothing under every
/// policy: the input is checked before the transaction opens, so a rejected
/// push records nothing.
pub(crate) fn push_element(array: &EntityArray, value: &Value) -> Result<StoreNode> {
    let ctx = array.ctx();
    let index = array.len();
    let pushed = check_entity(ctx, array.entity(), value).and_then(|()| {
        ctx.runtime.transaction(|| -> Result<StoreNode> {
            let node = array.new_element()?;
            write_node(&node, value)?;

            let mut nodes = array.nodes();
            nodes.push(node.clone());
            array.replace(nodes);
            Ok(node)
        })
    });
    pushed.map_err(|e| e.within(index.to_string()).during("push"))
}

pub(crate) fn clear_node(node: &StoreNode) {
    tracing::trace!(entity = %node.entity().name, "clear node");
    node.ctx().runtime.transaction(|| clear_fields(node));
}

pub(crate) fn clear_array(array: &EntityArray) {
    tracing::trace!(array = array.name(), "clear array");
    array.ctx().runtime.transaction(|| array.replace(Vec::new()));
}

pub(crate) fn clear_entries(entries: &[(Arc<str>, StoreEntry)]) {
    for (_, entry) in entries {
        entry.clear();
    }
}

fn clear_fields(node: &StoreNode) {
    for slot in node.fields() {
        match slot {
            FieldNode::Value(field) => clear_field(field),
            FieldNode::Object { node, .. } => clear_fields(node),
            FieldNode::List { array, .. } => array.replace(Vec::new()),
        }
    }
}

fn clear_field(field: &EntityField) {
    if let Err(error) = field.clear() {
        tracing::warn!(field = field.name(), %error, "field kept its value on clear");
    }
}

// Checks: validate input against the schema without touching the graph.

fn check_entity(ctx: &StoreContext, entity: &Entity, value: &Value) -> Result<()> {
    let map = match value {
        Value::Null => return Ok(()),
        Value::Map(map) => map,
        other => {
            return Err(Error::shape_mismatch(&*entity.name, "map", other.shape_name()));
        }
    };

    for (key, value) in map.iter() {
        let field = entity
            .field(key)
            .ok_or_else(|| Error::unknown_property(&*entity.name, &**key))?;
        check_field(ctx, entity, field, value).map_err(|e| e.within(&**key))?;
    }
    Ok(())
}

fn check_field(
    ctx: &StoreContext,
    owner: &Entity,
    field: &FieldDescriptor,
    value: &Value,
) -> Result<()> {
    match &field.field_type {
        FieldType::Scalar => {
            let expected = field.ty();
            let actual = value.value_type();
            if ctx.options.check_types && !expected.accepts(actual) {
                return Err(Error::type_mismatch(&*field.name, expected, actual));
            }
            Ok(())
        }
        FieldType::Object(target) => {
            let nested = ctx.schema.nested(&owner.name, target)?;
            check_entity(ctx, nested, value)
        }
        FieldType::List(target) => {
            let nested = ctx.schema.nested(&owner.name, target)?;
            check_array(ctx, nested, &field.name, value)
        }
    }
}

fn check_array(ctx: &StoreContext, entity: &Entity, name: &str, value: &Value) -> Result<()> {
    match value {
        Value::Null => Ok(()),
        Value::List(items) => {
            for (i, item) in items.iter().enumerate() {
                check_entity(ctx, entity, item).map_err(|e| e.within(i.to_string()))?;
            }
            Ok(())
        }
        other => Err(Error::shape_mismatch(name, "list", other.shape_name())),
    }
}

// Writes: apply input to the live graph, key by key.

fn write_node(node: &StoreNode, value: &Value) -> Result<()> {
    let map = match value {
        Value::Null => {
            clear_fields(node);
            return Ok(());
        }
        Value::Map(map) => map,
        other => {
            return Err(Error::shape_mismatch(
                &*node.entity().name,
                "map",
                other.shape_name(),
            ));
        }
    };

    for (key, value) in map.iter() {
        let slot = node
            .get(key)
            .ok_or_else(|| Error::unknown_property(&*node.entity().name, &**key))?;
        write_slot(node.ctx(), slot, value).map_err(|e| e.within(&**key))?;
    }
    Ok(())
}

fn write_slot(ctx: &StoreContext, slot: &FieldNode, value: &Value) -> Result<()> {
    match slot {
        FieldNode::Value(field) => {
            if ctx.options.check_types {
                field.check_type(value)?;
            }
            field.write(Some(value.clone()))
        }
        FieldNode::Object { node, .. } => write_node(node, value),
        FieldNode::List { array, .. } => write_array(array, value),
    }
}

fn write_array(array: &EntityArray, value: &Value) -> Result<()> {
    let items = match value {
        Value::Null => {
            array.replace(Vec::new());
            return Ok(());
        }
        Value::List(items) => items,
        other => return Err(Error::shape_mismatch(array.name(), "list", other.shape_name())),
    };

    let nodes = items
        .iter()
        .map(|_| array.new_element())
        .collect::<Result<Vec<_>>>()?;
    array.replace(nodes.clone());

    for (i, (node, item)) in nodes.iter().zip(items.iter()).enumerate() {
        write_node(node, item).map_err(|e| e.within(i.to_string()))?;
    }
    Ok(())
}
