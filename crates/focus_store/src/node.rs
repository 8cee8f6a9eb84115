//! Store graph nodes.
//!
//! A [`StoreNode`] is a branch: one [`FieldNode`] per field of its entity. An
//! [`EntityArray`] is an ordered list of branches built from one entity. Both
//! are cheap handles; clones refer to the same node.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use focus_foundation::{Result, Value};

use crate::field::EntityField;
use crate::mutation;
use crate::options::StoreOptions;
use crate::runtime::{Change, ChangeKind, Runtime};
use crate::schema::{Entity, EntityMap, FieldDescriptor, FieldType};

/// State shared by every node of one store.
pub(crate) struct StoreContext {
    pub(crate) schema: EntityMap,
    pub(crate) runtime: Runtime,
    pub(crate) options: StoreOptions,
}

/// One field slot of a branch.
pub enum FieldNode {
    /// Scalar field.
    Value(EntityField),
    /// Nested entity.
    Object {
        /// The field descriptor (`$field`).
        field: Arc<FieldDescriptor>,
        /// The nested branch.
        node: StoreNode,
    },
    /// Nested list of entities.
    List {
        /// The field descriptor (`$field`).
        field: Arc<FieldDescriptor>,
        /// The nested array.
        array: EntityArray,
    },
}

impl FieldNode {
    /// Returns the field descriptor (`$field`).
    #[must_use]
    pub fn descriptor(&self) -> &Arc<FieldDescriptor> {
        match self {
            Self::Value(field) => field.descriptor(),
            Self::Object { field, .. } | Self::List { field, .. } => field,
        }
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.descriptor().name
    }

    /// Returns the scalar field, if this is one.
    #[must_use]
    pub fn as_field(&self) -> Option<&EntityField> {
        match self {
            Self::Value(field) => Some(field),
            _ => None,
        }
    }

    /// Returns the nested branch, if this is one.
    #[must_use]
    pub fn as_node(&self) -> Option<&StoreNode> {
        match self {
            Self::Object { node, .. } => Some(node),
            _ => None,
        }
    }

    /// Returns the nested array, if this is one.
    #[must_use]
    pub fn as_list(&self) -> Option<&EntityArray> {
        match self {
            Self::List { array, .. } => Some(array),
            _ => None,
        }
    }
}

impl fmt::Debug for FieldNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(field) => fmt::Debug::fmt(field, f),
            Self::Object { node, .. } => fmt::Debug::fmt(node, f),
            Self::List { array, .. } => fmt::Debug::fmt(array, f),
        }
    }
}

struct NodeInner {
    entity: Arc<Entity>,
    fields: Vec<FieldNode>,
    ctx: Rc<StoreContext>,
}

/// Branch node: a mapping from field name to field slot.
#[derive(Clone)]
pub struct StoreNode(Rc<NodeInner>);

impl StoreNode {
    /// Builds an empty branch for `entity`, recursing into object fields.
    pub(crate) fn build(ctx: &Rc<StoreContext>, entity: &Arc<Entity>) -> Result<Self> {
        let mut fields = Vec::with_capacity(entity.fields.len());
        for field in &entity.fields {
            let slot = match &field.field_type {
                FieldType::Scalar => FieldNode::Value(EntityField::for_store(
                    &ctx.runtime,
                    &entity.name,
                    field,
                    ctx.options.check_types,
                )),
                FieldType::Object(target) => {
                    let nested = ctx.schema.nested(&entity.name, target)?;
                    FieldNode::Object {
                        field: field.clone(),
                        node: Self::build(ctx, nested)?,
                    }
                }
                FieldType::List(target) => {
                    let nested = ctx.schema.nested(&entity.name, target)?;
                    FieldNode::List {
                        field: field.clone(),
                        array: EntityArray::build(ctx, nested, field.name.clone()),
                    }
                }
            };
            fields.push(slot);
        }

        Ok(Self(Rc::new(NodeInner {
            entity: entity.clone(),
            fields,
            ctx: ctx.clone(),
        })))
    }

    pub(crate) fn ctx(&self) -> &Rc<StoreContext> {
        &self.0.ctx
    }

    /// Returns the entity this branch was built from.
    #[must_use]
    pub fn entity(&self) -> &Arc<Entity> {
        &self.0.entity
    }

    /// Returns the field slots in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldNode] {
        &self.0.fields
    }

    /// Returns field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.fields.iter().map(FieldNode::name)
    }

    /// Returns a field slot by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldNode> {
        self.0.fields.iter().find(|f| f.name() == name)
    }

    /// Returns a scalar field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&EntityField> {
        self.get(name).and_then(FieldNode::as_field)
    }

    /// Returns a nested branch by name.
    #[must_use]
    pub fn node(&self, name: &str) -> Option<&StoreNode> {
        self.get(name).and_then(FieldNode::as_node)
    }

    /// Returns a nested array by name.
    #[must_use]
    pub fn list(&self, name: &str) -> Option<&EntityArray> {
        self.get(name).and_then(FieldNode::as_list)
    }

    /// Applies plain data to this branch.
    ///
    /// Keys absent from `value` are left untouched; `Value::Null` clears the
    /// branch. See [`StoreOptions`] for what happens on error.
    ///
    /// # Errors
    ///
    /// Returns `UnknownProperty`, `ShapeMismatch`, or `TypeMismatch` when the
    /// input does not fit the entity.
    pub fn set(&self, value: &Value) -> Result<()> {
        mutation::set_node(self, value)
    }

    /// Resets every leaf to unset and empties every nested array.
    pub fn clear(&self) {
        mutation::clear_node(self);
    }

    /// Switches edit mode on every scalar field, recursing into nested nodes.
    pub fn set_edit(&self, is_edit: bool) {
        for slot in self.fields() {
            match slot {
                FieldNode::Value(field) => field.set_edit(is_edit),
                FieldNode::Object { node, .. } => node.set_edit(is_edit),
                FieldNode::List { array, .. } => {
                    for node in array.nodes() {
                        node.set_edit(is_edit);
                    }
                }
            }
        }
    }

    /// Returns validation errors keyed by dotted path.
    #[must_use]
    pub fn errors(&self) -> Vec<(String, String)> {
        let mut errors = Vec::new();
        self.collect_errors("", &mut errors);
        errors
    }

    /// Returns true if no field has a validation error.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    fn collect_errors(&self, prefix: &str, errors: &mut Vec<(String, String)>) {
        for slot in self.fields() {
            let path = join(prefix, slot.name());
            match slot {
                FieldNode::Value(field) => {
                    if let Some(message) = field.error() {
                        errors.push((path, message));
                    }
                }
                FieldNode::Object { node, .. } => node.collect_errors(&path, errors),
                FieldNode::List { array, .. } => {
                    for (i, node) in array.nodes().iter().enumerate() {
                        node.collect_errors(&join(&path, &i.to_string()), errors);
                    }
                }
            }
        }
    }

    /// Returns true if both handles refer to the same node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}.{segment}")
    }
}

impl fmt::Debug for StoreNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for slot in self.fields() {
            map.entry(&slot.name(), slot);
        }
        map.finish()
    }
}

struct ArrayInner {
    entity: Arc<Entity>,
    name: Arc<str>,
    items: RefCell<Vec<StoreNode>>,
    ctx: Rc<StoreContext>,
}

/// Observable ordered list of branches, all built from one entity (`$entity`).
#[derive(Clone)]
pub struct EntityArray(Rc<ArrayInner>);

impl EntityArray {
    pub(crate) fn build(ctx: &Rc<StoreContext>, entity: &Arc<Entity>, name: Arc<str>) -> Self {
        Self(Rc::new(ArrayInner {
            entity: entity.clone(),
            name,
            items: RefCell::new(Vec::new()),
            ctx: ctx.clone(),
        }))
    }

    pub(crate) fn ctx(&self) -> &Rc<StoreContext> {
        &self.0.ctx
    }

    /// Returns the entity every element is built from (`$entity`).
    #[must_use]
    pub fn entity(&self) -> &Arc<Entity> {
        &self.0.entity
    }

    /// Returns the entry or field name this array sits under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.items.borrow().len()
    }

    /// Returns true if the array is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.items.borrow().is_empty()
    }

    /// Returns the element at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<StoreNode> {
        self.0.items.borrow().get(index).cloned()
    }

    /// Returns handles to every element, in order.
    #[must_use]
    pub fn nodes(&self) -> Vec<StoreNode> {
        self.0.items.borrow().clone()
    }

    /// Iterates over a snapshot of the elements.
    pub fn iter(&self) -> impl Iterator<Item = StoreNode> {
        self.nodes().into_iter()
    }

    /// Replaces the contents with freshly built elements, one per input item.
    ///
    /// `Value::Null` empties the array. Element identity is never preserved.
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` for non-list input, or any error raised while
    /// setting an element.
    pub fn set(&self, value: &Value) -> Result<()> {
        mutation::set_array(self, value)
    }

    /// Empties the array.
    pub fn clear(&self) {
        mutation::clear_array(self);
    }

    /// Appends one element built from the array entity and set from `value`.
    ///
    /// # Errors
    ///
    /// Returns the error raised while setting the new element; the array is
    /// left unchanged in that case.
    pub fn push(&self, value: &Value) -> Result<StoreNode> {
        mutation::push_element(self, value)
    }

    /// Builds a fresh, empty element.
    pub(crate) fn new_element(&self) -> Result<StoreNode> {
        StoreNode::build(self.ctx(), self.entity())
    }

    /// Swaps in new contents and records the replacement.
    pub(crate) fn replace(&self, nodes: Vec<StoreNode>) {
        let len = nodes.len();
        let previous = std::mem::replace(&mut *self.0.items.borrow_mut(), nodes);
        if previous.is_empty() && len == 0 {
            return;
        }
        let runtime = &self.0.ctx.runtime;
        runtime.transaction(|| {
            runtime.record(Change {
                entity: Some(self.0.entity.name.clone()),
                field: self.0.name.clone(),
                kind: ChangeKind::Replace { len },
            });
        });
    }

    /// Returns true if both handles refer to the same array.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for EntityArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.items.borrow().iter()).finish()
    }
}

/// Top-level store entry: a branch or an array.
#[derive(Clone, Debug)]
pub enum StoreEntry {
    /// Single entity.
    Node(StoreNode),
    /// List of entities.
    List(EntityArray),
}

impl StoreEntry {
    /// Returns the entity behind the entry.
    #[must_use]
    pub fn entity(&self) -> &Arc<Entity> {
        match self {
            Self::Node(node) => node.entity(),
            Self::List(array) => array.entity(),
        }
    }

    /// Returns the branch, if this is one.
    #[must_use]
    pub fn as_node(&self) -> Option<&StoreNode> {
        match self {
            Self::Node(node) => Some(node),
            Self::List(_) => None,
        }
    }

    /// Returns the array, if this is one.
    #[must_use]
    pub fn as_list(&self) -> Option<&EntityArray> {
        match self {
            Self::List(array) => Some(array),
            Self::Node(_) => None,
        }
    }

    /// Applies plain data to the entry.
    ///
    /// # Errors
    ///
    /// See [`StoreNode::set`] and [`EntityArray::set`].
    pub fn set(&self, value: &Value) -> Result<()> {
        match self {
            Self::Node(node) => node.set(value),
            Self::List(array) => array.set(value),
        }
    }

    /// Clears the entry.
    pub fn clear(&self) {
        match self {
            Self::Node(node) => node.clear(),
            Self::List(array) => array.clear(),
        }
    }
}
