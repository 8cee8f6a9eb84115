//! Entity schema definitions.
//!
//! Entities are static, declarative records of typed fields. They are shared
//! by reference across every store built from them and never change once
//! constructed.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use focus_foundation::{Error, ErrorKind, Result, Type, Value};

use crate::domain::{Components, DisplayFormatter, Domain, Props, Validator};

/// Shape of a field's value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// A scalar value typed by the field's domain.
    Scalar,
    /// A nested entity.
    Object(Arc<str>),
    /// A list of nested entities.
    List(Arc<str>),
}

impl FieldType {
    /// Returns the referenced entity name for nested fields.
    #[must_use]
    pub fn entity_name(&self) -> Option<&str> {
        match self {
            Self::Scalar => None,
            Self::Object(name) | Self::List(name) => Some(&**name),
        }
    }
}

/// Per-field overrides layered over the domain defaults.
///
/// Every `Some` (and every prop) here wins over the corresponding domain value.
#[derive(Clone, Default)]
pub struct Metadata {
    /// Field label.
    pub label: Option<Arc<str>>,
    /// Help text.
    pub comment: Option<Arc<str>>,
    /// CSS class hint.
    pub class_name: Option<Arc<str>>,
    /// Display formatter override.
    pub display_formatter: Option<DisplayFormatter>,
    /// Component binding overrides.
    pub components: Components,
    /// Extra display props.
    pub display_props: Props,
    /// Extra label props.
    pub label_props: Props,
    /// Extra input props.
    pub input_props: Props,
    /// Extra field wrapper props.
    pub field_props: Props,
}

impl Metadata {
    /// Creates empty metadata.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<Arc<str>>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<Arc<str>>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Sets the CSS class hint.
    #[must_use]
    pub fn with_class_name(mut self, class_name: impl Into<Arc<str>>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Sets the display formatter.
    #[must_use]
    pub fn with_formatter(
        mut self,
        formatter: impl Fn(Option<&Value>) -> String + Send + Sync + 'static,
    ) -> Self {
        self.display_formatter = Some(Arc::new(formatter));
        self
    }

    /// Sets the display component.
    #[must_use]
    pub fn with_display_component(mut self, name: impl Into<Arc<str>>) -> Self {
        self.components.display = Some(name.into());
        self
    }

    /// Sets the label component.
    #[must_use]
    pub fn with_label_component(mut self, name: impl Into<Arc<str>>) -> Self {
        self.components.label = Some(name.into());
        self
    }

    /// Sets the input component.
    #[must_use]
    pub fn with_input_component(mut self, name: impl Into<Arc<str>>) -> Self {
        self.components.input = Some(name.into());
        self
    }

    /// Adds a display prop.
    #[must_use]
    pub fn with_display_prop(mut self, key: impl Into<Arc<str>>, value: Value) -> Self {
        self.display_props = self.display_props.insert(key.into(), value);
        self
    }

    /// Adds an input prop.
    #[must_use]
    pub fn with_input_prop(mut self, key: impl Into<Arc<str>>, value: Value) -> Self {
        self.input_props = self.input_props.insert(key.into(), value);
        self
    }

    /// Returns metadata where everything set in `later` replaces ours.
    #[must_use]
    pub fn merged_with(&self, later: &Self) -> Self {
        Self {
            label: later.label.clone().or_else(|| self.label.clone()),
            comment: later.comment.clone().or_else(|| self.comment.clone()),
            class_name: later.class_name.clone().or_else(|| self.class_name.clone()),
            display_formatter: later
                .display_formatter
                .clone()
                .or_else(|| self.display_formatter.clone()),
            components: self.components.overridden_by(&later.components),
            display_props: self.display_props.union(&later.display_props),
            label_props: self.label_props.union(&later.label_props),
            input_props: self.input_props.union(&later.input_props),
            field_props: self.field_props.union(&later.field_props),
        }
    }
}

impl fmt::Debug for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metadata")
            .field("label", &self.label)
            .field("comment", &self.comment)
            .field("has_formatter", &self.display_formatter.is_some())
            .field("components", &self.components)
            .finish_non_exhaustive()
    }
}

/// Static description of one field of an entity (`$field`).
#[derive(Clone, Debug)]
pub struct FieldDescriptor {
    /// Field name.
    pub name: Arc<str>,
    /// Shape of the value.
    pub field_type: FieldType,
    /// Domain the field draws its defaults from.
    pub domain: Arc<Domain>,
    /// Whether the field must hold a value to be valid.
    pub is_required: bool,
    /// Field-level overrides.
    pub metadata: Metadata,
}

impl FieldDescriptor {
    /// Creates a scalar field.
    pub fn scalar(name: impl Into<Arc<str>>, domain: impl Into<Arc<Domain>>) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Scalar,
            domain: domain.into(),
            is_required: false,
            metadata: Metadata::default(),
        }
    }

    /// Creates a field holding one nested entity.
    pub fn object(name: impl Into<Arc<str>>, entity: impl Into<Arc<str>>) -> Self {
        Self {
            field_type: FieldType::Object(entity.into()),
            ..Self::scalar(name, Domain::new("", Type::Object))
        }
    }

    /// Creates a field holding a list of nested entities.
    pub fn list(name: impl Into<Arc<str>>, entity: impl Into<Arc<str>>) -> Self {
        Self {
            field_type: FieldType::List(entity.into()),
            ..Self::scalar(name, Domain::new("", Type::Object))
        }
    }

    /// Marks the field as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    /// Sets the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<Arc<str>>) -> Self {
        self.metadata.label = Some(label.into());
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<Arc<str>>) -> Self {
        self.metadata.comment = Some(comment.into());
        self
    }

    /// Layers metadata over what the descriptor already has.
    #[must_use]
    pub fn with_metadata(mut self, metadata: &Metadata) -> Self {
        self.metadata = self.metadata.merged_with(metadata);
        self
    }

    /// Returns the label, falling back to the field name.
    #[must_use]
    pub fn label(&self) -> &str {
        self.metadata.label.as_deref().unwrap_or(&self.name)
    }

    /// Returns the help text.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.metadata.comment.as_deref()
    }

    /// Returns the domain type.
    #[must_use]
    pub fn ty(&self) -> Type {
        self.domain.ty
    }

    /// Returns the domain validators.
    #[must_use]
    pub fn validators(&self) -> &[Validator] {
        &self.domain.validators
    }

    /// Returns the effective display formatter.
    #[must_use]
    pub fn display_formatter(&self) -> Option<&DisplayFormatter> {
        self.metadata
            .display_formatter
            .as_ref()
            .or(self.domain.display_formatter.as_ref())
    }

    /// Returns the effective component bindings.
    #[must_use]
    pub fn components(&self) -> Components {
        self.domain.components.overridden_by(&self.metadata.components)
    }

    /// Returns the effective CSS class hint.
    #[must_use]
    pub fn class_name(&self) -> Option<&str> {
        self.metadata
            .class_name
            .as_deref()
            .or(self.domain.class_name.as_deref())
    }

    /// Returns display props, field values winning over domain values.
    #[must_use]
    pub fn display_props(&self) -> Props {
        self.domain.display_props.union(&self.metadata.display_props)
    }

    /// Returns label props, field values winning over domain values.
    #[must_use]
    pub fn label_props(&self) -> Props {
        self.domain.label_props.union(&self.metadata.label_props)
    }

    /// Returns input props, field values winning over domain values.
    #[must_use]
    pub fn input_props(&self) -> Props {
        self.domain.input_props.union(&self.metadata.input_props)
    }

    /// Returns field wrapper props, field values winning over domain values.
    #[must_use]
    pub fn field_props(&self) -> Props {
        self.domain.field_props.union(&self.metadata.field_props)
    }
}

/// Schema definition for an entity.
#[derive(Clone, Debug)]
pub struct Entity {
    /// Entity name, unique within an entity list.
    pub name: Arc<str>,
    /// Field descriptors in declaration order.
    pub fields: Vec<Arc<FieldDescriptor>>,
}

impl Entity {
    /// Creates an entity with no fields.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a field.
    #[must_use]
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(Arc::new(field));
        self
    }

    /// Returns the field descriptor by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Arc<FieldDescriptor>> {
        self.fields.iter().find(|f| &*f.name == name)
    }

    /// Returns field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| &*f.name)
    }
}

/// Name to entity lookup built from an entity list.
///
/// Construction validates the whole list: duplicate names, duplicate fields,
/// nested references to unknown entities, and object nesting cycles are all
/// rejected up front.
#[derive(Clone, Debug, Default)]
pub struct EntityMap {
    entities: HashMap<Arc<str>, Arc<Entity>>,
}

impl EntityMap {
    /// Builds and validates the lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is not self-contained (see type docs).
    pub fn new<I, E>(entities: I) -> Result<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<Arc<Entity>>,
    {
        let mut map = HashMap::new();
        for entity in entities {
            let entity: Arc<Entity> = entity.into();
            let mut seen = HashSet::new();
            for field in &entity.fields {
                if !seen.insert(field.name.clone()) {
                    return Err(Error::new(ErrorKind::DuplicateField {
                        entity: entity.name.to_string(),
                        field: field.name.to_string(),
                    }));
                }
            }
            if map.insert(entity.name.clone(), entity.clone()).is_some() {
                return Err(Error::new(ErrorKind::DuplicateEntity(entity.name.to_string())));
            }
        }

        let map = Self { entities: map };
        map.check_dependencies()?;
        map.check_cycles()?;
        Ok(map)
    }

    /// Returns an entity by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<Entity>> {
        self.entities.get(name)
    }

    /// Resolves the entity behind a store entry.
    ///
    /// # Errors
    ///
    /// Returns `SchemaResolution` naming the entry when the entity is unknown.
    pub fn resolve(&self, entry: &str, entity: &str) -> Result<&Arc<Entity>> {
        self.get(entity)
            .ok_or_else(|| Error::schema_resolution(entry, entity))
    }

    /// Resolves the entity referenced by a nested field of `owner`.
    pub(crate) fn nested(&self, owner: &str, dependency: &str) -> Result<&Arc<Entity>> {
        self.get(dependency)
            .ok_or_else(|| Error::missing_dependency(owner, dependency))
    }

    /// Returns the number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if there are no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    fn check_dependencies(&self) -> Result<()> {
        for entity in self.entities.values() {
            for field in &entity.fields {
                if let Some(dependency) = field.field_type.entity_name() {
                    self.nested(&entity.name, dependency)?;
                }
            }
        }
        Ok(())
    }

    /// Object fields are built eagerly, so a cycle through them never ends.
    /// List fields start empty and may refer back to their owner.
    fn check_cycles(&self) -> Result<()> {
        let mut done = HashSet::new();
        let mut names: Vec<_> = self.entities.keys().cloned().collect();
        names.sort();
        for name in names {
            let mut stack = Vec::new();
            self.visit(&name, &mut stack, &mut done)?;
        }
        Ok(())
    }

    fn visit(
        &self,
        name: &Arc<str>,
        stack: &mut Vec<Arc<str>>,
        done: &mut HashSet<Arc<str>>,
    ) -> Result<()> {
        if done.contains(name) {
            return Ok(());
        }
        if let Some(start) = stack.iter().position(|n| n == name) {
            let mut cycle: Vec<&str> = stack[start..].iter().map(|n| &**n).collect();
            cycle.push(name);
            return Err(Error::new(ErrorKind::RecursiveEntity {
                path: cycle.join(" -> "),
            }));
        }

        stack.push(name.clone());
        if let Some(entity) = self.entities.get(name) {
            for field in &entity.fields {
                if let FieldType::Object(target) = &field.field_type {
                    self.visit(target, stack, done)?;
                }
            }
        }
        stack.pop();
        done.insert(name.clone());
        Ok(())
    }
}
