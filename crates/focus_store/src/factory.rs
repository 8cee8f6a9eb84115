//! Ad hoc field construction outside a store.
//!
//! Read-only and editable fields have separate constructors. Whether a field
//! aliases another is visible in its [`FieldSource`]: [`clone_field`] yields a
//! `Shared` source, [`from_field`] and [`make_read_only_field`] a `Snapshot`.

use std::sync::Arc;

use focus_foundation::Value;

use crate::builder::EntityFieldBuilder;
use crate::domain::{DisplayFormatter, Domain};
use crate::field::{EntityField, FieldSource};
use crate::runtime::Runtime;
use crate::schema::{FieldDescriptor, Metadata};

/// Options for read-only fields.
///
/// Every option left unset falls back to the domain default, or, in
/// [`from_field`], to the source field's own value.
#[derive(Clone, Debug, Default)]
pub struct ReadOnlyFieldOptions {
    name: Option<Arc<str>>,
    domain: Option<Arc<Domain>>,
    metadata: Metadata,
}

impl ReadOnlyFieldOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field name.
    #[must_use]
    pub fn name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the domain.
    #[must_use]
    pub fn domain(mut self, domain: impl Into<Arc<Domain>>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Sets the label.
    #[must_use]
    pub fn label(mut self, label: impl Into<Arc<str>>) -> Self {
        self.metadata.label = Some(label.into());
        self
    }

    /// Sets the comment.
    #[must_use]
    pub fn comment(mut self, comment: impl Into<Arc<str>>) -> Self {
        self.metadata.comment = Some(comment.into());
        self
    }

    /// Sets the CSS class hint.
    #[must_use]
    pub fn class_name(mut self, class_name: impl Into<Arc<str>>) -> Self {
        self.metadata.class_name = Some(class_name.into());
        self
    }

    /// Sets the display formatter.
    #[must_use]
    pub fn display_formatter(
        mut self,
        formatter: impl Fn(Option<&Value>) -> String + Send + Sync + 'static,
    ) -> Self {
        self.metadata.display_formatter = Some(Arc::new(formatter) as DisplayFormatter);
        self
    }

    /// Sets the display component.
    #[must_use]
    pub fn display_component(mut self, name: impl Into<Arc<str>>) -> Self {
        self.metadata.components.display = Some(name.into());
        self
    }

    /// Sets the label component.
    #[must_use]
    pub fn label_component(mut self, name: impl Into<Arc<str>>) -> Self {
        self.metadata.components.label = Some(name.into());
        self
    }

    /// Adds a display component prop.
    #[must_use]
    pub fn display_prop(mut self, key: impl Into<Arc<str>>, value: Value) -> Self {
        self.metadata.display_props = self.metadata.display_props.insert(key.into(), value);
        self
    }

    /// Adds a label component prop.
    #[must_use]
    pub fn label_prop(mut self, key: impl Into<Arc<str>>, value: Value) -> Self {
        self.metadata.label_props = self.metadata.label_props.insert(key.into(), value);
        self
    }

    /// Adds a field wrapper prop.
    #[must_use]
    pub fn field_prop(mut self, key: impl Into<Arc<str>>, value: Value) -> Self {
        self.metadata.field_props = self.metadata.field_props.insert(key.into(), value);
        self
    }
}

/// Creates a read-only field holding `value`.
#[must_use]
pub fn make_read_only_field(value: Option<Value>, options: ReadOnlyFieldOptions) -> EntityField {
    let name = options.name.unwrap_or_else(|| Arc::from(""));
    let domain = options.domain.unwrap_or_default();
    EntityFieldBuilder::new(name)
        .source(FieldSource::Snapshot(value))
        .domain(domain)
        .metadata(options.metadata)
        .edit(false)
        .collect()
}

/// Creates an editable field.
///
/// The field starts in edit mode; `build` may bind an accessor pair, attach a
/// domain and metadata, or override the edit flag.
pub fn make_editable_field(
    name: impl Into<Arc<str>>,
    runtime: &Runtime,
    build: impl FnOnce(EntityFieldBuilder) -> EntityFieldBuilder,
) -> EntityField {
    build(EntityFieldBuilder::new(name).runtime(runtime).edit(true)).collect()
}

/// Creates a field reading and writing the same storage as `field`, with its
/// own edit flag.
#[must_use]
pub fn clone_field(field: &EntityField, is_edit: bool) -> EntityField {
    EntityFieldBuilder::from_descriptor(field.descriptor().clone())
        .source(field.source().share())
        .runtime(field.runtime())
        .edit(is_edit)
        .collect()
        .with_type_checks(field.checks_types())
}

/// Creates an independent read-only copy of `field`'s current value.
///
/// Options replace the corresponding metadata; unset options keep the
/// source field's label, comment, domain, and formatter.
#[must_use]
pub fn from_field(field: &EntityField, options: ReadOnlyFieldOptions) -> EntityField {
    let source = field.descriptor();
    let inherited = Metadata {
        label: Some(Arc::from(source.label())),
        comment: source.metadata.comment.clone(),
        class_name: source.class_name().map(Arc::from),
        display_formatter: source.display_formatter().cloned(),
        components: source.components(),
        ..Metadata::default()
    };

    let descriptor = FieldDescriptor {
        name: options.name.unwrap_or_else(|| source.name.clone()),
        field_type: source.field_type.clone(),
        domain: options.domain.unwrap_or_else(|| source.domain.clone()),
        is_required: source.is_required,
        metadata: inherited.merged_with(&options.metadata),
    };

    EntityFieldBuilder::from_descriptor(Arc::new(descriptor))
        .source(FieldSource::Snapshot(field.value()))
        .runtime(field.runtime())
        .edit(false)
        .collect()
}
