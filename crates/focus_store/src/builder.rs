//! Chainable construction of [`EntityField`] nodes.

use std::fmt;
use std::sync::Arc;

use focus_foundation::Value;

use crate::domain::Domain;
use crate::field::{Accessor, EntityField, FieldSource, ValueCell};
use crate::runtime::Runtime;
use crate::schema::{FieldDescriptor, Metadata};

enum EditMode {
    Static(bool),
    Lazy(Box<dyn FnOnce() -> bool>),
}

/// Builder for a single field node.
///
/// ```
/// use focus_foundation::{Type, Value};
/// use focus_store::{Domain, EntityFieldBuilder, Metadata};
///
/// let field = EntityFieldBuilder::new("name")
///     .domain(Domain::new("DO_NAME", Type::String))
///     .metadata(Metadata::new().with_label("Name"))
///     .initial(Value::from("Ada"))
///     .edit(true)
///     .collect();
///
/// assert_eq!(field.descriptor().label(), "Name");
/// assert_eq!(field.value(), Some(Value::from("Ada")));
/// ```
pub struct EntityFieldBuilder {
    name: Arc<str>,
    base: Option<Arc<FieldDescriptor>>,
    source: Option<FieldSource>,
    initial: Option<Value>,
    domain: Option<Arc<Domain>>,
    metadata: Option<Metadata>,
    is_required: Option<bool>,
    edit: EditMode,
    runtime: Option<Runtime>,
}

impl EntityFieldBuilder {
    /// Starts a builder for a field called `name`.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            base: None,
            source: None,
            initial: None,
            domain: None,
            metadata: None,
            is_required: None,
            edit: EditMode::Static(false),
            runtime: None,
        }
    }

    /// Starts from an existing descriptor. Later domain and metadata calls
    /// layer over it; without them the descriptor is reused as is.
    #[must_use]
    pub fn from_descriptor(descriptor: Arc<FieldDescriptor>) -> Self {
        let mut builder = Self::new(descriptor.name.clone());
        builder.base = Some(descriptor);
        builder
    }

    /// Sets the runtime writes are reported to.
    #[must_use]
    pub fn runtime(mut self, runtime: &Runtime) -> Self {
        self.runtime = Some(runtime.clone());
        self
    }

    /// Binds a getter/setter pair. The field keeps no copy of the value.
    #[must_use]
    pub fn value(
        mut self,
        get: impl Fn() -> Option<Value> + 'static,
        set: impl Fn(Option<Value>) + 'static,
    ) -> Self {
        self.source = Some(FieldSource::Accessor(Accessor::new(get, set)));
        self
    }

    /// Binds a getter only; the field will be read-only.
    #[must_use]
    pub fn getter(mut self, get: impl Fn() -> Option<Value> + 'static) -> Self {
        self.source = Some(FieldSource::Accessor(Accessor::read_only(get)));
        self
    }

    /// Uses an explicit value source.
    #[must_use]
    pub fn source(mut self, source: FieldSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Initial value of the owned cell created when no source is bound.
    #[must_use]
    pub fn initial(mut self, value: Value) -> Self {
        self.initial = Some(value);
        self
    }

    /// Attaches a domain.
    #[must_use]
    pub fn domain(mut self, domain: impl Into<Arc<Domain>>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Layers metadata. Successive calls merge, later values winning, and
    /// everything set here wins over the domain defaults.
    #[must_use]
    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(match self.metadata.take() {
            Some(previous) => previous.merged_with(&metadata),
            None => metadata,
        });
        self
    }

    /// Marks the field as required (or not).
    #[must_use]
    pub fn required(mut self, is_required: bool) -> Self {
        self.is_required = Some(is_required);
        self
    }

    /// Sets a static edit flag.
    #[must_use]
    pub fn edit(mut self, is_edit: bool) -> Self {
        self.edit = EditMode::Static(is_edit);
        self
    }

    /// Sets an edit flag computed once, when [`collect`](Self::collect) runs.
    #[must_use]
    pub fn edit_with(mut self, is_edit: impl FnOnce() -> bool + 'static) -> Self {
        self.edit = EditMode::Lazy(Box::new(is_edit));
        self
    }

    /// Builds the field.
    #[must_use]
    pub fn collect(self) -> EntityField {
        let runtime = self.runtime.unwrap_or_default();
        let descriptor = match (self.base, self.domain, self.metadata) {
            (Some(base), None, None) => base,
            (base, domain, metadata) => {
                let mut descriptor = match base {
                    Some(base) => (*base).clone(),
                    None => FieldDescriptor::scalar(self.name.clone(), Domain::default()),
                };
                if let Some(domain) = domain {
                    descriptor.domain = domain;
                }
                if let Some(metadata) = metadata {
                    descriptor = descriptor.with_metadata(&metadata);
                }
                Arc::new(descriptor)
            }
        };
        let descriptor = match self.is_required {
            Some(required) if required != descriptor.is_required => {
                let mut changed = (*descriptor).clone();
                changed.is_required = required;
                Arc::new(changed)
            }
            _ => descriptor,
        };

        let source = self.source.unwrap_or_else(|| {
            FieldSource::Owned(ValueCell::new(&runtime, None, self.name.clone(), self.initial))
        });
        let is_edit = match self.edit {
            EditMode::Static(is_edit) => is_edit,
            EditMode::Lazy(compute) => compute(),
        };

        EntityField::new(descriptor, source, is_edit, runtime)
    }
}

impl fmt::Debug for EntityFieldBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityFieldBuilder")
            .field("name", &self.name)
            .field("source", &self.source)
            .field("domain", &self.domain)
            .finish_non_exhaustive()
    }
}
