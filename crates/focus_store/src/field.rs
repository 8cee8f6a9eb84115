//! Field nodes: one live value plus its field metadata.
//!
//! Where the value lives is explicit in [`FieldSource`]: a field either owns
//! its [`ValueCell`], shares one with another field, goes through a bound
//! accessor pair, or holds a read-only snapshot.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use focus_foundation::{Error, Result, Value};

use crate::runtime::{Change, ChangeKind, Runtime};
use crate::schema::FieldDescriptor;

struct CellInner {
    value: RefCell<Option<Value>>,
    runtime: Runtime,
    entity: Option<Arc<str>>,
    field: Arc<str>,
}

/// Observable storage for one optional value.
///
/// `None` means the value is unset. Writes go through the runtime's
/// transaction primitive and are recorded only when the value changes.
#[derive(Clone)]
pub struct ValueCell(Rc<CellInner>);

impl ValueCell {
    /// Creates a cell reporting changes to `runtime`.
    pub fn new(
        runtime: &Runtime,
        entity: Option<Arc<str>>,
        field: impl Into<Arc<str>>,
        initial: Option<Value>,
    ) -> Self {
        Self(Rc::new(CellInner {
            value: RefCell::new(initial),
            runtime: runtime.clone(),
            entity,
            field: field.into(),
        }))
    }

    /// Returns the current value.
    #[must_use]
    pub fn get(&self) -> Option<Value> {
        self.0.value.borrow().clone()
    }

    /// Returns true if the cell is unset.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.0.value.borrow().is_none()
    }

    /// Writes a value.
    pub fn set(&self, value: Option<Value>) {
        let changed = {
            let mut slot = self.0.value.borrow_mut();
            if *slot == value {
                false
            } else {
                *slot = value;
                true
            }
        };
        if changed {
            let runtime = &self.0.runtime;
            runtime.transaction(|| {
                runtime.record(Change {
                    entity: self.0.entity.clone(),
                    field: self.0.field.clone(),
                    kind: ChangeKind::Value,
                });
            });
        }
    }

    /// Returns the runtime this cell reports to.
    #[must_use]
    pub fn runtime(&self) -> &Runtime {
        &self.0.runtime
    }

    /// Returns true if both handles refer to the same storage.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ValueCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ValueCell").field(&self.get()).finish()
    }
}

/// Getter/setter pair bound with [`EntityFieldBuilder::value`](crate::EntityFieldBuilder::value).
#[derive(Clone)]
pub struct Accessor {
    get: Rc<dyn Fn() -> Option<Value>>,
    set: Option<Rc<dyn Fn(Option<Value>)>>,
}

impl Accessor {
    /// Creates a read-write accessor.
    pub fn new(
        get: impl Fn() -> Option<Value> + 'static,
        set: impl Fn(Option<Value>) + 'static,
    ) -> Self {
        Self {
            get: Rc::new(get),
            set: Some(Rc::new(set)),
        }
    }

    /// Creates a read-only accessor.
    pub fn read_only(get: impl Fn() -> Option<Value> + 'static) -> Self {
        Self {
            get: Rc::new(get),
            set: None,
        }
    }
}

/// Where a field's value lives.
#[derive(Clone)]
pub enum FieldSource {
    /// The field owns its cell.
    Owned(ValueCell),
    /// The cell belongs to another field; reads and writes alias it.
    Shared(ValueCell),
    /// Reads and writes go through a bound accessor pair.
    Accessor(Accessor),
    /// Read-only copy taken when the field was built.
    Snapshot(Option<Value>),
}

impl FieldSource {
    fn read(&self) -> Option<Value> {
        match self {
            Self::Owned(cell) | Self::Shared(cell) => cell.get(),
            Self::Accessor(accessor) => (accessor.get)(),
            Self::Snapshot(value) => value.clone(),
        }
    }

    /// Returns true if the source accepts writes.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        match self {
            Self::Owned(_) | Self::Shared(_) => true,
            Self::Accessor(accessor) => accessor.set.is_some(),
            Self::Snapshot(_) => false,
        }
    }

    /// Returns a source reading and writing the same storage as this one.
    #[must_use]
    pub fn share(&self) -> Self {
        match self {
            Self::Owned(cell) | Self::Shared(cell) => Self::Shared(cell.clone()),
            other => other.clone(),
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Self::Owned(_) => "owned",
            Self::Shared(_) => "shared",
            Self::Accessor(_) => "accessor",
            Self::Snapshot(_) => "snapshot",
        }
    }
}

impl fmt::Debug for FieldSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.kind_name(), self.read())
    }
}

/// Live field node: a value plus its `$field` descriptor and edit flag.
pub struct EntityField {
    field: Arc<FieldDescriptor>,
    source: FieldSource,
    is_edit: Cell<bool>,
    check_types: bool,
    runtime: Runtime,
}

impl EntityField {
    pub(crate) fn new(
        field: Arc<FieldDescriptor>,
        source: FieldSource,
        is_edit: bool,
        runtime: Runtime,
    ) -> Self {
        Self {
            field,
            source,
            is_edit: Cell::new(is_edit),
            check_types: true,
            runtime,
        }
    }

    /// Turns the domain type check in [`set_value`](Self::set_value) on or off.
    #[must_use]
    pub(crate) fn with_type_checks(mut self, check_types: bool) -> Self {
        self.check_types = check_types;
        self
    }

    /// Creates the owned, initially unset field a store builds for a scalar.
    ///
    /// `check_types` follows the store's options, so direct writes accept the
    /// same values a store-level `set` does.
    pub(crate) fn for_store(
        runtime: &Runtime,
        entity: &Arc<str>,
        field: &Arc<FieldDescriptor>,
        check_types: bool,
    ) -> Self {
        let cell = ValueCell::new(runtime, Some(entity.clone()), field.name.clone(), None);
        Self::new(field.clone(), FieldSource::Owned(cell), false, runtime.clone())
            .with_type_checks(check_types)
    }

    /// Returns the field descriptor (`$field`).
    #[must_use]
    pub fn descriptor(&self) -> &Arc<FieldDescriptor> {
        &self.field
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.field.name
    }

    /// Returns the current value, `None` when unset.
    #[must_use]
    pub fn value(&self) -> Option<Value> {
        self.source.read()
    }

    /// Writes the value through the field's source.
    ///
    /// # Errors
    ///
    /// Returns `ReadOnlyField` if the source has no setter, or `TypeMismatch`
    /// if the domain type does not accept the value. Fields of a store built
    /// with `check_types` off skip the type check.
    pub fn set_value(&self, value: impl Into<Option<Value>>) -> Result<()> {
        let value = value.into();
        if let Some(v) = value.as_ref().filter(|_| self.check_types) {
            self.check_type(v)?;
        }
        self.write(value)
    }

    /// Unsets the value. Already unset fields are left alone.
    ///
    /// # Errors
    ///
    /// Returns `ReadOnlyField` if the field holds a value and cannot be written.
    pub fn clear(&self) -> Result<()> {
        if self.value().is_none() {
            return Ok(());
        }
        self.write(None)
    }

    pub(crate) fn check_type(&self, value: &Value) -> Result<()> {
        let expected = self.field.ty();
        let actual = value.value_type();
        if expected.accepts(actual) {
            Ok(())
        } else {
            Err(Error::type_mismatch(&*self.field.name, expected, actual))
        }
    }

    pub(crate) fn write(&self, value: Option<Value>) -> Result<()> {
        match &self.source {
            FieldSource::Owned(cell) | FieldSource::Shared(cell) => {
                cell.set(value);
                Ok(())
            }
            FieldSource::Accessor(Accessor { set: Some(set), .. }) => {
                self.runtime.transaction(|| set(value));
                Ok(())
            }
            FieldSource::Accessor(Accessor { set: None, .. }) | FieldSource::Snapshot(_) => {
                Err(Error::read_only(&*self.field.name))
            }
        }
    }

    /// Returns true if the field is in edit mode.
    #[must_use]
    pub fn is_edit(&self) -> bool {
        self.is_edit.get()
    }

    /// Switches edit mode.
    pub fn set_edit(&self, is_edit: bool) {
        self.is_edit.set(is_edit);
    }

    /// Returns true if `set_value` checks values against the domain type.
    #[must_use]
    pub fn checks_types(&self) -> bool {
        self.check_types
    }

    /// Returns true if the value can be written.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.source.is_writable()
    }

    /// Returns true if the value storage belongs to another field.
    #[must_use]
    pub fn is_alias(&self) -> bool {
        matches!(self.source, FieldSource::Shared(_))
    }

    /// Returns where the value lives.
    #[must_use]
    pub fn source(&self) -> &FieldSource {
        &self.source
    }

    /// Returns the runtime writes are reported to.
    #[must_use]
    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Returns the current validation error, if any.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        validate_field(self)
    }

    /// Returns the display string for the current value.
    #[must_use]
    pub fn display(&self) -> String {
        string_for(self)
    }
}

impl fmt::Debug for EntityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityField")
            .field("name", &self.field.name)
            .field("source", &self.source)
            .field("is_edit", &self.is_edit.get())
            .field("check_types", &self.check_types)
            .finish()
    }
}

/// Validates a field's current value.
///
/// A required field fails when unset, null, or an empty string. Otherwise the
/// domain validators run in order and the first message wins. Unset optional
/// fields are always valid.
#[must_use]
pub fn validate_field(field: &EntityField) -> Option<String> {
    let value = field.value();
    let descriptor = field.descriptor();

    let missing = match &value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    };
    if missing {
        return descriptor
            .is_required
            .then(|| "required field".to_string());
    }

    let value = value?;
    descriptor
        .validators()
        .iter()
        .find_map(|validator| validator.validate(&value))
}

/// Formats a field's current value for display.
///
/// Uses the resolved display formatter when there is one; otherwise unset
/// values render as an empty string and others through `Display`.
#[must_use]
pub fn string_for(field: &EntityField) -> String {
    let value = field.value();
    match field.descriptor().display_formatter() {
        Some(formatter) => formatter(value.as_ref()),
        None => value.map(|v| v.to_string()).unwrap_or_default(),
    }
}
