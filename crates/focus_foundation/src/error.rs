//! Error types for Focus stores.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::types::Type;

/// The main error type for Focus operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a schema resolution error for a config entry.
    #[must_use]
    pub fn schema_resolution(entry: impl Into<String>, entity: impl Into<String>) -> Self {
        Self::new(ErrorKind::SchemaResolution {
            entry: entry.into(),
            entity: entity.into(),
        })
    }

    /// Creates a missing nested entity error.
    #[must_use]
    pub fn missing_dependency(entity: impl Into<String>, dependency: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingDependency {
            entity: entity.into(),
            dependency: dependency.into(),
        })
    }

    /// Creates an unknown property error.
    #[must_use]
    pub fn unknown_property(entry: impl Into<String>, property: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownProperty {
            entry: entry.into(),
            property: property.into(),
        })
    }

    /// Creates a store reference error.
    #[must_use]
    pub fn store_reference(entry: impl Into<String>) -> Self {
        Self::new(ErrorKind::StoreReference {
            entry: entry.into(),
        })
    }

    /// Creates a shape mismatch error.
    #[must_use]
    pub fn shape_mismatch(
        entry: impl Into<String>,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::new(ErrorKind::ShapeMismatch {
            entry: entry.into(),
            expected,
            actual,
        })
    }

    /// Creates a type mismatch error for a field.
    #[must_use]
    pub fn type_mismatch(field: impl Into<String>, expected: Type, actual: Type) -> Self {
        Self::new(ErrorKind::TypeMismatch {
            field: field.into(),
            expected,
            actual,
        })
    }

    /// Creates a read-only field error.
    #[must_use]
    pub fn read_only(field: impl Into<String>) -> Self {
        Self::new(ErrorKind::ReadOnlyField {
            field: field.into(),
        })
    }

    /// Creates an unknown reference list error.
    #[must_use]
    pub fn unknown_reference(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownReference { name: name.into() })
    }

    /// Creates a reference load error, for loaders to report failures.
    #[must_use]
    pub fn reference_load(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ReferenceLoad {
            name: name.into(),
            message: message.into(),
        })
    }

    /// Records the operation that failed, keeping any path already recorded.
    #[must_use]
    pub fn during(mut self, operation: &'static str) -> Self {
        let ctx = self.context.take().unwrap_or_default().with_operation(operation);
        self.context = Some(ctx);
        self
    }

    /// Prepends a path segment, used while unwinding out of nested nodes.
    #[must_use]
    pub fn within(mut self, segment: impl Into<String>) -> Self {
        let ctx = self.context.take().unwrap_or_default().with_parent(segment);
        self.context = Some(ctx);
        self
    }

    /// Returns the dotted path recorded in the context, if any.
    #[must_use]
    pub fn path(&self) -> Option<String> {
        self.context
            .as_ref()
            .filter(|ctx| !ctx.path.is_empty())
            .map(ErrorContext::dotted_path)
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A config entry names an entity absent from the entity list.
    #[error("entry \"{entry}\" refers to entity \"{entity}\", which is not in the entity list")]
    SchemaResolution {
        /// The config entry.
        entry: String,
        /// The entity name that could not be resolved.
        entity: String,
    },

    /// A field references a nested entity absent from the entity list.
    #[error("entity \"{entity}\" depends on entity \"{dependency}\", which is not in the entity list")]
    MissingDependency {
        /// The entity declaring the field.
        entity: String,
        /// The nested entity name that could not be resolved.
        dependency: String,
    },

    /// Object-typed nesting loops back on itself.
    #[error("entity nesting is recursive: {path}")]
    RecursiveEntity {
        /// The chain of entity names forming the cycle.
        path: String,
    },

    /// `set` received a key that is not a field of the target.
    #[error("\"{entry}\" has no property \"{property}\"")]
    UnknownProperty {
        /// The node being written.
        entry: String,
        /// The offending key.
        property: String,
    },

    /// `set` on a store named an entry the store does not have.
    #[error("\"{entry}\" does not exist in this store")]
    StoreReference {
        /// The offending entry name.
        entry: String,
    },

    /// Input shape does not match the node shape.
    #[error("\"{entry}\" expects a {expected}, got a {actual}")]
    ShapeMismatch {
        /// The node being written.
        entry: String,
        /// Expected input shape.
        expected: &'static str,
        /// Actual input shape.
        actual: &'static str,
    },

    /// Scalar value not accepted by the field's domain type.
    #[error("type mismatch on \"{field}\": expected {expected}, got {actual}")]
    TypeMismatch {
        /// The field being written.
        field: String,
        /// The domain type.
        expected: Type,
        /// The type of the rejected value.
        actual: Type,
    },

    /// Write to a field that has no setter.
    #[error("field \"{field}\" is read-only")]
    ReadOnlyField {
        /// The field name.
        field: String,
    },

    /// A reference store was asked for a list it has no definition for.
    #[error("reference list \"{name}\" is not defined")]
    UnknownReference {
        /// The requested list name.
        name: String,
    },

    /// A reference loader failed.
    #[error("could not load reference list \"{name}\": {message}")]
    ReferenceLoad {
        /// The list being loaded.
        name: String,
        /// What went wrong.
        message: String,
    },

    /// Two config entries share a name.
    #[error("duplicate store entry: {0}")]
    DuplicateEntry(String),

    /// Two entities in the entity list share a name.
    #[error("duplicate entity: {0}")]
    DuplicateEntity(String),

    /// An entity declares the same field twice.
    #[error("duplicate field \"{field}\" on entity \"{entity}\"")]
    DuplicateField {
        /// The entity name.
        entity: String,
        /// The repeated field name.
        field: String,
    },
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation that failed (`set`, `build`, ...).
    pub operation: Option<&'static str>,
    /// Path of node names from the store root to the failing node.
    pub path: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the operation name.
    #[must_use]
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        self.operation = Some(operation);
        self
    }

    /// Appends a path segment.
    #[must_use]
    pub fn with_segment(mut self, segment: impl Into<String>) -> Self {
        self.path.push(segment.into());
        self
    }

    /// Prepends a path segment.
    #[must_use]
    pub fn with_parent(mut self, segment: impl Into<String>) -> Self {
        self.path.insert(0, segment.into());
        self
    }

    /// Returns the path joined with dots.
    #[must_use]
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(op) = self.operation {
            write!(f, "in {op}")?;
        }
        if !self.path.is_empty() {
            if self.operation.is_some() {
                write!(f, " ")?;
            }
            write!(f, "at {}", self.dotted_path())?;
        }
        Ok(())
    }
}
