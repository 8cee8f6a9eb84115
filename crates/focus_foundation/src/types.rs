//! Domain type tags for scalar field values.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Type tag carried by a domain.
///
/// Mirrors the four primitive kinds a form field can hold, plus `Null`
/// (the type of [`Value::Null`](crate::Value::Null)) and `Any`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Type {
    /// The type of the null value.
    Null,
    /// Boolean type.
    Boolean,
    /// Integer or floating point number.
    Number,
    /// String type.
    String,
    /// Structured value (list or map) stored whole in a single field.
    Object,
    /// Any type (accepts any value).
    Any,
}

impl Type {
    /// Returns true if this type is `Any`.
    #[must_use]
    pub const fn is_any(self) -> bool {
        matches!(self, Self::Any)
    }

    /// Checks if a value type is accepted by this type.
    ///
    /// Every field is nullable, so `Null` is accepted everywhere.
    #[must_use]
    pub const fn accepts(self, value_type: Type) -> bool {
        match (self, value_type) {
            (Self::Any, _)
            | (_, Self::Null)
            | (Self::Boolean, Self::Boolean)
            | (Self::Number, Self::Number)
            | (Self::String, Self::String)
            | (Self::Object, Self::Object) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean => write!(f, "boolean"),
            Self::Number => write!(f, "number"),
            Self::String => write!(f, "string"),
            Self::Object => write!(f, "object"),
            Self::Any => write!(f, "any"),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
