//! Domains: reusable bundles of type, validators, formatter, and component bindings.

use std::fmt;
use std::sync::Arc;

use focus_foundation::{LtMap, Type, Value};

/// Free-form component props, keyed by prop name.
pub type Props = LtMap<Arc<str>, Value>;

/// Formats a field value for display. Receives `None` for unset fields.
pub type DisplayFormatter = Arc<dyn Fn(Option<&Value>) -> String + Send + Sync>;

/// Custom validation function. Returns an error message when the value is rejected.
pub type ValidatorFn = Arc<dyn Fn(&Value) -> Option<String> + Send + Sync>;

/// Component names bound to a field for display, label, and input.
///
/// The store never renders anything; these are lookup keys for the UI layer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Components {
    /// Component used in display mode.
    pub display: Option<Arc<str>>,
    /// Component used for the label.
    pub label: Option<Arc<str>>,
    /// Component used in edit mode.
    pub input: Option<Arc<str>>,
}

impl Components {
    /// Returns a copy where every binding set in `other` replaces ours.
    #[must_use]
    pub fn overridden_by(&self, other: &Self) -> Self {
        Self {
            display: other.display.clone().or_else(|| self.display.clone()),
            label: other.label.clone().or_else(|| self.label.clone()),
            input: other.input.clone().or_else(|| self.input.clone()),
        }
    }
}

/// Validation rule attached to a domain.
#[derive(Clone)]
pub enum Validator {
    /// String length bounds (inclusive), counted in characters.
    StringLength {
        /// Minimum length.
        min: Option<usize>,
        /// Maximum length.
        max: Option<usize>,
    },
    /// Numeric bounds (inclusive).
    NumberRange {
        /// Minimum value.
        min: Option<f64>,
        /// Maximum value.
        max: Option<f64>,
    },
    /// Loose email address check.
    Email,
    /// Named custom check.
    Custom {
        /// Name used in debug output.
        name: Arc<str>,
        /// The check itself.
        check: ValidatorFn,
    },
}

impl Validator {
    /// Creates a custom validator.
    pub fn custom(
        name: impl Into<Arc<str>>,
        check: impl Fn(&Value) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        Self::Custom {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    /// Runs the validator, returning an error message on failure.
    ///
    /// Values of a kind the validator does not apply to pass.
    #[must_use]
    pub fn validate(&self, value: &Value) -> Option<String> {
        match self {
            Self::StringLength { min, max } => {
                let len = value.as_str()?.chars().count();
                if let Some(min) = min.filter(|m| len < *m) {
                    return Some(format!("must be at least {min} characters long"));
                }
                if let Some(max) = max.filter(|m| len > *m) {
                    return Some(format!("must be at most {max} characters long"));
                }
                None
            }
            Self::NumberRange { min, max } => {
                let n = value.as_number()?;
                if let Some(min) = min.filter(|m| n < *m) {
                    return Some(format!("must be greater than or equal to {min}"));
                }
                if let Some(max) = max.filter(|m| n > *m) {
                    return Some(format!("must be less than or equal to {max}"));
                }
                None
            }
            Self::Email => {
                let s = value.as_str()?;
                if is_email(s) {
                    None
                } else {
                    Some("must be a valid email address".to_string())
                }
            }
            Self::Custom { check, .. } => check(value),
        }
    }
}

fn is_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, host)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !host.contains('@')
        && host.contains('.')
        && !host.starts_with('.')
        && !host.ends_with('.')
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StringLength { min, max } => f
                .debug_struct("StringLength")
                .field("min", min)
                .field("max", max)
                .finish(),
            Self::NumberRange { min, max } => f
                .debug_struct("NumberRange")
                .field("min", min)
                .field("max", max)
                .finish(),
            Self::Email => write!(f, "Email"),
            Self::Custom { name, .. } => write!(f, "Custom({name})"),
        }
    }
}

/// Reusable field configuration shared by every field declared with it.
#[derive(Clone)]
pub struct Domain {
    /// Domain name.
    pub name: Arc<str>,
    /// Type of the values fields of this domain hold.
    pub ty: Type,
    /// Validators, run in order.
    pub validators: Vec<Validator>,
    /// Default display formatter.
    pub display_formatter: Option<DisplayFormatter>,
    /// Default component bindings.
    pub components: Components,
    /// CSS class hint for the UI layer.
    pub class_name: Option<Arc<str>>,
    /// Default props for the display component.
    pub display_props: Props,
    /// Default props for the label component.
    pub label_props: Props,
    /// Default props for the input component.
    pub input_props: Props,
    /// Default props for the field wrapper.
    pub field_props: Props,
}

impl Domain {
    /// Creates a domain with no validators or bindings.
    pub fn new(name: impl Into<Arc<str>>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            validators: Vec::new(),
            display_formatter: None,
            components: Components::default(),
            class_name: None,
            display_props: Props::new(),
            label_props: Props::new(),
            input_props: Props::new(),
            field_props: Props::new(),
        }
    }

    /// Adds a validator.
    #[must_use]
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
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

    /// Sets the CSS class hint.
    #[must_use]
    pub fn with_class_name(mut self, class_name: impl Into<Arc<str>>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Adds a default display prop.
    #[must_use]
    pub fn with_display_prop(mut self, key: impl Into<Arc<str>>, value: Value) -> Self {
        self.display_props = self.display_props.insert(key.into(), value);
        self
    }

    /// Adds a default label prop.
    #[must_use]
    pub fn with_label_prop(mut self, key: impl Into<Arc<str>>, value: Value) -> Self {
        self.label_props = self.label_props.insert(key.into(), value);
        self
    }

    /// Adds a default input prop.
    #[must_use]
    pub fn with_input_prop(mut self, key: impl Into<Arc<str>>, value: Value) -> Self {
        self.input_props = self.input_props.insert(key.into(), value);
        self
    }

    /// Adds a default field wrapper prop.
    #[must_use]
    pub fn with_field_prop(mut self, key: impl Into<Arc<str>>, value: Value) -> Self {
        self.field_props = self.field_props.insert(key.into(), value);
        self
    }
}

impl Default for Domain {
    fn default() -> Self {
        Self::new("", Type::Any)
    }
}

impl fmt::Debug for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Domain")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("validators", &self.validators)
            .field("has_formatter", &self.display_formatter.is_some())
            .field("components", &self.components)
            .finish_non_exhaustive()
    }
}
