//! Store options.

/// How `set` behaves when part of its input is rejected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SetPolicy {
    /// Validate the whole input first; on error nothing is written.
    #[default]
    Atomic,
    /// Write keys in order and stop at the first error. Writes made before
    /// the error are kept.
    Partial,
}

/// Behavior switches for a store.
#[derive(Clone, Debug)]
pub struct StoreOptions {
    /// Failure behavior of `set`.
    pub set_policy: SetPolicy,
    /// Reject scalar values whose type the field's domain does not accept.
    pub check_types: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            set_policy: SetPolicy::Atomic,
            check_types: true,
        }
    }
}

impl StoreOptions {
    /// Options that keep earlier writes when `set` fails midway.
    #[must_use]
    pub fn partial() -> Self {
        Self {
            set_policy: SetPolicy::Partial,
            ..Self::default()
        }
    }

    /// Options that accept any scalar value regardless of domain type.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            check_types: false,
            ..Self::default()
        }
    }

    /// Builder method to set the set policy.
    #[must_use]
    pub fn with_set_policy(mut self, policy: SetPolicy) -> Self {
        self.set_policy = policy;
        self
    }

    /// Builder method to enable/disable scalar type checks.
    #[must_use]
    pub fn with_check_types(mut self, check: bool) -> Self {
        self.check_types = check;
        self
    }
}
