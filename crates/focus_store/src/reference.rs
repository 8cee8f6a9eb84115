//! Reference lists: the lookup data select, radio, and autocomplete fields
//! bind to.
//!
//! A [`ReferenceList`] is an immutable list of map items plus the keys that
//! name each item's value and label. A [`ReferenceStore`] holds one list per
//! definition, loads it on first access through a [`ReferenceLoader`], and
//! reports every load to its [`Runtime`] as an array replacement.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use focus_foundation::{Error, ErrorKind, LtVec, Result, Value};

use crate::runtime::{Change, ChangeKind, Runtime};

/// Which item keys hold the value and the label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceDefinition {
    /// Key of the item value. Defaults to `code`.
    pub value_key: Arc<str>,
    /// Key of the item label. Defaults to `label`.
    pub label_key: Arc<str>,
}

impl Default for ReferenceDefinition {
    fn default() -> Self {
        Self {
            value_key: Arc::from("code"),
            label_key: Arc::from("label"),
        }
    }
}

impl ReferenceDefinition {
    /// Creates a definition with explicit keys.
    pub fn new(value_key: impl Into<Arc<str>>, label_key: impl Into<Arc<str>>) -> Self {
        Self {
            value_key: value_key.into(),
            label_key: label_key.into(),
        }
    }
}

/// Immutable list of reference items.
///
/// Cloning is cheap. Filtering keeps the value and label keys.
#[derive(Clone, PartialEq, Eq)]
pub struct ReferenceList {
    items: LtVec<Value>,
    definition: ReferenceDefinition,
}

impl ReferenceList {
    /// Returns the value key.
    #[must_use]
    pub fn value_key(&self) -> &str {
        &self.definition.value_key
    }

    /// Returns the label key.
    #[must_use]
    pub fn label_key(&self) -> &str {
        &self.definition.label_key
    }

    /// Returns the definition the list was built with.
    #[must_use]
    pub fn definition(&self) -> &ReferenceDefinition {
        &self.definition
    }

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the list has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over the items in order.
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.items.iter()
    }

    /// Returns the value of an item.
    #[must_use]
    pub fn value_of<'a>(&self, item: &'a Value) -> Option<&'a Value> {
        item.get(&self.definition.value_key)
    }

    /// Returns the first item whose value equals `value`.
    #[must_use]
    pub fn find(&self, value: &Value) -> Option<&Value> {
        self.items.iter().find(|item| self.value_of(item) == Some(value))
    }

    /// Returns the label of the item whose value equals `value`.
    ///
    /// Non-string labels render through `Display`.
    #[must_use]
    pub fn label_for(&self, value: &Value) -> Option<String> {
        let label = self.find(value)?.get(&self.definition.label_key)?;
        Some(match label {
            Value::String(s) => s.to_string(),
            other => other.to_string(),
        })
    }

    /// Returns the items matching `keep`, with the same keys.
    #[must_use]
    pub fn filter(&self, mut keep: impl FnMut(&Value) -> bool) -> Self {
        Self {
            items: self.items.iter().filter(|item| keep(item)).cloned().collect(),
            definition: self.definition.clone(),
        }
    }
}

impl fmt::Debug for ReferenceList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReferenceList")
            .field("value_key", &self.definition.value_key)
            .field("label_key", &self.definition.label_key)
            .field("items", &self.items)
            .finish()
    }
}

/// Builds a reference list from items.
///
/// ```
/// use focus_foundation::Value;
/// use focus_store::{ReferenceDefinition, make_reference_list};
///
/// let colors = make_reference_list(
///     [Value::map([("id", Value::Int(1)), ("name", Value::from("Red"))])],
///     ReferenceDefinition::new("id", "name"),
/// );
/// assert_eq!(colors.label_for(&Value::Int(1)).as_deref(), Some("Red"));
/// ```
pub fn make_reference_list<I>(items: I, definition: ReferenceDefinition) -> ReferenceList
where
    I: IntoIterator<Item = Value>,
{
    ReferenceList {
        items: items.into_iter().collect(),
        definition,
    }
}

/// An empty list with the default `code` / `label` keys.
#[must_use]
pub fn empty_reference_list() -> ReferenceList {
    make_reference_list(Vec::new(), ReferenceDefinition::default())
}

/// Source of reference items, called with the list name.
pub trait ReferenceLoader {
    /// Loads every item of the named list.
    ///
    /// # Errors
    ///
    /// Returns whatever error the underlying source reports.
    fn load(&self, name: &str) -> Result<Vec<Value>>;
}

impl<F> ReferenceLoader for F
where
    F: Fn(&str) -> Result<Vec<Value>>,
{
    fn load(&self, name: &str) -> Result<Vec<Value>> {
        self(name)
    }
}

/// Lazily loaded reference lists, keyed by name.
pub struct ReferenceStore {
    loader: Box<dyn ReferenceLoader>,
    definitions: Vec<(Arc<str>, ReferenceDefinition)>,
    cache: RefCell<HashMap<Arc<str>, ReferenceList>>,
    runtime: Runtime,
}

impl ReferenceStore {
    /// Returns the list, loading it on first access.
    ///
    /// # Errors
    ///
    /// Returns `UnknownReference` for a name without a definition, or the
    /// loader's error.
    pub fn get(&self, name: &str) -> Result<ReferenceList> {
        if let Some(list) = self.cache.borrow().get(name) {
            return Ok(list.clone());
        }
        self.load(name)
    }

    /// Loads the list again, replacing any cached copy.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get). On error the cached copy is kept.
    pub fn reload(&self, name: &str) -> Result<ReferenceList> {
        self.load(name)
    }

    /// Drops the cached copy of one list; the next `get` loads it again.
    pub fn invalidate(&self, name: &str) {
        self.cache.borrow_mut().remove(name);
    }

    /// Drops every cached list.
    pub fn invalidate_all(&self) {
        self.cache.borrow_mut().clear();
    }

    /// Returns true if the list is cached.
    #[must_use]
    pub fn is_loaded(&self, name: &str) -> bool {
        self.cache.borrow().contains_key(name)
    }

    /// Returns the defined list names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().map(|(name, _)| &**name)
    }

    /// Returns the label of `value` in the named list.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    pub fn label_for(&self, name: &str, value: &Value) -> Result<Option<String>> {
        Ok(self.get(name)?.label_for(value))
    }

    /// Returns the runtime loads are reported to.
    #[must_use]
    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    fn load(&self, name: &str) -> Result<ReferenceList> {
        let (key, definition) = self
            .definitions
            .iter()
            .find(|(defined, _)| &**defined == name)
            .ok_or_else(|| Error::unknown_reference(name))?;

        let items = self
            .loader
            .load(name)
            .map_err(|e| e.within(name).during("load"))?;
        let list = make_reference_list(items, definition.clone());
        tracing::debug!(reference = name, items = list.len(), "loaded reference list");

        self.cache.borrow_mut().insert(key.clone(), list.clone());
        self.runtime.record(Change {
            entity: None,
            field: key.clone(),
            kind: ChangeKind::Replace { len: list.len() },
        });
        Ok(list)
    }
}

impl fmt::Debug for ReferenceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut loaded: Vec<_> = self.cache.borrow().keys().cloned().collect();
        loaded.sort();
        f.debug_struct("ReferenceStore")
            .field("names", &self.names().collect::<Vec<_>>())
            .field("loaded", &loaded)
            .finish()
    }
}

/// Builds a reference store over `loader`.
///
/// Nothing is loaded until a list is first requested.
///
/// # Errors
///
/// Returns `DuplicateEntry` when two definitions share a name.
pub fn make_reference_store<L, I, N>(
    loader: L,
    definitions: I,
    runtime: &Runtime,
) -> Result<ReferenceStore>
where
    L: ReferenceLoader + 'static,
    I: IntoIterator<Item = (N, ReferenceDefinition)>,
    N: Into<Arc<str>>,
{
    let mut seen: Vec<(Arc<str>, ReferenceDefinition)> = Vec::new();
    for (name, definition) in definitions {
        let name = name.into();
        if seen.iter().any(|(existing, _)| *existing == name) {
            return Err(Error::new(ErrorKind::DuplicateEntry(name.to_string())));
        }
        seen.push((name, definition));
    }

    Ok(ReferenceStore {
        loader: Box::new(loader),
        definitions: seen,
        cache: RefCell::new(HashMap::new()),
        runtime: runtime.clone(),
    })
}
