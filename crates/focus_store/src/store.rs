//! Store construction and the root store handle.

use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use focus_foundation::{Error, ErrorKind, Result, Value};

use crate::flatten::ToFlatValues;
use crate::mutation;
use crate::node::{EntityArray, StoreContext, StoreEntry, StoreNode};
use crate::options::StoreOptions;
use crate::runtime::{ChangeBatch, Runtime, Subscription};
use crate::schema::{Entity, EntityMap};

/// Shape of a store entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryShape {
    /// A single entity.
    Object,
    /// A list of entities.
    List,
}

/// One configured store entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryConfig {
    /// Property name of the entry on the store.
    pub name: Arc<str>,
    /// Name of the entity the entry is built from.
    pub entity: Arc<str>,
    /// Entry shape.
    pub shape: EntryShape,
}

/// Declares the entries of a store, in order.
///
/// ```
/// use focus_store::StoreConfig;
///
/// let config = StoreConfig::new()
///     .object("Person")
///     .object_of("author", "Person")
///     .list("people", "Person");
/// assert_eq!(config.entries().len(), 3);
/// ```
#[derive(Clone, Debug, Default)]
pub struct StoreConfig {
    entries: Vec<EntryConfig>,
}

impl StoreConfig {
    /// Creates an empty config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an object entry named after its entity.
    #[must_use]
    pub fn object(self, entity: impl Into<Arc<str>>) -> Self {
        let entity = entity.into();
        self.entry(entity.clone(), entity, EntryShape::Object)
    }

    /// Adds an object entry whose name differs from its entity.
    #[must_use]
    pub fn object_of(self, name: impl Into<Arc<str>>, entity: impl Into<Arc<str>>) -> Self {
        self.entry(name.into(), entity.into(), EntryShape::Object)
    }

    /// Adds a list entry.
    #[must_use]
    pub fn list(self, name: impl Into<Arc<str>>, entity: impl Into<Arc<str>>) -> Self {
        self.entry(name.into(), entity.into(), EntryShape::List)
    }

    fn entry(mut self, name: Arc<str>, entity: Arc<str>, shape: EntryShape) -> Self {
        self.entries.push(EntryConfig {
            name,
            entity,
            shape,
        });
        self
    }

    /// Returns the configured entries.
    #[must_use]
    pub fn entries(&self) -> &[EntryConfig] {
        &self.entries
    }
}

/// Root of a materialized store: one entry per configured name.
pub struct EntityStore {
    entries: Vec<(Arc<str>, StoreEntry)>,
    ctx: Rc<StoreContext>,
}

impl EntityStore {
    /// Returns an entry by name.
    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&StoreEntry> {
        self.entries
            .iter()
            .find(|(entry, _)| &**entry == name)
            .map(|(_, entry)| entry)
    }

    /// Returns an object entry by name.
    #[must_use]
    pub fn node(&self, name: &str) -> Option<&StoreNode> {
        self.entry(name).and_then(StoreEntry::as_node)
    }

    /// Returns a list entry by name.
    #[must_use]
    pub fn list(&self, name: &str) -> Option<&EntityArray> {
        self.entry(name).and_then(StoreEntry::as_list)
    }

    /// Returns entry names in configuration order.
    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| &**name)
    }

    /// Iterates over `(name, entry)` pairs in configuration order.
    pub fn entries(&self) -> impl Iterator<Item = (&Arc<str>, &StoreEntry)> {
        self.entries.iter().map(|(name, entry)| (name, entry))
    }

    /// Applies plain data to the store, keyed by entry name.
    ///
    /// # Errors
    ///
    /// Returns `StoreReference` for a key that names no entry, or any error
    /// raised while setting an entry.
    pub fn set(&self, value: &Value) -> Result<()> {
        tracing::trace!(shape = value.shape_name(), "set store");
        mutation::set_entries(&self.ctx, &self.entries, value)
    }

    /// Clears every entry.
    pub fn clear(&self) {
        tracing::trace!("clear store");
        self.ctx
            .runtime
            .transaction(|| mutation::clear_entries(&self.entries));
    }

    /// Returns the plain-data projection of every entry.
    #[must_use]
    pub fn to_flat_values(&self) -> Value {
        ToFlatValues::to_flat_values(self)
    }

    /// Returns the runtime the store reports to.
    #[must_use]
    pub fn runtime(&self) -> &Runtime {
        &self.ctx.runtime
    }

    /// Returns the options the store was built with.
    #[must_use]
    pub fn options(&self) -> &StoreOptions {
        &self.ctx.options
    }

    /// Returns the schema the store was built from.
    #[must_use]
    pub fn schema(&self) -> &EntityMap {
        &self.ctx.schema
    }

    /// Registers a change listener on the store's runtime.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl Fn(&ChangeBatch) + 'static) -> Subscription {
        self.ctx.runtime.subscribe(listener)
    }
}

impl fmt::Debug for EntityStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, entry) in &self.entries {
            map.entry(name, entry);
        }
        map.finish()
    }
}

/// Builds a store with a fresh runtime and default options.
///
/// # Errors
///
/// See [`make_entity_store_with`].
pub fn make_entity_store<I, E>(config: &StoreConfig, entities: I) -> Result<EntityStore>
where
    I: IntoIterator<Item = E>,
    E: Into<Arc<Entity>>,
{
    make_entity_store_with(config, entities, &Runtime::new(), StoreOptions::default())
}

/// Builds a store reporting to `runtime`.
///
/// The schema is validated in full before anything is built, and every
/// entry is materialized eagerly: object entries as empty branches, list
/// entries as empty arrays.
///
/// # Errors
///
/// Returns `DuplicateEntry` for a repeated entry name, `SchemaResolution`
/// for an entry naming an unknown entity, or any schema validation error.
pub fn make_entity_store_with<I, E>(
    config: &StoreConfig,
    entities: I,
    runtime: &Runtime,
    options: StoreOptions,
) -> Result<EntityStore>
where
    I: IntoIterator<Item = E>,
    E: Into<Arc<Entity>>,
{
    let schema = EntityMap::new(entities)?;

    let mut names = HashSet::new();
    for entry in config.entries() {
        if !names.insert(entry.name.clone()) {
            return Err(Error::new(ErrorKind::DuplicateEntry(entry.name.to_string())));
        }
        schema.resolve(&entry.name, &entry.entity)?;
    }

    let ctx = Rc::new(StoreContext {
        schema,
        runtime: runtime.clone(),
        options,
    });

    let mut entries = Vec::with_capacity(config.entries().len());
    for entry in config.entries() {
        let entity = ctx.schema.resolve(&entry.name, &entry.entity)?;
        let built = match entry.shape {
            EntryShape::Object => StoreEntry::Node(
                StoreNode::build(&ctx, entity).map_err(|e| e.within(&*entry.name))?,
            ),
            EntryShape::List => {
                StoreEntry::List(EntityArray::build(&ctx, entity, entry.name.clone()))
            }
        };
        entries.push((entry.name.clone(), built));
    }

    tracing::debug!(
        entries = entries.len(),
        entities = ctx.schema.len(),
        "built entity store"
    );

    Ok(EntityStore { entries, ctx })
}
