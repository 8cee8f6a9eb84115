//! Observable entity stores for Focus.
//!
//! This crate provides:
//! - [`Entity`] / [`FieldDescriptor`] / [`Domain`] - Declarative schema
//! - [`Runtime`] - Transactional writes and change notification
//! - [`EntityField`] / [`EntityFieldBuilder`] - Live field nodes
//! - [`EntityStore`] / [`StoreNode`] / [`EntityArray`] - The materialized store graph
//! - [`ToFlatValues`] - Projection of the graph back to plain data
//! - [`ReferenceList`] / [`ReferenceStore`] - Lookup lists for select-style fields

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod builder;
pub mod domain;
pub mod factory;
pub mod field;
pub mod flatten;
mod mutation;
pub mod node;
pub mod options;
pub mod reference;
pub mod runtime;
pub mod schema;
pub mod store;

pub use builder::EntityFieldBuilder;
pub use domain::{Components, DisplayFormatter, Domain, Props, Validator};
pub use factory::{
    ReadOnlyFieldOptions, clone_field, from_field, make_editable_field, make_read_only_field,
};
pub use field::{Accessor, EntityField, FieldSource, ValueCell, string_for, validate_field};
pub use flatten::{ToFlatValues, to_flat_values};
pub use node::{EntityArray, FieldNode, StoreEntry, StoreNode};
pub use options::{SetPolicy, StoreOptions};
pub use reference::{
    ReferenceDefinition, ReferenceList, ReferenceLoader, ReferenceStore, empty_reference_list,
    make_reference_list, make_reference_store,
};
pub use runtime::{Change, ChangeBatch, ChangeKind, Runtime, Subscription};
pub use schema::{Entity, EntityMap, FieldDescriptor, FieldType, Metadata};
pub use store::{
    EntityStore, EntryConfig, EntryShape, StoreConfig, make_entity_store, make_entity_store_with,
};
