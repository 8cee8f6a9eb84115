//! Focus - Schema-driven observable entity stores
//!
//! This crate re-exports all layers of the Focus system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: focus_store      - Schema, observation runtime, field nodes, store graph
//! Layer 0: focus_foundation - Core types (Value, Type, Error, persistent collections)
//! ```

pub use focus_foundation as foundation;
pub use focus_store as store;
