//! Plain values, type tags, errors, and persistent collections for Focus stores.
//!
//! This crate provides:
//! - [`Value`] - Plain data pushed into and flattened out of entity stores
//! - [`Type`] - Domain type tags used to check scalar field values
//! - [`Error`] - Rich error types with context
//! - Persistent collections ([`LtVec`], [`LtMap`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collections;
pub mod error;
pub mod types;
pub mod value;

pub use collections::{LtMap, LtVec};
pub use error::{Error, ErrorContext, ErrorKind};
pub use types::Type;
pub use value::Value;

/// Result type used across all Focus crates.
pub type Result<T> = std::result::Result<T, Error>;
