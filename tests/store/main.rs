//! Integration tests for Layer 1: Store
//!
//! Tests for store construction, the set/clear protocol, flattening, field
//! factories, reference lists, and change notification.

mod common;
mod construction;
mod mutation;
mod reference;
mod runtime;
