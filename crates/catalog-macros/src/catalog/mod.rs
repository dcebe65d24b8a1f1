//! Implementation of the `#[derive(Catalog)]` macro.
//!
//! Generates a `FieldAccessor` implementation and field name constants
//! from `#[catalog(...)]` field annotations.

mod attrs;
mod derive;

pub use derive::catalog_derive_impl;
