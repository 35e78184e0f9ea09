//! Resource kind schemas.
//!
//! Every manageable NetBox object type is described as data:
//! - Field specs ([`FieldSpec`], [`FieldKind`], [`FieldDefault`])
//! - Kind definitions with natural keys ([`ResourceKind`], [`NaturalKey`])
//! - The kind table ([`KindRegistry`])

pub mod builtin;
mod field;
mod kind;
mod registry;

#[cfg(test)]
mod schema_tests;

pub use field::{FieldDefault, FieldKind, FieldSpec, slugify};
pub use kind::{KeyPart, NaturalKey, ResourceKind};
pub use registry::KindRegistry;
