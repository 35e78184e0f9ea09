//! NetBox Reconcile: declarative, idempotent NetBox resource management
//!
//! A library for converging NetBox objects (module bays, module types,
//! manufacturers, tags) to a desired state over the REST API, one
//! resource per call, with dry-run support.

pub mod api;
pub mod config;
pub mod desired;
pub mod engine;
pub mod schema;
