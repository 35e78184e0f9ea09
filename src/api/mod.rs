//! NetBox API access.
//!
//! This module provides types and traits for:
//! - Building HTTP requests ([`HttpRequest`]) and reading responses ([`HttpResponse`])
//! - Abstracting HTTP clients ([`HttpClient`]) with a reqwest implementation ([`ReqwestClient`])
//! - CRUD over NetBox endpoints ([`ResourceClient`], [`NetboxClient`])

mod client;
mod error;
mod http;
mod netbox;
mod resource;

#[cfg(test)]
pub(crate) mod fake;

#[cfg(test)]
mod resource_tests;

pub use client::ReqwestClient;
pub use error::{ApiError, HttpError};
pub use self::http::{HttpClient, HttpRequest, HttpResponse};
pub use netbox::NetboxClient;
pub use resource::{DeleteOutcome, Lookup, RemoteObject, ResourceClient};
