//! Resource client trait and remote object types.

use std::future::Future;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::schema::{NaturalKey, ResourceKind};

use super::ApiError;

/// An object as currently stored in NetBox.
///
/// Always carries the system-assigned `id`; all other attributes are
/// kept exactly as the API returned them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RemoteObject {
    fields: Map<String, Value>,
}

impl RemoteObject {
    /// Wraps an API object, which must have a non-negative integer `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if `value` is not an object with an id.
    pub fn from_value(value: Value) -> Result<Self, ApiError> {
        let Value::Object(fields) = value else {
            return Err(ApiError::Decode("expected a JSON object".to_string()));
        };

        if fields.get("id").and_then(Value::as_u64).is_none() {
            return Err(ApiError::Decode("object has no integer id".to_string()));
        }

        Ok(Self { fields })
    }

    /// Returns the system-assigned identifier.
    #[must_use]
    pub fn id(&self) -> u64 {
        // Checked in `from_value`.
        self.fields.get("id").and_then(Value::as_u64).unwrap_or_default()
    }

    /// Returns an attribute value.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns all attributes.
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Returns a copy with `changes` written over the current attributes.
    #[must_use]
    pub fn merged(&self, changes: &Map<String, Value>) -> Self {
        let mut fields = self.fields.clone();
        for (k, v) in changes {
            fields.insert(k.clone(), v.clone());
        }
        Self { fields }
    }

    /// Converts into a plain JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

/// Result of a natural-key lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// No object matches.
    Absent,
    /// Exactly one object matches.
    Unique(RemoteObject),
    /// Several objects match; carries how many.
    Ambiguous(usize),
}

impl From<Vec<RemoteObject>> for Lookup {
    fn from(mut matches: Vec<RemoteObject>) -> Self {
        match matches.len() {
            0 => Self::Absent,
            1 => Self::Unique(matches.remove(0)),
            n => Self::Ambiguous(n),
        }
    }
}

/// Result of a delete call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The object was removed.
    Deleted,
    /// The object did not exist (anymore).
    NotFound,
}

/// CRUD surface over NetBox endpoints.
///
/// Endpoints are paths relative to the API root (`dcim/module-bays`).
/// Implementations surface every failure as an [`ApiError`] and never
/// retry.
pub trait ResourceClient: Send + Sync {
    /// Lists every object on `endpoint` matching the query, across all pages.
    fn list(
        &self,
        endpoint: &str,
        query: &[(String, String)],
    ) -> impl Future<Output = Result<Vec<RemoteObject>, ApiError>> + Send;

    /// Looks up an instance of `kind` by its natural key.
    fn find(
        &self,
        kind: &ResourceKind,
        key: &NaturalKey,
    ) -> impl Future<Output = Result<Lookup, ApiError>> + Send {
        async move {
            let matches = self.list(kind.endpoint, &key.query()).await?;
            Ok(Lookup::from(matches))
        }
    }

    /// Creates an object and returns it with its assigned id.
    fn create(
        &self,
        endpoint: &str,
        payload: &Map<String, Value>,
    ) -> impl Future<Output = Result<RemoteObject, ApiError>> + Send;

    /// Partially updates an object; attributes not in `payload` are untouched.
    fn update(
        &self,
        endpoint: &str,
        id: u64,
        payload: &Map<String, Value>,
    ) -> impl Future<Output = Result<RemoteObject, ApiError>> + Send;

    /// Deletes an object.
    fn delete(
        &self,
        endpoint: &str,
        id: u64,
    ) -> impl Future<Output = Result<DeleteOutcome, ApiError>> + Send;
}

impl<T: ResourceClient> ResourceClient for &T {
    fn list(
        &self,
        endpoint: &str,
        query: &[(String, String)],
    ) -> impl Future<Output = Result<Vec<RemoteObject>, ApiError>> + Send {
        (**self).list(endpoint, query)
    }

    fn create(
        &self,
        endpoint: &str,
        payload: &Map<String, Value>,
    ) -> impl Future<Output = Result<RemoteObject, ApiError>> + Send {
        (**self).create(endpoint, payload)
    }

    fn update(
        &self,
        endpoint: &str,
        id: u64,
        payload: &Map<String, Value>,
    ) -> impl Future<Output = Result<RemoteObject, ApiError>> + Send {
        (**self).update(endpoint, id, payload)
    }

    fn delete(
        &self,
        endpoint: &str,
        id: u64,
    ) -> impl Future<Output = Result<DeleteOutcome, ApiError>> + Send {
        (**self).delete(endpoint, id)
    }
}
