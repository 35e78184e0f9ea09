//! In-memory NetBox used by engine tests.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use serde_json::{Map, Value};

use super::{ApiError, DeleteOutcome, HttpError, RemoteObject, ResourceClient};

/// A write that reached the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Write {
    Create {
        endpoint: String,
        payload: Map<String, Value>,
    },
    Update {
        endpoint: String,
        id: u64,
        payload: Map<String, Value>,
    },
    Delete {
        endpoint: String,
        id: u64,
    },
}

/// Failure injected into the next matching call.
#[derive(Debug, Clone)]
pub enum Failure {
    Auth,
    Timeout,
    Rejected(String),
}

impl Failure {
    fn into_error(self) -> ApiError {
        match self {
            Self::Auth => ApiError::Auth {
                status: http::StatusCode::FORBIDDEN,
            },
            Self::Timeout => ApiError::Transport(HttpError::Timeout),
            Self::Rejected(detail) => ApiError::Rejected {
                status: http::StatusCode::BAD_REQUEST,
                detail,
            },
        }
    }
}

/// Endpoint-keyed object store with NetBox-like filtering.
///
/// Reference attributes are stored as plain ids and match `<field>_id`
/// query parameters; other attributes match by their text form.
#[derive(Debug)]
pub struct FakeNetbox {
    objects: Mutex<BTreeMap<String, Vec<Map<String, Value>>>>,
    writes: Mutex<Vec<Write>>,
    next_id: AtomicU64,
    reads: AtomicUsize,
    fail_reads: Mutex<Option<Failure>>,
    fail_writes: Mutex<Option<Failure>>,
}

impl Default for FakeNetbox {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeNetbox {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(BTreeMap::new()),
            writes: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            reads: AtomicUsize::new(0),
            fail_reads: Mutex::new(None),
            fail_writes: Mutex::new(None),
        }
    }

    /// Stores an object directly, bypassing write recording. Returns its id.
    pub fn seed(&self, endpoint: &str, object: Value) -> u64 {
        let Value::Object(mut fields) = object else {
            panic!("seed object must be a JSON object");
        };
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        fields.insert("id".to_string(), Value::from(id));
        self.objects
            .lock()
            .unwrap()
            .entry(endpoint.to_string())
            .or_default()
            .push(fields);
        id
    }

    pub fn objects(&self, endpoint: &str) -> Vec<Map<String, Value>> {
        self.objects
            .lock()
            .unwrap()
            .get(endpoint)
            .cloned()
            .unwrap_or_default()
    }

    pub fn object(&self, endpoint: &str, id: u64) -> Option<Map<String, Value>> {
        self.objects(endpoint)
            .into_iter()
            .find(|o| o.get("id").and_then(Value::as_u64) == Some(id))
    }

    pub fn writes(&self) -> Vec<Write> {
        self.writes.lock().unwrap().clone()
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn fail_next_read(&self, failure: Failure) {
        *self.fail_reads.lock().unwrap() = Some(failure);
    }

    pub fn fail_next_write(&self, failure: Failure) {
        *self.fail_writes.lock().unwrap() = Some(failure);
    }

    fn take_write_failure(&self) -> Result<(), ApiError> {
        match self.fail_writes.lock().unwrap().take() {
            Some(failure) => Err(failure.into_error()),
            None => Ok(()),
        }
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn id_of(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.get("id").and_then(Value::as_u64))
}

fn matches(object: &Map<String, Value>, param: &str, expected: &str) -> bool {
    if let Some(base) = param.strip_suffix("_id") {
        if let Some(value) = object.get(base) {
            return match value {
                Value::Array(items) => items
                    .iter()
                    .filter_map(id_of)
                    .any(|id| id.to_string() == expected),
                other => id_of(other).is_some_and(|id| id.to_string() == expected),
            };
        }
    }

    object
        .get(param)
        .is_some_and(|value| text_of(value) == expected)
}

impl ResourceClient for FakeNetbox {
    async fn list(
        &self,
        endpoint: &str,
        query: &[(String, String)],
    ) -> Result<Vec<RemoteObject>, ApiError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = self.fail_reads.lock().unwrap().take() {
            return Err(failure.into_error());
        }

        self.objects(endpoint)
            .into_iter()
            .filter(|o| query.iter().all(|(k, v)| matches(o, k, v)))
            .map(|o| RemoteObject::from_value(Value::Object(o)))
            .collect()
    }

    async fn create(
        &self,
        endpoint: &str,
        payload: &Map<String, Value>,
    ) -> Result<RemoteObject, ApiError> {
        self.writes.lock().unwrap().push(Write::Create {
            endpoint: endpoint.to_string(),
            payload: payload.clone(),
        });
        self.take_write_failure()?;

        let id = self.seed(endpoint, Value::Object(payload.clone()));
        let stored = self.object(endpoint, id).unwrap_or_default();
        RemoteObject::from_value(Value::Object(stored))
    }

    async fn update(
        &self,
        endpoint: &str,
        id: u64,
        payload: &Map<String, Value>,
    ) -> Result<RemoteObject, ApiError> {
        self.writes.lock().unwrap().push(Write::Update {
            endpoint: endpoint.to_string(),
            id,
            payload: payload.clone(),
        });
        self.take_write_failure()?;

        let mut objects = self.objects.lock().unwrap();
        let object = objects
            .get_mut(endpoint)
            .and_then(|list| {
                list.iter_mut()
                    .find(|o| o.get("id").and_then(Value::as_u64) == Some(id))
            })
            .ok_or_else(|| ApiError::Rejected {
                status: http::StatusCode::NOT_FOUND,
                detail: "Not found.".to_string(),
            })?;

        for (k, v) in payload {
            object.insert(k.clone(), v.clone());
        }
        RemoteObject::from_value(Value::Object(object.clone()))
    }

    async fn delete(&self, endpoint: &str, id: u64) -> Result<DeleteOutcome, ApiError> {
        self.writes.lock().unwrap().push(Write::Delete {
            endpoint: endpoint.to_string(),
            id,
        });
        self.take_write_failure()?;

        let mut objects = self.objects.lock().unwrap();
        let Some(list) = objects.get_mut(endpoint) else {
            return Ok(DeleteOutcome::NotFound);
        };
        let before = list.len();
        list.retain(|o| o.get("id").and_then(Value::as_u64) != Some(id));

        if list.len() < before {
            Ok(DeleteOutcome::Deleted)
        } else {
            Ok(DeleteOutcome::NotFound)
        }
    }
}
