//! The reconciliation state machine.
//!
//! One call walks `Start → Resolved → Looked Up → Diffed → Executed →
//! Reported` and issues at most one write. Every stage either hands its
//! result to the next or ends the call with a [`ReconcileError`].

use serde_json::{Map, Value};

use crate::api::{ApiError, DeleteOutcome, Lookup, RemoteObject, ResourceClient};
use crate::desired::{DesiredState, RequestedState};
use crate::schema::{KindRegistry, NaturalKey, ResourceKind};

use super::diff::{Diff, diff};
use super::normalize::{CanonicalState, normalize_remote, to_payload, with_defaults};
use super::outcome::{Action, Outcome, StateDiff};
use super::resolve::Resolver;
use super::ReconcileError;

/// Input of one reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileRequest {
    /// Registered kind name
    pub kind: String,
    /// Target field values
    pub data: DesiredState,
    /// Whether the object should exist
    pub state: RequestedState,
    /// Plan only, never write
    pub dry_run: bool,
    /// Fields used for the lookup instead of the kind's natural key
    pub query_params: Vec<String>,
}

impl ReconcileRequest {
    /// Creates a `present`, live-run request using the natural key.
    #[must_use]
    pub fn new(kind: impl Into<String>, data: DesiredState) -> Self {
        Self {
            kind: kind.into(),
            data,
            state: RequestedState::Present,
            dry_run: false,
            query_params: Vec::new(),
        }
    }

    /// Sets the requested state.
    #[must_use]
    pub const fn with_state(mut self, state: RequestedState) -> Self {
        self.state = state;
        self
    }

    /// Enables or disables dry-run.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Overrides the lookup fields.
    #[must_use]
    pub fn with_query_params(mut self, fields: Vec<String>) -> Self {
        self.query_params = fields;
        self
    }
}

/// Planned action, decided after the lookup.
#[derive(Debug)]
enum Plan {
    AlreadyAbsent,
    Unchanged(RemoteObject),
    Create(Map<String, Value>),
    Update { current: RemoteObject, diff: Diff },
    Delete(RemoteObject),
}

/// Converges one NetBox object per call to a desired state.
///
/// Holds no per-call state; concurrent calls on one reconciler are
/// independent apart from the remote objects they touch.
///
/// # Type Parameters
///
/// - `C`: The resource client implementation
///
/// # Example
///
/// ```no_run
/// use netbox_reconcile::api::{NetboxClient, ReqwestClient};
/// use netbox_reconcile::desired::DesiredState;
/// use netbox_reconcile::engine::{ReconcileRequest, Reconciler};
/// use netbox_reconcile::schema::KindRegistry;
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = NetboxClient::new(
///     ReqwestClient::new(),
///     Url::parse("http://netbox.local/api/")?,
///     "thisIsMyToken",
/// )?;
/// let reconciler = Reconciler::new(client, KindRegistry::builtin());
///
/// let data = DesiredState::new()
///     .with("device", "Test Nexus One")
///     .with("name", "Module Bay One");
/// let outcome = reconciler
///     .reconcile(&ReconcileRequest::new("module_bay", data))
///     .await?;
/// println!("{}", outcome.message);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Reconciler<C> {
    client: C,
    registry: KindRegistry,
}

impl<C> Reconciler<C> {
    /// Creates a reconciler over a resource client and a kind table.
    #[must_use]
    pub const fn new(client: C, registry: KindRegistry) -> Self {
        Self { client, registry }
    }
}

impl<C: ResourceClient> Reconciler<C> {
    /// Runs one reconciliation.
    ///
    /// # Errors
    ///
    /// Returns the first [`ReconcileError`] of any stage. Errors before
    /// the execute stage guarantee nothing was written; under dry-run
    /// nothing is ever written.
    pub async fn reconcile(&self, request: &ReconcileRequest) -> Result<Outcome, ReconcileError> {
        let kind = self.start(request)?;
        let data = with_defaults(kind, &request.data);
        let key_fields = lookup_fields(kind, request)?;

        let resolved = self.resolve(kind, request.state, &data, &key_fields).await?;
        let key = natural_key(kind, request, &resolved, &key_fields)?;

        let existing = self.look_up(kind, &key).await?;
        let plan = plan(kind, request.state, &resolved, existing);

        let display = data
            .get(kind.display_field)
            .and_then(Value::as_str)
            .map_or_else(|| key.to_string(), ToString::to_string);

        self.execute(kind, &key, &display, plan, request.dry_run).await
    }

    /// Validates the request against the kind's schema.
    fn start(&self, request: &ReconcileRequest) -> Result<&ResourceKind, ReconcileError> {
        let kind = self
            .registry
            .get(&request.kind)
            .ok_or_else(|| ReconcileError::UnknownKind {
                kind: request.kind.clone(),
            })?;

        if !kind.managed {
            return Err(ReconcileError::NotManageable {
                kind: kind.name.to_string(),
            });
        }

        if let Some((field, _)) = request.data.iter().find(|(f, _)| kind.field(f).is_none()) {
            return Err(ReconcileError::UnknownField {
                kind: kind.name.to_string(),
                field: field.clone(),
            });
        }

        if let Some(field) = kind
            .required_fields(request.state)
            .into_iter()
            .find(|f| !request.data.contains(f))
        {
            return Err(ReconcileError::MissingField {
                kind: kind.name.to_string(),
                field: field.to_string(),
                state: request.state,
            });
        }

        tracing::debug!(
            "Reconciling {} (state={}, dry_run={})",
            kind.name,
            request.state,
            request.dry_run
        );
        Ok(kind)
    }

    /// Resolves references: every specified field for `present`, only
    /// the lookup fields for `absent`.
    async fn resolve(
        &self,
        kind: &ResourceKind,
        state: RequestedState,
        data: &DesiredState,
        key_fields: &[&'static str],
    ) -> Result<CanonicalState, ReconcileError> {
        let fields: Vec<&str> = match state {
            RequestedState::Present => kind.fields.iter().map(|f| f.name).collect(),
            RequestedState::Absent => key_fields.to_vec(),
        };

        let resolved = Resolver::new(&self.client, &self.registry)
            .resolve_state(kind, data, &fields)
            .await?;

        tracing::debug!("Resolved {} field(s) of {}", resolved.len(), kind.name);
        Ok(resolved)
    }

    /// Fetches the current object, if any.
    async fn look_up(
        &self,
        kind: &ResourceKind,
        key: &NaturalKey,
    ) -> Result<Option<RemoteObject>, ReconcileError> {
        let lookup = self
            .client
            .find(kind, key)
            .await
            .map_err(|e| ReconcileError::api(kind.name, key, e))?;

        match lookup {
            Lookup::Absent => {
                tracing::debug!("No {} matches ({key})", kind.name);
                Ok(None)
            }
            Lookup::Unique(object) => {
                tracing::debug!("Found {} id {} ({key})", kind.name, object.id());
                Ok(Some(object))
            }
            Lookup::Ambiguous(count) => Err(ReconcileError::LookupAmbiguous {
                kind: kind.name.to_string(),
                key: key.to_string(),
                count,
            }),
        }
    }

    /// Performs (or, under dry-run, simulates) the planned action.
    async fn execute(
        &self,
        kind: &ResourceKind,
        key: &NaturalKey,
        display: &str,
        plan: Plan,
        dry_run: bool,
    ) -> Result<Outcome, ReconcileError> {
        let write_error = |e: ApiError| ReconcileError::api(kind.name, key, e);

        if dry_run && !matches!(plan, Plan::AlreadyAbsent | Plan::Unchanged(_)) {
            tracing::info!("Dry-run: not writing {} ({key})", kind.name);
        }

        let (action, object, state_diff) = match plan {
            Plan::AlreadyAbsent => (Action::AlreadyAbsent, None, None),
            Plan::Unchanged(current) => (Action::Unchanged, Some(current.into_value()), None),
            Plan::Create(payload) => {
                let object = if dry_run {
                    Value::Object(payload)
                } else {
                    tracing::info!("Creating {} ({key})", kind.name);
                    self.client
                        .create(kind.endpoint, &payload)
                        .await
                        .map_err(write_error)?
                        .into_value()
                };
                let state_diff = StateDiff::existence("absent", "present");
                (Action::Created, Some(object), Some(state_diff))
            }
            Plan::Update { current, diff } => {
                let payload = diff.payload();
                let state_diff = StateDiff {
                    before: diff.before(),
                    after: payload.clone(),
                };
                let object = if dry_run {
                    current.merged(&payload)
                } else {
                    tracing::info!(
                        "Updating {} id {} ({key}): {}",
                        kind.name,
                        current.id(),
                        diff.fields().collect::<Vec<_>>().join(", ")
                    );
                    self.client
                        .update(kind.endpoint, current.id(), &payload)
                        .await
                        .map_err(write_error)?
                };
                (Action::Updated, Some(object.into_value()), Some(state_diff))
            }
            Plan::Delete(current) => {
                let outcome = if dry_run {
                    DeleteOutcome::Deleted
                } else {
                    tracing::info!("Deleting {} id {} ({key})", kind.name, current.id());
                    self.client
                        .delete(kind.endpoint, current.id())
                        .await
                        .map_err(write_error)?
                };

                match outcome {
                    DeleteOutcome::Deleted => (
                        Action::Deleted,
                        None,
                        Some(StateDiff::existence("present", "absent")),
                    ),
                    DeleteOutcome::NotFound => {
                        tracing::warn!(
                            "{} id {} ({key}) disappeared before it could be deleted",
                            kind.name,
                            current.id()
                        );
                        (Action::AlreadyAbsent, None, None)
                    }
                }
            }
        };

        Ok(Outcome {
            kind: kind.name.to_string(),
            action,
            dry_run,
            object,
            diff: state_diff,
            message: format!("{} {display} {action}", kind.name),
        })
    }
}

/// Fields used for the lookup: the caller's `query_params` or the kind's
/// natural key.
fn lookup_fields(
    kind: &ResourceKind,
    request: &ReconcileRequest,
) -> Result<Vec<&'static str>, ReconcileError> {
    if request.query_params.is_empty() {
        return Ok(kind.key_fields.to_vec());
    }

    request
        .query_params
        .iter()
        .map(|name| {
            kind.field(name)
                .map(|spec| spec.name)
                .ok_or_else(|| ReconcileError::UnknownField {
                    kind: kind.name.to_string(),
                    field: name.clone(),
                })
        })
        .collect()
}

/// Builds the lookup key from the resolved state.
///
/// With the default natural key, fields the caller left out are skipped,
/// so `absent` can be keyed on a subset. Explicit `query_params` must all
/// be present.
fn natural_key(
    kind: &ResourceKind,
    request: &ReconcileRequest,
    resolved: &CanonicalState,
    key_fields: &[&'static str],
) -> Result<NaturalKey, ReconcileError> {
    let strict = !request.query_params.is_empty();
    let missing = |field: &str| ReconcileError::MissingField {
        kind: kind.name.to_string(),
        field: field.to_string(),
        state: request.state,
    };

    let mut key = NaturalKey::new();
    for &name in key_fields {
        let Some(value) = resolved.get(name) else {
            if strict {
                return Err(missing(name));
            }
            continue;
        };
        let Some(spec) = kind.field(name) else {
            continue;
        };
        let text = value
            .query_text()
            .ok_or_else(|| ReconcileError::InvalidInput {
                kind: kind.name.to_string(),
                field: name.to_string(),
                reason: "list values cannot be used to look up an object".to_string(),
            })?;
        key = key.with_part(name, spec.filter_param(), text);
    }

    if key.is_empty() {
        return Err(missing(key_fields.first().copied().unwrap_or("name")));
    }
    Ok(key)
}

/// Decides the action from requested state and lookup result.
fn plan(
    kind: &ResourceKind,
    state: RequestedState,
    resolved: &CanonicalState,
    existing: Option<RemoteObject>,
) -> Plan {
    match (state, existing) {
        (RequestedState::Absent, None) => Plan::AlreadyAbsent,
        (RequestedState::Absent, Some(current)) => Plan::Delete(current),
        (RequestedState::Present, None) => Plan::Create(to_payload(resolved)),
        (RequestedState::Present, Some(current)) => {
            let remote = normalize_remote(kind, &current, resolved.keys());
            let diff = diff(resolved, &remote);
            if diff.is_empty() {
                Plan::Unchanged(current)
            } else {
                Plan::Update { current, diff }
            }
        }
    }
}
