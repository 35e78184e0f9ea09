//! Reference resolution against the remote system.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::api::ResourceClient;
use crate::desired::{DesiredState, Reference, describe_query};
use crate::schema::{FieldKind, FieldSpec, KindRegistry, ResourceKind};

use super::ReconcileError;
use super::normalize::{Canonical, CanonicalState, normalize_plain};

/// Turns names, filters and ids into remote identifiers.
///
/// Issues read-only list calls only.
#[derive(Debug)]
pub struct Resolver<'a, C> {
    client: &'a C,
    registry: &'a KindRegistry,
}

impl<'a, C: ResourceClient> Resolver<'a, C> {
    /// Creates a resolver over the given client and kind table.
    #[must_use]
    pub const fn new(client: &'a C, registry: &'a KindRegistry) -> Self {
        Self { client, registry }
    }

    /// Resolves one reference to exactly one identifier of kind `target`.
    ///
    /// # Errors
    ///
    /// - [`ReconcileError::UnknownKind`] if `target` is not registered
    /// - [`ReconcileError::ReferenceNotFound`] on zero matches
    /// - [`ReconcileError::AmbiguousReference`] on several matches
    /// - transport/auth errors from the lookup, tagged with `target`
    pub async fn resolve(&self, target: &str, reference: &Reference) -> Result<u64, ReconcileError> {
        let kind = self
            .registry
            .get(target)
            .ok_or_else(|| ReconcileError::UnknownKind {
                kind: target.to_string(),
            })?;

        if let Reference::Id(id) = reference {
            return Ok(*id);
        }

        let query = reference.query(kind.lookup_field);
        let filter = describe_query(&query);

        let matches = self
            .client
            .list(kind.endpoint, &query)
            .await
            .map_err(|e| ReconcileError::api(kind.name, &filter, e))?;

        match matches.as_slice() {
            [] => Err(ReconcileError::ReferenceNotFound {
                kind: kind.name.to_string(),
                filter,
            }),
            [only] => {
                tracing::debug!("Resolved {} ({filter}) to id {}", kind.name, only.id());
                Ok(only.id())
            }
            many => Err(ReconcileError::AmbiguousReference {
                kind: kind.name.to_string(),
                filter,
                count: many.len(),
            }),
        }
    }

    /// Resolves one field of `owner` into its canonical form.
    ///
    /// Non-reference fields pass through the normalizer untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::InvalidInput`] for values that cannot be a
    /// reference, or the first resolution error of a list element.
    pub async fn resolve_field(
        &self,
        owner: &ResourceKind,
        spec: &FieldSpec,
        value: &Value,
    ) -> Result<Canonical, ReconcileError> {
        match spec.kind {
            FieldKind::Scalar | FieldKind::ScalarList => Ok(normalize_plain(spec, value)),
            FieldKind::Reference(target) => {
                if value.is_null() {
                    return Ok(Canonical::Null);
                }
                let reference = parse_reference(owner, spec, value)?;
                Ok(Canonical::Id(self.resolve(target, &reference).await?))
            }
            FieldKind::ReferenceList(target) => {
                let items = match value {
                    Value::Null => return Ok(Canonical::IdSet(BTreeSet::new())),
                    Value::Array(items) => items.as_slice(),
                    single => std::slice::from_ref(single),
                };

                let mut ids = BTreeSet::new();
                for item in items {
                    let reference = parse_reference(owner, spec, item)?;
                    ids.insert(self.resolve(target, &reference).await?);
                }
                Ok(Canonical::IdSet(ids))
            }
        }
    }

    /// Resolves the named fields of `data`, in schema order.
    ///
    /// Fields not present in `data` are skipped; the result only contains
    /// what the caller specified.
    ///
    /// # Errors
    ///
    /// Fails on the first field that does not resolve.
    pub async fn resolve_state(
        &self,
        kind: &ResourceKind,
        data: &DesiredState,
        fields: &[&str],
    ) -> Result<CanonicalState, ReconcileError> {
        let mut resolved = CanonicalState::new();

        for spec in kind.fields.iter().filter(|f| fields.contains(&f.name)) {
            let Some(value) = data.get(spec.name) else {
                continue;
            };
            let canonical = self.resolve_field(kind, spec, value).await?;
            resolved.insert(spec.name.to_string(), canonical);
        }

        Ok(resolved)
    }
}

fn parse_reference(
    owner: &ResourceKind,
    spec: &FieldSpec,
    value: &Value,
) -> Result<Reference, ReconcileError> {
    Reference::parse(value).ok_or_else(|| ReconcileError::InvalidInput {
        kind: owner.name.to_string(),
        field: spec.name.to_string(),
        reason: format!("{value} is not a name, filter or id"),
    })
}
