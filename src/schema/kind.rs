//! Resource kind definitions and natural keys.

use std::fmt;

use crate::desired::RequestedState;

use super::FieldSpec;

/// A registered type of manageable NetBox object.
///
/// Kinds are plain data: the engine reads the schema to decide how
/// every field is resolved, compared and sent, so adding a kind never
/// requires new reconciliation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceKind {
    /// Registry name, also used as the result key (`module_bay`)
    pub name: &'static str,
    /// Endpoint path relative to the API root (`dcim/module-bays`)
    pub endpoint: &'static str,
    /// Field schema
    pub fields: &'static [FieldSpec],
    /// Fields identifying an instance independently of its id
    pub key_fields: &'static [&'static str],
    /// Fields that must be supplied when the requested state is `absent`
    pub absent_required: &'static [&'static str],
    /// Attribute matched when another kind references this one by plain name
    pub lookup_field: &'static str,
    /// Attribute shown in messages
    pub display_field: &'static str,
    /// Whether the reconciler may create, update and delete this kind
    pub managed: bool,
}

impl ResourceKind {
    /// Looks up a field spec by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields that must be present for the given requested state.
    #[must_use]
    pub fn required_fields(&self, state: RequestedState) -> Vec<&'static str> {
        match state {
            RequestedState::Present => self
                .fields
                .iter()
                .filter(|f| f.required)
                .map(|f| f.name)
                .collect(),
            RequestedState::Absent => self.absent_required.to_vec(),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// One component of a natural key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPart {
    /// Schema field name
    pub field: String,
    /// Query parameter sent to the API
    pub param: String,
    /// Query value (an id for reference fields)
    pub value: String,
}

/// The canonical lookup key of one resource instance.
///
/// Displays as `field=value` pairs, so error messages name exactly what
/// was looked up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NaturalKey {
    parts: Vec<KeyPart>,
}

impl NaturalKey {
    /// Creates an empty key.
    #[must_use]
    pub const fn new() -> Self {
        Self { parts: Vec::new() }
    }

    /// Appends a component.
    #[must_use]
    pub fn with_part(
        mut self,
        field: impl Into<String>,
        param: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.parts.push(KeyPart {
            field: field.into(),
            param: param.into(),
            value: value.into(),
        });
        self
    }

    /// Returns the components in order.
    #[must_use]
    pub fn parts(&self) -> &[KeyPart] {
        &self.parts
    }

    /// Returns true if the key has no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Query-string pairs for the kind's list endpoint.
    #[must_use]
    pub fn query(&self) -> Vec<(String, String)> {
        self.parts
            .iter()
            .map(|p| (p.param.clone(), p.value.clone()))
            .collect()
    }
}

impl fmt::Display for NaturalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", part.field, part.value)?;
        }
        Ok(())
    }
}
