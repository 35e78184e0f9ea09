//! Field specifications and value defaults.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::desired::DesiredState;

/// How a field's value is interpreted and compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A plain value compared byte for byte.
    Scalar,
    /// An ordered list of plain values.
    ScalarList,
    /// A pointer to one object of the named kind.
    Reference(&'static str),
    /// A set of pointers to objects of the named kind (tags).
    ReferenceList(&'static str),
}

impl FieldKind {
    /// Returns the referenced kind name, if this field points at other objects.
    #[must_use]
    pub const fn target(self) -> Option<&'static str> {
        match self {
            Self::Reference(target) | Self::ReferenceList(target) => Some(target),
            Self::Scalar | Self::ScalarList => None,
        }
    }

    /// Returns true for list-valued fields.
    #[must_use]
    pub const fn is_list(self) -> bool {
        matches!(self, Self::ScalarList | Self::ReferenceList(_))
    }
}

/// A value filled in when the caller leaves the field out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    /// NetBox-style slug of another string field.
    SlugOf(&'static str),
}

impl FieldDefault {
    /// Computes the default from the caller's data, if its source is present.
    #[must_use]
    pub fn compute(self, data: &DesiredState) -> Option<Value> {
        match self {
            Self::SlugOf(source) => data
                .get(source)
                .and_then(Value::as_str)
                .map(|s| Value::String(slugify(s))),
        }
    }
}

/// Schema entry for one field of a resource kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name as used by the API
    pub name: &'static str,
    /// Value interpretation
    pub kind: FieldKind,
    /// Must be supplied when the requested state is `present`
    pub required: bool,
    /// Value used when the caller omits the field
    pub default: Option<FieldDefault>,
}

impl FieldSpec {
    const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            default: None,
        }
    }

    /// An optional scalar field.
    #[must_use]
    pub const fn scalar(name: &'static str) -> Self {
        Self::new(name, FieldKind::Scalar)
    }

    /// An optional list-of-scalars field.
    #[must_use]
    pub const fn scalar_list(name: &'static str) -> Self {
        Self::new(name, FieldKind::ScalarList)
    }

    /// An optional reference to an object of kind `target`.
    #[must_use]
    pub const fn reference(name: &'static str, target: &'static str) -> Self {
        Self::new(name, FieldKind::Reference(target))
    }

    /// An optional set of references to objects of kind `target`.
    #[must_use]
    pub const fn reference_list(name: &'static str, target: &'static str) -> Self {
        Self::new(name, FieldKind::ReferenceList(target))
    }

    /// Marks the field as required for `present`.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attaches a default.
    #[must_use]
    pub const fn with_default(mut self, default: FieldDefault) -> Self {
        self.default = Some(default);
        self
    }

    /// Query parameter NetBox accepts when filtering on this field.
    ///
    /// Reference fields filter by the referenced object's id (`device_id`).
    #[must_use]
    pub fn filter_param(&self) -> String {
        match self.kind {
            FieldKind::Reference(_) | FieldKind::ReferenceList(_) => format!("{}_id", self.name),
            FieldKind::Scalar | FieldKind::ScalarList => self.name.to_string(),
        }
    }
}

static UNSAFE_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\-\.\w\s]").expect("static slug pattern is valid")
});

static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\-\.\s]+").expect("static slug pattern is valid"));

/// Converts a display name into a NetBox slug.
///
/// Characters other than word characters, whitespace, `-` and `.` are
/// dropped; runs of separators become a single `-`.
///
/// ```
/// use netbox_reconcile::schema::slugify;
///
/// assert_eq!(slugify("Test Manufacturer One"), "test-manufacturer-one");
/// ```
#[must_use]
pub fn slugify(value: &str) -> String {
    let cleaned = UNSAFE_CHARS.replace_all(value, "");
    let dashed = SEPARATORS.replace_all(cleaned.trim(), "-");
    dashed.to_lowercase()
}
