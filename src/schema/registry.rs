//! Registry of resource kinds.

use std::collections::BTreeMap;

use super::ResourceKind;
use super::builtin::{DEVICE, MANUFACTURER, MODULE_BAY, MODULE_TYPE, TAG};

/// Table of resource kinds, keyed by name.
///
/// Built once at startup and read-only afterwards.
///
/// # Example
///
/// ```
/// use netbox_reconcile::schema::KindRegistry;
///
/// let registry = KindRegistry::builtin();
/// let bay = registry.get("module_bay").unwrap();
/// assert_eq!(bay.key_fields, &["device", "name"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct KindRegistry {
    kinds: BTreeMap<&'static str, ResourceKind>,
}

impl KindRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            kinds: BTreeMap::new(),
        }
    }

    /// Creates a registry holding every built-in kind.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new()
            .with(MODULE_BAY)
            .with(MODULE_TYPE)
            .with(MANUFACTURER)
            .with(TAG)
            .with(DEVICE)
    }

    /// Registers a kind, replacing any kind of the same name.
    #[must_use]
    pub fn with(mut self, kind: ResourceKind) -> Self {
        self.kinds.insert(kind.name, kind);
        self
    }

    /// Looks up a kind by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ResourceKind> {
        self.kinds.get(name)
    }

    /// Iterates over registered kinds in name order.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceKind> {
        self.kinds.values()
    }

    /// Number of registered kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Returns true if no kinds are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
