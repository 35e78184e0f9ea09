//! Built-in resource kinds.

use super::{FieldDefault, FieldSpec, ResourceKind};

/// Module bay: a slot on a device that accepts a module.
pub const MODULE_BAY: ResourceKind = ResourceKind {
    name: "module_bay",
    endpoint: "dcim/module-bays",
    fields: &[
        FieldSpec::reference("device", "device").required(),
        FieldSpec::scalar("name").required(),
        FieldSpec::scalar("label"),
        FieldSpec::scalar("position"),
        FieldSpec::scalar("description"),
        FieldSpec::reference_list("tags", "tag"),
    ],
    key_fields: &["device", "name"],
    absent_required: &["name"],
    lookup_field: "name",
    display_field: "name",
    managed: true,
};

/// Module type: a hardware model that can be installed in a module bay.
pub const MODULE_TYPE: ResourceKind = ResourceKind {
    name: "module_type",
    endpoint: "dcim/module-types",
    fields: &[
        FieldSpec::reference("manufacturer", "manufacturer").required(),
        FieldSpec::scalar("model").required(),
        FieldSpec::scalar("part_number"),
        FieldSpec::scalar("description"),
        FieldSpec::scalar("comments"),
        FieldSpec::reference_list("tags", "tag"),
    ],
    key_fields: &["manufacturer", "model"],
    absent_required: &["model"],
    lookup_field: "model",
    display_field: "model",
    managed: true,
};

/// Manufacturer: the vendor a module type belongs to.
pub const MANUFACTURER: ResourceKind = ResourceKind {
    name: "manufacturer",
    endpoint: "dcim/manufacturers",
    fields: &[
        FieldSpec::scalar("name").required(),
        FieldSpec::scalar("slug").with_default(FieldDefault::SlugOf("name")),
        FieldSpec::scalar("description"),
        FieldSpec::reference_list("tags", "tag"),
    ],
    key_fields: &["slug"],
    absent_required: &["name"],
    lookup_field: "name",
    display_field: "name",
    managed: true,
};

/// Tag: a label attachable to most objects.
pub const TAG: ResourceKind = ResourceKind {
    name: "tag",
    endpoint: "extras/tags",
    fields: &[
        FieldSpec::scalar("name").required(),
        FieldSpec::scalar("slug").with_default(FieldDefault::SlugOf("name")),
        FieldSpec::scalar("color"),
        FieldSpec::scalar("description"),
        FieldSpec::scalar_list("object_types"),
    ],
    key_fields: &["slug"],
    absent_required: &["name"],
    lookup_field: "name",
    display_field: "name",
    managed: true,
};

/// Devices are only referenced, never reconciled here.
pub const DEVICE: ResourceKind = ResourceKind {
    name: "device",
    endpoint: "dcim/devices",
    fields: &[FieldSpec::scalar("name")],
    key_fields: &["name"],
    absent_required: &[],
    lookup_field: "name",
    display_field: "name",
    managed: false,
};
