//! Tests for field specs, kinds and the registry.

use serde_json::json;

use super::builtin::{DEVICE, MANUFACTURER, MODULE_BAY, MODULE_TYPE, TAG};
use super::{FieldDefault, FieldKind, FieldSpec, KindRegistry, NaturalKey, slugify};
use crate::desired::{DesiredState, RequestedState};

mod slug {
    use super::*;

    #[test]
    fn lowercases_and_dashes_spaces() {
        assert_eq!(slugify("Test Manufacturer One"), "test-manufacturer-one");
    }

    #[test]
    fn drops_unsafe_characters() {
        assert_eq!(slugify("Acme, Inc. (EU)"), "acme-inc-eu");
    }

    #[test]
    fn collapses_separator_runs() {
        assert_eq!(slugify("  a -- b..c  "), "a-b-c");
    }

    #[test]
    fn keeps_underscores_and_digits() {
        assert_eq!(slugify("SFP_28 Module 2"), "sfp_28-module-2");
    }
}

mod field_spec {
    use super::*;

    #[test]
    fn constructors_set_kind() {
        assert_eq!(FieldSpec::scalar("name").kind, FieldKind::Scalar);
        assert_eq!(
            FieldSpec::scalar_list("object_types").kind,
            FieldKind::ScalarList
        );
        assert_eq!(
            FieldSpec::reference("device", "device").kind,
            FieldKind::Reference("device")
        );
        assert_eq!(
            FieldSpec::reference_list("tags", "tag").kind,
            FieldKind::ReferenceList("tag")
        );
    }

    #[test]
    fn builder_flags() {
        let spec = FieldSpec::scalar("slug")
            .required()
            .with_default(FieldDefault::SlugOf("name"));

        assert!(spec.required);
        assert_eq!(spec.default, Some(FieldDefault::SlugOf("name")));
    }

    #[test]
    fn filter_param_uses_id_suffix_for_references() {
        assert_eq!(FieldSpec::reference("device", "device").filter_param(), "device_id");
        assert_eq!(FieldSpec::reference_list("tags", "tag").filter_param(), "tags_id");
        assert_eq!(FieldSpec::scalar("name").filter_param(), "name");
    }

    #[test]
    fn kind_helpers() {
        assert_eq!(FieldKind::Reference("device").target(), Some("device"));
        assert_eq!(FieldKind::ReferenceList("tag").target(), Some("tag"));
        assert_eq!(FieldKind::Scalar.target(), None);
        assert!(FieldKind::ScalarList.is_list());
        assert!(FieldKind::ReferenceList("tag").is_list());
        assert!(!FieldKind::Reference("device").is_list());
    }

    #[test]
    fn slug_default_needs_string_source() {
        let default = FieldDefault::SlugOf("name");

        let named = DesiredState::new().with("name", "Test Manufacturer Two");
        assert_eq!(default.compute(&named), Some(json!("test-manufacturer-two")));

        assert_eq!(default.compute(&DesiredState::new()), None);
        assert_eq!(default.compute(&DesiredState::new().with("name", 5)), None);
    }
}

mod kinds {
    use super::*;

    #[test]
    fn every_key_field_is_in_the_schema() {
        for kind in [MODULE_BAY, MODULE_TYPE, MANUFACTURER, TAG, DEVICE] {
            for key in kind.key_fields {
                assert!(kind.field(key).is_some(), "{kind}: key field {key}");
            }
            assert!(
                kind.field(kind.display_field).is_some(),
                "{kind}: display field"
            );
        }
    }

    #[test]
    fn every_reference_targets_a_builtin_kind() {
        let registry = KindRegistry::builtin();
        for kind in registry.iter() {
            for field in kind.fields {
                if let Some(target) = field.kind.target() {
                    assert!(registry.get(target).is_some(), "{kind}.{}", field.name);
                }
            }
        }
    }

    #[test]
    fn required_fields_depend_on_state() {
        assert_eq!(
            MODULE_BAY.required_fields(RequestedState::Present),
            vec!["device", "name"]
        );
        assert_eq!(MODULE_BAY.required_fields(RequestedState::Absent), vec!["name"]);
        assert_eq!(
            MODULE_TYPE.required_fields(RequestedState::Present),
            vec!["manufacturer", "model"]
        );
        assert_eq!(MODULE_TYPE.required_fields(RequestedState::Absent), vec!["model"]);
    }

    #[test]
    fn module_type_is_referenced_by_model() {
        assert_eq!(MODULE_TYPE.lookup_field, "model");
        assert_eq!(MODULE_TYPE.endpoint, "dcim/module-types");
    }

    #[test]
    fn device_is_reference_only() {
        assert!(!DEVICE.managed);
        assert!(MODULE_BAY.managed);
    }

    #[test]
    fn display_uses_name() {
        assert_eq!(MODULE_BAY.to_string(), "module_bay");
    }
}

mod natural_key {
    use super::*;

    #[test]
    fn query_uses_params_and_display_uses_fields() {
        let key = NaturalKey::new()
            .with_part("device", "device_id", "1")
            .with_part("name", "name", "Module Bay One");

        assert_eq!(
            key.query(),
            vec![
                ("device_id".to_string(), "1".to_string()),
                ("name".to_string(), "Module Bay One".to_string()),
            ]
        );
        assert_eq!(key.to_string(), "device=1, name=Module Bay One");
        assert_eq!(key.parts().len(), 2);
    }

    #[test]
    fn empty_key() {
        let key = NaturalKey::new();
        assert!(key.is_empty());
        assert_eq!(key.to_string(), "");
    }
}

mod registry {
    use super::*;

    #[test]
    fn builtin_holds_all_kinds() {
        let registry = KindRegistry::builtin();

        assert_eq!(registry.len(), 5);
        let names: Vec<&str> = registry.iter().map(|k| k.name).collect();
        assert_eq!(
            names,
            vec!["device", "manufacturer", "module_bay", "module_type", "tag"]
        );
    }

    #[test]
    fn unknown_kind_is_none() {
        assert!(KindRegistry::builtin().get("widget").is_none());
    }

    #[test]
    fn with_replaces_same_name() {
        let mut custom = TAG;
        custom.endpoint = "extras/custom-tags";

        let registry = KindRegistry::builtin().with(custom);

        assert_eq!(registry.len(), 5);
        assert_eq!(registry.get("tag").unwrap().endpoint, "extras/custom-tags");
    }

    #[test]
    fn new_is_empty() {
        assert!(KindRegistry::new().is_empty());
    }
}
