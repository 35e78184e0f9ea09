//! Tests for reference resolution.

use serde_json::json;

use super::ReconcileError;
use super::normalize::Canonical;
use super::resolve::Resolver;
use crate::api::fake::{FakeNetbox, Failure};
use crate::desired::{DesiredState, Reference};
use crate::schema::KindRegistry;
use crate::schema::builtin::{MODULE_BAY, MODULE_TYPE};

const DEVICES: &str = "dcim/devices";
const TAGS: &str = "extras/tags";
const MANUFACTURERS: &str = "dcim/manufacturers";

fn fixture() -> (FakeNetbox, KindRegistry) {
    let fake = FakeNetbox::new();
    fake.seed(DEVICES, json!({"name": "Test Nexus One", "site": 1}));
    fake.seed(DEVICES, json!({"name": "Twin", "site": 1}));
    fake.seed(DEVICES, json!({"name": "Twin", "site": 2}));
    (fake, KindRegistry::builtin())
}

mod single {
    use super::*;

    #[tokio::test]
    async fn name_resolves_to_id() {
        let (fake, registry) = fixture();
        let resolver = Resolver::new(&fake, &registry);

        let id = resolver
            .resolve("device", &Reference::Name("Test Nexus One".to_string()))
            .await
            .unwrap();

        assert_eq!(id, 1);
    }

    #[tokio::test]
    async fn id_is_used_without_lookup() {
        let (fake, registry) = fixture();
        let resolver = Resolver::new(&fake, &registry);

        let id = resolver.resolve("device", &Reference::Id(42)).await.unwrap();

        assert_eq!(id, 42);
        assert_eq!(fake.reads(), 0);
    }

    #[tokio::test]
    async fn filter_disambiguates() {
        let (fake, registry) = fixture();
        let resolver = Resolver::new(&fake, &registry);
        let filter = Reference::parse(&json!({"name": "Twin", "site": 2})).unwrap();

        let id = resolver.resolve("device", &filter).await.unwrap();

        assert_eq!(id, 3);
    }

    #[tokio::test]
    async fn no_match_is_not_found() {
        let (fake, registry) = fixture();
        let resolver = Resolver::new(&fake, &registry);

        let err = resolver
            .resolve("device", &Reference::Name("Nope".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ReconcileError::ReferenceNotFound { ref kind, ref filter }
                if kind == "device" && filter == "name=Nope"
        ));
    }

    #[tokio::test]
    async fn several_matches_are_ambiguous() {
        let (fake, registry) = fixture();
        let resolver = Resolver::new(&fake, &registry);

        let err = resolver
            .resolve("device", &Reference::Name("Twin".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ReconcileError::AmbiguousReference { count: 2, .. }
        ));
    }

    #[tokio::test]
    async fn unknown_target_kind() {
        let (fake, registry) = fixture();
        let resolver = Resolver::new(&fake, &registry);

        let err = resolver
            .resolve("rack", &Reference::Id(1))
            .await
            .unwrap_err();

        assert!(matches!(err, ReconcileError::UnknownKind { ref kind } if kind == "rack"));
    }

    #[tokio::test]
    async fn transport_error_names_target() {
        let (fake, registry) = fixture();
        fake.fail_next_read(Failure::Timeout);
        let resolver = Resolver::new(&fake, &registry);

        let err = resolver
            .resolve("device", &Reference::Name("Test Nexus One".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ReconcileError::Transport { ref kind, ref key, .. }
                if kind == "device" && key == "name=Test Nexus One"
        ));
    }

    #[tokio::test]
    async fn module_type_resolves_by_model() {
        let fake = FakeNetbox::new();
        let registry = KindRegistry::builtin();
        let id = fake.seed(
            "dcim/module-types",
            json!({"manufacturer": 1, "model": "Fancy Module"}),
        );
        let resolver = Resolver::new(&fake, &registry);

        let resolved = resolver
            .resolve("module_type", &Reference::Name("Fancy Module".to_string()))
            .await
            .unwrap();

        assert_eq!(resolved, id);
    }
}

mod fields {
    use super::*;

    #[tokio::test]
    async fn tag_list_resolves_to_set() {
        let (fake, registry) = fixture();
        let a = fake.seed(TAGS, json!({"name": "a", "slug": "a"}));
        let b = fake.seed(TAGS, json!({"name": "b", "slug": "b"}));
        let resolver = Resolver::new(&fake, &registry);
        let spec = MODULE_BAY.field("tags").unwrap();

        let canonical = resolver
            .resolve_field(&MODULE_BAY, spec, &json!(["b", "a", "b"]))
            .await
            .unwrap();

        assert_eq!(canonical, Canonical::IdSet([a, b].into_iter().collect()));
    }

    #[tokio::test]
    async fn tag_list_fails_on_first_unresolved() {
        let (fake, registry) = fixture();
        fake.seed(TAGS, json!({"name": "a", "slug": "a"}));
        let resolver = Resolver::new(&fake, &registry);
        let spec = MODULE_BAY.field("tags").unwrap();

        let err = resolver
            .resolve_field(&MODULE_BAY, spec, &json!(["a", "missing", "also-missing"]))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ReconcileError::ReferenceNotFound { ref kind, ref filter }
                if kind == "tag" && filter == "name=missing"
        ));
    }

    #[tokio::test]
    async fn null_reference_clears() {
        let (fake, registry) = fixture();
        let resolver = Resolver::new(&fake, &registry);

        let device = resolver
            .resolve_field(&MODULE_BAY, MODULE_BAY.field("device").unwrap(), &json!(null))
            .await
            .unwrap();
        let tags = resolver
            .resolve_field(&MODULE_BAY, MODULE_BAY.field("tags").unwrap(), &json!(null))
            .await
            .unwrap();

        assert_eq!(device, Canonical::Null);
        assert_eq!(tags, Canonical::IdSet(std::collections::BTreeSet::new()));
    }

    #[tokio::test]
    async fn invalid_reference_value() {
        let (fake, registry) = fixture();
        let resolver = Resolver::new(&fake, &registry);

        let err = resolver
            .resolve_field(&MODULE_BAY, MODULE_BAY.field("device").unwrap(), &json!(true))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ReconcileError::InvalidInput { ref field, .. } if field == "device"
        ));
        assert!(err.is_input_error());
    }

    #[tokio::test]
    async fn state_resolution_skips_unrequested_fields() {
        let fake = FakeNetbox::new();
        let registry = KindRegistry::builtin();
        let acme = fake.seed(MANUFACTURERS, json!({"name": "Acme", "slug": "acme"}));
        let resolver = Resolver::new(&fake, &registry);
        let data = DesiredState::new()
            .with("manufacturer", "Acme")
            .with("model", "Fancy Module")
            .with("part_number", "FM-1");

        let resolved = resolver
            .resolve_state(&MODULE_TYPE, &data, &["manufacturer", "model", "comments"])
            .await
            .unwrap();

        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved.get("manufacturer"), Some(&Canonical::Id(acme)));
        assert_eq!(
            resolved.get("model"),
            Some(&Canonical::Scalar(json!("Fancy Module")))
        );
    }
}
