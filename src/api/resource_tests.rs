//! Tests for remote objects, lookups and the in-memory fake.

use serde_json::{Value, json};

use super::fake::{FakeNetbox, Failure, Write};
use super::{ApiError, DeleteOutcome, Lookup, RemoteObject, ResourceClient};
use crate::schema::{KindRegistry, NaturalKey};

fn object(value: Value) -> RemoteObject {
    RemoteObject::from_value(value).unwrap()
}

mod remote_object {
    use super::*;

    #[test]
    fn from_value_requires_object() {
        let result = RemoteObject::from_value(json!([1, 2]));
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[test]
    fn from_value_requires_integer_id() {
        assert!(RemoteObject::from_value(json!({"name": "x"})).is_err());
        assert!(RemoteObject::from_value(json!({"id": "7"})).is_err());
        assert!(RemoteObject::from_value(json!({"id": -1})).is_err());
    }

    #[test]
    fn accessors() {
        let obj = object(json!({"id": 7, "name": "Bay 1", "device": {"id": 1}}));

        assert_eq!(obj.id(), 7);
        assert_eq!(obj.get("name"), Some(&json!("Bay 1")));
        assert_eq!(obj.get("label"), None);
        assert_eq!(obj.fields().len(), 3);
    }

    #[test]
    fn merged_overwrites_only_given_fields() {
        let obj = object(json!({"id": 7, "name": "Bay 1", "label": "old"}));
        let changes = json!({"label": "new"}).as_object().unwrap().clone();

        let merged = obj.merged(&changes);

        assert_eq!(
            merged.into_value(),
            json!({"id": 7, "name": "Bay 1", "label": "new"})
        );
        assert_eq!(obj.get("label"), Some(&json!("old")));
    }

    #[test]
    fn serializes_transparently() {
        let obj = object(json!({"id": 1, "name": "x"}));
        assert_eq!(serde_json::to_value(&obj).unwrap(), json!({"id": 1, "name": "x"}));
    }
}

mod lookup {
    use super::*;

    #[test]
    fn from_matches() {
        assert_eq!(Lookup::from(Vec::<RemoteObject>::new()), Lookup::Absent);

        let one = object(json!({"id": 1}));
        assert_eq!(Lookup::from(vec![one.clone()]), Lookup::Unique(one));

        let many = vec![object(json!({"id": 1})), object(json!({"id": 2}))];
        assert_eq!(Lookup::from(many), Lookup::Ambiguous(2));
    }
}

mod fake_netbox {
    use super::*;

    const BAYS: &str = "dcim/module-bays";

    fn query(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[tokio::test]
    async fn filters_by_reference_id_and_text() {
        let fake = FakeNetbox::new();
        fake.seed(BAYS, json!({"device": {"id": 1}, "name": "Bay 1"}));
        fake.seed(BAYS, json!({"device": 2, "name": "Bay 1"}));

        let found = fake
            .list(BAYS, &query(&[("device_id", "2"), ("name", "Bay 1")]))
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].get("device"), Some(&json!(2)));
        assert_eq!(fake.reads(), 1);
    }

    #[tokio::test]
    async fn find_uses_natural_key() {
        let fake = FakeNetbox::new();
        let id = fake.seed(BAYS, json!({"device": 1, "name": "Bay 1"}));
        let registry = KindRegistry::builtin();
        let kind = registry.get("module_bay").unwrap();
        let key = NaturalKey::new()
            .with_part("device", "device_id", "1")
            .with_part("name", "name", "Bay 1");

        let lookup = fake.find(kind, &key).await.unwrap();

        assert!(matches!(lookup, Lookup::Unique(ref o) if o.id() == id));
    }

    #[tokio::test]
    async fn writes_are_recorded() {
        let fake = FakeNetbox::new();
        let payload = json!({"name": "Bay 1"}).as_object().unwrap().clone();

        let created = fake.create(BAYS, &payload).await.unwrap();
        fake.update(BAYS, created.id(), &payload).await.unwrap();
        let deleted = fake.delete(BAYS, created.id()).await.unwrap();

        assert_eq!(deleted, DeleteOutcome::Deleted);
        assert_eq!(fake.writes().len(), 3);
        assert!(matches!(fake.writes()[2], Write::Delete { id, .. } if id == created.id()));
        assert!(fake.objects(BAYS).is_empty());
    }

    #[tokio::test]
    async fn injected_failures_fire_once() {
        let fake = FakeNetbox::new();
        fake.fail_next_read(Failure::Timeout);

        assert!(fake.list(BAYS, &[]).await.is_err());
        assert!(fake.list(BAYS, &[]).await.is_ok());
    }

    #[tokio::test]
    async fn delete_unknown_is_not_found() {
        let fake = FakeNetbox::new();

        let outcome = fake.delete(BAYS, 42).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::NotFound);
    }
}
