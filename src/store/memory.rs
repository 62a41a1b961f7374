//! # In-Memory Store
//!
//! In-memory [`DocumentStore`] for testing.
//!
//! Matching is deliberately shallow — top-level field equality for filters,
//! top-level include/exclude for projections, `$set` as the only update
//! operator — which covers what the gateway's dispatch path exercises.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Bson, Document};

use super::{DocumentStore, FindSpec, StoreError};

#[derive(Debug, Default)]
pub struct MemoryStore {
    /// collection name -> documents in insertion order
    data: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(document: &Document, filter: &Document) -> bool {
        filter
            .iter()
            .all(|(key, value)| document.get(key) == Some(value))
    }

    fn truthy(value: &Bson) -> bool {
        match value {
            Bson::Int32(n) => *n != 0,
            Bson::Int64(n) => *n != 0,
            Bson::Double(n) => *n != 0.0,
            Bson::Boolean(b) => *b,
            _ => true,
        }
    }

    /// Shape a document per a projection: include mode when any non-`_id`
    /// field is truthy, exclude mode otherwise. `_id` is kept unless
    /// explicitly excluded, like the real store.
    fn project(document: &Document, projection: &Document) -> Document {
        let include_mode = projection
            .iter()
            .any(|(key, value)| key != "_id" && Self::truthy(value));

        if include_mode {
            let mut shaped = Document::new();
            let keep_id = projection
                .get("_id")
                .map(Self::truthy)
                .unwrap_or(true);
            if keep_id {
                if let Some(id) = document.get("_id") {
                    shaped.insert("_id", id.clone());
                }
            }
            for (key, value) in projection {
                if key != "_id" && Self::truthy(value) {
                    if let Some(field) = document.get(key) {
                        shaped.insert(key, field.clone());
                    }
                }
            }
            shaped
        } else {
            let mut shaped = document.clone();
            for (key, value) in projection {
                if !Self::truthy(value) {
                    shaped.remove(key);
                }
            }
            shaped
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, HashMap<String, Vec<Document>>>, StoreError> {
        self.data
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<String, Vec<Document>>>, StoreError> {
        self.data
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(&self, collection: &str, spec: FindSpec) -> Result<Vec<Document>, StoreError> {
        let data = self.read()?;
        let documents = data.get(collection).cloned().unwrap_or_default();

        let matched = documents
            .into_iter()
            .filter(|d| match &spec.filter {
                Some(filter) => Self::matches(d, filter),
                None => true,
            })
            .skip(spec.skip as usize);

        let capped: Vec<Document> = if spec.limit > 0 {
            matched.take(spec.limit as usize).collect()
        } else {
            matched.collect()
        };

        Ok(match &spec.projection {
            Some(projection) => capped.iter().map(|d| Self::project(d, projection)).collect(),
            None => capped,
        })
    }

    async fn find_one(
        &self,
        collection: &str,
        id: ObjectId,
    ) -> Result<Option<Document>, StoreError> {
        let data = self.read()?;
        let wanted = Bson::ObjectId(id);
        Ok(data
            .get(collection)
            .and_then(|documents| documents.iter().find(|d| d.get("_id") == Some(&wanted)))
            .cloned())
    }

    async fn insert_one(&self, collection: &str, mut document: Document) -> Result<Bson, StoreError> {
        let mut data = self.write()?;
        if !document.contains_key("_id") {
            document.insert("_id", ObjectId::new());
        }
        let id = document
            .get("_id")
            .cloned()
            .unwrap_or(Bson::Null);

        let documents = data.entry(collection.to_string()).or_default();
        if documents.iter().any(|d| d.get("_id") == Some(&id)) {
            return Err(StoreError::Rejected(format!(
                "duplicate key error: _id {}",
                id
            )));
        }
        documents.push(document);
        Ok(id)
    }

    async fn update_one(
        &self,
        collection: &str,
        id: ObjectId,
        update: Document,
    ) -> Result<bool, StoreError> {
        if update.keys().any(|k| !k.starts_with('$')) {
            return Err(StoreError::Rejected(
                "update document must contain only update operators".to_string(),
            ));
        }
        if let Some(unknown) = update.keys().find(|k| k.as_str() != "$set") {
            return Err(StoreError::Rejected(format!(
                "unsupported update operator: {}",
                unknown
            )));
        }

        let mut data = self.write()?;
        let wanted = Bson::ObjectId(id);
        if let Some(target) = data
            .get_mut(collection)
            .and_then(|documents| documents.iter_mut().find(|d| d.get("_id") == Some(&wanted)))
        {
            if let Ok(fields) = update.get_document("$set") {
                for (key, value) in fields {
                    target.insert(key, value.clone());
                }
            }
        }
        // No match is still an acknowledged write, like the real store.
        Ok(true)
    }

    async fn delete_one(&self, collection: &str, id: ObjectId) -> Result<(), StoreError> {
        let mut data = self.write()?;
        let wanted = Bson::ObjectId(id);
        if let Some(documents) = data.get_mut(collection) {
            documents.retain(|d| d.get("_id") != Some(&wanted));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[tokio::test]
    async fn test_insert_assigns_id_when_absent() {
        let store = MemoryStore::new();
        let id = store
            .insert_one("items", doc! { "name": "x" })
            .await
            .unwrap();
        assert!(matches!(id, Bson::ObjectId(_)));
    }

    #[tokio::test]
    async fn test_insert_keeps_supplied_id() {
        let store = MemoryStore::new();
        let supplied = ObjectId::new();
        let id = store
            .insert_one("items", doc! { "_id": supplied, "name": "x" })
            .await
            .unwrap();
        assert_eq!(id, Bson::ObjectId(supplied));
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let store = MemoryStore::new();
        let id = ObjectId::new();
        store
            .insert_one("items", doc! { "_id": id })
            .await
            .unwrap();
        let err = store
            .insert_one("items", doc! { "_id": id })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_find_applies_filter_skip_and_limit_in_order() {
        let store = MemoryStore::new();
        for n in 0..10 {
            store
                .insert_one("items", doc! { "n": n, "kind": "even_or_odd" })
                .await
                .unwrap();
        }

        let spec = FindSpec {
            skip: 3,
            limit: 4,
            ..Default::default()
        };
        let page = store.find("items", spec).await.unwrap();
        let ns: Vec<i32> = page.iter().map(|d| d.get_i32("n").unwrap()).collect();
        assert_eq!(ns, vec![3, 4, 5, 6]);

        let all = store.find("items", FindSpec::default()).await.unwrap();
        assert_eq!(all.len(), 10);
    }

    #[tokio::test]
    async fn test_find_with_equality_filter() {
        let store = MemoryStore::new();
        store.insert_one("items", doc! { "name": "x" }).await.unwrap();
        store.insert_one("items", doc! { "name": "y" }).await.unwrap();

        let spec = FindSpec {
            filter: Some(doc! { "name": "y" }),
            ..Default::default()
        };
        let found = store.find("items", spec).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].get_str("name").unwrap(), "y");
    }

    #[tokio::test]
    async fn test_projection_include_and_exclude() {
        let store = MemoryStore::new();
        store
            .insert_one("items", doc! { "name": "x", "secret": "s" })
            .await
            .unwrap();

        let include = FindSpec {
            projection: Some(doc! { "name": 1 }),
            ..Default::default()
        };
        let shaped = store.find("items", include).await.unwrap();
        assert!(shaped[0].contains_key("_id"));
        assert!(shaped[0].contains_key("name"));
        assert!(!shaped[0].contains_key("secret"));

        let exclude = FindSpec {
            projection: Some(doc! { "secret": 0 }),
            ..Default::default()
        };
        let shaped = store.find("items", exclude).await.unwrap();
        assert!(shaped[0].contains_key("name"));
        assert!(!shaped[0].contains_key("secret"));
    }

    #[tokio::test]
    async fn test_update_requires_operators() {
        let store = MemoryStore::new();
        let id = ObjectId::new();
        store
            .insert_one("items", doc! { "_id": id, "name": "x" })
            .await
            .unwrap();

        let err = store
            .update_one("items", id, doc! { "name": "y" })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Rejected(_)));

        let acknowledged = store
            .update_one("items", id, doc! { "$set": { "name": "y" } })
            .await
            .unwrap();
        assert!(acknowledged);

        let updated = store.find_one("items", id).await.unwrap().unwrap();
        assert_eq!(updated.get_str("name").unwrap(), "y");
    }

    #[tokio::test]
    async fn test_update_of_missing_document_is_acknowledged() {
        let store = MemoryStore::new();
        let acknowledged = store
            .update_one("items", ObjectId::new(), doc! { "$set": { "name": "y" } })
            .await
            .unwrap();
        assert!(acknowledged);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryStore::new();
        let id = ObjectId::new();
        store
            .insert_one("items", doc! { "_id": id })
            .await
            .unwrap();

        store.delete_one("items", id).await.unwrap();
        assert!(store.find_one("items", id).await.unwrap().is_none());
        // Second delete of the same id is still a success
        store.delete_one("items", id).await.unwrap();
    }
}
