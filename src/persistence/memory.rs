//! In-memory implementation of the document store.
//!
//! Used when `PERSISTENCE_ENABLED=false` and throughout the test suite.
//! Semantics mirror the PostgreSQL backend: text-rendered equality filters,
//! newest-first default ordering, shallow-merge updates.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{Document, ListQuery};
use crate::error::GatewayError;

/// Volatile document store backed by nested hash maps.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, HashMap<String, Document>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lists documents in a collection.
    ///
    /// # Errors
    ///
    /// Infallible in practice; the `Result` keeps the signature aligned
    /// with the PostgreSQL backend.
    pub async fn list_documents(
        &self,
        collection: &str,
        query: &ListQuery,
    ) -> Result<Vec<Document>, GatewayError> {
        let collections = self.collections.read().await;
        let mut docs: Vec<Document> = collections
            .get(collection)
            .map(|by_id| {
                by_id
                    .values()
                    .filter(|doc| matches_filters(doc, query))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        match &query.order_by {
            Some(order) => {
                docs.sort_by(|a, b| {
                    let ka = sort_key(a, &order.field);
                    let kb = sort_key(b, &order.field);
                    if order.descending { kb.cmp(&ka) } else { ka.cmp(&kb) }
                });
            }
            None => docs.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }

        if let Some(limit) = query.limit {
            docs.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        Ok(docs)
    }

    /// Fetches a single document by id, returning `None` when absent.
    ///
    /// # Errors
    ///
    /// Infallible in practice; signature aligned with the PostgreSQL
    /// backend.
    pub async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, GatewayError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|by_id| by_id.get(id))
            .cloned())
    }

    /// Inserts a new document with a generated UUID v4 id.
    ///
    /// # Errors
    ///
    /// Infallible in practice; signature aligned with the PostgreSQL
    /// backend.
    pub async fn create_document(
        &self,
        collection: &str,
        data: serde_json::Value,
    ) -> Result<Document, GatewayError> {
        let now = Utc::now();
        let doc = Document {
            id: Uuid::new_v4().to_string(),
            collection: collection.to_string(),
            data,
            created_at: now,
            updated_at: now,
        };
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(doc.id.clone(), doc.clone());
        Ok(doc)
    }

    /// Shallow-merges `patch` into an existing document's payload.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::DocumentNotFound`] when the document does
    /// not exist.
    pub async fn update_document(
        &self,
        collection: &str,
        id: &str,
        patch: &serde_json::Value,
    ) -> Result<Document, GatewayError> {
        let mut collections = self.collections.write().await;
        let doc = collections
            .get_mut(collection)
            .and_then(|by_id| by_id.get_mut(id))
            .ok_or_else(|| GatewayError::DocumentNotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        if let (Some(target), Some(fields)) = (doc.data.as_object_mut(), patch.as_object()) {
            for (key, value) in fields {
                target.insert(key.clone(), value.clone());
            }
        }
        doc.updated_at = Utc::now();
        Ok(doc.clone())
    }

    /// Deletes a document.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::DocumentNotFound`] when the document does
    /// not exist.
    pub async fn delete_document(&self, collection: &str, id: &str) -> Result<(), GatewayError> {
        let mut collections = self.collections.write().await;
        let removed = collections
            .get_mut(collection)
            .and_then(|by_id| by_id.remove(id));
        if removed.is_none() {
            return Err(GatewayError::DocumentNotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

/// Applies the query's equality filters against a document.
fn matches_filters(doc: &Document, query: &ListQuery) -> bool {
    query
        .filters
        .iter()
        .all(|(field, value)| field_as_text(doc, field).as_deref() == Some(value))
}

/// Renders a payload field as text the way PostgreSQL's `->>` does:
/// strings unquoted, other scalars via their JSON rendering.
fn field_as_text(doc: &Document, field: &str) -> Option<String> {
    match doc.data.get(field)? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Sort key for ordered listings; timestamps sort by RFC 3339 rendering,
/// which preserves chronological order.
fn sort_key(doc: &Document, field: &str) -> String {
    match field {
        "created_at" => doc.created_at.to_rfc3339(),
        "updated_at" => doc.updated_at.to_rfc3339(),
        _ => field_as_text(doc, field).unwrap_or_default(),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn create_then_get_round_trip() {
        let store = MemoryStore::new();
        let doc = store
            .create_document("announcements", json!({"title": "Pool closed"}))
            .await
            .unwrap_or_else(|_| panic!("create failed"));

        let fetched = store.get_document("announcements", &doc.id).await;
        let Ok(Some(fetched)) = fetched else {
            panic!("expected document");
        };
        assert_eq!(fetched.data.get("title").and_then(|v| v.as_str()), Some("Pool closed"));
    }

    #[tokio::test]
    async fn list_applies_equality_filters() {
        let store = MemoryStore::new();
        let _ = store
            .create_document("visitor_logs", json!({"qrCodeId": "a"}))
            .await;
        let _ = store
            .create_document("visitor_logs", json!({"qrCodeId": "b"}))
            .await;

        let query = ListQuery::default().with_filter("qrCodeId", "a");
        let docs = store
            .list_documents("visitor_logs", &query)
            .await
            .unwrap_or_default();
        assert_eq!(docs.len(), 1);
    }

    #[tokio::test]
    async fn numeric_fields_filter_by_text_rendering() {
        let store = MemoryStore::new();
        let _ = store.create_document("feedback", json!({"rating": 4})).await;

        let query = ListQuery::default().with_filter("rating", "4");
        let docs = store
            .list_documents("feedback", &query)
            .await
            .unwrap_or_default();
        assert_eq!(docs.len(), 1);
    }

    #[tokio::test]
    async fn list_respects_limit() {
        let store = MemoryStore::new();
        for i in 0..5 {
            let _ = store.create_document("feedback", json!({"n": i})).await;
        }
        let query = ListQuery::default().with_limit(2);
        let docs = store
            .list_documents("feedback", &query)
            .await
            .unwrap_or_default();
        assert_eq!(docs.len(), 2);
    }

    #[tokio::test]
    async fn update_shallow_merges_payload() {
        let store = MemoryStore::new();
        let doc = store
            .create_document("announcements", json!({"title": "Old", "body": "text"}))
            .await
            .unwrap_or_else(|_| panic!("create failed"));

        let updated = store
            .update_document("announcements", &doc.id, &json!({"title": "New"}))
            .await
            .unwrap_or_else(|_| panic!("update failed"));
        assert_eq!(updated.data.get("title").and_then(|v| v.as_str()), Some("New"));
        assert_eq!(updated.data.get("body").and_then(|v| v.as_str()), Some("text"));
    }

    #[tokio::test]
    async fn update_missing_document_is_not_found() {
        let store = MemoryStore::new();
        let result = store
            .update_document("announcements", "ghost", &json!({}))
            .await;
        assert!(matches!(result, Err(GatewayError::DocumentNotFound { .. })));
    }

    #[tokio::test]
    async fn delete_removes_document() {
        let store = MemoryStore::new();
        let doc = store
            .create_document("announcements", json!({}))
            .await
            .unwrap_or_else(|_| panic!("create failed"));

        assert!(store.delete_document("announcements", &doc.id).await.is_ok());
        assert!(store.delete_document("announcements", &doc.id).await.is_err());
    }
}
