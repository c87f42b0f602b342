//! Backend-dispatching document store.
//!
//! [`DocumentStore`] is the single type the service layer talks to. It
//! validates query field names once, then delegates to the configured
//! backend.

use super::memory::MemoryStore;
use super::models::{Document, ListQuery};
use super::postgres::PostgresStore;
use crate::error::GatewayError;

/// Document store with a PostgreSQL or in-memory backend.
#[derive(Debug)]
pub enum DocumentStore {
    /// Durable PostgreSQL JSONB backend.
    Postgres(PostgresStore),
    /// Volatile in-memory backend.
    Memory(MemoryStore),
}

impl DocumentStore {
    /// Lists documents in a collection.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidFieldName`] for malformed filter or
    /// order-by fields, or [`GatewayError::Persistence`] on backend
    /// failure.
    pub async fn list_documents(
        &self,
        collection: &str,
        query: &ListQuery,
    ) -> Result<Vec<Document>, GatewayError> {
        for (field, _) in &query.filters {
            ensure_identifier(field)?;
        }
        if let Some(order) = &query.order_by {
            ensure_identifier(&order.field)?;
        }
        match self {
            Self::Postgres(store) => store.list_documents(collection, query).await,
            Self::Memory(store) => store.list_documents(collection, query).await,
        }
    }

    /// Fetches a single document by id, returning `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Persistence`] on backend failure.
    pub async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, GatewayError> {
        match self {
            Self::Postgres(store) => store.get_document(collection, id).await,
            Self::Memory(store) => store.get_document(collection, id).await,
        }
    }

    /// Inserts a new document, returning it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if `data` is not a JSON
    /// object, or [`GatewayError::Persistence`] on backend failure.
    pub async fn create_document(
        &self,
        collection: &str,
        data: serde_json::Value,
    ) -> Result<Document, GatewayError> {
        if !data.is_object() {
            return Err(GatewayError::InvalidRequest(
                "document payload must be a JSON object".to_string(),
            ));
        }
        match self {
            Self::Postgres(store) => store.create_document(collection, data).await,
            Self::Memory(store) => store.create_document(collection, data).await,
        }
    }

    /// Shallow-merges `patch` into an existing document's payload.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if `patch` is not a JSON
    /// object, [`GatewayError::DocumentNotFound`] if the document does not
    /// exist, or [`GatewayError::Persistence`] on backend failure.
    pub async fn update_document(
        &self,
        collection: &str,
        id: &str,
        patch: &serde_json::Value,
    ) -> Result<Document, GatewayError> {
        if !patch.is_object() {
            return Err(GatewayError::InvalidRequest(
                "update patch must be a JSON object".to_string(),
            ));
        }
        match self {
            Self::Postgres(store) => store.update_document(collection, id, patch).await,
            Self::Memory(store) => store.update_document(collection, id, patch).await,
        }
    }

    /// Deletes a document.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::DocumentNotFound`] if the document does not
    /// exist, or [`GatewayError::Persistence`] on backend failure.
    pub async fn delete_document(&self, collection: &str, id: &str) -> Result<(), GatewayError> {
        match self {
            Self::Postgres(store) => store.delete_document(collection, id).await,
            Self::Memory(store) => store.delete_document(collection, id).await,
        }
    }
}

/// Validates that a query field name is a plain identifier. Field names
/// are interpolated into SQL by the PostgreSQL backend, so anything else
/// is rejected up front.
fn ensure_identifier(field: &str) -> Result<(), GatewayError> {
    let valid = !field.is_empty()
        && field.len() <= 64
        && field
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_');
    if valid {
        Ok(())
    } else {
        Err(GatewayError::InvalidFieldName(field.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    fn memory() -> DocumentStore {
        DocumentStore::Memory(MemoryStore::new())
    }

    #[tokio::test]
    async fn rejects_malicious_filter_field() {
        let store = memory();
        let query = ListQuery::default().with_filter("x' OR '1'='1", "y");
        let result = store.list_documents("announcements", &query).await;
        assert!(matches!(result, Err(GatewayError::InvalidFieldName(_))));
    }

    #[tokio::test]
    async fn rejects_non_object_payload() {
        let store = memory();
        let result = store.create_document("announcements", json!("just a string")).await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn rejects_non_object_patch() {
        let store = memory();
        let result = store
            .update_document("announcements", "id", &json!([1, 2]))
            .await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn delegates_to_memory_backend() {
        let store = memory();
        let doc = store
            .create_document("announcements", json!({"title": "hi"}))
            .await
            .unwrap_or_else(|_| panic!("create failed"));
        let fetched = store.get_document("announcements", &doc.id).await;
        assert!(matches!(fetched, Ok(Some(_))));
    }
}
