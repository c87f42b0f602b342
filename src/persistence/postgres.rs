//! PostgreSQL implementation of the document store.
//!
//! All collections share one `documents` table with a JSONB payload
//! column; equality filters and payload ordering use the `->>` text
//! extraction operator. Field names are interpolated into SQL and must be
//! pre-validated as plain identifiers (see `store::ensure_identifier`).

use chrono::{DateTime, Utc};
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use super::models::{Document, ListQuery};
use crate::error::GatewayError;

type DocumentRow = (String, serde_json::Value, DateTime<Utc>, DateTime<Utc>);

/// PostgreSQL-backed document store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists documents in a collection.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Persistence`] on database failure.
    pub async fn list_documents(
        &self,
        collection: &str,
        query: &ListQuery,
    ) -> Result<Vec<Document>, GatewayError> {
        let mut qb: QueryBuilder<'_, sqlx::Postgres> =
            QueryBuilder::new("SELECT id, data, created_at, updated_at FROM documents WHERE collection = ");
        qb.push_bind(collection);

        for (field, value) in &query.filters {
            qb.push(" AND data->>'");
            qb.push(field.as_str());
            qb.push("' = ");
            qb.push_bind(value);
        }

        match &query.order_by {
            Some(order) if order.field == "created_at" || order.field == "updated_at" => {
                qb.push(" ORDER BY ");
                qb.push(order.field.as_str());
                qb.push(if order.descending { " DESC" } else { " ASC" });
            }
            Some(order) => {
                qb.push(" ORDER BY data->>'");
                qb.push(order.field.as_str());
                qb.push("'");
                qb.push(if order.descending { " DESC" } else { " ASC" });
            }
            None => {
                qb.push(" ORDER BY created_at DESC");
            }
        }

        if let Some(limit) = query.limit {
            qb.push(" LIMIT ");
            qb.push_bind(limit);
        }

        let rows: Vec<DocumentRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| GatewayError::Persistence(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(id, data, created_at, updated_at)| Document {
                id,
                collection: collection.to_string(),
                data,
                created_at,
                updated_at,
            })
            .collect())
    }

    /// Fetches a single document by id, returning `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Persistence`] on database failure.
    pub async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, GatewayError> {
        let row: Option<DocumentRow> = sqlx::query_as(
            "SELECT id, data, created_at, updated_at FROM documents \
             WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| GatewayError::Persistence(e.to_string()))?;

        Ok(row.map(|(id, data, created_at, updated_at)| Document {
            id,
            collection: collection.to_string(),
            data,
            created_at,
            updated_at,
        }))
    }

    /// Inserts a new document with a server-generated UUID v4 id.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Persistence`] on database failure.
    pub async fn create_document(
        &self,
        collection: &str,
        data: serde_json::Value,
    ) -> Result<Document, GatewayError> {
        let id = Uuid::new_v4().to_string();
        let (created_at, updated_at): (DateTime<Utc>, DateTime<Utc>) = sqlx::query_as(
            "INSERT INTO documents (id, collection, data) VALUES ($1, $2, $3) \
             RETURNING created_at, updated_at",
        )
        .bind(&id)
        .bind(collection)
        .bind(&data)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| GatewayError::Persistence(e.to_string()))?;

        Ok(Document {
            id,
            collection: collection.to_string(),
            data,
            created_at,
            updated_at,
        })
    }

    /// Shallow-merges `patch` into an existing document's payload.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::DocumentNotFound`] when the document does
    /// not exist, or [`GatewayError::Persistence`] on database failure.
    pub async fn update_document(
        &self,
        collection: &str,
        id: &str,
        patch: &serde_json::Value,
    ) -> Result<Document, GatewayError> {
        let row: Option<DocumentRow> = sqlx::query_as(
            "UPDATE documents SET data = data || $3, updated_at = now() \
             WHERE collection = $1 AND id = $2 \
             RETURNING id, data, created_at, updated_at",
        )
        .bind(collection)
        .bind(id)
        .bind(patch)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| GatewayError::Persistence(e.to_string()))?;

        row.map(|(id, data, created_at, updated_at)| Document {
            id,
            collection: collection.to_string(),
            data,
            created_at,
            updated_at,
        })
        .ok_or_else(|| GatewayError::DocumentNotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        })
    }

    /// Deletes a document.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::DocumentNotFound`] when the document does
    /// not exist, or [`GatewayError::Persistence`] on database failure.
    pub async fn delete_document(&self, collection: &str, id: &str) -> Result<(), GatewayError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| GatewayError::Persistence(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(GatewayError::DocumentNotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}
