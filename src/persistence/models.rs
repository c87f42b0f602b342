//! Document model and list-query parameters for the store contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An untyped document as stored in a collection.
///
/// `data` is deliberately schemaless — typed extraction happens once at the
/// domain boundary (`domain::records`), not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Store-assigned identifier (UUID v4 string).
    pub id: String,
    /// Collection the document belongs to.
    pub collection: String,
    /// Schemaless JSON payload.
    pub data: serde_json::Value,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Server-side last-update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Sort specification for list queries.
#[derive(Debug, Clone)]
pub struct OrderBy {
    /// Field to order by: `created_at`, `updated_at`, or a top-level
    /// payload field (compared as text).
    pub field: String,
    /// Whether to sort descending.
    pub descending: bool,
}

/// Parameters for `list_documents`.
///
/// Mirrors the read contract the console needs: equality filters on
/// top-level payload fields, an optional sort, and an optional limit.
/// When no sort is given, results come back newest-first.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    /// `field == value` filters, all of which must match. Values are
    /// compared against the text rendering of the payload field.
    pub filters: Vec<(String, String)>,
    /// Optional sort specification.
    pub order_by: Option<OrderBy>,
    /// Optional maximum number of documents to return.
    pub limit: Option<i64>,
}

impl ListQuery {
    /// Adds an equality filter.
    #[must_use]
    pub fn with_filter(mut self, field: &str, value: &str) -> Self {
        self.filters.push((field.to_string(), value.to_string()));
        self
    }

    /// Sets the sort specification.
    #[must_use]
    pub fn with_order(mut self, field: &str, descending: bool) -> Self {
        self.order_by = Some(OrderBy {
            field: field.to_string(),
            descending,
        });
        self
    }

    /// Sets the result limit.
    #[must_use]
    pub const fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}
