//! Feedback service: submissions and the rating summary.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::{ConsoleEvent, EventBus};
use crate::error::GatewayError;
use crate::persistence::{Document, DocumentStore, ListQuery};

/// Collection holding resident feedback documents.
pub const FEEDBACK_COLLECTION: &str = "feedback";

/// Input for submitting feedback.
#[derive(Debug, Clone)]
pub struct NewFeedback {
    /// Rating from 1 to 5.
    pub rating: u8,
    /// Free-form comment, if provided.
    pub comment: Option<String>,
    /// Identifier of the submitting resident.
    pub submitted_by: String,
}

/// A feedback entry as read back from the store.
#[derive(Debug, Clone)]
pub struct FeedbackView {
    /// Document identifier.
    pub id: String,
    /// Rating from 1 to 5; 0 when the stored value was malformed.
    pub rating: u8,
    /// Free-form comment, if provided.
    pub comment: Option<String>,
    /// Identifier of the submitting resident.
    pub submitted_by: String,
    /// Submission timestamp.
    pub created_at: DateTime<Utc>,
}

impl FeedbackView {
    fn from_document(doc: &Document) -> Self {
        let rating = doc
            .data
            .get("rating")
            .and_then(|v| v.as_u64())
            .and_then(|n| u8::try_from(n).ok())
            .filter(|n| (1..=5).contains(n))
            .unwrap_or(0);
        Self {
            id: doc.id.clone(),
            rating,
            comment: doc
                .data
                .get("comment")
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(ToString::to_string),
            submitted_by: doc
                .data
                .get("submittedBy")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            created_at: doc.created_at,
        }
    }
}

/// Aggregate rating figures for the feedback dashboard. Computed by simple
/// reduction over the listed entries; malformed ratings are excluded from
/// the average rather than dragging it toward zero.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackSummary {
    /// Number of feedback entries listed.
    pub count: usize,
    /// Mean of the valid (1–5) ratings, or `None` when there are none.
    pub average_rating: Option<f64>,
}

/// Orchestration layer for feedback submissions.
#[derive(Debug)]
pub struct FeedbackService {
    store: Arc<DocumentStore>,
    event_bus: EventBus,
}

impl FeedbackService {
    /// Creates a new `FeedbackService`.
    #[must_use]
    pub fn new(store: Arc<DocumentStore>, event_bus: EventBus) -> Self {
        Self { store, event_bus }
    }

    /// Submits a feedback entry.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] for a rating outside 1–5,
    /// or a persistence error from the store.
    pub async fn submit(&self, new: NewFeedback) -> Result<FeedbackView, GatewayError> {
        if !(1..=5).contains(&new.rating) {
            return Err(GatewayError::InvalidRequest(format!(
                "rating must be between 1 and 5, got {}",
                new.rating
            )));
        }
        let data = json!({
            "rating": new.rating,
            "comment": new.comment,
            "submittedBy": new.submitted_by,
        });
        let doc = self.store.create_document(FEEDBACK_COLLECTION, data).await?;
        let view = FeedbackView::from_document(&doc);

        let _ = self.event_bus.publish(ConsoleEvent::FeedbackSubmitted {
            id: view.id.clone(),
            rating: view.rating,
            timestamp: Utc::now(),
        });
        tracing::info!(id = %view.id, rating = view.rating, "feedback submitted");
        Ok(view)
    }

    /// Lists feedback entries (newest first) together with their rating
    /// summary.
    ///
    /// # Errors
    ///
    /// Returns a persistence error from the store.
    pub async fn list(
        &self,
        limit: Option<i64>,
    ) -> Result<(Vec<FeedbackView>, FeedbackSummary), GatewayError> {
        let mut query = ListQuery::default();
        query.limit = limit;
        let docs = self.store.list_documents(FEEDBACK_COLLECTION, &query).await?;
        let entries: Vec<FeedbackView> = docs.iter().map(FeedbackView::from_document).collect();
        let summary = summarize(&entries);
        Ok((entries, summary))
    }
}

/// Reduces listed entries to the dashboard summary figures.
fn summarize(entries: &[FeedbackView]) -> FeedbackSummary {
    let valid: Vec<u8> = entries
        .iter()
        .map(|e| e.rating)
        .filter(|r| (1..=5).contains(r))
        .collect();
    let average_rating = if valid.is_empty() {
        None
    } else {
        #[allow(clippy::cast_precision_loss)]
        Some(valid.iter().map(|r| f64::from(*r)).sum::<f64>() / valid.len() as f64)
    };
    FeedbackSummary {
        count: entries.len(),
        average_rating,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn make_service() -> FeedbackService {
        let store = Arc::new(DocumentStore::Memory(MemoryStore::new()));
        FeedbackService::new(store, EventBus::new(100))
    }

    fn feedback(rating: u8) -> NewFeedback {
        NewFeedback {
            rating,
            comment: None,
            submitted_by: "resident-1".to_string(),
        }
    }

    #[tokio::test]
    async fn submit_rejects_out_of_range_rating() {
        let service = make_service();
        assert!(service.submit(feedback(0)).await.is_err());
        assert!(service.submit(feedback(6)).await.is_err());
    }

    #[tokio::test]
    async fn average_is_mean_of_submitted_ratings() {
        let service = make_service();
        for rating in [5, 4, 3] {
            let _ = service.submit(feedback(rating)).await;
        }
        let (entries, summary) = service
            .list(None)
            .await
            .unwrap_or_else(|_| panic!("list failed"));
        assert_eq!(entries.len(), 3);
        assert_eq!(summary.count, 3);
        let Some(avg) = summary.average_rating else {
            panic!("expected an average");
        };
        assert!((avg - 4.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn empty_list_has_no_average() {
        let service = make_service();
        let (entries, summary) = service
            .list(None)
            .await
            .unwrap_or_else(|_| panic!("list failed"));
        assert!(entries.is_empty());
        assert_eq!(summary.average_rating, None);
    }

    #[test]
    fn malformed_ratings_are_excluded_from_average() {
        let views = vec![
            FeedbackView {
                id: "a".to_string(),
                rating: 4,
                comment: None,
                submitted_by: String::new(),
                created_at: Utc::now(),
            },
            FeedbackView {
                id: "b".to_string(),
                rating: 0, // malformed in store
                comment: None,
                submitted_by: String::new(),
                created_at: Utc::now(),
            },
        ];
        let summary = summarize(&views);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.average_rating, Some(4.0));
    }
}
