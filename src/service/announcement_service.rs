//! Announcement service: CRUD over the announcements collection.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::{ConsoleEvent, EventBus};
use crate::error::GatewayError;
use crate::persistence::{Document, DocumentStore, ListQuery};

/// Collection holding announcement documents.
pub const ANNOUNCEMENTS_COLLECTION: &str = "announcements";

/// Input for posting or editing an announcement.
#[derive(Debug, Clone)]
pub struct AnnouncementInput {
    /// Announcement title.
    pub title: String,
    /// Announcement body text.
    pub body: String,
    /// Identifier of the posting user.
    pub posted_by: String,
}

/// An announcement as read back from the store.
#[derive(Debug, Clone)]
pub struct AnnouncementView {
    /// Document identifier.
    pub id: String,
    /// Announcement title.
    pub title: String,
    /// Announcement body text.
    pub body: String,
    /// Identifier of the posting user.
    pub posted_by: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-edit timestamp.
    pub updated_at: DateTime<Utc>,
}

impl AnnouncementView {
    fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            title: str_field(&doc.data, "title"),
            body: str_field(&doc.data, "body"),
            posted_by: str_field(&doc.data, "postedBy"),
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

/// Orchestration layer for announcement CRUD.
#[derive(Debug)]
pub struct AnnouncementService {
    store: Arc<DocumentStore>,
    event_bus: EventBus,
}

impl AnnouncementService {
    /// Creates a new `AnnouncementService`.
    #[must_use]
    pub fn new(store: Arc<DocumentStore>, event_bus: EventBus) -> Self {
        Self { store, event_bus }
    }

    /// Posts a new announcement.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] for an empty title, or a
    /// persistence error from the store.
    pub async fn create(&self, input: AnnouncementInput) -> Result<AnnouncementView, GatewayError> {
        validate(&input)?;
        let data = json!({
            "title": input.title.trim(),
            "body": input.body,
            "postedBy": input.posted_by,
        });
        let doc = self.store.create_document(ANNOUNCEMENTS_COLLECTION, data).await?;
        let view = AnnouncementView::from_document(&doc);

        let _ = self.event_bus.publish(ConsoleEvent::AnnouncementPosted {
            id: view.id.clone(),
            title: view.title.clone(),
            timestamp: Utc::now(),
        });
        tracing::info!(id = %view.id, "announcement posted");
        Ok(view)
    }

    /// Lists announcements, newest first.
    ///
    /// # Errors
    ///
    /// Returns a persistence error from the store.
    pub async fn list(&self, limit: Option<i64>) -> Result<Vec<AnnouncementView>, GatewayError> {
        let mut query = ListQuery::default();
        query.limit = limit;
        let docs = self.store.list_documents(ANNOUNCEMENTS_COLLECTION, &query).await?;
        Ok(docs.iter().map(AnnouncementView::from_document).collect())
    }

    /// Fetches one announcement.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::DocumentNotFound`] for an unknown id, or a
    /// persistence error from the store.
    pub async fn get(&self, id: &str) -> Result<AnnouncementView, GatewayError> {
        let doc = self
            .store
            .get_document(ANNOUNCEMENTS_COLLECTION, id)
            .await?
            .ok_or_else(|| GatewayError::DocumentNotFound {
                collection: ANNOUNCEMENTS_COLLECTION.to_string(),
                id: id.to_string(),
            })?;
        Ok(AnnouncementView::from_document(&doc))
    }

    /// Edits an announcement's title and body.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] for an empty title,
    /// [`GatewayError::DocumentNotFound`] for an unknown id, or a
    /// persistence error from the store.
    pub async fn update(
        &self,
        id: &str,
        input: AnnouncementInput,
    ) -> Result<AnnouncementView, GatewayError> {
        validate(&input)?;
        let patch = json!({
            "title": input.title.trim(),
            "body": input.body,
        });
        let doc = self
            .store
            .update_document(ANNOUNCEMENTS_COLLECTION, id, &patch)
            .await?;

        let _ = self.event_bus.publish(ConsoleEvent::AnnouncementUpdated {
            id: id.to_string(),
            timestamp: Utc::now(),
        });
        tracing::info!(id, "announcement updated");
        Ok(AnnouncementView::from_document(&doc))
    }

    /// Deletes an announcement.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::DocumentNotFound`] for an unknown id, or a
    /// persistence error from the store.
    pub async fn delete(&self, id: &str) -> Result<(), GatewayError> {
        self.store.delete_document(ANNOUNCEMENTS_COLLECTION, id).await?;

        let _ = self.event_bus.publish(ConsoleEvent::AnnouncementRemoved {
            id: id.to_string(),
            timestamp: Utc::now(),
        });
        tracing::info!(id, "announcement removed");
        Ok(())
    }
}

fn validate(input: &AnnouncementInput) -> Result<(), GatewayError> {
    if input.title.trim().is_empty() {
        return Err(GatewayError::InvalidRequest(
            "title must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn str_field(data: &serde_json::Value, key: &str) -> String {
    data.get(key)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn make_service() -> AnnouncementService {
        let store = Arc::new(DocumentStore::Memory(MemoryStore::new()));
        AnnouncementService::new(store, EventBus::new(100))
    }

    fn input(title: &str) -> AnnouncementInput {
        AnnouncementInput {
            title: title.to_string(),
            body: "Water interruption on Saturday.".to_string(),
            posted_by: "admin-1".to_string(),
        }
    }

    #[tokio::test]
    async fn create_rejects_empty_title() {
        let service = make_service();
        let result = service.create(input("   ")).await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn create_list_get_round_trip() {
        let service = make_service();
        let created = service
            .create(input("Maintenance notice"))
            .await
            .unwrap_or_else(|_| panic!("create failed"));

        let listed = service.list(None).await.unwrap_or_default();
        assert_eq!(listed.len(), 1);

        let fetched = service
            .get(&created.id)
            .await
            .unwrap_or_else(|_| panic!("get failed"));
        assert_eq!(fetched.title, "Maintenance notice");
    }

    #[tokio::test]
    async fn update_edits_title_and_emits_event() {
        let service = make_service();
        let mut rx = service.event_bus.subscribe();
        let created = service
            .create(input("Old title"))
            .await
            .unwrap_or_else(|_| panic!("create failed"));
        let _ = rx.recv().await; // drain AnnouncementPosted

        let updated = service
            .update(&created.id, input("New title"))
            .await
            .unwrap_or_else(|_| panic!("update failed"));
        assert_eq!(updated.title, "New title");

        let event = rx.recv().await;
        let Ok(event) = event else {
            panic!("expected event");
        };
        assert_eq!(event.event_type_str(), "announcement_updated");
    }

    #[tokio::test]
    async fn delete_missing_announcement_is_not_found() {
        let service = make_service();
        let result = service.delete("ghost").await;
        assert!(matches!(result, Err(GatewayError::DocumentNotFound { .. })));
    }
}
