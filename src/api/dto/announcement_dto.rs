//! Announcement DTOs for the CRUD endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::PaginationMeta;
use crate::service::announcement_service::AnnouncementView;

/// Request body for creating or editing an announcement.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AnnouncementRequest {
    /// Announcement title.
    pub title: String,
    /// Announcement body text.
    #[serde(default)]
    pub body: String,
    /// Identifier of the posting user.
    pub posted_by: String,
}

/// An announcement record.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnnouncementDto {
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

impl From<AnnouncementView> for AnnouncementDto {
    fn from(view: AnnouncementView) -> Self {
        Self {
            id: view.id,
            title: view.title,
            body: view.body,
            posted_by: view.posted_by,
            created_at: view.created_at,
            updated_at: view.updated_at,
        }
    }
}

/// Paginated list response for `GET /announcements`.
#[derive(Debug, Serialize, ToSchema)]
pub struct AnnouncementListResponse {
    /// Announcement records, newest first.
    pub data: Vec<AnnouncementDto>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}
